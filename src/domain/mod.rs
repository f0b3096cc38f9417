// ==========================================
// 供应链场景分析引擎 - 领域模型层
// ==========================================
// 职责: 定义类型化记录、封闭枚举、渲染值对象
// 红线: 不含解析逻辑, 不含计算逻辑
// ==========================================

pub mod dataset;
pub mod kpi;
pub mod network;
pub mod render;
pub mod shipment;
pub mod types;
pub mod warehouse;

// 重导出核心类型
pub use dataset::{AnalysisMetadata, ScenarioDataset};
pub use kpi::{KpiRecord, ScenarioParameters, BASELINE_SCENARIO};
pub use network::{FlowFilter, FlowFilterKey, NetworkEdge, NetworkNode};
pub use render::{EndpointRole, RenderEdge, RenderNode, Rgb};
pub use shipment::{ShipmentRecord, StockingRecord};
pub use types::{
    CostComponent, MetricDirection, NodeType, RatioMetric, ScenarioMetric, UtilizationBand,
};
pub use warehouse::WarehouseUtilization;
