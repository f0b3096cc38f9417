// ==========================================
// 供应链场景分析引擎 - 核心库
// ==========================================
// 技术栈: Rust + serde + tracing
// 系统定位: 决策支持系统 (只读分析, 不做求解)
// 输入: 外部优化器产出的场景 KPI 与网络流结果
// 输出: 派生指标 / 归一化分数 / 渲染就绪网络图
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 纯计算
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 分析系数
pub mod config;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// API 层 - 驾驶舱接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    CostComponent, MetricDirection, NodeType, RatioMetric, ScenarioMetric, UtilizationBand,
};

// 领域实体
pub use domain::{
    AnalysisMetadata, FlowFilter, KpiRecord, NetworkEdge, NetworkNode, RenderEdge, RenderNode,
    Rgb, ScenarioDataset, ScenarioParameters, ShipmentRecord, StockingRecord,
    WarehouseUtilization, BASELINE_SCENARIO,
};

// 引擎
pub use engine::{
    DerivedMetrics, DerivedMetricsCalculator, DerivedValue, EngineError, FlowEncoder, MetricSpec,
    MultiMetricNormalizer, NetworkStatisticsEngine, NormalizedScoreTable, RenderGraph,
    ScenarioInsightEngine,
};

// 导入
pub use importer::{DatasetBuilder, DqReport, ImportError, ResultsLoader};

// 配置
pub use config::AnalyticsConfig;

// API
pub use api::{ApiError, ApiResult, ScenarioDashboardApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "供应链场景分析引擎";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
