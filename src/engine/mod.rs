// ==========================================
// 供应链场景分析引擎 - 引擎层
// ==========================================
// 职责: 派生指标 / 多指标归一化 / 网络流编码 / 统计与洞察
// 红线: 引擎无状态, 不做 I/O, 同输入同输出
// ==========================================

pub mod cache;
pub mod derived_metrics;
pub mod error;
pub mod flow_encoder;
pub mod insights;
pub mod network_stats;
pub mod normalizer;

// 重导出核心引擎
pub use cache::{ComputeCache, NormalizationKey};
pub use derived_metrics::{
    DerivedMetrics, DerivedMetricsCalculator, DerivedValue, MetricFault, ParameterAdjustments,
    NOT_AVAILABLE, RELATIVE_CHANGE_METRICS,
};
pub use error::{EngineError, EngineResult};
pub use flow_encoder::{CostColorScale, EdgeFault, FlowEncoder, RenderGraph};
pub use insights::{ScenarioInsightEngine, ScenarioInsights, UtilizationEntry};
pub use network_stats::{
    HistogramBin, NetworkStatistics, NetworkStatisticsEngine, ShipmentSummary,
};
pub use normalizer::{
    default_comparison_metrics, normalize_values, MetricSpec, MultiMetricNormalizer,
    NormalizedRow, NormalizedScoreTable,
};
