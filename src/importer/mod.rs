// ==========================================
// 供应链场景分析引擎 - 导入层
// ==========================================
// 职责: 外部优化结果 → 类型化记录 → 不可变数据集
// 支持: CSV, JSON
// 红线: 缺失/无效字段在这里失败或被跳过, 不进入引擎层
// ==========================================

// 模块声明
pub mod dataset_builder;
pub mod dq_validator;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod results_loader;

// 重导出核心类型
pub use dataset_builder::DatasetBuilder;
pub use dq_validator::{DqLevel, DqReport, DqValidator, DqViolation};
pub use error::{ImportError, ImportResult};
pub use field_mapper::{
    EdgeRow, KpiRow, NodeRow, ShipmentRow, StockingRow, TableRow, UtilizationRow,
};
pub use file_parser::{
    parse_edges_csv, parse_kpi_csv, parse_kpi_json, parse_metadata_json, parse_nodes_csv,
    parse_scenario_kpi_json, parse_shipments_csv, parse_stocking_csv, parse_utilization_csv,
    ParsedTable,
};
pub use results_loader::{result_files, ResultsLoader};
