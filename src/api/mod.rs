// ==========================================
// 供应链场景分析引擎 - API 层
// ==========================================
// 职责: 向展示层暴露场景对比、归一化、网络流与洞察查询
// ==========================================

pub mod dashboard_api;
pub mod error;

pub use dashboard_api::ScenarioDashboardApi;
pub use error::{ApiError, ApiResult};
