// ==========================================
// 供应链场景分析引擎 - 配置层
// ==========================================
// 职责: 分析/渲染配置管理, 支持 JSON 文件与环境变量覆写
// ==========================================

pub mod analytics_config;
pub mod error;

// 重导出核心配置
pub use analytics_config::{env_keys, AnalyticsConfig, EncodingConfig};
pub use error::{ConfigError, ConfigResult};
