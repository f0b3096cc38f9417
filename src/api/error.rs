// ==========================================
// 供应链场景分析引擎 - API层错误类型
// ==========================================
// 职责: 统一引擎/导入/配置错误, 转换为展示层可读的错误消息
// ==========================================

use crate::config::ConfigError;
use crate::engine::error::EngineError;
use crate::importer::error::ImportError;
use thiserror::Error;

/// API层错误类型
/// 所有错误信息必须包含显式原因
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 请求错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("输入为空: {0}")]
    EmptyInput(String),

    // ==========================================
    // 数据错误
    // ==========================================
    /// 除零 / 悬空引用等数据层面的问题
    #[error("数据完整性错误: {0}")]
    DataIntegrity(String),

    #[error("数据导入失败: {0}")]
    ImportError(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 EngineError 转换
// ==========================================
impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::EmptyInput(msg) => ApiError::EmptyInput(msg),
            e @ EngineError::DivideByZero { .. } => ApiError::DataIntegrity(e.to_string()),
            e @ EngineError::ReferenceError { .. } => ApiError::DataIntegrity(e.to_string()),
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::FileNotFound(path) => ApiError::NotFound(format!("文件不存在: {}", path)),
            e @ (ImportError::MissingBaseline
            | ImportError::DuplicateScenario(_)
            | ImportError::DuplicateNode(_)) => ApiError::DataIntegrity(e.to_string()),
            ImportError::InternalError(msg) => ApiError::InternalError(msg),
            ImportError::Other(e) => ApiError::Other(e),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
