// ==========================================
// 供应链场景分析引擎 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .csv/.json）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("JSON 解析失败: {0}")]
    JsonParseError(String),

    // ===== 字段映射错误 =====
    /// 表头缺少必需列 (整表失败)
    #[error("表头缺少必需列 (表 {table}, 列 {column})")]
    MissingColumn { table: String, column: String },

    #[error("必填字段缺失 (行 {row}, 字段 {field})")]
    MissingField { row: usize, field: String },

    #[error("字段值无效 (行 {row}, 字段 {field}, 值 {value}): {message}")]
    InvalidValue {
        row: usize,
        field: String,
        value: String,
        message: String,
    },

    #[error("未知节点类型 (行 {row}): {value}（仅支持 warehouse/region）")]
    UnknownNodeType { row: usize, value: String },

    // ===== 数据集结构错误 =====
    #[error("缺少基准场景 (scenario_name = \"Baseline\")")]
    MissingBaseline,

    #[error("场景名称重复: {0}")]
    DuplicateScenario(String),

    #[error("节点 ID 重复: {0}")]
    DuplicateNode(String),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// 行级错误涉及的字段名
    pub fn field(&self) -> Option<&str> {
        match self {
            ImportError::MissingField { field, .. } | ImportError::InvalidValue { field, .. } => {
                Some(field)
            }
            ImportError::UnknownNodeType { .. } => Some("type"),
            ImportError::MissingColumn { column, .. } => Some(column),
            _ => None,
        }
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<serde_json::Error>
impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::JsonParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
