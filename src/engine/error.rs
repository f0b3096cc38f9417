// ==========================================
// 供应链场景分析引擎 - 引擎层错误类型
// ==========================================
// 分类: 除零 (局部兜底) / 引用缺失 (单条边失败) / 空输入 (边界拒绝)
// ==========================================

use crate::domain::render::EndpointRole;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineError {
    /// 基准值为 0 或驱动值相同
    #[error("除零: {context}")]
    DivideByZero { context: String },

    /// 边引用了不存在的节点
    #[error("节点引用缺失: edge#{edge_index} {endpoint}={missing_id}")]
    ReferenceError {
        edge_index: usize,
        endpoint: EndpointRole,
        missing_id: String,
    },

    /// 场景集或指标集为空
    #[error("输入为空: {0}")]
    EmptyInput(String),
}

impl EngineError {
    pub fn divide_by_zero(context: impl Into<String>) -> Self {
        EngineError::DivideByZero {
            context: context.into(),
        }
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
