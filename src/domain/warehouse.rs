// ==========================================
// 供应链场景分析引擎 - 仓库利用率
// ==========================================

use serde::{Deserialize, Serialize};

/// 单仓库利用率 (来自 warehouse_utilization 表)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseUtilization {
    pub warehouse_id: String,

    /// 利用率 (0~100, 允许超过 100 表示超负荷)
    pub utilization_pct: f64,
}
