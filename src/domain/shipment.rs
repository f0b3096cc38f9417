// ==========================================
// 供应链场景分析引擎 - 基准发运与备货记录
// ==========================================
// 来源: <root>/Baseline/shipments.csv, <root>/Baseline/stocking.csv
// 粒度: 仓库 × 区域 × 产品 (发运), 仓库 × 产品 (备货)
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// ShipmentRecord - 发运分配记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentRecord {
    pub warehouse_id: String,
    pub region: String,
    pub product_id: String,

    /// 发运量 (非负)
    pub quantity: f64,

    /// 运输成本 (非负)
    pub transport_cost: f64,

    /// 在途天数 (非负)
    pub transit_time_days: f64,

    /// 是否满足交付时效目标
    pub meets_service_target: bool,
}

// ==========================================
// StockingRecord - 备货决策记录
// ==========================================
/// 一行表示某仓库备有某产品
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockingRecord {
    pub warehouse_id: String,
    pub product_id: String,
}
