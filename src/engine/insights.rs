// ==========================================
// 供应链场景分析引擎 - 场景洞察
// ==========================================
// 职责: 最优场景识别 + 仓库利用率分档
// ==========================================

use crate::config::AnalyticsConfig;
use crate::domain::kpi::KpiRecord;
use crate::domain::types::UtilizationBand;
use crate::domain::warehouse::WarehouseUtilization;
use crate::engine::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};

/// 各维度最优场景
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioInsights {
    /// 总成本最低
    pub best_cost: String,
    /// 订单满足率最高
    pub best_fulfillment: String,
    /// 利润改善最大
    pub best_profit: String,
}

/// 单仓库利用率 + 分档
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilizationEntry {
    pub warehouse_id: String,
    pub utilization_pct: f64,
    pub band: UtilizationBand,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioInsightEngine {
    utilization_target_pct: f64,
    utilization_max_pct: f64,
}

impl Default for ScenarioInsightEngine {
    fn default() -> Self {
        Self::new(&AnalyticsConfig::default())
    }
}

impl ScenarioInsightEngine {
    pub fn new(config: &AnalyticsConfig) -> Self {
        Self {
            utilization_target_pct: config.utilization_target_pct,
            utilization_max_pct: config.utilization_max_pct,
        }
    }

    /// 识别各维度最优场景 (并列时取先出现者)
    pub fn best_scenarios(&self, records: &[KpiRecord]) -> EngineResult<ScenarioInsights> {
        let first = records
            .first()
            .ok_or_else(|| EngineError::EmptyInput("场景集为空".to_string()))?;

        let mut best_cost = first;
        let mut best_fulfillment = first;
        let mut best_profit = first;

        for r in &records[1..] {
            if r.total_cost < best_cost.total_cost {
                best_cost = r;
            }
            if r.order_fulfillment_rate > best_fulfillment.order_fulfillment_rate {
                best_fulfillment = r;
            }
            if r.profit_improvement > best_profit.profit_improvement {
                best_profit = r;
            }
        }

        Ok(ScenarioInsights {
            best_cost: best_cost.scenario_name.clone(),
            best_fulfillment: best_fulfillment.scenario_name.clone(),
            best_profit: best_profit.scenario_name.clone(),
        })
    }

    /// 利用率分档: < 目标线 / < 上限 / 其余
    pub fn classify_utilization(&self, utilization_pct: f64) -> UtilizationBand {
        if utilization_pct < self.utilization_target_pct {
            UtilizationBand::WithinTarget
        } else if utilization_pct < self.utilization_max_pct {
            UtilizationBand::NearCapacity
        } else {
            UtilizationBand::OverCapacity
        }
    }

    pub fn utilization_report(&self, rows: &[WarehouseUtilization]) -> Vec<UtilizationEntry> {
        rows.iter()
            .map(|row| UtilizationEntry {
                warehouse_id: row.warehouse_id.clone(),
                utilization_pct: row.utilization_pct,
                band: self.classify_utilization(row.utilization_pct),
            })
            .collect()
    }
}
