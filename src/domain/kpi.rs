// ==========================================
// 供应链场景分析引擎 - KPI 记录模型
// ==========================================
// 职责: 单个场景的绩效指标 (一条记录 = 一次优化运行)
// 生命周期: 加载时构造一次, 之后只读
// ==========================================

use crate::domain::types::{CostComponent, ScenarioMetric};
use serde::{Deserialize, Serialize};

/// 基准场景名称
pub const BASELINE_SCENARIO: &str = "Baseline";

// ==========================================
// ScenarioParameters - 场景参数
// ==========================================
/// 场景参数 (缺省: 1.0 / 1.0 / 0.95)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParameters {
    /// 产能系数
    #[serde(default = "default_multiplier")]
    pub capacity_multiplier: f64,

    /// 运输成本系数
    #[serde(default = "default_multiplier")]
    pub transport_cost_multiplier: f64,

    /// 服务水平目标 (0~1)
    #[serde(default = "default_service_level_target")]
    pub service_level_target: f64,
}

fn default_multiplier() -> f64 {
    1.0
}

fn default_service_level_target() -> f64 {
    0.95
}

impl Default for ScenarioParameters {
    fn default() -> Self {
        Self {
            capacity_multiplier: default_multiplier(),
            transport_cost_multiplier: default_multiplier(),
            service_level_target: default_service_level_target(),
        }
    }
}

// ==========================================
// KpiRecord - 场景 KPI 记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiRecord {
    /// 场景名称 (唯一键)
    pub scenario_name: String,

    // ===== 成本 =====
    pub total_cost: f64,
    pub total_transportation_cost: f64,
    pub total_holding_cost: f64,
    pub total_stockout_cost: f64,

    // ===== 服务 (0~1) =====
    pub order_fulfillment_rate: f64,
    pub on_time_delivery_rate: f64,

    // ===== 数量 =====
    pub total_demand: f64,
    pub total_fulfilled: f64,
    pub total_stockouts: f64,

    // ===== 利润 =====
    pub profit_improvement: f64,
    pub current_profit: f64,
    pub estimated_new_profit: f64,

    /// 平均仓库利用率 (0~100)
    pub avg_warehouse_utilization: f64,

    /// 场景参数
    pub parameters: ScenarioParameters,

    /// 优化前延迟交付率 (0~1), 仅 kpis.json 提供
    #[serde(default)]
    pub current_late_delivery_rate: Option<f64>,

    /// 求解状态 (如 "Optimal")
    #[serde(default)]
    pub optimization_status: Option<String>,

    /// 求解耗时 (秒)
    #[serde(default)]
    pub solve_time_seconds: Option<f64>,
}

impl KpiRecord {
    /// 是否为基准场景
    pub fn is_baseline(&self) -> bool {
        self.scenario_name == BASELINE_SCENARIO
    }

    /// 按指标取值
    pub fn metric_value(&self, metric: ScenarioMetric) -> f64 {
        match metric {
            ScenarioMetric::TotalCost => self.total_cost,
            ScenarioMetric::TransportationCost => self.total_transportation_cost,
            ScenarioMetric::HoldingCost => self.total_holding_cost,
            ScenarioMetric::StockoutCost => self.total_stockout_cost,
            ScenarioMetric::OrderFulfillmentRate => self.order_fulfillment_rate,
            ScenarioMetric::OnTimeDeliveryRate => self.on_time_delivery_rate,
            ScenarioMetric::LateDeliveryRate => 1.0 - self.on_time_delivery_rate,
            ScenarioMetric::TotalDemand => self.total_demand,
            ScenarioMetric::TotalFulfilled => self.total_fulfilled,
            ScenarioMetric::TotalStockouts => self.total_stockouts,
            ScenarioMetric::ProfitImprovement => self.profit_improvement,
            ScenarioMetric::CurrentProfit => self.current_profit,
            ScenarioMetric::EstimatedNewProfit => self.estimated_new_profit,
            ScenarioMetric::AvgWarehouseUtilization => self.avg_warehouse_utilization,
            ScenarioMetric::CapacityMultiplier => self.parameters.capacity_multiplier,
            ScenarioMetric::TransportCostMultiplier => self.parameters.transport_cost_multiplier,
            ScenarioMetric::ServiceLevelTarget => self.parameters.service_level_target,
        }
    }

    /// 成本分量金额
    pub fn cost_component(&self, component: CostComponent) -> f64 {
        self.metric_value(component.as_metric())
    }

    /// 成本分量之和
    pub fn component_cost_sum(&self) -> f64 {
        CostComponent::ALL
            .iter()
            .map(|c| self.cost_component(*c))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> KpiRecord {
        KpiRecord {
            scenario_name: BASELINE_SCENARIO.to_string(),
            total_cost: 100.0,
            total_transportation_cost: 70.0,
            total_holding_cost: 10.0,
            total_stockout_cost: 20.0,
            order_fulfillment_rate: 0.9,
            on_time_delivery_rate: 0.8,
            total_demand: 1000.0,
            total_fulfilled: 900.0,
            total_stockouts: 100.0,
            profit_improvement: 5.0,
            current_profit: -3.0,
            estimated_new_profit: 2.0,
            avg_warehouse_utilization: 70.0,
            parameters: ScenarioParameters::default(),
            current_late_delivery_rate: None,
            optimization_status: None,
            solve_time_seconds: None,
        }
    }

    #[test]
    fn test_default_parameters() {
        let p = ScenarioParameters::default();
        assert_eq!(p.capacity_multiplier, 1.0);
        assert_eq!(p.transport_cost_multiplier, 1.0);
        assert_eq!(p.service_level_target, 0.95);
    }

    #[test]
    fn test_parameters_deserialize_with_defaults() {
        let p: ScenarioParameters =
            serde_json::from_str(r#"{"capacity_multiplier": 1.2}"#).unwrap();
        assert_eq!(p.capacity_multiplier, 1.2);
        assert_eq!(p.transport_cost_multiplier, 1.0);
        assert_eq!(p.service_level_target, 0.95);
    }

    #[test]
    fn test_metric_value_and_late_rate() {
        let record = sample();
        assert!(record.is_baseline());
        assert_eq!(record.metric_value(ScenarioMetric::TotalCost), 100.0);
        assert!((record.metric_value(ScenarioMetric::LateDeliveryRate) - 0.2).abs() < 1e-12);
        assert_eq!(record.component_cost_sum(), 100.0);
    }
}
