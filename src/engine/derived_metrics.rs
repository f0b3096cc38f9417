// ==========================================
// 供应链场景分析引擎 - 派生指标计算器
// ==========================================
// 职责: 由原始 KPI 计算二级指标 (对比基准差值/弹性/成本占比/增长余量)
// 输入: 基准 KpiRecord + 目标 KpiRecord
// 输出: DerivedMetrics (不可定义的项以 N/A 标记, 不中断)
// ==========================================

use crate::domain::kpi::KpiRecord;
use crate::domain::types::{CostComponent, RatioMetric, ScenarioMetric};
use crate::engine::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 不可定义值的展示哨兵
pub const NOT_AVAILABLE: &str = "N/A";

/// derive() 计算相对变化的指标集合
pub const RELATIVE_CHANGE_METRICS: [ScenarioMetric; 7] = [
    ScenarioMetric::TotalCost,
    ScenarioMetric::TransportationCost,
    ScenarioMetric::HoldingCost,
    ScenarioMetric::StockoutCost,
    ScenarioMetric::ProfitImprovement,
    ScenarioMetric::TotalFulfilled,
    ScenarioMetric::TotalStockouts,
];

// ==========================================
// DerivedValue - 可能不可定义的派生值
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DerivedValue {
    Defined { value: f64 },
    Undefined { reason: String },
}

impl DerivedValue {
    pub fn defined(value: f64) -> Self {
        DerivedValue::Defined { value }
    }

    pub fn undefined(reason: impl Into<String>) -> Self {
        DerivedValue::Undefined {
            reason: reason.into(),
        }
    }

    /// 由引擎结果转换 (错误 → Undefined)
    pub fn from_result(result: EngineResult<f64>) -> Self {
        match result {
            Ok(value) => DerivedValue::Defined { value },
            Err(e) => DerivedValue::Undefined {
                reason: e.to_string(),
            },
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            DerivedValue::Defined { value } => Some(*value),
            DerivedValue::Undefined { .. } => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, DerivedValue::Defined { .. })
    }

    /// 不可定义时返回哨兵值
    pub fn or_sentinel(&self, sentinel: f64) -> f64 {
        self.value().unwrap_or(sentinel)
    }

    /// 格式化展示, 不可定义时为 "N/A"
    pub fn format_with<F>(&self, f: F) -> String
    where
        F: FnOnce(f64) -> String,
    {
        match self {
            DerivedValue::Defined { value } => f(*value),
            DerivedValue::Undefined { .. } => NOT_AVAILABLE.to_string(),
        }
    }
}

impl fmt::Display for DerivedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DerivedValue::Defined { value } => write!(f, "{:.2}", value),
            DerivedValue::Undefined { .. } => write!(f, "{}", NOT_AVAILABLE),
        }
    }
}

/// 单项派生失败记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricFault {
    pub item: String,
    pub reason: String,
}

/// 场景参数调整幅度 (%)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterAdjustments {
    /// (capacity_multiplier - 1) * 100
    pub capacity_change_pct: f64,
    /// (transport_cost_multiplier - 1) * 100
    pub transport_cost_change_pct: f64,
    /// service_level_target * 100
    pub service_level_target_pct: f64,
}

// ==========================================
// DerivedMetrics - 派生指标值对象
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub scenario_name: String,
    pub baseline_name: String,

    /// 总成本绝对差 (目标 - 基准)
    pub total_cost_delta: f64,
    pub cost_component_deltas: BTreeMap<CostComponent, f64>,

    /// 百分点差值
    pub fulfillment_pp_delta: f64,
    pub on_time_pp_delta: f64,

    /// 相对变化 (基准为 0 时 Undefined)
    pub relative_changes: BTreeMap<ScenarioMetric, DerivedValue>,

    /// 目标场景成本占比
    pub cost_shares: BTreeMap<CostComponent, f64>,

    pub parameter_adjustments: ParameterAdjustments,

    /// 增长余量 (%) = 100 - 平均利用率
    pub growth_headroom_pct: f64,

    /// 延迟率降幅 (%)
    pub late_delivery_reduction_pct: DerivedValue,

    /// 利润摆幅 (%)
    pub profit_swing_pct: DerivedValue,

    /// 所有不可定义项
    pub faults: Vec<MetricFault>,
}

impl DerivedMetrics {
    pub fn relative_change(&self, metric: ScenarioMetric) -> Option<&DerivedValue> {
        self.relative_changes.get(&metric)
    }

    pub fn has_faults(&self) -> bool {
        !self.faults.is_empty()
    }
}

// ==========================================
// DerivedMetricsCalculator - 派生指标计算器
// ==========================================
// 红线: 无状态, 所有方法都是纯函数
#[derive(Debug, Default, Clone, Copy)]
pub struct DerivedMetricsCalculator;

impl DerivedMetricsCalculator {
    pub fn new() -> Self {
        Self
    }

    // ==========================================
    // 基础运算
    // ==========================================

    /// 百分点差值 = (目标 - 基准) × 100
    pub fn percentage_point_delta(
        &self,
        baseline: &KpiRecord,
        target: &KpiRecord,
        metric: RatioMetric,
    ) -> f64 {
        let m = metric.as_metric();
        (target.metric_value(m) - baseline.metric_value(m)) * 100.0
    }

    /// 相对变化 = (目标 - 基准) / |基准|
    ///
    /// 基准为 0 时返回 DivideByZero, 由调用方替换为哨兵
    pub fn relative_change(
        &self,
        baseline: &KpiRecord,
        target: &KpiRecord,
        metric: ScenarioMetric,
    ) -> EngineResult<f64> {
        let base = baseline.metric_value(metric);
        if base == 0.0 {
            return Err(EngineError::divide_by_zero(format!(
                "{} 的基准值为 0 (scenario={})",
                metric, baseline.scenario_name
            )));
        }
        Ok((target.metric_value(metric) - base) / base.abs())
    }

    /// 成本占比 = 分量 / 总成本 (总成本为 0 时定义为 0)
    pub fn cost_share(&self, record: &KpiRecord, component: CostComponent) -> f64 {
        if record.total_cost == 0.0 {
            return 0.0;
        }
        record.cost_component(component) / record.total_cost
    }

    /// 弹性 = (输出A - 输出B) / (驱动A - 驱动B)
    ///
    /// 两个场景驱动值相同时返回 DivideByZero
    pub fn elasticity(
        &self,
        output: ScenarioMetric,
        driver: ScenarioMetric,
        scenario_a: &KpiRecord,
        scenario_b: &KpiRecord,
    ) -> EngineResult<f64> {
        let driver_delta = scenario_a.metric_value(driver) - scenario_b.metric_value(driver);
        if driver_delta == 0.0 {
            return Err(EngineError::divide_by_zero(format!(
                "{} 在 {} 与 {} 中取值相同",
                driver, scenario_a.scenario_name, scenario_b.scenario_name
            )));
        }
        let output_delta = scenario_a.metric_value(output) - scenario_b.metric_value(output);
        Ok(output_delta / driver_delta)
    }

    // ==========================================
    // 场景上下文指标
    // ==========================================

    pub fn parameter_adjustments(&self, record: &KpiRecord) -> ParameterAdjustments {
        let p = &record.parameters;
        ParameterAdjustments {
            capacity_change_pct: (p.capacity_multiplier - 1.0) * 100.0,
            transport_cost_change_pct: (p.transport_cost_multiplier - 1.0) * 100.0,
            service_level_target_pct: p.service_level_target * 100.0,
        }
    }

    /// 增长余量 (%), 不低于 0
    pub fn growth_headroom_pct(&self, record: &KpiRecord) -> f64 {
        (100.0 - record.avg_warehouse_utilization).max(0.0)
    }

    /// 延迟率降幅 (%) = (优化前延迟率 - 新延迟率) / 优化前延迟率 × 100
    pub fn late_delivery_reduction_pct(&self, record: &KpiRecord) -> DerivedValue {
        let current_late = match record.current_late_delivery_rate {
            Some(v) => v,
            None => return DerivedValue::undefined("缺少 current_late_delivery_rate"),
        };
        if current_late == 0.0 {
            return DerivedValue::from_result(Err(EngineError::divide_by_zero(
                "优化前延迟率为 0",
            )));
        }
        let new_late = 1.0 - record.on_time_delivery_rate;
        DerivedValue::defined((current_late - new_late) / current_late * 100.0)
    }

    /// 利润摆幅 (%) = |利润改善 / |当前利润|| × 100
    pub fn profit_swing_pct(&self, record: &KpiRecord) -> DerivedValue {
        if record.current_profit == 0.0 {
            return DerivedValue::from_result(Err(EngineError::divide_by_zero("当前利润为 0")));
        }
        DerivedValue::defined(
            (record.profit_improvement / record.current_profit.abs()).abs() * 100.0,
        )
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 生成目标场景相对基准的派生指标
    pub fn derive(&self, baseline: &KpiRecord, target: &KpiRecord) -> DerivedMetrics {
        let mut faults = Vec::new();

        // 1. 绝对差值
        let total_cost_delta = target.total_cost - baseline.total_cost;
        let cost_component_deltas: BTreeMap<CostComponent, f64> = CostComponent::ALL
            .iter()
            .map(|c| (*c, target.cost_component(*c) - baseline.cost_component(*c)))
            .collect();

        // 2. 百分点差值
        let fulfillment_pp_delta =
            self.percentage_point_delta(baseline, target, RatioMetric::OrderFulfillmentRate);
        let on_time_pp_delta =
            self.percentage_point_delta(baseline, target, RatioMetric::OnTimeDeliveryRate);

        // 3. 相对变化
        let mut relative_changes = BTreeMap::new();
        for metric in RELATIVE_CHANGE_METRICS {
            let value = DerivedValue::from_result(self.relative_change(baseline, target, metric));
            if let DerivedValue::Undefined { reason } = &value {
                faults.push(MetricFault {
                    item: format!("relative_change:{}", metric),
                    reason: reason.clone(),
                });
            }
            relative_changes.insert(metric, value);
        }

        // 4. 成本占比
        let cost_shares: BTreeMap<CostComponent, f64> = CostComponent::ALL
            .iter()
            .map(|c| (*c, self.cost_share(target, *c)))
            .collect();

        // 5. 上下文指标
        let late_delivery_reduction_pct = self.late_delivery_reduction_pct(target);
        if let DerivedValue::Undefined { reason } = &late_delivery_reduction_pct {
            faults.push(MetricFault {
                item: "late_delivery_reduction_pct".to_string(),
                reason: reason.clone(),
            });
        }
        let profit_swing_pct = self.profit_swing_pct(target);
        if let DerivedValue::Undefined { reason } = &profit_swing_pct {
            faults.push(MetricFault {
                item: "profit_swing_pct".to_string(),
                reason: reason.clone(),
            });
        }

        if !faults.is_empty() {
            tracing::debug!(
                scenario = %target.scenario_name,
                fault_count = faults.len(),
                "派生指标存在不可定义项"
            );
        }

        DerivedMetrics {
            scenario_name: target.scenario_name.clone(),
            baseline_name: baseline.scenario_name.clone(),
            total_cost_delta,
            cost_component_deltas,
            fulfillment_pp_delta,
            on_time_pp_delta,
            relative_changes,
            cost_shares,
            parameter_adjustments: self.parameter_adjustments(target),
            growth_headroom_pct: self.growth_headroom_pct(target),
            late_delivery_reduction_pct,
            profit_swing_pct,
            faults,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::kpi::{ScenarioParameters, BASELINE_SCENARIO};

    fn record(name: &str, total: f64, transport: f64, holding: f64, stockout: f64) -> KpiRecord {
        KpiRecord {
            scenario_name: name.to_string(),
            total_cost: total,
            total_transportation_cost: transport,
            total_holding_cost: holding,
            total_stockout_cost: stockout,
            order_fulfillment_rate: 0.90,
            on_time_delivery_rate: 0.80,
            total_demand: 1000.0,
            total_fulfilled: 900.0,
            total_stockouts: 100.0,
            profit_improvement: 11_800_000.0,
            current_profit: -9_500_000.0,
            estimated_new_profit: 2_300_000.0,
            avg_warehouse_utilization: 72.5,
            parameters: ScenarioParameters::default(),
            current_late_delivery_rate: Some(0.548),
            optimization_status: Some("Optimal".to_string()),
            solve_time_seconds: Some(3.2),
        }
    }

    fn baseline() -> KpiRecord {
        record(BASELINE_SCENARIO, 38_200_000.0, 28_000_000.0, 200_000.0, 10_000_000.0)
    }

    #[test]
    fn test_percentage_point_delta() {
        let calc = DerivedMetricsCalculator::new();
        let base = baseline();
        let mut target = record("HighService", 40_000_000.0, 30_000_000.0, 0.0, 10_000_000.0);
        target.on_time_delivery_rate = 0.95;
        let delta = calc.percentage_point_delta(&base, &target, RatioMetric::OnTimeDeliveryRate);
        assert!((delta - 15.0).abs() < 1e-9);
        let late = calc.percentage_point_delta(&base, &target, RatioMetric::LateDeliveryRate);
        assert!((late + 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_relative_change_uses_absolute_baseline() {
        let calc = DerivedMetricsCalculator::new();
        let mut base = baseline();
        base.profit_improvement = -100.0;
        let mut target = baseline();
        target.profit_improvement = -50.0;
        let change = calc
            .relative_change(&base, &target, ScenarioMetric::ProfitImprovement)
            .unwrap();
        assert!((change - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_relative_change_zero_baseline_is_divide_by_zero() {
        let calc = DerivedMetricsCalculator::new();
        let base = record(BASELINE_SCENARIO, 100.0, 100.0, 0.0, 0.0);
        let target = record("T", 120.0, 100.0, 20.0, 0.0);
        let err = calc
            .relative_change(&base, &target, ScenarioMetric::HoldingCost)
            .unwrap_err();
        assert!(matches!(err, EngineError::DivideByZero { .. }));
    }

    #[test]
    fn test_cost_share_sums_to_one() {
        let calc = DerivedMetricsCalculator::new();
        let base = baseline();
        let sum: f64 = CostComponent::ALL
            .iter()
            .map(|c| calc.cost_share(&base, *c))
            .sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cost_share_zero_total_is_zero() {
        let calc = DerivedMetricsCalculator::new();
        let empty = record("Empty", 0.0, 0.0, 0.0, 0.0);
        for component in CostComponent::ALL {
            assert_eq!(calc.cost_share(&empty, component), 0.0);
        }
    }

    #[test]
    fn test_elasticity() {
        let calc = DerivedMetricsCalculator::new();
        let mut a = baseline();
        a.scenario_name = "Cap120".to_string();
        a.parameters.capacity_multiplier = 1.2;
        a.total_cost = 36_000_000.0;
        let b = baseline();
        let e = calc
            .elasticity(ScenarioMetric::TotalCost, ScenarioMetric::CapacityMultiplier, &a, &b)
            .unwrap();
        assert!((e - (-2_200_000.0 / 0.2)).abs() < 1e-3);
    }

    #[test]
    fn test_elasticity_equal_drivers_is_divide_by_zero() {
        let calc = DerivedMetricsCalculator::new();
        let a = baseline();
        let b = record("Other", 1.0, 1.0, 0.0, 0.0);
        let result = calc.elasticity(
            ScenarioMetric::TotalCost,
            ScenarioMetric::TransportCostMultiplier,
            &a,
            &b,
        );
        assert!(matches!(result, Err(EngineError::DivideByZero { .. })));
    }

    #[test]
    fn test_context_metrics() {
        let calc = DerivedMetricsCalculator::new();
        let mut target = baseline();
        target.parameters.capacity_multiplier = 0.8;
        target.parameters.transport_cost_multiplier = 1.25;
        target.on_time_delivery_rate = 0.9452;

        let adj = calc.parameter_adjustments(&target);
        assert!((adj.capacity_change_pct + 20.0).abs() < 1e-9);
        assert!((adj.transport_cost_change_pct - 25.0).abs() < 1e-9);
        assert!((adj.service_level_target_pct - 95.0).abs() < 1e-9);

        assert!((calc.growth_headroom_pct(&target) - 27.5).abs() < 1e-9);
        target.avg_warehouse_utilization = 104.0;
        assert_eq!(calc.growth_headroom_pct(&target), 0.0);

        let reduction = calc.late_delivery_reduction_pct(&target).value().unwrap();
        assert!((reduction - (0.548 - 0.0548) / 0.548 * 100.0).abs() < 1e-9);

        let swing = calc.profit_swing_pct(&target).value().unwrap();
        assert!((swing - 11_800_000.0 / 9_500_000.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_derive_collects_faults_without_aborting() {
        let calc = DerivedMetricsCalculator::new();
        let mut base = record(BASELINE_SCENARIO, 100.0, 100.0, 0.0, 0.0);
        base.current_profit = 0.0;
        let mut target = record("T", 150.0, 120.0, 30.0, 0.0);
        target.current_late_delivery_rate = None;
        target.current_profit = 0.0;

        let derived = calc.derive(&base, &target);
        assert_eq!(derived.scenario_name, "T");
        assert_eq!(derived.baseline_name, BASELINE_SCENARIO);
        assert_eq!(derived.total_cost_delta, 50.0);
        assert_eq!(derived.cost_component_deltas[&CostComponent::Holding], 30.0);

        // 持有/缺货基准为 0 → N/A
        let holding = derived.relative_change(ScenarioMetric::HoldingCost).unwrap();
        assert!(!holding.is_defined());
        assert_eq!(holding.to_string(), NOT_AVAILABLE);
        assert_eq!(holding.or_sentinel(0.0), 0.0);

        let total = derived.relative_change(ScenarioMetric::TotalCost).unwrap();
        assert!((total.value().unwrap() - 0.5).abs() < 1e-12);

        assert!(!derived.late_delivery_reduction_pct.is_defined());
        assert!(!derived.profit_swing_pct.is_defined());
        // holding + stockout + late + swing
        assert_eq!(derived.faults.len(), 4);
        assert!(derived.has_faults());
    }

    #[test]
    fn test_derive_is_deterministic() {
        let calc = DerivedMetricsCalculator::new();
        let base = baseline();
        let target = record("LowCost", 30_000_000.0, 22_000_000.0, 300_000.0, 7_700_000.0);
        let first = serde_json::to_string(&calc.derive(&base, &target)).unwrap();
        let second = serde_json::to_string(&calc.derive(&base, &target)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_derived_value_format() {
        let v = DerivedValue::defined(12.345);
        assert_eq!(v.format_with(|x| format!("{:+.1}%", x)), "+12.3%");
        let na = DerivedValue::undefined("x");
        assert_eq!(na.format_with(|x| format!("{:+.1}%", x)), "N/A");
    }
}
