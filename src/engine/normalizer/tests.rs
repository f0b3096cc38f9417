use super::*;
use crate::domain::kpi::{ScenarioParameters, BASELINE_SCENARIO};

// ==========================================
// 测试辅助函数
// ==========================================

fn create_scenario(name: &str, total_cost: f64, fulfillment: f64, profit: f64) -> KpiRecord {
    KpiRecord {
        scenario_name: name.to_string(),
        total_cost,
        total_transportation_cost: total_cost * 0.7,
        total_holding_cost: total_cost * 0.1,
        total_stockout_cost: total_cost * 0.2,
        order_fulfillment_rate: fulfillment,
        on_time_delivery_rate: 0.9,
        total_demand: 1000.0,
        total_fulfilled: 1000.0 * fulfillment,
        total_stockouts: 1000.0 * (1.0 - fulfillment),
        profit_improvement: profit,
        current_profit: -9_500_000.0,
        estimated_new_profit: -9_500_000.0 + profit,
        avg_warehouse_utilization: 80.0,
        parameters: ScenarioParameters::default(),
        current_late_delivery_rate: None,
        optimization_status: None,
        solve_time_seconds: None,
    }
}

fn refs(records: &[KpiRecord]) -> Vec<&KpiRecord> {
    records.iter().collect()
}

// ==========================================
// 正常案例
// ==========================================

#[test]
fn test_lower_is_better_total_cost() {
    let records = vec![
        create_scenario(BASELINE_SCENARIO, 38_200_000.0, 0.95, 11_800_000.0),
        create_scenario("LowCost", 30_000_000.0, 0.90, 12_000_000.0),
    ];
    let table = MultiMetricNormalizer::new()
        .normalize(
            &refs(&records),
            &[MetricSpec::lower_is_better(ScenarioMetric::TotalCost)],
        )
        .unwrap();

    assert_eq!(table.score("LowCost", ScenarioMetric::TotalCost), Some(1.0));
    assert_eq!(table.score(BASELINE_SCENARIO, ScenarioMetric::TotalCost), Some(0.0));
}

#[test]
fn test_higher_is_better_extremes() {
    let records = vec![
        create_scenario("A", 10.0, 0.80, 1.0),
        create_scenario("B", 20.0, 0.95, 2.0),
        create_scenario("C", 30.0, 0.90, 3.0),
    ];
    let table = MultiMetricNormalizer::new()
        .normalize(
            &refs(&records),
            &[MetricSpec::higher_is_better(ScenarioMetric::OrderFulfillmentRate)],
        )
        .unwrap();

    assert_eq!(table.score("B", ScenarioMetric::OrderFulfillmentRate), Some(1.0));
    assert_eq!(table.score("A", ScenarioMetric::OrderFulfillmentRate), Some(0.0));
    let c = table.score("C", ScenarioMetric::OrderFulfillmentRate).unwrap();
    assert!((c - 2.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_rows_follow_input_order() {
    let records = vec![
        create_scenario("Z", 1.0, 0.9, 1.0),
        create_scenario("A", 2.0, 0.9, 1.0),
        create_scenario("M", 3.0, 0.9, 1.0),
    ];
    let table = MultiMetricNormalizer::new()
        .normalize(&refs(&records), &default_comparison_metrics())
        .unwrap();
    assert_eq!(table.scenario_names(), vec!["Z", "A", "M"]);
    assert_eq!(table.metrics.len(), 4);
    for row in &table.rows {
        assert_eq!(row.scores.len(), 4);
        assert!(row.scores.iter().all(|s| (0.0..=1.0).contains(s)));
    }
}

// ==========================================
// 边界案例
// ==========================================

#[test]
fn test_tied_metric_scores_one_for_all() {
    let records = vec![
        create_scenario("A", 100.0, 0.9, 5.0),
        create_scenario("B", 100.0, 0.9, 5.0),
    ];
    let table = MultiMetricNormalizer::new()
        .normalize(&refs(&records), &default_comparison_metrics())
        .unwrap();
    for row in &table.rows {
        assert!(row.scores.iter().all(|s| *s == 1.0));
        assert!(row.scores.iter().all(|s| !s.is_nan()));
    }
}

#[test]
fn test_single_scenario_scores_one_for_every_metric() {
    let records = vec![create_scenario(BASELINE_SCENARIO, 38_200_000.0, 0.95, 11_800_000.0)];
    let metrics: Vec<MetricSpec> = ScenarioMetric::ALL
        .iter()
        .map(|m| MetricSpec::with_default_direction(*m))
        .collect();
    let table = MultiMetricNormalizer::new()
        .normalize(&refs(&records), &metrics)
        .unwrap();
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].scores, vec![1.0; metrics.len()]);
}

#[test]
fn test_empty_scenarios_rejected() {
    let result = MultiMetricNormalizer::new().normalize(&[], &default_comparison_metrics());
    assert!(matches!(result, Err(EngineError::EmptyInput(_))));
}

#[test]
fn test_empty_metrics_rejected() {
    let records = vec![create_scenario("A", 1.0, 0.9, 1.0)];
    let result = MultiMetricNormalizer::new().normalize(&refs(&records), &[]);
    assert!(matches!(result, Err(EngineError::EmptyInput(_))));
}

#[test]
fn test_scores_are_set_relative() {
    // 新增场景后 min/max 随集合变化
    let a = create_scenario("A", 100.0, 0.9, 1.0);
    let b = create_scenario("B", 200.0, 0.9, 1.0);
    let c = create_scenario("C", 50.0, 0.9, 1.0);
    let spec = [MetricSpec::lower_is_better(ScenarioMetric::TotalCost)];
    let normalizer = MultiMetricNormalizer::new();

    let two = normalizer.normalize(&[&a, &b], &spec).unwrap();
    assert_eq!(two.score("A", ScenarioMetric::TotalCost), Some(1.0));

    let three = normalizer.normalize(&[&a, &b, &c], &spec).unwrap();
    let score_a = three.score("A", ScenarioMetric::TotalCost).unwrap();
    assert!((score_a - (1.0 - 50.0 / 150.0)).abs() < 1e-9);
    assert_eq!(three.score("C", ScenarioMetric::TotalCost), Some(1.0));
}

#[test]
fn test_normalization_is_idempotent() {
    let records = vec![
        create_scenario("A", 10.0, 0.80, -1.0),
        create_scenario("B", 20.0, 0.95, 2.0),
        create_scenario("C", 15.0, 0.85, 0.5),
    ];
    let normalizer = MultiMetricNormalizer::new();
    let first = normalizer
        .normalize(&refs(&records), &default_comparison_metrics())
        .unwrap();
    let second = normalizer
        .normalize(&refs(&records), &default_comparison_metrics())
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_inversion_not_applied_to_raw_values() {
    let records = vec![
        create_scenario("A", 10.0, 0.8, 1.0),
        create_scenario("B", 20.0, 0.8, 1.0),
    ];
    let _ = MultiMetricNormalizer::new()
        .normalize(
            &refs(&records),
            &[MetricSpec::lower_is_better(ScenarioMetric::TotalCost)],
        )
        .unwrap();
    assert_eq!(records[0].total_cost, 10.0);
    assert_eq!(records[1].total_cost, 20.0);
}

#[test]
fn test_normalize_values_directly() {
    assert!(normalize_values(&[], MetricDirection::HigherIsBetter).is_empty());
    assert_eq!(
        normalize_values(&[3.0, 1.0, 2.0], MetricDirection::HigherIsBetter),
        vec![1.0, 0.0, 0.5]
    );
    assert_eq!(
        normalize_values(&[3.0, 1.0, 2.0], MetricDirection::LowerIsBetter),
        vec![0.0, 1.0, 0.5]
    );
    assert_eq!(
        normalize_values(&[7.0, 7.0], MetricDirection::LowerIsBetter),
        vec![1.0, 1.0]
    );
}
