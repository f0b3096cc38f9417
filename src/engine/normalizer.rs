// ==========================================
// 供应链场景分析引擎 - 多指标归一化器
// ==========================================
// 职责: 将所选场景集的各指标原始值映射到 [0,1] 可比分数 (雷达图/平行坐标)
// 规则:
//   - min/max 按本次场景集计算, 不跨选择复用
//   - max == min 时全部记 1.0
//   - LowerIsBetter 在归一化时反转, 原始值不改
// ==========================================

use crate::domain::kpi::KpiRecord;
use crate::domain::types::{MetricDirection, ScenarioMetric};
use crate::engine::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};

// ==========================================
// MetricSpec - 指标 + 方向
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetricSpec {
    pub metric: ScenarioMetric,
    pub direction: MetricDirection,
}

impl MetricSpec {
    pub fn new(metric: ScenarioMetric, direction: MetricDirection) -> Self {
        Self { metric, direction }
    }

    pub fn higher_is_better(metric: ScenarioMetric) -> Self {
        Self::new(metric, MetricDirection::HigherIsBetter)
    }

    pub fn lower_is_better(metric: ScenarioMetric) -> Self {
        Self::new(metric, MetricDirection::LowerIsBetter)
    }

    /// 使用指标默认方向
    pub fn with_default_direction(metric: ScenarioMetric) -> Self {
        Self::new(metric, metric.default_direction())
    }
}

/// 默认对比指标集: 成本效率 / 满足率 / 准时率 / 利润
pub fn default_comparison_metrics() -> Vec<MetricSpec> {
    vec![
        MetricSpec::lower_is_better(ScenarioMetric::TotalCost),
        MetricSpec::higher_is_better(ScenarioMetric::OrderFulfillmentRate),
        MetricSpec::higher_is_better(ScenarioMetric::OnTimeDeliveryRate),
        MetricSpec::higher_is_better(ScenarioMetric::ProfitImprovement),
    ]
}

// ==========================================
// NormalizedScoreTable - 归一化分数表
// ==========================================
/// 一行一个场景, 一列一个指标
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedScoreTable {
    pub metrics: Vec<MetricSpec>,
    pub rows: Vec<NormalizedRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRow {
    pub scenario_name: String,
    /// 与 metrics 同序
    pub scores: Vec<f64>,
}

impl NormalizedScoreTable {
    /// 查询某场景某指标的分数
    pub fn score(&self, scenario_name: &str, metric: ScenarioMetric) -> Option<f64> {
        let col = self.metrics.iter().position(|m| m.metric == metric)?;
        self.rows
            .iter()
            .find(|r| r.scenario_name == scenario_name)
            .and_then(|r| r.scores.get(col).copied())
    }

    pub fn row(&self, scenario_name: &str) -> Option<&NormalizedRow> {
        self.rows.iter().find(|r| r.scenario_name == scenario_name)
    }

    pub fn scenario_names(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.scenario_name.as_str()).collect()
    }
}

// ==========================================
// MultiMetricNormalizer - 多指标归一化器
// ==========================================
// 红线: 无状态, 不缓存 min/max
#[derive(Debug, Default, Clone, Copy)]
pub struct MultiMetricNormalizer;

impl MultiMetricNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// 对场景集做多指标归一化
    ///
    /// # 参数
    /// - `scenarios`: 场景集 (非空, 保持顺序)
    /// - `metrics`: 指标集 (非空)
    ///
    /// # 返回
    /// - Ok(NormalizedScoreTable): 分数均在 [0,1]
    /// - Err(EngineError::EmptyInput): 场景集或指标集为空
    pub fn normalize(
        &self,
        scenarios: &[&KpiRecord],
        metrics: &[MetricSpec],
    ) -> EngineResult<NormalizedScoreTable> {
        if scenarios.is_empty() {
            return Err(EngineError::EmptyInput("场景集为空".to_string()));
        }
        if metrics.is_empty() {
            return Err(EngineError::EmptyInput("指标集为空".to_string()));
        }

        // 按列计算
        let columns: Vec<Vec<f64>> = metrics
            .iter()
            .map(|spec| {
                let raw: Vec<f64> = scenarios
                    .iter()
                    .map(|s| s.metric_value(spec.metric))
                    .collect();
                normalize_values(&raw, spec.direction)
            })
            .collect();

        // 转置为行
        let rows = scenarios
            .iter()
            .enumerate()
            .map(|(i, s)| NormalizedRow {
                scenario_name: s.scenario_name.clone(),
                scores: columns.iter().map(|col| col[i]).collect(),
            })
            .collect();

        tracing::debug!(
            scenario_count = scenarios.len(),
            metric_count = metrics.len(),
            "归一化完成"
        );

        Ok(NormalizedScoreTable {
            metrics: metrics.to_vec(),
            rows,
        })
    }
}

/// 单列归一化
///
/// - max == min (含单元素): 全部 1.0
/// - HigherIsBetter: (v - min) / (max - min)
/// - LowerIsBetter: 1 - (v - min) / (max - min)
pub fn normalize_values(values: &[f64], direction: MetricDirection) -> Vec<f64> {
    let (min, max) = match min_max(values) {
        Some(range) => range,
        None => return Vec::new(),
    };

    if max == min {
        return vec![1.0; values.len()];
    }

    let span = max - min;
    values
        .iter()
        .map(|v| {
            let t = ((v - min) / span).clamp(0.0, 1.0);
            match direction {
                MetricDirection::HigherIsBetter => t,
                MetricDirection::LowerIsBetter => 1.0 - t,
            }
        })
        .collect()
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let mut iter = values.iter().copied();
    let first = iter.next()?;
    Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}

#[cfg(test)]
mod tests;
