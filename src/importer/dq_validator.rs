// ==========================================
// 供应链场景分析引擎 - 数据质量校验器
// ==========================================
// 职责: KPI 记录不变量 + 网络图引用完整性 + 利用率范围 + 被拒绝的表行
// 规则: Error 阻断构建 (由 DatasetBuilder 决定); Warning 只记录
// ==========================================

use crate::domain::kpi::KpiRecord;
use crate::domain::network::{NetworkEdge, NetworkNode};
use crate::domain::shipment::{ShipmentRecord, StockingRecord};
use crate::domain::warehouse::WarehouseUtilization;
use crate::importer::error::ImportError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 不变量比较的相对容差
pub const DEFAULT_RELATIVE_TOLERANCE: f64 = 1e-6;

// ==========================================
// DqLevel - 数据质量级别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DqLevel {
    Error,   // 错误（阻断构建）
    Warning, // 警告（允许加载）
}

// ==========================================
// DqViolation - 数据质量违规记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DqViolation {
    pub level: DqLevel,
    pub subject: String, // 场景名 / 节点 ID / "edge#3" / "network_edges.csv 行 5"
    pub field: String,
    pub message: String,
}

impl DqViolation {
    fn warning(subject: impl Into<String>, field: &str, message: impl Into<String>) -> Self {
        Self {
            level: DqLevel::Warning,
            subject: subject.into(),
            field: field.to_string(),
            message: message.into(),
        }
    }

    fn error(subject: impl Into<String>, field: &str, message: impl Into<String>) -> Self {
        Self {
            level: DqLevel::Error,
            subject: subject.into(),
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// 单行值无效, 该行被跳过 (Warning)
    pub fn rejected_row(table: &str, row: usize, error: &ImportError) -> Self {
        Self::warning(
            format!("{} 行 {}", table, row),
            error.field().unwrap_or("*"),
            format!("已跳过: {}", error),
        )
    }
}

// ==========================================
// DqReport - 数据质量报告
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DqReport {
    pub violations: Vec<DqViolation>,
}

impl DqReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, violations: impl IntoIterator<Item = DqViolation>) {
        self.violations.extend(violations);
    }

    pub fn error_count(&self) -> usize {
        self.count(DqLevel::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(DqLevel::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// 某主体的全部违规
    pub fn for_subject<'a>(&'a self, subject: &'a str) -> impl Iterator<Item = &'a DqViolation> {
        self.violations.iter().filter(move |v| v.subject == subject)
    }

    fn count(&self, level: DqLevel) -> usize {
        self.violations.iter().filter(|v| v.level == level).count()
    }
}

// ==========================================
// DqValidator
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct DqValidator {
    relative_tolerance: f64,
}

impl Default for DqValidator {
    fn default() -> Self {
        Self::new(DEFAULT_RELATIVE_TOLERANCE)
    }
}

impl DqValidator {
    pub fn new(relative_tolerance: f64) -> Self {
        Self { relative_tolerance }
    }

    fn approx_eq(&self, a: f64, b: f64) -> bool {
        let scale = a.abs().max(b.abs()).max(1.0);
        (a - b).abs() <= self.relative_tolerance * scale
    }

    /// 单条 KPI 记录的数值不变量 (全部为 Warning)
    pub fn validate_kpi(&self, record: &KpiRecord) -> Vec<DqViolation> {
        let mut violations = Vec::new();
        let subject = record.scenario_name.as_str();

        let component_sum = record.component_cost_sum();
        if !self.approx_eq(component_sum, record.total_cost) {
            violations.push(DqViolation::warning(
                subject,
                "total_cost",
                format!(
                    "成本分项之和 {:.2} 与总成本 {:.2} 不一致",
                    component_sum, record.total_cost
                ),
            ));
        }

        let accounted = record.total_fulfilled + record.total_stockouts;
        if !self.approx_eq(accounted, record.total_demand) {
            violations.push(DqViolation::warning(
                subject,
                "total_demand",
                format!(
                    "满足量 + 缺货量 = {:.2}, 与总需求 {:.2} 不一致",
                    accounted, record.total_demand
                ),
            ));
        }

        let expected_profit = record.current_profit + record.profit_improvement;
        if !self.approx_eq(expected_profit, record.estimated_new_profit) {
            violations.push(DqViolation::warning(
                subject,
                "estimated_new_profit",
                format!(
                    "当前利润 + 利润改善 = {:.2}, 与预计新利润 {:.2} 不一致",
                    expected_profit, record.estimated_new_profit
                ),
            ));
        }

        if !(0.0..=100.0).contains(&record.avg_warehouse_utilization) {
            violations.push(DqViolation::warning(
                subject,
                "avg_warehouse_utilization",
                format!(
                    "平均仓库利用率 {:.2}% 超出 [0,100]",
                    record.avg_warehouse_utilization
                ),
            ));
        }

        violations
    }

    /// 场景集结构: 名称唯一 (Error)
    pub fn validate_scenario_names(&self, records: &[KpiRecord]) -> Vec<DqViolation> {
        let mut seen = HashSet::new();
        records
            .iter()
            .filter(|r| !seen.insert(r.scenario_name.as_str()))
            .map(|r| DqViolation::error(r.scenario_name.clone(), "scenario_name", "场景名称重复"))
            .collect()
    }

    /// 网络图: 节点 ID 唯一 (Error) + 边端点存在 (Warning)
    pub fn validate_network(
        &self,
        nodes: &[NetworkNode],
        edges: &[NetworkEdge],
    ) -> Vec<DqViolation> {
        let mut violations = Vec::new();
        let mut ids = HashSet::new();

        for node in nodes {
            if !ids.insert(node.id.as_str()) {
                violations.push(DqViolation::error(node.id.clone(), "id", "节点 ID 重复"));
            }
        }

        for (idx, edge) in edges.iter().enumerate() {
            let subject = format!("edge#{}", idx);
            if !ids.contains(edge.source.as_str()) {
                violations.push(DqViolation::warning(
                    subject.clone(),
                    "source",
                    format!("起点 {} 不在节点表中", edge.source),
                ));
            }
            if !ids.contains(edge.target.as_str()) {
                violations.push(DqViolation::warning(
                    subject,
                    "target",
                    format!("终点 {} 不在节点表中", edge.target),
                ));
            }
        }

        violations
    }

    /// 仓库利用率: 范围 [0,100] + 仓库存在于节点表 (Warning)
    pub fn validate_utilization(
        &self,
        rows: &[WarehouseUtilization],
        nodes: &[NetworkNode],
    ) -> Vec<DqViolation> {
        let warehouses: HashSet<&str> = nodes
            .iter()
            .filter(|n| n.is_warehouse())
            .map(|n| n.id.as_str())
            .collect();

        let mut violations = Vec::new();
        for row in rows {
            if !(0.0..=100.0).contains(&row.utilization_pct) {
                violations.push(DqViolation::warning(
                    row.warehouse_id.clone(),
                    "utilization_pct",
                    format!("利用率 {:.2}% 超出 [0,100]", row.utilization_pct),
                ));
            }
            if !warehouses.is_empty() && !warehouses.contains(row.warehouse_id.as_str()) {
                violations.push(DqViolation::warning(
                    row.warehouse_id.clone(),
                    "warehouse_id",
                    "仓库不在节点表中",
                ));
            }
        }
        violations
    }

    /// 基准发运/备货: 仓库存在于节点表 (Warning, 每个仓库只报一次)
    pub fn validate_baseline_flows(
        &self,
        shipments: &[ShipmentRecord],
        stocking: &[StockingRecord],
        nodes: &[NetworkNode],
    ) -> Vec<DqViolation> {
        let warehouses: HashSet<&str> = nodes
            .iter()
            .filter(|n| n.is_warehouse())
            .map(|n| n.id.as_str())
            .collect();
        if warehouses.is_empty() {
            return Vec::new();
        }

        let mut reported = HashSet::new();
        shipments
            .iter()
            .map(|s| s.warehouse_id.as_str())
            .chain(stocking.iter().map(|s| s.warehouse_id.as_str()))
            .filter(|id| !warehouses.contains(id) && reported.insert(*id))
            .map(|id| DqViolation::warning(id, "warehouse_id", "发运/备货仓库不在节点表中"))
            .collect()
    }
}
