// ==========================================
// 供应链场景分析引擎 - 数据集构建器
// ==========================================
// 职责: 收集已映射的记录 → 结构校验 → 不可变 ScenarioDataset
// 致命: 缺少基准 / 场景名重复 / 节点 ID 重复
// 警告: 被跳过的表行 / 数值不变量漂移 / 悬空边 / 利用率越界 / 未知发运仓库 / 元数据场景缺失
// ==========================================

use crate::domain::dataset::{AnalysisMetadata, ScenarioDataset};
use crate::domain::kpi::KpiRecord;
use crate::domain::network::{NetworkEdge, NetworkNode};
use crate::domain::shipment::{ShipmentRecord, StockingRecord};
use crate::domain::warehouse::WarehouseUtilization;
use crate::importer::dq_validator::{DqLevel, DqReport, DqValidator, DqViolation};
use crate::importer::error::{ImportError, ImportResult};
use tracing::{info, warn};

#[derive(Debug, Clone, Default)]
pub struct DatasetBuilder {
    scenarios: Vec<KpiRecord>,
    nodes: Vec<NetworkNode>,
    edges: Vec<NetworkEdge>,
    warehouse_utilization: Vec<WarehouseUtilization>,
    shipments: Vec<ShipmentRecord>,
    stocking: Vec<StockingRecord>,
    rejected_rows: Vec<DqViolation>,
    metadata: Option<AnalysisMetadata>,
    validator: DqValidator,
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_validator(mut self, validator: DqValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_scenarios(mut self, scenarios: Vec<KpiRecord>) -> Self {
        self.scenarios = scenarios;
        self
    }

    /// 同名场景就地替换 (保持原顺序), 否则追加
    pub fn upsert_scenario(&mut self, record: KpiRecord) {
        match self
            .scenarios
            .iter_mut()
            .find(|r| r.scenario_name == record.scenario_name)
        {
            Some(slot) => *slot = record,
            None => self.scenarios.push(record),
        }
    }

    pub fn with_nodes(mut self, nodes: Vec<NetworkNode>) -> Self {
        self.nodes = nodes;
        self
    }

    pub fn with_edges(mut self, edges: Vec<NetworkEdge>) -> Self {
        self.edges = edges;
        self
    }

    pub fn with_warehouse_utilization(mut self, rows: Vec<WarehouseUtilization>) -> Self {
        self.warehouse_utilization = rows;
        self
    }

    pub fn with_shipments(mut self, shipments: Vec<ShipmentRecord>) -> Self {
        self.shipments = shipments;
        self
    }

    pub fn with_stocking(mut self, stocking: Vec<StockingRecord>) -> Self {
        self.stocking = stocking;
        self
    }

    /// 解析阶段跳过的行, 原样并入质量报告
    pub fn with_rejected_rows(mut self, rejected: Vec<DqViolation>) -> Self {
        self.rejected_rows = rejected;
        self
    }

    pub fn with_metadata(mut self, metadata: Option<AnalysisMetadata>) -> Self {
        self.metadata = metadata;
        self
    }

    /// 校验并构建数据集
    ///
    /// # 返回
    /// - Ok((数据集, 质量报告)): 报告中只含 Warning
    /// - Err: 第一个结构性错误
    pub fn build(self) -> ImportResult<(ScenarioDataset, DqReport)> {
        let validator = self.validator;
        let mut report = DqReport::new();
        report.extend(self.rejected_rows);

        // ===== 结构性检查 (致命) =====
        if let Some(dup) = validator.validate_scenario_names(&self.scenarios).first() {
            return Err(ImportError::DuplicateScenario(dup.subject.clone()));
        }

        let baseline_index = self
            .scenarios
            .iter()
            .position(|r| r.is_baseline())
            .ok_or(ImportError::MissingBaseline)?;

        let network = validator.validate_network(&self.nodes, &self.edges);
        if let Some(dup) = network.iter().find(|v| v.level == DqLevel::Error) {
            return Err(ImportError::DuplicateNode(dup.subject.clone()));
        }
        report.extend(network);

        // ===== 数值不变量 (警告) =====
        for record in &self.scenarios {
            report.extend(validator.validate_kpi(record));
        }
        report.extend(validator.validate_utilization(&self.warehouse_utilization, &self.nodes));
        report.extend(validator.validate_baseline_flows(
            &self.shipments,
            &self.stocking,
            &self.nodes,
        ));

        if let Some(meta) = &self.metadata {
            for name in &meta.scenarios {
                if !self.scenarios.iter().any(|r| &r.scenario_name == name) {
                    report.extend([DqViolation {
                        level: DqLevel::Warning,
                        subject: name.clone(),
                        field: "scenarios".to_string(),
                        message: "元数据列出的场景没有 KPI 记录".to_string(),
                    }]);
                }
            }
        }

        for v in &report.violations {
            warn!(subject = %v.subject, field = %v.field, "数据质量警告: {}", v.message);
        }

        info!(
            scenarios = self.scenarios.len(),
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            shipments = self.shipments.len(),
            warnings = report.warning_count(),
            "场景数据集构建完成"
        );

        let dataset = ScenarioDataset::from_parts(
            self.scenarios,
            baseline_index,
            self.nodes,
            self.edges,
            self.warehouse_utilization,
            self.metadata,
        )
        .with_baseline_flows(self.shipments, self.stocking);
        Ok((dataset, report))
    }
}
