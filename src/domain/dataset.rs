// ==========================================
// 供应链场景分析引擎 - 场景数据集
// ==========================================
// 职责: 一次加载得到的全部只读输入 (KPI/网络/基准明细/元数据)
// 红线: 构造后不可变; 只能经 importer::DatasetBuilder 校验后构造
// ==========================================

use crate::domain::kpi::KpiRecord;
use crate::domain::network::{NetworkEdge, NetworkNode};
use crate::domain::shipment::{ShipmentRecord, StockingRecord};
use crate::domain::warehouse::WarehouseUtilization;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// AnalysisMetadata - 分析元数据
// ==========================================
/// analysis_metadata.json
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// 结果生成时间
    #[serde(default)]
    pub generated_at: Option<NaiveDateTime>,

    /// 场景列表
    #[serde(default)]
    pub scenarios: Vec<String>,

    /// 其他未建模字段原样保留
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ==========================================
// ScenarioDataset - 场景数据集
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioDataset {
    scenarios: Vec<KpiRecord>,
    baseline_index: usize,
    nodes: Vec<NetworkNode>,
    edges: Vec<NetworkEdge>,
    warehouse_utilization: Vec<WarehouseUtilization>,
    shipments: Vec<ShipmentRecord>,
    stocking: Vec<StockingRecord>,
    metadata: Option<AnalysisMetadata>,
}

impl ScenarioDataset {
    /// 由 DatasetBuilder 在校验通过后调用
    pub(crate) fn from_parts(
        scenarios: Vec<KpiRecord>,
        baseline_index: usize,
        nodes: Vec<NetworkNode>,
        edges: Vec<NetworkEdge>,
        warehouse_utilization: Vec<WarehouseUtilization>,
        metadata: Option<AnalysisMetadata>,
    ) -> Self {
        Self {
            scenarios,
            baseline_index,
            nodes,
            edges,
            warehouse_utilization,
            shipments: Vec::new(),
            stocking: Vec::new(),
            metadata,
        }
    }

    /// 附带基准场景的发运与备货明细
    pub(crate) fn with_baseline_flows(
        mut self,
        shipments: Vec<ShipmentRecord>,
        stocking: Vec<StockingRecord>,
    ) -> Self {
        self.shipments = shipments;
        self.stocking = stocking;
        self
    }

    /// 全部场景 (保持输入顺序)
    pub fn scenarios(&self) -> &[KpiRecord] {
        &self.scenarios
    }

    /// 基准场景
    pub fn baseline(&self) -> &KpiRecord {
        &self.scenarios[self.baseline_index]
    }

    /// 按名称查找场景
    pub fn scenario(&self, name: &str) -> Option<&KpiRecord> {
        self.scenarios.iter().find(|s| s.scenario_name == name)
    }

    pub fn scenario_names(&self) -> Vec<String> {
        self.scenarios.iter().map(|s| s.scenario_name.clone()).collect()
    }

    pub fn nodes(&self) -> &[NetworkNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[NetworkEdge] {
        &self.edges
    }

    pub fn warehouse_utilization(&self) -> &[WarehouseUtilization] {
        &self.warehouse_utilization
    }

    /// 基准发运明细 (无文件时为空)
    pub fn shipments(&self) -> &[ShipmentRecord] {
        &self.shipments
    }

    pub fn stocking(&self) -> &[StockingRecord] {
        &self.stocking
    }

    pub fn metadata(&self) -> Option<&AnalysisMetadata> {
        self.metadata.as_ref()
    }
}
