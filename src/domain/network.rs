// ==========================================
// 供应链场景分析引擎 - 网络流模型
// ==========================================
// 职责: 仓库 → 区域 的有向流图 (节点/边) 与筛选条件
// 红线: 边只通过 id 引用节点, 不持有节点对象
// ==========================================

use crate::domain::types::NodeType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ==========================================
// NetworkNode - 网络节点
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkNode {
    /// 节点 ID (唯一)
    pub id: String,

    /// 节点类型
    pub node_type: NodeType,

    /// 纬度 (度)
    pub latitude: f64,

    /// 经度 (度)
    pub longitude: f64,

    /// 量级: 仓库为 capacity, 区域为 total_demand
    pub magnitude: f64,

    /// 展示标签
    pub label: String,
}

impl NetworkNode {
    pub fn is_warehouse(&self) -> bool {
        self.node_type == NodeType::Warehouse
    }
}

// ==========================================
// NetworkEdge - 网络边 (已求解流量的只读投影)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkEdge {
    /// 起点节点 ID
    pub source: String,

    /// 终点节点 ID
    pub target: String,

    /// 流量 (>= 0)
    pub quantity: f64,

    /// 线路运输总成本 (>= 0)
    pub cost: f64,

    /// 服务达标率 (0~1)
    pub service_compliance: f64,
}

// ==========================================
// FlowFilter - 流量筛选条件
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowFilter {
    /// 选中的起点节点
    pub selected_source_ids: BTreeSet<String>,

    /// 最小流量 (含)
    pub min_quantity: f64,

    /// 是否只保留服务达标线路
    pub require_service_compliance: bool,
}

impl FlowFilter {
    pub fn new<I, S>(
        selected_source_ids: I,
        min_quantity: f64,
        require_service_compliance: bool,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selected_source_ids: selected_source_ids.into_iter().map(Into::into).collect(),
            min_quantity,
            require_service_compliance,
        }
    }

    /// 默认筛选: 选中全部仓库, 不限流量, 不要求达标
    pub fn all_warehouses(nodes: &[NetworkNode]) -> Self {
        Self::new(
            nodes
                .iter()
                .filter(|n| n.is_warehouse())
                .map(|n| n.id.clone()),
            0.0,
            false,
        )
    }

    pub fn with_min_quantity(mut self, min_quantity: f64) -> Self {
        self.min_quantity = min_quantity;
        self
    }

    pub fn with_service_compliance(mut self, required: bool) -> Self {
        self.require_service_compliance = required;
        self
    }

    /// 缓存键
    pub fn cache_key(&self) -> FlowFilterKey {
        FlowFilterKey {
            sources: self.selected_source_ids.iter().cloned().collect(),
            // -0.0 与 0.0 视为同一键
            min_quantity_bits: if self.min_quantity == 0.0 {
                0
            } else {
                self.min_quantity.to_bits()
            },
            require_service_compliance: self.require_service_compliance,
        }
    }
}

/// 筛选条件的可哈希签名
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlowFilterKey {
    sources: Vec<String>,
    min_quantity_bits: u64,
    require_service_compliance: bool,
}
