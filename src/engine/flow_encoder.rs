// ==========================================
// 供应链场景分析引擎 - 网络流筛选与编码器
// ==========================================
// 职责: 按筛选条件过滤边, 并编码为渲染就绪图
// 步骤:
//   1. 过滤 (起点 ∈ 选中集 且 流量 >= 阈值 且 [可选] 达标)
//   2. 成本 → 颜色 (绿 → 黄 → 红 两段渐变)
//   3. 流量/容量 → 宽度/尺寸 (带最小可见下限)
//   4. 端点解析 (缺失节点 → ReferenceError, 仅跳过该边; 悬空边不影响色标)
// 输出: RenderGraph (与图表库无关)
// ==========================================

use crate::config::{AnalyticsConfig, EncodingConfig};
use crate::domain::network::{FlowFilter, NetworkEdge, NetworkNode};
use crate::domain::render::{EndpointRole, RenderEdge, RenderNode, Rgb};
use crate::domain::types::NodeType;
use crate::engine::error::EngineError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// 输出结构
// ==========================================

/// 被跳过的边
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeFault {
    /// 在原始边表中的下标
    pub edge_index: usize,
    pub source: String,
    pub target: String,
    pub error: EngineError,
}

/// 渲染就绪图
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderGraph {
    pub edges: Vec<RenderEdge>,
    pub nodes: Vec<RenderNode>,
    pub skipped: Vec<EdgeFault>,
}

impl RenderGraph {
    pub fn has_faults(&self) -> bool {
        !self.skipped.is_empty()
    }
}

// ==========================================
// CostColorScale - 成本色标
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostColorScale {
    min_cost: f64,
    max_cost: f64,
    neutral: Rgb,
}

impl CostColorScale {
    /// 由成本集合构造 (空集合视为退化区间)
    pub fn from_costs<I>(costs: I, neutral: Rgb) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut iter = costs.into_iter();
        let (min_cost, max_cost) = match iter.next() {
            Some(first) => iter.fold((first, first), |(lo, hi), c| (lo.min(c), hi.max(c))),
            None => (0.0, 0.0),
        };
        Self {
            min_cost,
            max_cost,
            neutral,
        }
    }

    pub fn min_cost(&self) -> f64 {
        self.min_cost
    }

    pub fn max_cost(&self) -> f64 {
        self.max_cost
    }

    /// 区间退化 (空集/单边/全部相同)
    pub fn is_degenerate(&self) -> bool {
        self.max_cost == self.min_cost
    }

    /// 归一化位置 t ∈ [0,1]; 退化区间返回 None
    pub fn position(&self, cost: f64) -> Option<f64> {
        if self.is_degenerate() {
            return None;
        }
        Some(((cost - self.min_cost) / (self.max_cost - self.min_cost)).clamp(0.0, 1.0))
    }

    /// 成本 → 颜色
    ///
    /// - t < 0.5: 绿 → 黄, 插值因子 t × 2
    /// - t >= 0.5: 黄 → 红, 插值因子 (t - 0.5) × 2
    pub fn color_for(&self, cost: f64) -> Rgb {
        match self.position(cost) {
            None => self.neutral,
            Some(t) if t < 0.5 => Rgb::lerp(Rgb::GREEN, Rgb::YELLOW, t * 2.0),
            Some(t) => Rgb::lerp(Rgb::YELLOW, Rgb::RED, (t - 0.5) * 2.0),
        }
    }
}

// ==========================================
// FlowEncoder - 网络流编码器
// ==========================================
// 红线: 无状态, 同输入必得同输出
#[derive(Debug, Clone, PartialEq)]
pub struct FlowEncoder {
    encoding: EncodingConfig,
    service_compliance_threshold: f64,
}

impl Default for FlowEncoder {
    fn default() -> Self {
        Self::new(&AnalyticsConfig::default())
    }
}

impl FlowEncoder {
    pub fn new(config: &AnalyticsConfig) -> Self {
        Self {
            encoding: config.encoding.clone(),
            service_compliance_threshold: config.service_compliance_threshold,
        }
    }

    pub fn encoding(&self) -> &EncodingConfig {
        &self.encoding
    }

    // ==========================================
    // 步骤1: 过滤
    // ==========================================

    /// 过滤边, 保持输入顺序, 返回 (原始下标, 边)
    pub fn filter_edges<'a>(
        &self,
        edges: &'a [NetworkEdge],
        filter: &FlowFilter,
    ) -> Vec<(usize, &'a NetworkEdge)> {
        edges
            .iter()
            .enumerate()
            .filter(|(_, e)| self.retains(e, filter))
            .collect()
    }

    /// 单条边是否保留
    pub fn retains(&self, edge: &NetworkEdge, filter: &FlowFilter) -> bool {
        filter.selected_source_ids.contains(&edge.source)
            && edge.quantity >= filter.min_quantity
            && (!filter.require_service_compliance
                || edge.service_compliance > self.service_compliance_threshold)
    }

    // ==========================================
    // 步骤3: 量级编码
    // ==========================================

    /// 边宽 = max(下限, quantity / edge_width_divisor)
    pub fn edge_width(&self, quantity: f64) -> f64 {
        (quantity / self.encoding.edge_width_divisor).max(self.encoding.min_visible_size)
    }

    /// 节点尺寸 = max(下限, magnitude / 对应类型系数)
    pub fn node_size(&self, node: &NetworkNode) -> f64 {
        let divisor = match node.node_type {
            NodeType::Warehouse => self.encoding.warehouse_size_divisor,
            NodeType::Region => self.encoding.region_size_divisor,
        };
        (node.magnitude / divisor).max(self.encoding.min_visible_size)
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 生成渲染就绪图
    ///
    /// # 参数
    /// - `nodes`: 全部节点 (全部渲染, 保持输入顺序)
    /// - `edges`: 全部边
    /// - `filter`: 筛选条件
    ///
    /// # 返回
    /// 渲染图; 端点缺失的边记入 skipped, 不中断其余边
    pub fn encode(
        &self,
        nodes: &[NetworkNode],
        edges: &[NetworkEdge],
        filter: &FlowFilter,
    ) -> RenderGraph {
        // 1. 过滤
        let retained = self.filter_edges(edges, filter);

        // 4. 端点解析 (先于着色, 悬空边不参与色标区间)
        let index: HashMap<&str, &NetworkNode> =
            nodes.iter().map(|n| (n.id.as_str(), n)).collect();

        let mut resolved = Vec::with_capacity(retained.len());
        let mut skipped = Vec::new();

        for (edge_index, edge) in retained {
            match resolve_endpoints(&index, edge_index, edge) {
                Ok((from, to)) => resolved.push((edge, from, to)),
                Err(error) => {
                    tracing::warn!(
                        edge_index,
                        source = %edge.source,
                        target = %edge.target,
                        error = %error,
                        "跳过端点缺失的边"
                    );
                    skipped.push(EdgeFault {
                        edge_index,
                        source: edge.source.clone(),
                        target: edge.target.clone(),
                        error,
                    });
                }
            }
        }

        // 2. 色标基于实际渲染的边集
        let scale = CostColorScale::from_costs(
            resolved.iter().map(|(e, _, _)| e.cost),
            self.encoding.neutral_color,
        );

        // 3. 量级编码
        let render_edges: Vec<RenderEdge> = resolved
            .into_iter()
            .map(|(edge, from, to)| RenderEdge {
                source: edge.source.clone(),
                target: edge.target.clone(),
                x1: from.longitude,
                y1: from.latitude,
                x2: to.longitude,
                y2: to.latitude,
                color: scale.color_for(edge.cost),
                width: self.edge_width(edge.quantity),
                quantity: edge.quantity,
                cost: edge.cost,
                service_compliance: edge.service_compliance,
            })
            .collect();

        let render_nodes = nodes
            .iter()
            .map(|n| RenderNode {
                id: n.id.clone(),
                x: n.longitude,
                y: n.latitude,
                size: self.node_size(n),
                label: n.label.clone(),
                category: n.node_type,
            })
            .collect();

        tracing::debug!(
            edge_count = render_edges.len(),
            skipped_count = skipped.len(),
            min_cost = scale.min_cost(),
            max_cost = scale.max_cost(),
            "网络图编码完成"
        );

        RenderGraph {
            edges: render_edges,
            nodes: render_nodes,
            skipped,
        }
    }
}

fn resolve_endpoints<'a>(
    index: &HashMap<&str, &'a NetworkNode>,
    edge_index: usize,
    edge: &NetworkEdge,
) -> Result<(&'a NetworkNode, &'a NetworkNode), EngineError> {
    let lookup = |id: &str, endpoint: EndpointRole| {
        index
            .get(id)
            .copied()
            .ok_or_else(|| EngineError::ReferenceError {
                edge_index,
                endpoint,
                missing_id: id.to_string(),
            })
    };
    let from = lookup(&edge.source, EndpointRole::Source)?;
    let to = lookup(&edge.target, EndpointRole::Target)?;
    Ok((from, to))
}
