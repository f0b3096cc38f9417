// ==========================================
// 供应链场景分析引擎 - 网络统计
// ==========================================
// 职责: 过滤后线路的汇总统计与成本分布直方图; 基准发运/备货摘要
// ==========================================

use crate::domain::network::NetworkEdge;
use crate::domain::shipment::{ShipmentRecord, StockingRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 网络统计摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkStatistics {
    /// 选中的起点数
    pub selected_sources: usize,
    /// 活跃线路数
    pub active_routes: usize,
    pub total_flow: f64,
    pub total_cost: f64,
    /// 达标线路数 (service_compliance > 阈值)
    pub compliant_routes: usize,
    /// 达标率 (%), 无线路时为 0
    pub compliance_rate_pct: f64,
}

/// 直方图分箱
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// 基准发运摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentSummary {
    /// 发运线路数 (发运明细行数)
    pub active_routes: usize,
    /// 发运量最大的前 N 条 (并列保持输入顺序)
    pub top_by_volume: Vec<ShipmentRecord>,
    /// 运输成本最高的前 N 条
    pub top_by_cost: Vec<ShipmentRecord>,
    pub compliant_routes: usize,
    /// 达标率 (%), 无发运时为 0
    pub compliance_rate_pct: f64,
    /// 平均在途天数, 无发运时为 None
    pub avg_transit_days: Option<f64>,
    /// 备货记录数
    pub products_stocked: usize,
    /// 有备货的仓库数 (去重)
    pub warehouses_used: usize,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NetworkStatisticsEngine;

impl NetworkStatisticsEngine {
    pub fn new() -> Self {
        Self
    }

    /// 汇总过滤后的线路
    pub fn summarize(
        &self,
        edges: &[&NetworkEdge],
        selected_sources: usize,
        compliance_threshold: f64,
    ) -> NetworkStatistics {
        let active_routes = edges.len();
        let total_flow = edges.iter().map(|e| e.quantity).sum();
        let total_cost = edges.iter().map(|e| e.cost).sum();
        let compliant_routes = edges
            .iter()
            .filter(|e| e.service_compliance > compliance_threshold)
            .count();
        let compliance_rate_pct = if active_routes > 0 {
            compliant_routes as f64 / active_routes as f64 * 100.0
        } else {
            0.0
        };

        NetworkStatistics {
            selected_sources,
            active_routes,
            total_flow,
            total_cost,
            compliant_routes,
            compliance_rate_pct,
        }
    }

    /// 等宽成本直方图
    ///
    /// - 无边: 空
    /// - 成本全部相同: 单个分箱
    /// - 最大值计入最后一个分箱
    pub fn cost_histogram(&self, edges: &[&NetworkEdge], bins: usize) -> Vec<HistogramBin> {
        let costs: Vec<f64> = edges.iter().map(|e| e.cost).collect();
        let Some(first) = costs.first().copied() else {
            return Vec::new();
        };
        let (min, max) = costs
            .iter()
            .fold((first, first), |(lo, hi), c| (lo.min(*c), hi.max(*c)));

        if max == min || bins <= 1 {
            return vec![HistogramBin {
                lower: min,
                upper: max,
                count: costs.len(),
            }];
        }

        let width = (max - min) / bins as f64;
        let mut result: Vec<HistogramBin> = (0..bins)
            .map(|i| HistogramBin {
                lower: min + width * i as f64,
                upper: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
                count: 0,
            })
            .collect();

        for cost in costs {
            let idx = (((cost - min) / width).floor() as usize).min(bins - 1);
            result[idx].count += 1;
        }

        result
    }

    /// 基准发运与备货摘要
    pub fn summarize_shipments(
        &self,
        shipments: &[ShipmentRecord],
        stocking: &[StockingRecord],
        top_n: usize,
    ) -> ShipmentSummary {
        let active_routes = shipments.len();
        let compliant_routes = shipments.iter().filter(|s| s.meets_service_target).count();
        let (compliance_rate_pct, avg_transit_days) = if active_routes > 0 {
            let total_transit: f64 = shipments.iter().map(|s| s.transit_time_days).sum();
            (
                compliant_routes as f64 / active_routes as f64 * 100.0,
                Some(total_transit / active_routes as f64),
            )
        } else {
            (0.0, None)
        };

        let warehouses_used = stocking
            .iter()
            .map(|s| s.warehouse_id.as_str())
            .collect::<HashSet<_>>()
            .len();

        ShipmentSummary {
            active_routes,
            top_by_volume: top_n_by(shipments, top_n, |s| s.quantity),
            top_by_cost: top_n_by(shipments, top_n, |s| s.transport_cost),
            compliant_routes,
            compliance_rate_pct,
            avg_transit_days,
            products_stocked: stocking.len(),
            warehouses_used,
        }
    }
}

/// 按 key 降序取前 n 条; 稳定排序保证并列时保持输入顺序
fn top_n_by<F>(shipments: &[ShipmentRecord], n: usize, key: F) -> Vec<ShipmentRecord>
where
    F: Fn(&ShipmentRecord) -> f64,
{
    let mut ranked: Vec<&ShipmentRecord> = shipments.iter().collect();
    ranked.sort_by(|a, b| key(b).total_cmp(&key(a)));
    ranked.into_iter().take(n).cloned().collect()
}
