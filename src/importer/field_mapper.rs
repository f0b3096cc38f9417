// ==========================================
// 供应链场景分析引擎 - 字段映射器
// ==========================================
// 职责: 松散表行 (全部字段可选) → 类型化记录
// 红线: 缺失/改名字段在构造时立即失败, 不把 None/NaN 带进计算
// 表头: 每种行声明必需列, 表头缺列时整表失败
// ==========================================

use crate::domain::kpi::{KpiRecord, ScenarioParameters};
use crate::domain::network::{NetworkEdge, NetworkNode};
use crate::domain::shipment::{ShipmentRecord, StockingRecord};
use crate::domain::types::NodeType;
use crate::domain::warehouse::WarehouseUtilization;
use crate::importer::error::{ImportError, ImportResult};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt::Display;

/// 表格行: 声明表头必需列
pub trait TableRow: DeserializeOwned {
    const REQUIRED_COLUMNS: &'static [&'static str];
}

// ==========================================
// 原始行结构
// ==========================================

/// KPI 行 (scenario_comparison_kpis.csv / kpis.json)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KpiRow {
    #[serde(default)]
    pub scenario_name: Option<String>,
    #[serde(default)]
    pub total_cost: Option<f64>,
    #[serde(default)]
    pub total_transportation_cost: Option<f64>,
    #[serde(default)]
    pub total_holding_cost: Option<f64>,
    #[serde(default)]
    pub total_stockout_cost: Option<f64>,
    #[serde(default)]
    pub order_fulfillment_rate: Option<f64>,
    #[serde(default)]
    pub on_time_delivery_rate: Option<f64>,
    #[serde(default)]
    pub total_demand: Option<f64>,
    #[serde(default)]
    pub total_fulfilled: Option<f64>,
    #[serde(default)]
    pub total_stockouts: Option<f64>,
    #[serde(default)]
    pub profit_improvement: Option<f64>,
    #[serde(default)]
    pub current_profit: Option<f64>,
    #[serde(default)]
    pub estimated_new_profit: Option<f64>,
    #[serde(default)]
    pub avg_warehouse_utilization: Option<f64>,
    #[serde(default)]
    pub capacity_multiplier: Option<f64>,
    #[serde(default)]
    pub transport_cost_multiplier: Option<f64>,
    #[serde(default)]
    pub service_level_target: Option<f64>,
    #[serde(default)]
    pub current_late_delivery_rate: Option<f64>,
    #[serde(default)]
    pub optimization_status: Option<String>,
    #[serde(default)]
    pub solve_time_seconds: Option<f64>,
}

/// 节点行 (network_nodes.csv)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeRow {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "type")]
    pub node_type: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub capacity: Option<f64>,
    #[serde(default)]
    pub total_demand: Option<f64>,
    #[serde(default)]
    pub label: Option<String>,
}

/// 边行 (network_edges.csv)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EdgeRow {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub service_compliance: Option<f64>,
}

/// 仓库利用率行 (warehouse_utilization.csv)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UtilizationRow {
    #[serde(default)]
    pub warehouse_id: Option<String>,
    #[serde(default)]
    pub utilization_pct: Option<f64>,
}

/// 发运行 (Baseline/shipments.csv)
///
/// meets_service_target 按文本读取, 兼容 True/False 与 1/0 写法
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShipmentRow {
    #[serde(default)]
    pub warehouse_id: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub transport_cost: Option<f64>,
    #[serde(default)]
    pub transit_time_days: Option<f64>,
    #[serde(default)]
    pub meets_service_target: Option<String>,
}

/// 备货行 (Baseline/stocking.csv)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StockingRow {
    #[serde(default)]
    pub warehouse_id: Option<String>,
    #[serde(default)]
    pub product_id: Option<String>,
}

impl TableRow for KpiRow {
    const REQUIRED_COLUMNS: &'static [&'static str] = &[
        "scenario_name",
        "total_cost",
        "total_transportation_cost",
        "total_holding_cost",
        "total_stockout_cost",
        "order_fulfillment_rate",
        "on_time_delivery_rate",
        "total_demand",
        "total_fulfilled",
        "total_stockouts",
        "profit_improvement",
        "current_profit",
        "estimated_new_profit",
        "avg_warehouse_utilization",
    ];
}

impl TableRow for NodeRow {
    const REQUIRED_COLUMNS: &'static [&'static str] = &["id", "type", "latitude", "longitude"];
}

impl TableRow for EdgeRow {
    const REQUIRED_COLUMNS: &'static [&'static str] =
        &["source", "target", "quantity", "cost", "service_compliance"];
}

impl TableRow for UtilizationRow {
    const REQUIRED_COLUMNS: &'static [&'static str] = &["warehouse_id", "utilization_pct"];
}

impl TableRow for ShipmentRow {
    const REQUIRED_COLUMNS: &'static [&'static str] = &[
        "warehouse_id",
        "region",
        "product_id",
        "quantity",
        "transport_cost",
        "transit_time_days",
        "meets_service_target",
    ];
}

impl TableRow for StockingRow {
    const REQUIRED_COLUMNS: &'static [&'static str] = &["warehouse_id", "product_id"];
}

// ==========================================
// 字段读取辅助
// ==========================================

/// 单行字段读取器 (携带行号用于报错)
struct FieldReader {
    row: usize,
}

impl FieldReader {
    fn text(&self, field: &str, value: Option<String>) -> ImportResult<String> {
        match value.map(|v| v.trim().to_string()) {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(self.missing(field)),
        }
    }

    fn number(&self, field: &str, value: Option<f64>) -> ImportResult<f64> {
        let v = value.ok_or_else(|| self.missing(field))?;
        if !v.is_finite() {
            return Err(self.invalid(field, v, "必须为有限数值"));
        }
        Ok(v)
    }

    fn non_negative(&self, field: &str, value: Option<f64>) -> ImportResult<f64> {
        let v = self.number(field, value)?;
        if v < 0.0 {
            return Err(self.invalid(field, v, "不能为负数"));
        }
        Ok(v)
    }

    fn ratio(&self, field: &str, value: Option<f64>) -> ImportResult<f64> {
        let v = self.number(field, value)?;
        if !(0.0..=1.0).contains(&v) {
            return Err(self.invalid(field, v, "必须在 [0,1] 内"));
        }
        Ok(v)
    }

    /// 布尔标记: true/false, 1/0, yes/no (不区分大小写)
    fn flag(&self, field: &str, value: Option<String>) -> ImportResult<bool> {
        let raw = self.text(field, value)?;
        match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(self.invalid(field, raw, "必须为布尔值")),
        }
    }

    fn positive_or(&self, field: &str, value: Option<f64>, default: f64) -> ImportResult<f64> {
        match value {
            None => Ok(default),
            Some(v) if v.is_finite() && v > 0.0 => Ok(v),
            Some(v) => Err(self.invalid(field, v, "必须为正数")),
        }
    }

    fn missing(&self, field: &str) -> ImportError {
        ImportError::MissingField {
            row: self.row,
            field: field.to_string(),
        }
    }

    fn invalid(&self, field: &str, value: impl Display, message: &str) -> ImportError {
        ImportError::InvalidValue {
            row: self.row,
            field: field.to_string(),
            value: value.to_string(),
            message: message.to_string(),
        }
    }
}

// ==========================================
// 行 → 记录
// ==========================================

impl KpiRow {
    /// 转换为 KpiRecord
    ///
    /// # 参数
    /// - `row`: 行号 (从 1 开始)
    /// - `defaults`: 场景参数缺省值
    pub fn into_record(self, row: usize, defaults: &ScenarioParameters) -> ImportResult<KpiRecord> {
        let f = FieldReader { row };

        let parameters = ScenarioParameters {
            capacity_multiplier: f.positive_or(
                "capacity_multiplier",
                self.capacity_multiplier,
                defaults.capacity_multiplier,
            )?,
            transport_cost_multiplier: f.positive_or(
                "transport_cost_multiplier",
                self.transport_cost_multiplier,
                defaults.transport_cost_multiplier,
            )?,
            service_level_target: match self.service_level_target {
                None => defaults.service_level_target,
                Some(_) => {
                    let v = f.ratio("service_level_target", self.service_level_target)?;
                    if v == 0.0 {
                        return Err(f.invalid("service_level_target", v, "必须为正数"));
                    }
                    v
                }
            },
        };

        let current_late_delivery_rate = match self.current_late_delivery_rate {
            None => None,
            Some(_) => Some(f.ratio(
                "current_late_delivery_rate",
                self.current_late_delivery_rate,
            )?),
        };

        Ok(KpiRecord {
            scenario_name: f.text("scenario_name", self.scenario_name)?,
            total_cost: f.non_negative("total_cost", self.total_cost)?,
            total_transportation_cost: f
                .non_negative("total_transportation_cost", self.total_transportation_cost)?,
            total_holding_cost: f.non_negative("total_holding_cost", self.total_holding_cost)?,
            total_stockout_cost: f.non_negative("total_stockout_cost", self.total_stockout_cost)?,
            order_fulfillment_rate: f.ratio("order_fulfillment_rate", self.order_fulfillment_rate)?,
            on_time_delivery_rate: f.ratio("on_time_delivery_rate", self.on_time_delivery_rate)?,
            total_demand: f.non_negative("total_demand", self.total_demand)?,
            total_fulfilled: f.non_negative("total_fulfilled", self.total_fulfilled)?,
            total_stockouts: f.non_negative("total_stockouts", self.total_stockouts)?,
            profit_improvement: f.number("profit_improvement", self.profit_improvement)?,
            current_profit: f.number("current_profit", self.current_profit)?,
            estimated_new_profit: f.number("estimated_new_profit", self.estimated_new_profit)?,
            avg_warehouse_utilization: f
                .non_negative("avg_warehouse_utilization", self.avg_warehouse_utilization)?,
            parameters,
            current_late_delivery_rate,
            optimization_status: self
                .optimization_status
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            solve_time_seconds: self.solve_time_seconds.filter(|v| v.is_finite()),
        })
    }
}

impl NodeRow {
    /// 转换为 NetworkNode; 量级按类型取 capacity 或 total_demand
    pub fn into_node(self, row: usize) -> ImportResult<NetworkNode> {
        let f = FieldReader { row };

        let id = f.text("id", self.id)?;
        let raw_type = f.text("type", self.node_type)?;
        let node_type = NodeType::parse(&raw_type).ok_or(ImportError::UnknownNodeType {
            row,
            value: raw_type.clone(),
        })?;

        let magnitude = match node_type {
            NodeType::Warehouse => f.non_negative("capacity", self.capacity)?,
            NodeType::Region => f.non_negative("total_demand", self.total_demand)?,
        };

        let label = self
            .label
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| id.clone());

        Ok(NetworkNode {
            id,
            node_type,
            latitude: f.number("latitude", self.latitude)?,
            longitude: f.number("longitude", self.longitude)?,
            magnitude,
            label,
        })
    }
}

impl EdgeRow {
    pub fn into_edge(self, row: usize) -> ImportResult<NetworkEdge> {
        let f = FieldReader { row };
        Ok(NetworkEdge {
            source: f.text("source", self.source)?,
            target: f.text("target", self.target)?,
            quantity: f.non_negative("quantity", self.quantity)?,
            cost: f.non_negative("cost", self.cost)?,
            service_compliance: f.ratio("service_compliance", self.service_compliance)?,
        })
    }
}

impl UtilizationRow {
    pub fn into_utilization(self, row: usize) -> ImportResult<WarehouseUtilization> {
        let f = FieldReader { row };
        Ok(WarehouseUtilization {
            warehouse_id: f.text("warehouse_id", self.warehouse_id)?,
            utilization_pct: f.non_negative("utilization_pct", self.utilization_pct)?,
        })
    }
}

impl ShipmentRow {
    pub fn into_shipment(self, row: usize) -> ImportResult<ShipmentRecord> {
        let f = FieldReader { row };
        Ok(ShipmentRecord {
            warehouse_id: f.text("warehouse_id", self.warehouse_id)?,
            region: f.text("region", self.region)?,
            product_id: f.text("product_id", self.product_id)?,
            quantity: f.non_negative("quantity", self.quantity)?,
            transport_cost: f.non_negative("transport_cost", self.transport_cost)?,
            transit_time_days: f.non_negative("transit_time_days", self.transit_time_days)?,
            meets_service_target: f.flag("meets_service_target", self.meets_service_target)?,
        })
    }
}

impl StockingRow {
    pub fn into_stocking(self, row: usize) -> ImportResult<StockingRecord> {
        let f = FieldReader { row };
        Ok(StockingRecord {
            warehouse_id: f.text("warehouse_id", self.warehouse_id)?,
            product_id: f.text("product_id", self.product_id)?,
        })
    }
}
