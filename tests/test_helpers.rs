// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 场景 KPI / 网络节点 / 边的构建器, 以及结果目录生成
// ==========================================

#![allow(dead_code)]

use scenario_insight::domain::kpi::{KpiRecord, ScenarioParameters};
use scenario_insight::domain::network::{NetworkEdge, NetworkNode};
use scenario_insight::domain::shipment::{ShipmentRecord, StockingRecord};
use scenario_insight::domain::types::NodeType;
use scenario_insight::domain::warehouse::WarehouseUtilization;
use std::error::Error;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// ==========================================
// KpiRecord 构建器
// ==========================================

pub struct KpiRecordBuilder {
    record: KpiRecord,
}

impl KpiRecordBuilder {
    /// 默认值自洽: 成本分项之和 = 总成本, 满足 + 缺货 = 需求
    pub fn new(name: &str) -> Self {
        Self {
            record: KpiRecord {
                scenario_name: name.to_string(),
                total_cost: 100.0,
                total_transportation_cost: 60.0,
                total_holding_cost: 10.0,
                total_stockout_cost: 30.0,
                order_fulfillment_rate: 0.9,
                on_time_delivery_rate: 0.9,
                total_demand: 100.0,
                total_fulfilled: 90.0,
                total_stockouts: 10.0,
                profit_improvement: 0.0,
                current_profit: 0.0,
                estimated_new_profit: 0.0,
                avg_warehouse_utilization: 50.0,
                parameters: ScenarioParameters::default(),
                current_late_delivery_rate: None,
                optimization_status: None,
                solve_time_seconds: None,
            },
        }
    }

    /// 设置成本分项, 总成本取分项之和
    pub fn costs(mut self, transport: f64, holding: f64, stockout: f64) -> Self {
        self.record.total_transportation_cost = transport;
        self.record.total_holding_cost = holding;
        self.record.total_stockout_cost = stockout;
        self.record.total_cost = transport + holding + stockout;
        self
    }

    /// 设置满足情况, 满足量/缺货量按需求推算
    pub fn service(mut self, fulfillment: f64, on_time: f64, demand: f64) -> Self {
        self.record.order_fulfillment_rate = fulfillment;
        self.record.on_time_delivery_rate = on_time;
        self.record.total_demand = demand;
        self.record.total_fulfilled = demand * fulfillment;
        self.record.total_stockouts = demand - demand * fulfillment;
        self
    }

    /// 设置利润, 新利润 = 当前 + 改善
    pub fn profit(mut self, current: f64, improvement: f64) -> Self {
        self.record.current_profit = current;
        self.record.profit_improvement = improvement;
        self.record.estimated_new_profit = current + improvement;
        self
    }

    pub fn utilization(mut self, pct: f64) -> Self {
        self.record.avg_warehouse_utilization = pct;
        self
    }

    pub fn parameters(mut self, capacity: f64, transport: f64, service_target: f64) -> Self {
        self.record.parameters = ScenarioParameters {
            capacity_multiplier: capacity,
            transport_cost_multiplier: transport,
            service_level_target: service_target,
        };
        self
    }

    pub fn current_late_rate(mut self, rate: f64) -> Self {
        self.record.current_late_delivery_rate = Some(rate);
        self
    }

    pub fn build(self) -> KpiRecord {
        self.record
    }
}

// ==========================================
// 标准场景集
// ==========================================

pub fn baseline_record() -> KpiRecord {
    KpiRecordBuilder::new("Baseline")
        .costs(28_000_000.0, 200_000.0, 10_000_000.0)
        .service(0.95, 0.93, 1000.0)
        .profit(-9_500_000.0, 11_800_000.0)
        .utilization(78.0)
        .current_late_rate(0.12)
        .build()
}

pub fn low_cost_record() -> KpiRecord {
    KpiRecordBuilder::new("LowCost")
        .costs(22_000_000.0, 150_000.0, 7_850_000.0)
        .service(0.90, 0.88, 1000.0)
        .profit(-9_500_000.0, 12_500_000.0)
        .utilization(81.0)
        .parameters(1.0, 0.8, 0.95)
        .build()
}

pub fn high_service_record() -> KpiRecord {
    KpiRecordBuilder::new("HighService")
        .costs(33_000_000.0, 300_000.0, 11_700_000.0)
        .service(0.99, 0.97, 1000.0)
        .profit(-9_500_000.0, 9_000_000.0)
        .utilization(92.0)
        .parameters(1.2, 1.0, 0.99)
        .build()
}

pub fn standard_scenarios() -> Vec<KpiRecord> {
    vec![baseline_record(), low_cost_record(), high_service_record()]
}

// ==========================================
// 网络构建器
// ==========================================

pub fn warehouse(id: &str, lat: f64, lon: f64, capacity: f64) -> NetworkNode {
    NetworkNode {
        id: id.to_string(),
        node_type: NodeType::Warehouse,
        latitude: lat,
        longitude: lon,
        magnitude: capacity,
        label: id.to_string(),
    }
}

pub fn region(id: &str, lat: f64, lon: f64, demand: f64) -> NetworkNode {
    NetworkNode {
        id: id.to_string(),
        node_type: NodeType::Region,
        latitude: lat,
        longitude: lon,
        magnitude: demand,
        label: id.to_string(),
    }
}

pub fn edge(source: &str, target: &str, quantity: f64, cost: f64, compliance: f64) -> NetworkEdge {
    NetworkEdge {
        source: source.to_string(),
        target: target.to_string(),
        quantity,
        cost,
        service_compliance: compliance,
    }
}

/// 两仓库三区域, 成本区间 [5000, 20000]
pub fn standard_nodes() -> Vec<NetworkNode> {
    vec![
        warehouse("WH1", 40.7, -74.0, 30_000.0),
        warehouse("WH2", 41.9, -87.6, 15_000.0),
        region("R1", 34.0, -118.2, 45_000.0),
        region("R5", 29.8, -95.4, 1_200.0),
        region("R7", 47.6, -122.3, 9_000.0),
    ]
}

pub fn standard_edges() -> Vec<NetworkEdge> {
    vec![
        edge("WH1", "R1", 200.0, 5_000.0, 0.9),
        edge("WH1", "R5", 500.0, 12_000.0, 0.8),
        edge("WH2", "R7", 1_500.0, 20_000.0, 0.3),
        edge("WH2", "R1", 50.0, 8_000.0, 0.6),
    ]
}

pub fn standard_utilization() -> Vec<WarehouseUtilization> {
    vec![
        WarehouseUtilization {
            warehouse_id: "WH1".to_string(),
            utilization_pct: 97.0,
        },
        WarehouseUtilization {
            warehouse_id: "WH2".to_string(),
            utilization_pct: 60.0,
        },
    ]
}

pub fn shipment(
    warehouse_id: &str,
    region: &str,
    product_id: &str,
    quantity: f64,
    transport_cost: f64,
    transit_days: f64,
    on_time: bool,
) -> ShipmentRecord {
    ShipmentRecord {
        warehouse_id: warehouse_id.to_string(),
        region: region.to_string(),
        product_id: product_id.to_string(),
        quantity,
        transport_cost,
        transit_time_days: transit_days,
        meets_service_target: on_time,
    }
}

/// 基准发运: 5 条线路, 4 条达标, 平均在途 3 天
pub fn standard_shipments() -> Vec<ShipmentRecord> {
    vec![
        shipment("WH1", "R1", "P1", 120.0, 2_500.0, 2.0, true),
        shipment("WH1", "R5", "P2", 500.0, 12_000.0, 3.0, true),
        shipment("WH2", "R7", "P1", 900.0, 14_000.0, 6.0, false),
        shipment("WH2", "R7", "P3", 600.0, 6_000.0, 2.0, true),
        shipment("WH2", "R1", "P2", 50.0, 8_000.0, 2.0, true),
    ]
}

pub fn standard_stocking() -> Vec<StockingRecord> {
    [("WH1", "P1"), ("WH1", "P2"), ("WH2", "P1"), ("WH2", "P3")]
        .iter()
        .map(|(wh, p)| StockingRecord {
            warehouse_id: wh.to_string(),
            product_id: p.to_string(),
        })
        .collect()
}

// ==========================================
// 结果目录
// ==========================================

const KPI_HEADER: &str = "scenario_name,total_cost,total_transportation_cost,total_holding_cost,total_stockout_cost,order_fulfillment_rate,on_time_delivery_rate,total_demand,total_fulfilled,total_stockouts,profit_improvement,current_profit,estimated_new_profit,avg_warehouse_utilization,capacity_multiplier,transport_cost_multiplier,service_level_target";

fn kpi_csv_line(r: &KpiRecord) -> String {
    format!(
        "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
        r.scenario_name,
        r.total_cost,
        r.total_transportation_cost,
        r.total_holding_cost,
        r.total_stockout_cost,
        r.order_fulfillment_rate,
        r.on_time_delivery_rate,
        r.total_demand,
        r.total_fulfilled,
        r.total_stockouts,
        r.profit_improvement,
        r.current_profit,
        r.estimated_new_profit,
        r.avg_warehouse_utilization,
        r.parameters.capacity_multiplier,
        r.parameters.transport_cost_multiplier,
        r.parameters.service_level_target,
    )
}

fn node_csv_line(n: &NetworkNode) -> String {
    let (kind, capacity, demand) = match n.node_type {
        NodeType::Warehouse => ("warehouse", n.magnitude.to_string(), String::new()),
        NodeType::Region => ("region", String::new(), n.magnitude.to_string()),
    };
    format!(
        "{},{},{},{},{},{},{}",
        n.id, kind, n.latitude, n.longitude, capacity, demand, n.label
    )
}

/// 在临时目录中写出标准结果布局
///
/// # 返回
/// - TempDir: 临时目录（需要保持存活）
pub fn write_results_dir(
    scenarios: &[KpiRecord],
    nodes: &[NetworkNode],
    edges: &[NetworkEdge],
) -> Result<TempDir, Box<dyn Error>> {
    let dir = TempDir::new()?;
    let root = dir.path();

    let mut kpis = vec![KPI_HEADER.to_string()];
    kpis.extend(scenarios.iter().map(kpi_csv_line));
    fs::write(root.join("scenario_comparison_kpis.csv"), kpis.join("\n"))?;

    let mut node_lines = vec!["id,type,latitude,longitude,capacity,total_demand,label".to_string()];
    node_lines.extend(nodes.iter().map(node_csv_line));
    fs::write(root.join("network_nodes.csv"), node_lines.join("\n"))?;

    let mut edge_lines = vec!["source,target,quantity,cost,service_compliance".to_string()];
    edge_lines.extend(edges.iter().map(|e| {
        format!(
            "{},{},{},{},{}",
            e.source, e.target, e.quantity, e.cost, e.service_compliance
        )
    }));
    fs::write(root.join("network_edges.csv"), edge_lines.join("\n"))?;

    Ok(dir)
}

/// 写出 <scenario>/kpis.json
pub fn write_scenario_json(root: &Path, record: &KpiRecord) -> Result<(), Box<dyn Error>> {
    let dir = root.join(&record.scenario_name);
    fs::create_dir_all(&dir)?;
    let mut value = serde_json::to_value(record)?;
    // kpis.json 中参数为平铺字段
    if let Some(obj) = value.as_object_mut() {
        obj.remove("parameters");
        obj.insert(
            "capacity_multiplier".to_string(),
            record.parameters.capacity_multiplier.into(),
        );
        obj.insert(
            "transport_cost_multiplier".to_string(),
            record.parameters.transport_cost_multiplier.into(),
        );
        obj.insert(
            "service_level_target".to_string(),
            record.parameters.service_level_target.into(),
        );
    }
    fs::write(dir.join("kpis.json"), serde_json::to_string_pretty(&value)?)?;
    Ok(())
}

/// 写出 Baseline/warehouse_utilization.csv
pub fn write_utilization_csv(
    root: &Path,
    rows: &[WarehouseUtilization],
) -> Result<(), Box<dyn Error>> {
    let dir = root.join("Baseline");
    fs::create_dir_all(&dir)?;
    let mut lines = vec!["warehouse_id,utilization_pct".to_string()];
    lines.extend(
        rows.iter()
            .map(|r| format!("{},{}", r.warehouse_id, r.utilization_pct)),
    );
    fs::write(dir.join("warehouse_utilization.csv"), lines.join("\n"))?;
    Ok(())
}

/// 写出 analysis_metadata.json
pub fn write_metadata(root: &Path, json: &str) -> Result<(), Box<dyn Error>> {
    fs::write(root.join("analysis_metadata.json"), json)?;
    Ok(())
}

/// 在 network_edges.csv 末尾追加原始行 (可为无效值)
pub fn append_edge_line(root: &Path, line: &str) -> Result<(), Box<dyn Error>> {
    let path = root.join("network_edges.csv");
    let mut content = fs::read_to_string(&path)?;
    content.push('\n');
    content.push_str(line);
    fs::write(path, content)?;
    Ok(())
}

/// 写出 Baseline/shipments.csv 与 Baseline/stocking.csv (布尔值按 True/False 书写)
pub fn write_baseline_flows(
    root: &Path,
    shipments: &[ShipmentRecord],
    stocking: &[StockingRecord],
) -> Result<(), Box<dyn Error>> {
    let dir = root.join("Baseline");
    fs::create_dir_all(&dir)?;

    let mut lines = vec![
        "warehouse_id,region,product_id,quantity,transport_cost,transit_time_days,meets_service_target"
            .to_string(),
    ];
    lines.extend(shipments.iter().map(|s| {
        format!(
            "{},{},{},{},{},{},{}",
            s.warehouse_id,
            s.region,
            s.product_id,
            s.quantity,
            s.transport_cost,
            s.transit_time_days,
            if s.meets_service_target { "True" } else { "False" }
        )
    }));
    fs::write(dir.join("shipments.csv"), lines.join("\n"))?;

    let mut lines = vec!["warehouse_id,product_id".to_string()];
    lines.extend(
        stocking
            .iter()
            .map(|s| format!("{},{}", s.warehouse_id, s.product_id)),
    );
    fs::write(dir.join("stocking.csv"), lines.join("\n"))?;
    Ok(())
}
