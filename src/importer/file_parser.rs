// ==========================================
// 供应链场景分析引擎 - 文件解析器
// ==========================================
// 支持: CSV (表格记录) / JSON (单场景 KPI, 分析元数据)
// 输入: 任意 impl Read, 不关心来源 (文件/内存)
// 行号: 从 1 开始, 不含表头
// 失败策略:
//   - 表头缺少必需列: 整表失败
//   - KPI 表: 任一行无效即失败 (场景集不可残缺)
//   - 网络/明细表: 无效行跳过, 记入 rejected
// ==========================================

use crate::domain::dataset::AnalysisMetadata;
use crate::domain::kpi::{KpiRecord, ScenarioParameters};
use crate::domain::network::{NetworkEdge, NetworkNode};
use crate::domain::shipment::{ShipmentRecord, StockingRecord};
use crate::domain::warehouse::WarehouseUtilization;
use crate::importer::dq_validator::DqViolation;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::{
    EdgeRow, KpiRow, NodeRow, ShipmentRow, StockingRow, TableRow, UtilizationRow,
};
use crate::importer::results_loader::result_files;
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;
use tracing::debug;

/// 逐行容错解析结果
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTable<T> {
    pub records: Vec<T>,
    /// 被跳过的行 (Warning)
    pub rejected: Vec<DqViolation>,
}

impl<T> Default for ParsedTable<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

// ==========================================
// CSV 通用读取
// ==========================================

/// 逐行反序列化 CSV, 跳过完全空白的行; 空单元格视为缺失 (None)
///
/// # 返回
/// - Err: 表头缺列 / CSV 结构损坏
/// - Ok: (行号, 该行结果), 行级错误留给调用方决定
fn read_csv_rows<R, T>(reader: R, table: &str) -> ImportResult<Vec<(usize, ImportResult<T>)>>
where
    R: Read,
    T: TableRow,
{
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true) // 允许行长度不一致
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    if let Some(column) = T::REQUIRED_COLUMNS
        .iter()
        .find(|c| !headers.iter().any(|h| h == **c))
    {
        return Err(ImportError::MissingColumn {
            table: table.to_string(),
            column: column.to_string(),
        });
    }

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result?;

        // 跳过完全空白的行
        if record.iter().all(|v| v.is_empty()) {
            continue;
        }

        let row = idx + 1;
        let parsed = record
            .deserialize::<T>(Some(&headers))
            .map_err(|e| cell_error(row, &headers, &record, e));
        rows.push((row, parsed));
    }

    debug!(table, rows = rows.len(), "CSV 解析完成");
    Ok(rows)
}

/// 单元格类型错误 → 带列名的 InvalidValue
fn cell_error(
    row: usize,
    headers: &StringRecord,
    record: &StringRecord,
    err: csv::Error,
) -> ImportError {
    if let csv::ErrorKind::Deserialize { err: de, .. } = err.kind() {
        if let Some(idx) = de.field().map(|i| i as usize) {
            return ImportError::InvalidValue {
                row,
                field: headers.get(idx).unwrap_or("*").to_string(),
                value: record.get(idx).unwrap_or_default().to_string(),
                message: de.kind().to_string(),
            };
        }
    }
    ImportError::from(err)
}

/// 任一行失败即整表失败
fn collect_strict<T, U, F>(
    rows: Vec<(usize, ImportResult<T>)>,
    convert: F,
) -> ImportResult<Vec<U>>
where
    F: Fn(T, usize) -> ImportResult<U>,
{
    rows.into_iter()
        .map(|(row, raw)| raw.and_then(|raw| convert(raw, row)))
        .collect()
}

/// 无效行跳过并记录
fn collect_lenient<T, U, F>(
    table: &str,
    rows: Vec<(usize, ImportResult<T>)>,
    convert: F,
) -> ParsedTable<U>
where
    F: Fn(T, usize) -> ImportResult<U>,
{
    let mut parsed = ParsedTable::default();
    for (row, raw) in rows {
        match raw.and_then(|raw| convert(raw, row)) {
            Ok(record) => parsed.records.push(record),
            Err(err) => {
                debug!(table, row, error = %err, "跳过无效行");
                parsed.rejected.push(DqViolation::rejected_row(table, row, &err));
            }
        }
    }
    parsed
}

// ==========================================
// 各类表解析
// ==========================================

/// scenario_comparison_kpis.csv
pub fn parse_kpi_csv<R: Read>(
    reader: R,
    defaults: &ScenarioParameters,
) -> ImportResult<Vec<KpiRecord>> {
    let rows = read_csv_rows::<R, KpiRow>(reader, result_files::SCENARIO_COMPARISON_KPIS)?;
    collect_strict(rows, |raw, row| raw.into_record(row, defaults))
}

/// <scenario>/kpis.json (单个对象)
pub fn parse_kpi_json<R: Read>(
    reader: R,
    defaults: &ScenarioParameters,
) -> ImportResult<KpiRecord> {
    let raw: KpiRow = serde_json::from_reader(reader)?;
    raw.into_record(1, defaults)
}

/// <scenario>/kpis.json, 文件内缺少 scenario_name 时取目录名
pub fn parse_scenario_kpi_json<R: Read>(
    reader: R,
    scenario_name: &str,
    defaults: &ScenarioParameters,
) -> ImportResult<KpiRecord> {
    let mut raw: KpiRow = serde_json::from_reader(reader)?;
    if raw.scenario_name.as_deref().map_or(true, |n| n.trim().is_empty()) {
        raw.scenario_name = Some(scenario_name.to_string());
    }
    raw.into_record(1, defaults)
}

/// network_nodes.csv
pub fn parse_nodes_csv<R: Read>(reader: R) -> ImportResult<ParsedTable<NetworkNode>> {
    let table = result_files::NETWORK_NODES;
    let rows = read_csv_rows::<R, NodeRow>(reader, table)?;
    Ok(collect_lenient(table, rows, NodeRow::into_node))
}

/// network_edges.csv
pub fn parse_edges_csv<R: Read>(reader: R) -> ImportResult<ParsedTable<NetworkEdge>> {
    let table = result_files::NETWORK_EDGES;
    let rows = read_csv_rows::<R, EdgeRow>(reader, table)?;
    Ok(collect_lenient(table, rows, EdgeRow::into_edge))
}

/// warehouse_utilization.csv
pub fn parse_utilization_csv<R: Read>(
    reader: R,
) -> ImportResult<ParsedTable<WarehouseUtilization>> {
    let table = result_files::WAREHOUSE_UTILIZATION;
    let rows = read_csv_rows::<R, UtilizationRow>(reader, table)?;
    Ok(collect_lenient(table, rows, UtilizationRow::into_utilization))
}

/// shipments.csv
pub fn parse_shipments_csv<R: Read>(reader: R) -> ImportResult<ParsedTable<ShipmentRecord>> {
    let table = result_files::SHIPMENTS;
    let rows = read_csv_rows::<R, ShipmentRow>(reader, table)?;
    Ok(collect_lenient(table, rows, ShipmentRow::into_shipment))
}

/// stocking.csv
pub fn parse_stocking_csv<R: Read>(reader: R) -> ImportResult<ParsedTable<StockingRecord>> {
    let table = result_files::STOCKING;
    let rows = read_csv_rows::<R, StockingRow>(reader, table)?;
    Ok(collect_lenient(table, rows, StockingRow::into_stocking))
}

/// analysis_metadata.json
pub fn parse_metadata_json<R: Read>(reader: R) -> ImportResult<AnalysisMetadata> {
    Ok(serde_json::from_reader(reader)?)
}
