// ==========================================
// 供应链场景分析引擎 - 优化结果目录加载器
// ==========================================
// 目录布局 (由外部优化器产出):
//   <root>/scenario_comparison_kpis.csv     必需
//   <root>/network_nodes.csv                必需
//   <root>/network_edges.csv                必需
//   <root>/analysis_metadata.json           可选
//   <root>/Baseline/kpis.json               可选, 覆盖对比表中的基准行
//   <root>/Baseline/warehouse_utilization.csv 可选
//   <root>/Baseline/shipments.csv           可选, 基准发运分配
//   <root>/Baseline/stocking.csv            可选, 基准备货决策
//   <root>/<scenario>/kpis.json             按需读取
// 网络/明细表中的无效行被跳过, 记入质量报告
// ==========================================

use crate::config::AnalyticsConfig;
use crate::domain::dataset::ScenarioDataset;
use crate::domain::kpi::{KpiRecord, ScenarioParameters, BASELINE_SCENARIO};
use crate::importer::dataset_builder::DatasetBuilder;
use crate::importer::dq_validator::DqReport;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{self, ParsedTable};
use crate::perf::PerfGuard;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 结果文件名
pub mod result_files {
    pub const SCENARIO_COMPARISON_KPIS: &str = "scenario_comparison_kpis.csv";
    pub const NETWORK_NODES: &str = "network_nodes.csv";
    pub const NETWORK_EDGES: &str = "network_edges.csv";
    pub const ANALYSIS_METADATA: &str = "analysis_metadata.json";
    pub const SCENARIO_KPIS: &str = "kpis.json";
    pub const WAREHOUSE_UTILIZATION: &str = "warehouse_utilization.csv";
    pub const SHIPMENTS: &str = "shipments.csv";
    pub const STOCKING: &str = "stocking.csv";
}

pub struct ResultsLoader {
    root: PathBuf,
    defaults: ScenarioParameters,
}

impl ResultsLoader {
    pub fn new(root: impl Into<PathBuf>, config: &AnalyticsConfig) -> Self {
        Self {
            root: root.into(),
            defaults: config.default_parameters,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 读取完整结果目录并构建数据集
    pub fn load_dataset(&self) -> ImportResult<(ScenarioDataset, DqReport)> {
        let mut perf = PerfGuard::new("importer.load_dataset");
        info!(root = %self.root.display(), "开始加载优化结果");

        let scenarios = file_parser::parse_kpi_csv(
            self.open_required(result_files::SCENARIO_COMPARISON_KPIS)?,
            &self.defaults,
        )?;
        let nodes = file_parser::parse_nodes_csv(self.open_required(result_files::NETWORK_NODES)?)?;
        let edges = file_parser::parse_edges_csv(self.open_required(result_files::NETWORK_EDGES)?)?;

        let metadata = match self.open_optional(Path::new(result_files::ANALYSIS_METADATA))? {
            Some(reader) => Some(file_parser::parse_metadata_json(reader)?),
            None => None,
        };

        let utilization = self.load_baseline_table(
            result_files::WAREHOUSE_UTILIZATION,
            file_parser::parse_utilization_csv,
        )?;
        let shipments =
            self.load_baseline_table(result_files::SHIPMENTS, file_parser::parse_shipments_csv)?;
        let stocking =
            self.load_baseline_table(result_files::STOCKING, file_parser::parse_stocking_csv)?;

        perf.set_items(scenarios.len() + nodes.records.len() + edges.records.len());

        let rejected = [
            nodes.rejected,
            edges.rejected,
            utilization.rejected,
            shipments.rejected,
            stocking.rejected,
        ]
        .concat();

        let mut builder = DatasetBuilder::new()
            .with_scenarios(scenarios)
            .with_nodes(nodes.records)
            .with_edges(edges.records)
            .with_warehouse_utilization(utilization.records)
            .with_shipments(shipments.records)
            .with_stocking(stocking.records)
            .with_rejected_rows(rejected)
            .with_metadata(metadata);

        // 基准详情 (含 current_late_delivery_rate 等) 覆盖对比表中的基准行
        if let Some(baseline) = self.try_load_scenario_kpis(BASELINE_SCENARIO)? {
            debug!("使用 Baseline/kpis.json 覆盖基准记录");
            builder.upsert_scenario(baseline);
        }

        builder.build()
    }

    /// 读取 <scenario>/kpis.json
    pub fn load_scenario_kpis(&self, scenario_name: &str) -> ImportResult<KpiRecord> {
        self.try_load_scenario_kpis(scenario_name)?.ok_or_else(|| {
            ImportError::FileNotFound(self.scenario_kpis_path(scenario_name).display().to_string())
        })
    }

    fn try_load_scenario_kpis(&self, scenario_name: &str) -> ImportResult<Option<KpiRecord>> {
        let relative = Path::new(scenario_name).join(result_files::SCENARIO_KPIS);
        match self.open_optional(&relative)? {
            Some(reader) => Ok(Some(file_parser::parse_scenario_kpi_json(
                reader,
                scenario_name,
                &self.defaults,
            )?)),
            None => Ok(None),
        }
    }

    /// Baseline/<file>, 文件不存在时为空表
    fn load_baseline_table<T, F>(&self, file: &str, parse: F) -> ImportResult<ParsedTable<T>>
    where
        F: FnOnce(BufReader<File>) -> ImportResult<ParsedTable<T>>,
    {
        match self.open_optional(&Path::new(BASELINE_SCENARIO).join(file))? {
            Some(reader) => parse(reader),
            None => Ok(ParsedTable::default()),
        }
    }

    fn scenario_kpis_path(&self, scenario_name: &str) -> PathBuf {
        self.root.join(scenario_name).join(result_files::SCENARIO_KPIS)
    }

    fn open_required(&self, name: &str) -> ImportResult<BufReader<File>> {
        self.open_optional(Path::new(name))?
            .ok_or_else(|| ImportError::FileNotFound(self.root.join(name).display().to_string()))
    }

    fn open_optional(&self, relative: &Path) -> ImportResult<Option<BufReader<File>>> {
        let path = self.root.join(relative);
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(BufReader::new(File::open(&path)?)))
    }
}
