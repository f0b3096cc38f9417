// ==========================================
// 供应链场景分析引擎 - 场景驾驶舱 API
// ==========================================
// 职责: 展示层的唯一入口; 持有不可变数据集、配置与计算缓存
// 架构: API 层 → 引擎层 (纯函数) ← 导入层 (数据集)
// 缓存: 归一化分数按 (场景集, 指标集), 渲染图按筛选条件; 永不失效
// ==========================================

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::config::AnalyticsConfig;
use crate::domain::dataset::{AnalysisMetadata, ScenarioDataset};
use crate::domain::kpi::KpiRecord;
use crate::domain::network::{FlowFilter, FlowFilterKey, NetworkEdge};
use crate::domain::types::ScenarioMetric;
use crate::engine::cache::{ComputeCache, NormalizationKey};
use crate::engine::derived_metrics::{DerivedMetrics, DerivedMetricsCalculator, DerivedValue};
use crate::engine::flow_encoder::{FlowEncoder, RenderGraph};
use crate::engine::insights::{ScenarioInsightEngine, ScenarioInsights, UtilizationEntry};
use crate::engine::network_stats::{
    HistogramBin, NetworkStatistics, NetworkStatisticsEngine, ShipmentSummary,
};
use crate::engine::normalizer::{
    default_comparison_metrics, MetricSpec, MultiMetricNormalizer, NormalizedScoreTable,
};
use crate::importer::dq_validator::DqReport;
use crate::importer::results_loader::ResultsLoader;
use crate::perf::PerfGuard;

// ==========================================
// ScenarioDashboardApi - 场景驾驶舱 API
// ==========================================

/// 场景驾驶舱API
///
/// 职责：
/// 1. 场景查询与相对基准的派生指标
/// 2. 多指标归一化对比（带缓存）
/// 3. 网络流渲染图、统计与成本分布（带缓存）、基准发运摘要
/// 4. 最优场景洞察与仓库利用率分档
///
/// 数据集加载后不可变，所有方法只读，可跨线程共享。
pub struct ScenarioDashboardApi {
    dataset: Arc<ScenarioDataset>,
    dq_report: DqReport,
    config: AnalyticsConfig,

    calculator: DerivedMetricsCalculator,
    normalizer: MultiMetricNormalizer,
    encoder: FlowEncoder,
    statistics: NetworkStatisticsEngine,
    insights: ScenarioInsightEngine,

    score_cache: ComputeCache<NormalizationKey, NormalizedScoreTable>,
    render_cache: ComputeCache<FlowFilterKey, RenderGraph>,
}

impl ScenarioDashboardApi {
    /// 创建新的ScenarioDashboardApi实例
    ///
    /// # 参数
    /// - dataset: 已校验的场景数据集
    /// - config: 分析配置（先校验）
    pub fn new(dataset: ScenarioDataset, config: AnalyticsConfig) -> ApiResult<Self> {
        config.validate()?;

        info!(
            scenarios = dataset.scenarios().len(),
            nodes = dataset.nodes().len(),
            edges = dataset.edges().len(),
            "初始化场景驾驶舱"
        );

        Ok(Self {
            dataset: Arc::new(dataset),
            dq_report: DqReport::new(),
            encoder: FlowEncoder::new(&config),
            insights: ScenarioInsightEngine::new(&config),
            calculator: DerivedMetricsCalculator::new(),
            normalizer: MultiMetricNormalizer::new(),
            statistics: NetworkStatisticsEngine::new(),
            config,
            score_cache: ComputeCache::new(),
            render_cache: ComputeCache::new(),
        })
    }

    /// 附带加载阶段的数据质量报告
    pub fn with_dq_report(mut self, report: DqReport) -> Self {
        self.dq_report = report;
        self
    }

    /// 从优化结果目录加载
    pub fn load_from_dir(root: &Path, config: AnalyticsConfig) -> ApiResult<Self> {
        let (dataset, report) = ResultsLoader::new(root, &config).load_dataset()?;
        Ok(Self::new(dataset, config)?.with_dq_report(report))
    }

    pub fn dataset(&self) -> Arc<ScenarioDataset> {
        Arc::clone(&self.dataset)
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn dq_report(&self) -> &DqReport {
        &self.dq_report
    }

    pub fn metadata(&self) -> Option<&AnalysisMetadata> {
        self.dataset.metadata()
    }

    // ==========================================
    // 场景查询
    // ==========================================

    pub fn baseline(&self) -> &KpiRecord {
        self.dataset.baseline()
    }

    /// 按名称查询场景
    ///
    /// # 返回
    /// - Err(ApiError::NotFound): 场景不存在
    pub fn scenario(&self, name: &str) -> ApiResult<&KpiRecord> {
        if name.trim().is_empty() {
            return Err(ApiError::InvalidInput("场景名称不能为空".to_string()));
        }
        self.dataset
            .scenario(name)
            .ok_or_else(|| ApiError::NotFound(format!("场景(name={})不存在", name)))
    }

    pub fn scenario_names(&self) -> Vec<String> {
        self.dataset.scenario_names()
    }

    // ==========================================
    // 派生指标
    // ==========================================

    /// 目标场景相对基准的派生指标
    pub fn compare_to_baseline(&self, name: &str) -> ApiResult<DerivedMetrics> {
        let target = self.scenario(name)?;
        let derived = self.calculator.derive(self.baseline(), target);

        for fault in &derived.faults {
            warn!(
                scenario = %derived.scenario_name,
                item = %fault.item,
                reason = %fault.reason,
                "派生指标未定义"
            );
        }
        Ok(derived)
    }

    /// 全部非基准场景相对基准的派生指标（保持加载顺序）
    pub fn compare_all_to_baseline(&self) -> Vec<DerivedMetrics> {
        let mut perf = PerfGuard::new("api.compare_all_to_baseline");
        let baseline = self.baseline();
        let result: Vec<DerivedMetrics> = self
            .dataset
            .scenarios()
            .iter()
            .filter(|r| !r.is_baseline())
            .map(|r| self.calculator.derive(baseline, r))
            .collect();
        perf.set_items(result.len());
        result
    }

    /// 两个场景之间的弹性; 驱动值相同时为 Undefined
    pub fn elasticity(
        &self,
        output: ScenarioMetric,
        driver: ScenarioMetric,
        scenario_a: &str,
        scenario_b: &str,
    ) -> ApiResult<DerivedValue> {
        let a = self.scenario(scenario_a)?;
        let b = self.scenario(scenario_b)?;
        Ok(DerivedValue::from_result(
            self.calculator.elasticity(output, driver, a, b),
        ))
    }

    // ==========================================
    // 多指标归一化
    // ==========================================

    /// 选中场景集的归一化分数 (按场景集+指标集缓存)
    ///
    /// # 返回
    /// - Err(ApiError::EmptyInput): 场景集或指标集为空
    /// - Err(ApiError::NotFound): 含未知场景
    pub fn normalized_scores(
        &self,
        names: &[String],
        metrics: &[MetricSpec],
    ) -> ApiResult<Arc<NormalizedScoreTable>> {
        let records = names
            .iter()
            .map(|n| self.scenario(n))
            .collect::<ApiResult<Vec<&KpiRecord>>>()?;

        let key = NormalizationKey::new(names, metrics);
        self.score_cache.get_or_try_insert_with(key, || {
            let mut perf = PerfGuard::new("api.normalized_scores");
            perf.set_items(records.len() * metrics.len());
            debug!(scenarios = records.len(), metrics = metrics.len(), "计算归一化分数");
            self.normalizer
                .normalize(&records, metrics)
                .map_err(ApiError::from)
        })
    }

    /// 默认对比指标 (总成本/满足率/准时率/利润改善)
    pub fn default_comparison(&self, names: &[String]) -> ApiResult<Arc<NormalizedScoreTable>> {
        self.normalized_scores(names, &default_comparison_metrics())
    }

    // ==========================================
    // 网络流
    // ==========================================

    /// 默认筛选: 全部仓库
    pub fn default_filter(&self) -> FlowFilter {
        FlowFilter::all_warehouses(self.dataset.nodes())
    }

    /// 渲染图 (按筛选条件缓存)
    pub fn render_network(&self, filter: &FlowFilter) -> Arc<RenderGraph> {
        self.render_cache.get_or_insert_with(filter.cache_key(), || {
            let mut perf = PerfGuard::new("api.render_network");
            let graph = self
                .encoder
                .encode(self.dataset.nodes(), self.dataset.edges(), filter);
            perf.set_items(graph.edges.len());
            debug!(
                edges = graph.edges.len(),
                skipped = graph.skipped.len(),
                "生成网络渲染图"
            );
            graph
        })
    }

    pub fn network_statistics(&self, filter: &FlowFilter) -> NetworkStatistics {
        let edges = self.filtered_edges(filter);
        self.statistics.summarize(
            &edges,
            filter.selected_source_ids.len(),
            self.config.service_compliance_threshold,
        )
    }

    pub fn cost_histogram(&self, filter: &FlowFilter) -> Vec<HistogramBin> {
        let edges = self.filtered_edges(filter);
        self.statistics
            .cost_histogram(&edges, self.config.histogram_bins)
    }

    /// 基准发运排行/达标率/在途天数与备货统计
    pub fn shipment_summary(&self) -> ShipmentSummary {
        let mut perf = PerfGuard::new("api.shipment_summary");
        perf.set_items(self.dataset.shipments().len());
        self.statistics.summarize_shipments(
            self.dataset.shipments(),
            self.dataset.stocking(),
            self.config.top_routes,
        )
    }

    fn filtered_edges(&self, filter: &FlowFilter) -> Vec<&NetworkEdge> {
        self.encoder
            .filter_edges(self.dataset.edges(), filter)
            .into_iter()
            .map(|(_, e)| e)
            .collect()
    }

    // ==========================================
    // 洞察
    // ==========================================

    pub fn scenario_insights(&self) -> ApiResult<ScenarioInsights> {
        Ok(self.insights.best_scenarios(self.dataset.scenarios())?)
    }

    /// 基准场景的仓库利用率分档
    pub fn utilization_report(&self) -> Vec<UtilizationEntry> {
        self.insights
            .utilization_report(self.dataset.warehouse_utilization())
    }
}
