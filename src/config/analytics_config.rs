// ==========================================
// 供应链场景分析引擎 - 分析配置
// ==========================================
// 职责: 渲染系数/阈值等可覆写的命名配置项
// 来源: 默认值 → JSON 文件 → 环境变量 (后者覆盖前者)
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::kpi::ScenarioParameters;
use crate::domain::render::Rgb;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 环境变量名
pub mod env_keys {
    pub const EDGE_WIDTH_DIVISOR: &str = "SCENARIO_INSIGHT_EDGE_WIDTH_DIVISOR";
    pub const WAREHOUSE_SIZE_DIVISOR: &str = "SCENARIO_INSIGHT_WAREHOUSE_SIZE_DIVISOR";
    pub const REGION_SIZE_DIVISOR: &str = "SCENARIO_INSIGHT_REGION_SIZE_DIVISOR";
    pub const MIN_VISIBLE_SIZE: &str = "SCENARIO_INSIGHT_MIN_VISIBLE_SIZE";
    pub const HISTOGRAM_BINS: &str = "SCENARIO_INSIGHT_HISTOGRAM_BINS";
}

// ==========================================
// EncodingConfig - 视觉编码系数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingConfig {
    /// 边宽 = quantity / edge_width_divisor
    pub edge_width_divisor: f64,

    /// 仓库节点尺寸 = capacity / warehouse_size_divisor
    pub warehouse_size_divisor: f64,

    /// 区域节点尺寸 = total_demand / region_size_divisor
    pub region_size_divisor: f64,

    /// 最小可见尺寸 (边宽与节点尺寸共用)
    pub min_visible_size: f64,

    /// 成本区间退化时的中性色
    pub neutral_color: Rgb,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            edge_width_divisor: 500.0,
            warehouse_size_divisor: 300.0,
            region_size_divisor: 1500.0,
            min_visible_size: 1.0,
            neutral_color: Rgb(255, 200, 0),
        }
    }
}

// ==========================================
// AnalyticsConfig - 分析配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub encoding: EncodingConfig,

    /// 服务达标阈值 (service_compliance 严格大于该值视为达标)
    pub service_compliance_threshold: f64,

    /// 仓库利用率目标线 (%)
    pub utilization_target_pct: f64,

    /// 仓库利用率上限 (%)
    pub utilization_max_pct: f64,

    /// 成本直方图分箱数
    pub histogram_bins: usize,

    /// 基准发运排行条数 (按发运量/运输成本)
    pub top_routes: usize,

    /// 场景参数缺省值
    pub default_parameters: ScenarioParameters,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            encoding: EncodingConfig::default(),
            service_compliance_threshold: 0.5,
            utilization_target_pct: 85.0,
            utilization_max_pct: 95.0,
            histogram_bins: 20,
            top_routes: 10,
            default_parameters: ScenarioParameters::default(),
        }
    }
}

impl AnalyticsConfig {
    /// 从 JSON 字符串加载 (缺失字段取默认值)
    pub fn from_json_str(raw: &str) -> ConfigResult<Self> {
        let config: AnalyticsConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 文件加载
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        tracing::info!(path = %path.display(), "加载分析配置");
        Self::from_json_str(&raw)
    }

    /// 应用环境变量覆写
    pub fn with_env_overrides(self) -> ConfigResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// 按 key 查找覆写值 (便于测试注入)
    pub fn with_overrides<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = read_f64(&lookup, env_keys::EDGE_WIDTH_DIVISOR)? {
            self.encoding.edge_width_divisor = v;
        }
        if let Some(v) = read_f64(&lookup, env_keys::WAREHOUSE_SIZE_DIVISOR)? {
            self.encoding.warehouse_size_divisor = v;
        }
        if let Some(v) = read_f64(&lookup, env_keys::REGION_SIZE_DIVISOR)? {
            self.encoding.region_size_divisor = v;
        }
        if let Some(v) = read_f64(&lookup, env_keys::MIN_VISIBLE_SIZE)? {
            self.encoding.min_visible_size = v;
        }
        if let Some(raw) = lookup(env_keys::HISTOGRAM_BINS) {
            self.histogram_bins =
                raw.trim()
                    .parse::<usize>()
                    .map_err(|e| ConfigError::InvalidValue {
                        key: env_keys::HISTOGRAM_BINS.to_string(),
                        value: raw.clone(),
                        message: e.to_string(),
                    })?;
        }

        self.validate()?;
        Ok(self)
    }

    /// 校验配置合法性
    pub fn validate(&self) -> ConfigResult<()> {
        let positive = [
            ("encoding.edge_width_divisor", self.encoding.edge_width_divisor),
            ("encoding.warehouse_size_divisor", self.encoding.warehouse_size_divisor),
            ("encoding.region_size_divisor", self.encoding.region_size_divisor),
        ];
        for (key, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(key, value, "必须为正数"));
            }
        }

        let floor = self.encoding.min_visible_size;
        if !(floor.is_finite() && floor >= 0.0) {
            return Err(invalid("encoding.min_visible_size", floor, "不能为负数"));
        }

        let threshold = self.service_compliance_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(invalid("service_compliance_threshold", threshold, "必须在 [0,1] 内"));
        }

        if self.histogram_bins == 0 {
            return Err(ConfigError::InvalidValue {
                key: "histogram_bins".to_string(),
                value: "0".to_string(),
                message: "分箱数必须大于 0".to_string(),
            });
        }

        if self.top_routes == 0 {
            return Err(ConfigError::InvalidValue {
                key: "top_routes".to_string(),
                value: "0".to_string(),
                message: "排行条数必须大于 0".to_string(),
            });
        }

        if !(self.utilization_target_pct < self.utilization_max_pct) {
            return Err(invalid(
                "utilization_target_pct",
                self.utilization_target_pct,
                "目标线必须低于上限",
            ));
        }

        Ok(())
    }
}

fn read_f64<F>(lookup: &F, key: &str) -> ConfigResult<Option<f64>>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw.clone(),
                message: e.to_string(),
            }),
    }
}

fn invalid(key: &str, value: f64, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        message: message.to_string(),
    }
}
