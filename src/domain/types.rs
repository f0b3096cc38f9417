// ==========================================
// 供应链场景分析引擎 - 领域类型定义
// ==========================================
// 职责: 指标/成本分量/节点类型等封闭枚举
// 红线: 指标一律用枚举表达, 不允许自由字符串键
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 指标方向 (Metric Direction)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricDirection {
    HigherIsBetter, // 越大越好
    LowerIsBetter,  // 越小越好 (如总成本)
}

impl fmt::Display for MetricDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricDirection::HigherIsBetter => write!(f, "HIGHER_IS_BETTER"),
            MetricDirection::LowerIsBetter => write!(f, "LOWER_IS_BETTER"),
        }
    }
}

// ==========================================
// 场景指标 (Scenario Metric)
// ==========================================
// 取值逻辑见 KpiRecord::metric_value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScenarioMetric {
    TotalCost,
    TransportationCost,
    HoldingCost,
    StockoutCost,
    OrderFulfillmentRate,
    OnTimeDeliveryRate,
    LateDeliveryRate, // 1 - on_time_delivery_rate
    TotalDemand,
    TotalFulfilled,
    TotalStockouts,
    ProfitImprovement,
    CurrentProfit,
    EstimatedNewProfit,
    AvgWarehouseUtilization,
    CapacityMultiplier,
    TransportCostMultiplier,
    ServiceLevelTarget,
}

impl ScenarioMetric {
    /// 所有指标 (稳定顺序)
    pub const ALL: [ScenarioMetric; 17] = [
        ScenarioMetric::TotalCost,
        ScenarioMetric::TransportationCost,
        ScenarioMetric::HoldingCost,
        ScenarioMetric::StockoutCost,
        ScenarioMetric::OrderFulfillmentRate,
        ScenarioMetric::OnTimeDeliveryRate,
        ScenarioMetric::LateDeliveryRate,
        ScenarioMetric::TotalDemand,
        ScenarioMetric::TotalFulfilled,
        ScenarioMetric::TotalStockouts,
        ScenarioMetric::ProfitImprovement,
        ScenarioMetric::CurrentProfit,
        ScenarioMetric::EstimatedNewProfit,
        ScenarioMetric::AvgWarehouseUtilization,
        ScenarioMetric::CapacityMultiplier,
        ScenarioMetric::TransportCostMultiplier,
        ScenarioMetric::ServiceLevelTarget,
    ];

    /// 默认比较方向
    ///
    /// 成本/缺货/延迟类为 LowerIsBetter, 其余为 HigherIsBetter
    pub fn default_direction(self) -> MetricDirection {
        match self {
            ScenarioMetric::TotalCost
            | ScenarioMetric::TransportationCost
            | ScenarioMetric::HoldingCost
            | ScenarioMetric::StockoutCost
            | ScenarioMetric::LateDeliveryRate
            | ScenarioMetric::TotalStockouts => MetricDirection::LowerIsBetter,
            _ => MetricDirection::HigherIsBetter,
        }
    }

    /// 是否为比率类指标 ([0,1])
    pub fn is_ratio(self) -> bool {
        matches!(
            self,
            ScenarioMetric::OrderFulfillmentRate
                | ScenarioMetric::OnTimeDeliveryRate
                | ScenarioMetric::LateDeliveryRate
                | ScenarioMetric::ServiceLevelTarget
        )
    }

    /// 展示名称
    pub fn label(self) -> &'static str {
        match self {
            ScenarioMetric::TotalCost => "总成本",
            ScenarioMetric::TransportationCost => "运输成本",
            ScenarioMetric::HoldingCost => "持有成本",
            ScenarioMetric::StockoutCost => "缺货惩罚",
            ScenarioMetric::OrderFulfillmentRate => "订单满足率",
            ScenarioMetric::OnTimeDeliveryRate => "准时交付率",
            ScenarioMetric::LateDeliveryRate => "延迟交付率",
            ScenarioMetric::TotalDemand => "总需求",
            ScenarioMetric::TotalFulfilled => "已满足量",
            ScenarioMetric::TotalStockouts => "缺货量",
            ScenarioMetric::ProfitImprovement => "利润改善",
            ScenarioMetric::CurrentProfit => "当前利润",
            ScenarioMetric::EstimatedNewProfit => "预计新利润",
            ScenarioMetric::AvgWarehouseUtilization => "平均仓库利用率",
            ScenarioMetric::CapacityMultiplier => "产能系数",
            ScenarioMetric::TransportCostMultiplier => "运输成本系数",
            ScenarioMetric::ServiceLevelTarget => "服务水平目标",
        }
    }
}

impl fmt::Display for ScenarioMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScenarioMetric::TotalCost => "TOTAL_COST",
            ScenarioMetric::TransportationCost => "TRANSPORTATION_COST",
            ScenarioMetric::HoldingCost => "HOLDING_COST",
            ScenarioMetric::StockoutCost => "STOCKOUT_COST",
            ScenarioMetric::OrderFulfillmentRate => "ORDER_FULFILLMENT_RATE",
            ScenarioMetric::OnTimeDeliveryRate => "ON_TIME_DELIVERY_RATE",
            ScenarioMetric::LateDeliveryRate => "LATE_DELIVERY_RATE",
            ScenarioMetric::TotalDemand => "TOTAL_DEMAND",
            ScenarioMetric::TotalFulfilled => "TOTAL_FULFILLED",
            ScenarioMetric::TotalStockouts => "TOTAL_STOCKOUTS",
            ScenarioMetric::ProfitImprovement => "PROFIT_IMPROVEMENT",
            ScenarioMetric::CurrentProfit => "CURRENT_PROFIT",
            ScenarioMetric::EstimatedNewProfit => "ESTIMATED_NEW_PROFIT",
            ScenarioMetric::AvgWarehouseUtilization => "AVG_WAREHOUSE_UTILIZATION",
            ScenarioMetric::CapacityMultiplier => "CAPACITY_MULTIPLIER",
            ScenarioMetric::TransportCostMultiplier => "TRANSPORT_COST_MULTIPLIER",
            ScenarioMetric::ServiceLevelTarget => "SERVICE_LEVEL_TARGET",
        };
        write!(f, "{}", s)
    }
}

// ==========================================
// 比率指标 (Ratio Metric)
// ==========================================
// 百分点差值只对比率指标有意义
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RatioMetric {
    OrderFulfillmentRate,
    OnTimeDeliveryRate,
    LateDeliveryRate,
    ServiceLevelTarget,
}

impl RatioMetric {
    pub fn as_metric(self) -> ScenarioMetric {
        match self {
            RatioMetric::OrderFulfillmentRate => ScenarioMetric::OrderFulfillmentRate,
            RatioMetric::OnTimeDeliveryRate => ScenarioMetric::OnTimeDeliveryRate,
            RatioMetric::LateDeliveryRate => ScenarioMetric::LateDeliveryRate,
            RatioMetric::ServiceLevelTarget => ScenarioMetric::ServiceLevelTarget,
        }
    }
}

impl From<RatioMetric> for ScenarioMetric {
    fn from(metric: RatioMetric) -> Self {
        metric.as_metric()
    }
}

// ==========================================
// 成本分量 (Cost Component)
// ==========================================
// 三个分量之和 = total_cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CostComponent {
    Transportation,
    Holding,
    Stockout,
}

impl CostComponent {
    pub const ALL: [CostComponent; 3] = [
        CostComponent::Transportation,
        CostComponent::Holding,
        CostComponent::Stockout,
    ];

    pub fn as_metric(self) -> ScenarioMetric {
        match self {
            CostComponent::Transportation => ScenarioMetric::TransportationCost,
            CostComponent::Holding => ScenarioMetric::HoldingCost,
            CostComponent::Stockout => ScenarioMetric::StockoutCost,
        }
    }
}

impl fmt::Display for CostComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostComponent::Transportation => write!(f, "TRANSPORTATION"),
            CostComponent::Holding => write!(f, "HOLDING"),
            CostComponent::Stockout => write!(f, "STOCKOUT"),
        }
    }
}

// ==========================================
// 网络节点类型 (Node Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Warehouse, // 仓库 (量级 = capacity)
    Region,    // 需求区域 (量级 = total_demand)
}

impl NodeType {
    /// 解析外部表中的 type 字段 (大小写不敏感)
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "warehouse" => Some(NodeType::Warehouse),
            "region" => Some(NodeType::Region),
            _ => None,
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeType::Warehouse => write!(f, "warehouse"),
            NodeType::Region => write!(f, "region"),
        }
    }
}

// ==========================================
// 仓库利用率分档 (Utilization Band)
// ==========================================
// 顺序: WithinTarget < NearCapacity < OverCapacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UtilizationBand {
    WithinTarget, // 低于目标线
    NearCapacity, // 目标线 ~ 上限
    OverCapacity, // 达到或超过上限
}

impl fmt::Display for UtilizationBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UtilizationBand::WithinTarget => write!(f, "WITHIN_TARGET"),
            UtilizationBand::NearCapacity => write!(f, "NEAR_CAPACITY"),
            UtilizationBand::OverCapacity => write!(f, "OVER_CAPACITY"),
        }
    }
}
