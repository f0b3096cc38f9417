// ==========================================
// 供应链场景分析引擎 - 渲染对象
// ==========================================
// 职责: 与具体图表库无关的渲染就绪结构
// 红线: 颜色必须是已解析的 RGB 三元组, 不输出色标对象
// ==========================================

use crate::domain::types::NodeType;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Rgb - 颜色
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const GREEN: Rgb = Rgb(0, 255, 0);
    pub const YELLOW: Rgb = Rgb(255, 255, 0);
    pub const RED: Rgb = Rgb(255, 0, 0);

    /// 线性插值, factor 截断到 [0,1], 通道四舍五入
    pub fn lerp(from: Rgb, to: Rgb, factor: f64) -> Rgb {
        let f = if factor.is_nan() { 0.0 } else { factor.clamp(0.0, 1.0) };
        let channel = |a: u8, b: u8| -> u8 {
            let v = a as f64 + (b as f64 - a as f64) * f;
            v.round().clamp(0.0, 255.0) as u8
        };
        Rgb(
            channel(from.0, to.0),
            channel(from.1, to.1),
            channel(from.2, to.2),
        )
    }

    /// CSS 字符串, 如 "rgb(255,0,0)"
    pub fn to_css(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.0, self.1, self.2)
    }
}

// ==========================================
// RenderEdge - 渲染就绪的边
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderEdge {
    pub source: String,
    pub target: String,

    // 端点坐标 (x = 经度, y = 纬度)
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,

    pub color: Rgb,
    pub width: f64,

    // 悬浮提示用的原始值
    pub quantity: f64,
    pub cost: f64,
    pub service_compliance: f64,
}

// ==========================================
// RenderNode - 渲染就绪的节点
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub label: String,
    pub category: NodeType,
}

/// 边端点角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointRole {
    Source,
    Target,
}

impl fmt::Display for EndpointRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointRole::Source => write!(f, "source"),
            EndpointRole::Target => write!(f, "target"),
        }
    }
}
