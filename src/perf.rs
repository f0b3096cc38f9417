use std::cell::Cell;
use std::sync::OnceLock;
use std::time::Instant;

static PERF_ENABLED: OnceLock<bool> = OnceLock::new();
static SLOW_OP_THRESHOLD_MS: OnceLock<u64> = OnceLock::new();

thread_local! {
    static PERF_DEPTH: Cell<u32> = Cell::new(0);
}

fn is_true(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

/// 性能日志开关
///
/// - Debug 默认开启；Release 默认关闭（可通过环境变量开启）
/// - `SCENARIO_INSIGHT_PERF=1` 强制开启, `=0` 强制关闭
pub fn is_enabled() -> bool {
    *PERF_ENABLED.get_or_init(|| match std::env::var("SCENARIO_INSIGHT_PERF") {
        Ok(v) => is_true(&v),
        Err(_) => cfg!(debug_assertions),
    })
}

/// 慢操作阈值（毫秒），`SCENARIO_INSIGHT_SLOW_OP_MS` 可覆盖
fn slow_threshold_ms() -> u64 {
    *SLOW_OP_THRESHOLD_MS.get_or_init(|| {
        std::env::var("SCENARIO_INSIGHT_SLOW_OP_MS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(if cfg!(debug_assertions) { 50 } else { 200 })
    })
}

/// 性能统计 Guard：记录 elapsed_ms + 处理条目数 + 嵌套深度
///
/// 使用方式：
/// ```ignore
/// let mut perf = scenario_insight::perf::PerfGuard::new("api.render_network");
/// // do work...
/// perf.set_items(edges.len());
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    items: usize,
    depth: u32,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        let depth = PERF_DEPTH.with(|d| {
            let next = d.get().saturating_add(1);
            d.set(next);
            next
        });
        Self {
            op,
            start: Instant::now(),
            items: 0,
            depth,
        }
    }

    /// 记录本次操作处理的条目数 (边/场景/行)
    pub fn set_items(&mut self, items: usize) {
        self.items = items;
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        PERF_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));

        if !is_enabled() {
            return;
        }

        let elapsed_ms = self.start.elapsed().as_millis() as u64;
        let threshold = slow_threshold_ms();
        if threshold > 0 && elapsed_ms >= threshold {
            tracing::warn!(
                target: "perf",
                op = self.op,
                elapsed_ms,
                items = self.items,
                depth = self.depth,
                "slow op"
            );
        } else {
            tracing::info!(
                target: "perf",
                op = self.op,
                elapsed_ms,
                items = self.items,
                depth = self.depth,
                "done"
            );
        }
    }
}
