// ==========================================
// S&OP 预测录入系统 - SQL 追踪与操作耗时
// ==========================================
// 开关:
// - SOP_FORECAST_PERF_SQL=1 开启（Debug 默认开启）
// - SOP_FORECAST_SLOW_SQL_MS=50 慢 SQL 阈值（毫秒）
// ==========================================

use rusqlite::Connection;
use std::cell::Cell;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

static SQL_TRACE_ON: AtomicBool = AtomicBool::new(false);
static SLOW_SQL_MS: AtomicU64 = AtomicU64::new(0);

thread_local! {
    static STATEMENTS: Cell<u64> = Cell::new(0);
}

fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name).ok().map(|v| {
        matches!(
            v.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

/// 为连接安装 profile 回调（语句计数 + 慢 SQL 告警）
pub fn install_sqlite_tracing(conn: &mut Connection) {
    let enabled = env_flag("SOP_FORECAST_PERF_SQL").unwrap_or(cfg!(debug_assertions));
    SQL_TRACE_ON.store(enabled, Ordering::Relaxed);

    if !enabled {
        conn.profile(None);
        return;
    }

    let slow_ms = std::env::var("SOP_FORECAST_SLOW_SQL_MS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(100);
    SLOW_SQL_MS.store(slow_ms, Ordering::Relaxed);

    conn.profile(Some(on_statement_profiled));
}

fn on_statement_profiled(sql: &str, duration: Duration) {
    if !SQL_TRACE_ON.load(Ordering::Relaxed) {
        return;
    }
    STATEMENTS.with(|c| c.set(c.get().saturating_add(1)));

    let ms = duration.as_millis() as u64;
    let threshold = SLOW_SQL_MS.load(Ordering::Relaxed);
    if threshold > 0 && ms >= threshold {
        let one_line: String = sql.split_whitespace().collect::<Vec<_>>().join(" ");
        tracing::warn!(target: "slow_sql", duration_ms = ms, sql = %one_line, "slow sql");
    }
}

/// 操作耗时 Guard：drop 时输出 elapsed_ms 与本线程执行的 SQL 语句数
///
/// ```ignore
/// let _perf = sop_forecast::perf::PerfGuard::new("set_total");
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    statements_before: u64,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        Self {
            op,
            start: Instant::now(),
            statements_before: STATEMENTS.with(|c| c.get()),
        }
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let sql_count = STATEMENTS
            .with(|c| c.get())
            .saturating_sub(self.statements_before);
        tracing::debug!(
            target: "perf",
            op = self.op,
            elapsed_ms = self.start.elapsed().as_millis() as u64,
            sql_count,
            "done"
        );
    }
}
