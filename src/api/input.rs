// ==========================================
// S&OP 预测录入系统 - 输入解析（展示边界）
// ==========================================
// 规则: 非数字输入一律按 0 处理，从不拒绝
// 支持: 首尾空白、逗号小数点、巴西千分位 (1.234,5)
// 点号:
// - 含逗号时点号一律为千分位: "1.234,5" = 1234.5
// - 不含逗号且只有一个点号时为小数点: "1.234" = 1.234
// - 不含逗号且按三位分组出现多个点号时为千分位: "1.234.567" = 1234567
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::types::Mes;

/// 原始字符串 → 数值；无法解析或非有限值时返回 0
pub fn parse_numeric_input(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let normalized = if trimmed.contains(',') {
        trimmed.replace('.', "").replace(',', ".")
    } else if is_dot_grouped(trimmed) {
        trimmed.replace('.', "")
    } else {
        trimmed.to_string()
    };

    match normalized.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => {
            tracing::debug!(raw, "非数字输入按 0 处理");
            0.0
        }
    }
}

/// 形如 1.234.567：至少两个点号，首段 1-3 位数字，其余每段恰好 3 位
fn is_dot_grouped(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let mut parts = digits.split('.');
    let head_ok = parts
        .next()
        .is_some_and(|h| (1..=3).contains(&h.len()) && h.bytes().all(|b| b.is_ascii_digit()));
    let groups: Vec<&str> = parts.collect();
    head_ok
        && groups.len() >= 2
        && groups
            .iter()
            .all(|g| g.len() == 3 && g.bytes().all(|b| b.is_ascii_digit()))
}

/// 月份编码解析（JAN..DEZ，忽略大小写）
pub fn parse_mes(raw: &str) -> ApiResult<Mes> {
    Mes::parse(raw).ok_or_else(|| ApiError::InvalidInput(format!("月份编码无效: {}", raw)))
}
