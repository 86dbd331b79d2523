// ==========================================
// S&OP 预测录入系统 - 预测变更日志数据仓储
// ==========================================
// 对齐: forecast_log 表
// 红线: 只追加，不修改、不删除
// ==========================================

mod core;
mod queries;

#[cfg(test)]
mod tests;

pub use self::core::ForecastLogRepository;
