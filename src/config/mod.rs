// ==========================================
// S&OP 预测录入系统 - 配置层
// ==========================================
// 职责: 系统配置管理（编辑标签、零权重策略、认证参数）
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod forecast_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, defaults, ConfigManager};
pub use forecast_config_trait::ForecastConfigReader;
