// ==========================================
// S&OP 预测录入系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod forecast_log_repo;
pub mod forecast_store;
pub mod forecast_value_repo;
pub mod group_repo;
pub mod month_config_repo;
pub mod product_repo;
pub mod user_repo;

/// 时间戳存储格式（毫秒精度，UTC）
pub(crate) const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use forecast_log_repo::ForecastLogRepository;
pub use forecast_store::{ForecastStore, SqliteForecastStore};
pub use forecast_value_repo::ForecastValueRepository;
pub use group_repo::GroupRepository;
pub use month_config_repo::MonthConfigRepository;
pub use product_repo::ProductRepository;
pub use user_repo::UserRepository;
