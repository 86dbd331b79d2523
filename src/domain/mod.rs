// ==========================================
// S&OP 预测录入系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod forecast;
pub mod forecast_log;
pub mod product;
pub mod types;
pub mod user;

// 重导出核心类型
pub use forecast::{
    row_values, value_or_zero, ForecastKey, ForecastValue, Group, MonthConfigMap,
    MonthConfiguration, ProductValueMap, YearConfig,
};
pub use forecast_log::ForecastLogEntry;
pub use product::Produto;
pub use types::{IdentityBackend, LogOrigin, Mes, ZeroWeightPolicy};
pub use user::{AuthenticatedUser, PasswordHash, UserRecord};
