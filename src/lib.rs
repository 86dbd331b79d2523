// ==========================================
// S&OP 预测录入系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 按产品/分组/月份录入预测值，修改全部留痕
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "pt-BR");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 编辑与重分配规则
pub mod engine;

// 身份层 - 密码散列与认证
pub mod identity;

// 导入层 - 参考数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/建表）
pub mod db;

// SQL 追踪与操作耗时
pub mod perf;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{IdentityBackend, LogOrigin, Mes, ZeroWeightPolicy};

// 领域实体
pub use domain::{
    ForecastKey, ForecastLogEntry, Group, MonthConfiguration, Produto, UserRecord, YearConfig,
};

// 引擎
pub use engine::{CellEditor, ForecastReader, RedistributionOutcome, TotalRedistributor};

// API
pub use api::{ApiError, ApiResult, AuthApi, ForecastApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "S&OP 预测录入";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
