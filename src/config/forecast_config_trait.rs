// ==========================================
// S&OP 预测录入系统 - 预测配置读取 Trait
// ==========================================
// 职责: 定义编辑/重分配/认证所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::domain::types::{IdentityBackend, ZeroWeightPolicy};
use async_trait::async_trait;
use std::error::Error;

// ==========================================
// ForecastConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ForecastConfigReader: Send + Sync {
    /// 可编辑行的类型标签
    ///
    /// # 默认值
    /// - REVISÃO
    async fn get_editable_tipo(&self) -> Result<String, Box<dyn Error + Send + Sync>>;

    /// 开放月份权重和为 0 时的策略
    ///
    /// # 默认值
    /// - EVEN
    async fn get_zero_weight_policy(&self) -> Result<ZeroWeightPolicy, Box<dyn Error + Send + Sync>>;

    /// 未指定操作人时写入日志的 actor
    ///
    /// # 默认值
    /// - sistema
    async fn get_default_actor(&self) -> Result<String, Box<dyn Error + Send + Sync>>;

    /// 新密码散列的 PBKDF2 迭代次数
    ///
    /// # 默认值
    /// - 100000
    async fn get_pbkdf2_iterations(&self) -> Result<u32, Box<dyn Error + Send + Sync>>;

    /// 身份后端
    ///
    /// # 默认值
    /// - REMOTE_STORE
    async fn get_identity_backend(&self) -> Result<IdentityBackend, Box<dyn Error + Send + Sync>>;
}
