// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use sop_forecast::config::ForecastConfigReader;
use sop_forecast::domain::{IdentityBackend, ZeroWeightPolicy};
use std::error::Error;

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub editable_tipo: String,
    pub zero_weight_policy: ZeroWeightPolicy,
    pub default_actor: String,
    pub pbkdf2_iterations: u32,
    pub identity_backend: IdentityBackend,
}

impl MockConfig {
    /// 创建默认配置（迭代次数调低以加快测试）
    pub fn default() -> Self {
        Self {
            editable_tipo: "REVISÃO".to_string(),
            zero_weight_policy: ZeroWeightPolicy::Even,
            default_actor: "sistema".to_string(),
            pbkdf2_iterations: 1_000,
            identity_backend: IdentityBackend::RemoteStore,
        }
    }

    /// 零权重时拒绝重分配
    pub fn rejecting_zero_weight() -> Self {
        let mut config = Self::default();
        config.zero_weight_policy = ZeroWeightPolicy::Reject;
        config
    }
}

#[async_trait]
impl ForecastConfigReader for MockConfig {
    async fn get_editable_tipo(&self) -> Result<String, Box<dyn Error + Send + Sync>> {
        Ok(self.editable_tipo.clone())
    }

    async fn get_zero_weight_policy(&self) -> Result<ZeroWeightPolicy, Box<dyn Error + Send + Sync>> {
        Ok(self.zero_weight_policy)
    }

    async fn get_default_actor(&self) -> Result<String, Box<dyn Error + Send + Sync>> {
        Ok(self.default_actor.clone())
    }

    async fn get_pbkdf2_iterations(&self) -> Result<u32, Box<dyn Error + Send + Sync>> {
        Ok(self.pbkdf2_iterations)
    }

    async fn get_identity_backend(&self) -> Result<IdentityBackend, Box<dyn Error + Send + Sync>> {
        Ok(self.identity_backend)
    }
}
