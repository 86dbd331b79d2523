// ==========================================
// S&OP 预测录入系统 - 认证 API
// ==========================================
// 职责: 登录、注册、修改密码
// 后端: 由 IdentityProvider 决定（LocalList / RemoteStore）
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::config::ForecastConfigReader;
use crate::domain::types::IdentityBackend;
use crate::domain::user::AuthenticatedUser;
use crate::identity::IdentityProvider;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub nome: String,
    pub password: String,
}

pub struct AuthApi {
    provider: Arc<IdentityProvider>,
    config: Arc<dyn ForecastConfigReader>,
}

impl AuthApi {
    pub fn new(provider: Arc<IdentityProvider>, config: Arc<dyn ForecastConfigReader>) -> Self {
        Self { provider, config }
    }

    pub fn backend(&self) -> IdentityBackend {
        self.provider.backend()
    }

    /// 登录
    ///
    /// # 返回
    /// - Err(InvalidCredentials): 用户不存在/已停用/密码错误（不区分）
    pub fn login(&self, req: &LoginRequest) -> ApiResult<AuthenticatedUser> {
        if req.username.trim().is_empty() {
            return Err(ApiError::InvalidCredentials);
        }
        Ok(self.provider.authenticate(&req.username, &req.password)?)
    }

    /// 注册新用户（密码加盐散列后保存）
    pub async fn register_user(&self, req: &RegisterRequest) -> ApiResult<AuthenticatedUser> {
        if req.username.trim().is_empty() {
            return Err(ApiError::InvalidInput("用户名不能为空".to_string()));
        }
        if req.password.is_empty() {
            return Err(ApiError::InvalidInput("密码不能为空".to_string()));
        }
        let iterations = self.iterations().await?;
        let user = self
            .provider
            .register(&req.username, &req.nome, &req.password, iterations)?;
        tracing::info!(username = %user.username, "用户已注册");
        Ok(user)
    }

    pub async fn change_password(
        &self,
        username: &str,
        current: &str,
        next: &str,
    ) -> ApiResult<()> {
        if next.is_empty() {
            return Err(ApiError::InvalidInput("新密码不能为空".to_string()));
        }
        let iterations = self.iterations().await?;
        self.provider
            .change_password(username, current, next, iterations)?;
        tracing::info!(username = username.trim(), "密码已修改");
        Ok(())
    }

    async fn iterations(&self) -> ApiResult<u32> {
        self.config
            .get_pbkdf2_iterations()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))
    }
}
