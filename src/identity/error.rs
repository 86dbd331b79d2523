// ==========================================
// S&OP 预测录入系统 - 身份层错误类型
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdentityError {
    /// 用户不存在/已停用/密码错误统一为同一错误
    #[error("用户名或密码错误")]
    InvalidCredentials,

    #[error("用户已存在: {0}")]
    UserAlreadyExists(String),

    #[error("当前身份后端不支持该操作: {0}")]
    UnsupportedOperation(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type IdentityResult<T> = Result<T, IdentityError>;
