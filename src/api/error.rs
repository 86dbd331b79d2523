// ==========================================
// S&OP 预测录入系统 - API层错误类型
// ==========================================
// 职责: 汇总仓储/引擎/身份层错误，转换为用户可见的通知
// 原则: 所有错误都是单次操作级别，不影响进程
// ==========================================

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::error::EngineError;
use crate::i18n::{t, t_with_args};
use crate::identity::error::IdentityError;
use crate::repository::error::RepositoryError;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("行不可编辑: tipo={tipo}")]
    NotEditable { tipo: String },

    #[error("开放月份权重之和为 0: ano={ano}")]
    ZeroOpenWeight { ano: i32 },

    #[error("重分配部分完成: {committed}/{total} (已写入 {written}): {detail}")]
    PartialRedistribution {
        committed: usize,
        written: usize,
        total: usize,
        detail: String,
    },

    /// 值已写入，日志缺失
    #[error("日志追加失败: {0}")]
    AuditLogFailed(String),

    // ==========================================
    // 身份错误
    // ==========================================
    #[error("用户名或密码错误")]
    InvalidCredentials,

    #[error("用户已存在: {0}")]
    UserAlreadyExists(String),

    #[error("不支持的操作: {0}")]
    UnsupportedOperation(String),

    // ==========================================
    // 数据访问错误（瞬时，不自动重试）
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("配置读取失败: {0}")]
    ConfigError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseTransactionError(msg)
            | RepositoryError::DatabaseQueryError(msg)
            | RepositoryError::UniqueConstraintViolation(msg) => ApiError::DatabaseError(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("字段{}错误: {}", field, message))
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::NotEditable { tipo, .. } => ApiError::NotEditable { tipo },
            EngineError::ZeroOpenWeight { ano } => ApiError::ZeroOpenWeight { ano },
            EngineError::NonFiniteTotal(v) => ApiError::InvalidInput(format!("总量无效: {}", v)),
            EngineError::AuditAppendFailed { key, source } => ApiError::AuditLogFailed(format!(
                "{} {}/{}/{}: {}",
                key.produto, key.ano, key.id_tipo, key.mes, source
            )),
            EngineError::PartialRedistribution {
                committed,
                written,
                total,
                source,
            } => ApiError::PartialRedistribution {
                committed,
                written,
                total,
                detail: source.to_string(),
            },
            EngineError::Repository(e) => e.into(),
        }
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::InvalidCredentials => ApiError::InvalidCredentials,
            IdentityError::UserAlreadyExists(u) => ApiError::UserAlreadyExists(u),
            IdentityError::UnsupportedOperation(op) => ApiError::UnsupportedOperation(op),
            IdentityError::Repository(e) => e.into(),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

// ==========================================
// 用户通知
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// 前端展示的非阻塞通知
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn info(message: String) -> Self {
        Self {
            level: NotificationLevel::Info,
            message,
        }
    }

    pub fn warning(message: String) -> Self {
        Self {
            level: NotificationLevel::Warning,
            message,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            level: NotificationLevel::Error,
            message,
        }
    }
}

impl ApiError {
    /// 转换为当前语言的用户通知
    pub fn notification(&self) -> Notification {
        match self {
            ApiError::NotEditable { tipo } => {
                Notification::warning(t_with_args("notify.not_editable", &[("tipo", tipo.as_str())]))
            }
            ApiError::ZeroOpenWeight { ano } => Notification::warning(t_with_args(
                "notify.zero_weight",
                &[("ano", ano.to_string().as_str())],
            )),
            ApiError::PartialRedistribution {
                committed,
                written,
                total,
                ..
            } => Notification::error(t_with_args(
                "notify.partial",
                &[
                    ("committed", committed.to_string().as_str()),
                    ("written", written.to_string().as_str()),
                    ("total", total.to_string().as_str()),
                ],
            )),
            ApiError::AuditLogFailed(_) => Notification::warning(t("notify.audit_failed")),
            ApiError::InvalidCredentials => Notification::error(t("notify.invalid_credentials")),
            ApiError::UserAlreadyExists(_) => Notification::warning(t("notify.user_exists")),
            ApiError::NotFound(what) => {
                Notification::warning(t_with_args("notify.not_found", &[("what", what.as_str())]))
            }
            ApiError::InvalidInput(what) | ApiError::UnsupportedOperation(what) => {
                Notification::warning(t_with_args("notify.invalid_input", &[("what", what.as_str())]))
            }
            ApiError::DatabaseError(_) | ApiError::DatabaseConnectionError(_) => {
                Notification::error(t("notify.persistence_failure"))
            }
            ApiError::ConfigError(_) | ApiError::InternalError(_) | ApiError::Other(_) => {
                Notification::error(t("notify.internal"))
            }
        }
    }
}
