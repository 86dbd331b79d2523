// ==========================================
// S&OP 预测录入系统 - 身份层
// ==========================================
// 职责: 加盐密码散列 + 单一身份协作者
// ==========================================

pub mod error;
pub mod password;
pub mod provider;

pub use error::{IdentityError, IdentityResult};
pub use password::{hash_password, verify_password};
pub use provider::IdentityProvider;
