// ==========================================
// S&OP 预测录入系统 - 用户
// ==========================================
// 红线: 只保存加盐散列，不保存明文密码
// ==========================================

use serde::{Deserialize, Serialize};

/// 密码散列记录（PBKDF2-HMAC-SHA256，base64 编码）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordHash {
    pub salt: String,
    pub hash: String,
    pub iterations: u32,
}

/// 用户记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub nome: String,
    pub password: PasswordHash,
    pub ativo: bool,
}

/// 认证通过的用户（不含散列）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub username: String,
    pub nome: String,
}

impl From<&UserRecord> for AuthenticatedUser {
    fn from(record: &UserRecord) -> Self {
        Self {
            username: record.username.clone(),
            nome: record.nome.clone(),
        }
    }
}
