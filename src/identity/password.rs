// ==========================================
// S&OP 预测录入系统 - 密码散列
// ==========================================
// 算法: PBKDF2-HMAC-SHA256，16 字节随机盐，32 字节派生密钥
// 编码: base64 (标准字母表)
// 红线: 不存在明文比较路径
// ==========================================

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;

use crate::domain::user::PasswordHash;

const SALT_LEN: usize = 16;
const KEY_LEN: usize = 32;

fn derive_key(password: &str, salt: &[u8], iterations: u32) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations.max(1), &mut key);
    key
}

/// 生成新的加盐散列
pub fn hash_password(password: &str, iterations: u32) -> PasswordHash {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    let iterations = iterations.max(1);
    let key = derive_key(password, &salt, iterations);
    PasswordHash {
        salt: B64.encode(salt),
        hash: B64.encode(key),
        iterations,
    }
}

/// 校验密码；记录损坏（盐/散列无法解码）视为不匹配
pub fn verify_password(password: &str, record: &PasswordHash) -> bool {
    if password.is_empty() || record.salt.is_empty() || record.hash.is_empty() {
        return false;
    }
    let salt = match B64.decode(record.salt.as_bytes()) {
        Ok(salt) => salt,
        Err(_) => return false,
    };
    let expected = match B64.decode(record.hash.as_bytes()) {
        Ok(hash) => hash,
        Err(_) => return false,
    };
    let key = derive_key(password, &salt, record.iterations);
    constant_time_eq(&key, &expected)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
