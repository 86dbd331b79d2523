// ==========================================
// S&OP 预测录入系统 - 用户数据仓储
// ==========================================
// 对齐: usuario 表
// 红线: 只存散列 + 盐
// ==========================================

use crate::domain::user::{PasswordHash, UserRecord};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct UserRepository {
    conn: Arc<Mutex<Connection>>,
}

impl UserRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 按用户名查找（ASCII 大小写不敏感，与 LocalList 一致）
    pub fn find_by_username(&self, username: &str) -> RepositoryResult<Option<UserRecord>> {
        let conn = self.get_conn()?;
        let user = conn
            .query_row(
                r#"
                SELECT username, nome, password_hash, salt, iterations, ativo
                FROM usuario WHERE username = ?1 COLLATE NOCASE
                "#,
                params![username],
                map_row,
            )
            .optional()?;
        Ok(user)
    }

    /// 新增用户；用户名已存在时返回 UniqueConstraintViolation
    pub fn insert(&self, user: &UserRecord) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO usuario (username, nome, password_hash, salt, iterations, ativo)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                user.username,
                user.nome,
                user.password.hash,
                user.password.salt,
                user.password.iterations,
                user.ativo,
            ],
        )?;
        Ok(())
    }

    /// 替换密码散列（重新加盐）
    pub fn update_password(&self, username: &str, password: &PasswordHash) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "UPDATE usuario SET password_hash = ?2, salt = ?3, iterations = ?4 \
             WHERE username = ?1 COLLATE NOCASE",
            params![username, password.hash, password.salt, password.iterations],
        )?;
        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "usuario".to_string(),
                id: username.to_string(),
            });
        }
        Ok(())
    }
}

fn map_row(row: &Row) -> rusqlite::Result<UserRecord> {
    Ok(UserRecord {
        username: row.get(0)?,
        nome: row.get(1)?,
        password: PasswordHash {
            hash: row.get(2)?,
            salt: row.get(3)?,
            iterations: row.get(4)?,
        },
        ativo: row.get(5)?,
    })
}
