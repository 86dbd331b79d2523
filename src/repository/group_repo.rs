// ==========================================
// S&OP 预测录入系统 - 分组数据仓储
// ==========================================
// 对齐: grupo 表
// 只读参考数据（upsert 仅供导入工具使用）
// ==========================================

use crate::domain::forecast::Group;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct GroupRepository {
    conn: Arc<Mutex<Connection>>,
}

impl GroupRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 全部分组，按 ano, id_tipo 升序
    pub fn list_ordered(&self) -> RepositoryResult<Vec<Group>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT ano, id_tipo, tipo FROM grupo ORDER BY ano ASC, id_tipo ASC")?;
        let groups = stmt
            .query_map([], map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(groups)
    }

    pub fn find(&self, ano: i32, id_tipo: i32) -> RepositoryResult<Option<Group>> {
        let conn = self.get_conn()?;
        let group = conn
            .query_row(
                "SELECT ano, id_tipo, tipo FROM grupo WHERE ano = ?1 AND id_tipo = ?2",
                params![ano, id_tipo],
                map_row,
            )
            .optional()?;
        Ok(group)
    }

    pub fn upsert(&self, group: &Group) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO grupo (ano, id_tipo, tipo) VALUES (?1, ?2, ?3)
            ON CONFLICT(ano, id_tipo) DO UPDATE SET tipo = ?3
            "#,
            params![group.ano, group.id_tipo, group.tipo],
        )?;
        Ok(())
    }
}

fn map_row(row: &Row) -> rusqlite::Result<Group> {
    Ok(Group {
        ano: row.get(0)?,
        id_tipo: row.get(1)?,
        tipo: row.get(2)?,
    })
}
