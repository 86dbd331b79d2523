// ==========================================
// S&OP 预测录入系统 - 产品数据仓储
// ==========================================
// 对齐: produto 表
// ==========================================

use crate::domain::product::Produto;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct ProductRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询启用的产品（按编码排序）
    pub fn list_active(&self) -> RepositoryResult<Vec<Produto>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT codigo, descricao, ativo FROM produto WHERE ativo = 1 ORDER BY codigo",
        )?;
        let rows = stmt
            .query_map([], map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn find_by_codigo(&self, codigo: &str) -> RepositoryResult<Option<Produto>> {
        let conn = self.get_conn()?;
        let produto = conn
            .query_row(
                "SELECT codigo, descricao, ativo FROM produto WHERE codigo = ?1",
                params![codigo],
                map_row,
            )
            .optional()?;
        Ok(produto)
    }

    /// 插入或更新产品
    pub fn upsert(&self, produto: &Produto) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO produto (codigo, descricao, ativo) VALUES (?1, ?2, ?3)
            ON CONFLICT(codigo) DO UPDATE SET descricao = ?2, ativo = ?3
            "#,
            params![produto.codigo, produto.descricao, produto.ativo],
        )?;
        Ok(())
    }
}

fn map_row(row: &Row) -> rusqlite::Result<Produto> {
    Ok(Produto {
        codigo: row.get(0)?,
        descricao: row.get(1)?,
        ativo: row.get(2)?,
    })
}
