// ==========================================
// S&OP 预测录入系统 - 预测值数据仓储
// ==========================================
// 对齐: forecast_valor 表，主键 (produto, ano, id_tipo, mes)
// 写入策略: UPSERT，后写覆盖
// ==========================================

use crate::domain::forecast::{ForecastKey, ProductValueMap};
use crate::repository::error::{parse_mes_column, RepositoryError, RepositoryResult};
use crate::repository::TS_FORMAT;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct ForecastValueRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ForecastValueRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询某产品的全部预测值
    pub fn find_by_product(&self, produto: &str) -> RepositoryResult<ProductValueMap> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT ano, id_tipo, mes, valor FROM forecast_valor WHERE produto = ?1",
        )?;
        let rows = stmt
            .query_map(params![produto], |row| {
                let ano: i32 = row.get(0)?;
                let id_tipo: i32 = row.get(1)?;
                let mes = parse_mes_column(2, row.get(2)?)?;
                let valor: f64 = row.get(3)?;
                Ok(((ano, id_tipo, mes), valor))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows.into_iter().collect())
    }

    /// 查询单个存储值（从未设置返回 None）
    pub fn find_one(&self, key: &ForecastKey) -> RepositoryResult<Option<f64>> {
        let conn = self.get_conn()?;
        let valor = conn
            .query_row(
                r#"
                SELECT valor FROM forecast_valor
                WHERE produto = ?1 AND ano = ?2 AND id_tipo = ?3 AND mes = ?4
                "#,
                params![key.produto, key.ano, key.id_tipo, key.mes.as_str()],
                |row| row.get::<_, f64>(0),
            )
            .optional()?;
        Ok(valor)
    }

    /// 写入预测值（UPSERT）
    pub fn upsert(&self, key: &ForecastKey, valor: f64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let now = chrono::Utc::now().naive_utc().format(TS_FORMAT).to_string();
        conn.execute(
            r#"
            INSERT INTO forecast_valor (produto, ano, id_tipo, mes, valor, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(produto, ano, id_tipo, mes) DO UPDATE SET valor = ?5, updated_at = ?6
            "#,
            params![key.produto, key.ano, key.id_tipo, key.mes.as_str(), valor, now],
        )?;
        Ok(())
    }
}
