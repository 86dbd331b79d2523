// ==========================================
// S&OP 预测录入系统 - 月份配置数据仓储
// ==========================================
// 对齐: mes_config 表
// ==========================================

use crate::domain::forecast::{MonthConfigMap, MonthConfiguration};
use crate::domain::types::Mes;
use crate::repository::error::{parse_mes_column, RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct MonthConfigRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MonthConfigRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 全量配置 (ano, mes) → MonthConfiguration
    pub fn list_all(&self) -> RepositoryResult<MonthConfigMap> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT ano, mes, pct_atual, realizado FROM mes_config")?;
        let rows = stmt
            .query_map([], map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows.into_iter().collect())
    }

    pub fn upsert(&self, ano: i32, mes: Mes, config: &MonthConfiguration) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO mes_config (ano, mes, pct_atual, realizado) VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(ano, mes) DO UPDATE SET pct_atual = ?3, realizado = ?4
            "#,
            params![ano, mes.as_str(), config.pct_atual, config.realizado],
        )?;
        Ok(())
    }
}

fn map_row(row: &Row) -> rusqlite::Result<((i32, Mes), MonthConfiguration)> {
    let ano: i32 = row.get(0)?;
    let mes = parse_mes_column(1, row.get(1)?)?;
    Ok((
        (ano, mes),
        MonthConfiguration {
            pct_atual: row.get(2)?,
            realizado: row.get(3)?,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory_with_schema;

    #[test]
    fn test_upsert_and_list_all() {
        let conn = Arc::new(Mutex::new(open_in_memory_with_schema().unwrap()));
        let repo = MonthConfigRepository::new(conn);

        repo.upsert(2025, Mes::Jan, &MonthConfiguration::realized()).unwrap();
        repo.upsert(2025, Mes::Jul, &MonthConfiguration::open(0.2)).unwrap();
        repo.upsert(2025, Mes::Jul, &MonthConfiguration::open(0.25)).unwrap();

        let all = repo.list_all().unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[&(2025, Mes::Jan)].realizado);
        assert_eq!(all[&(2025, Mes::Jul)].pct_atual, 0.25);
    }

    #[test]
    fn test_weight_outside_unit_range_rejected() {
        let conn = Arc::new(Mutex::new(open_in_memory_with_schema().unwrap()));
        let repo = MonthConfigRepository::new(conn);

        assert!(repo.upsert(2025, Mes::Jul, &MonthConfiguration::open(1.5)).is_err());
        assert!(repo.upsert(2025, Mes::Ago, &MonthConfiguration::open(-0.5)).is_err());
        assert!(repo.list_all().unwrap().is_empty());
    }
}
