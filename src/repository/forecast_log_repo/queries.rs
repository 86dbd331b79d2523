use super::core::ForecastLogRepository;
use crate::domain::forecast::ForecastKey;
use crate::domain::forecast_log::ForecastLogEntry;
use crate::domain::types::LogOrigin;
use crate::repository::error::{parse_mes_column, RepositoryResult};
use crate::repository::TS_FORMAT;
use chrono::NaiveDateTime;
use rusqlite::{params, Result as SqliteResult, Row};

const SELECT_COLUMNS: &str = r#"
    SELECT log_id, produto, ano, id_tipo, mes,
           valor_anterior, valor_novo, actor, log_ts, origem
    FROM forecast_log
"#;

impl ForecastLogRepository {
    // ==========================================
    // 查询操作（均按时间倒序）
    // ==========================================

    /// 查询某产品最近的日志
    pub fn find_by_product(&self, produto: &str, limit: usize) -> RepositoryResult<Vec<ForecastLogEntry>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} WHERE produto = ?1 ORDER BY log_ts DESC, rowid DESC LIMIT ?2",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let logs = stmt
            .query_map(params![produto, limit as i64], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(logs)
    }

    /// 查询某个单元格的全部日志
    pub fn find_by_cell(&self, key: &ForecastKey) -> RepositoryResult<Vec<ForecastLogEntry>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} WHERE produto = ?1 AND ano = ?2 AND id_tipo = ?3 AND mes = ?4 \
             ORDER BY log_ts DESC, rowid DESC",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let logs = stmt
            .query_map(
                params![key.produto, key.ano, key.id_tipo, key.mes.as_str()],
                map_row,
            )?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(logs)
    }

    /// 查询最近的日志（全部产品）
    pub fn find_recent(&self, limit: usize) -> RepositoryResult<Vec<ForecastLogEntry>> {
        let conn = self.get_conn()?;
        let sql = format!("{} ORDER BY log_ts DESC, rowid DESC LIMIT ?1", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let logs = stmt
            .query_map(params![limit as i64], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(logs)
    }

    /// 日志总数
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM forecast_log", [], |row| row.get(0))?;
        Ok(n)
    }
}

fn map_row(row: &Row) -> SqliteResult<ForecastLogEntry> {
    let mes = parse_mes_column(4, row.get(4)?)?;

    let log_ts_str: String = row.get(8)?;
    let log_ts = NaiveDateTime::parse_from_str(&log_ts_str, TS_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e)))?;

    // 未知来源按单元格编辑处理（历史数据）
    let origem_str: String = row.get(9)?;
    let origem = LogOrigin::parse(&origem_str).unwrap_or(LogOrigin::CellEdit);

    Ok(ForecastLogEntry {
        log_id: row.get(0)?,
        key: ForecastKey {
            produto: row.get(1)?,
            ano: row.get(2)?,
            id_tipo: row.get(3)?,
            mes,
        },
        valor_anterior: row.get(5)?,
        valor_novo: row.get(6)?,
        actor: row.get(7)?,
        log_ts,
        origem,
    })
}
