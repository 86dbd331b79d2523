use crate::domain::forecast_log::ForecastLogEntry;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::TS_FORMAT;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// ForecastLogRepository - 预测变更日志仓储
// ==========================================
// 红线: Repository 不做业务逻辑,只做数据映射
pub struct ForecastLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ForecastLogRepository {
    /// 创建新的日志仓储
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    pub(super) fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 追加一条日志
    ///
    /// # 返回
    /// - `Ok(log_id)`: 成功插入
    /// - `Err(...)`: 数据库错误
    pub fn append(&self, entry: &ForecastLogEntry) -> RepositoryResult<String> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO forecast_log (
                log_id, produto, ano, id_tipo, mes,
                valor_anterior, valor_novo, actor, log_ts, origem
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                entry.log_id,
                entry.key.produto,
                entry.key.ano,
                entry.key.id_tipo,
                entry.key.mes.as_str(),
                entry.valor_anterior,
                entry.valor_novo,
                entry.actor,
                entry.log_ts.format(TS_FORMAT).to_string(),
                entry.origem.as_str(),
            ],
        )?;

        Ok(entry.log_id.clone())
    }
}
