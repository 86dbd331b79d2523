// ==========================================
// S&OP 预测录入系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 建库脚本集中在此（CREATE TABLE IF NOT EXISTS，幂等）
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 打开内存库并建表（测试/演示用）
pub fn open_in_memory_with_schema() -> rusqlite::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure_sqlite_connection(&conn)?;
    init_schema(&conn)?;
    Ok(conn)
}

/// 建表（幂等）并写入 schema_version
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL DEFAULT 'global',
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS produto (
            codigo TEXT PRIMARY KEY,
            descricao TEXT NOT NULL DEFAULT '',
            ativo INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS grupo (
            ano INTEGER NOT NULL,
            id_tipo INTEGER NOT NULL,
            tipo TEXT NOT NULL,
            PRIMARY KEY (ano, id_tipo)
        );

        CREATE TABLE IF NOT EXISTS mes_config (
            ano INTEGER NOT NULL,
            mes TEXT NOT NULL,
            pct_atual REAL NOT NULL DEFAULT 0 CHECK (pct_atual >= 0 AND pct_atual <= 1),
            realizado INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (ano, mes)
        );

        CREATE TABLE IF NOT EXISTS forecast_valor (
            produto TEXT NOT NULL,
            ano INTEGER NOT NULL,
            id_tipo INTEGER NOT NULL,
            mes TEXT NOT NULL,
            valor REAL NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (produto, ano, id_tipo, mes)
        );

        CREATE TABLE IF NOT EXISTS forecast_log (
            log_id TEXT PRIMARY KEY,
            produto TEXT NOT NULL,
            ano INTEGER NOT NULL,
            id_tipo INTEGER NOT NULL,
            mes TEXT NOT NULL,
            valor_anterior REAL,
            valor_novo REAL NOT NULL,
            actor TEXT NOT NULL,
            log_ts TEXT NOT NULL,
            origem TEXT NOT NULL DEFAULT 'CELL_EDIT'
        );

        CREATE INDEX IF NOT EXISTS idx_forecast_log_produto_ts
            ON forecast_log (produto, log_ts);
        CREATE INDEX IF NOT EXISTS idx_forecast_log_cell
            ON forecast_log (produto, ano, id_tipo, mes);

        CREATE TABLE IF NOT EXISTS usuario (
            username TEXT PRIMARY KEY COLLATE NOCASE,
            nome TEXT NOT NULL DEFAULT '',
            password_hash TEXT NOT NULL,
            salt TEXT NOT NULL,
            iterations INTEGER NOT NULL,
            ativo INTEGER NOT NULL DEFAULT 1
        );
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
