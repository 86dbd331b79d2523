// ==========================================
// S&OP 预测录入系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::forecast_config_trait::ForecastConfigReader;
use crate::db::open_sqlite_connection;
use crate::domain::types::{IdentityBackend, ZeroWeightPolicy};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

type ConfigResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    pub const EDITABLE_TIPO: &str = "forecast.editable_tipo";
    pub const ZERO_WEIGHT_POLICY: &str = "forecast.zero_weight_policy";
    pub const DEFAULT_ACTOR: &str = "forecast.default_actor";
    pub const PBKDF2_ITERATIONS: &str = "auth.pbkdf2_iterations";
    pub const IDENTITY_BACKEND: &str = "auth.identity_backend";
}

// ==========================================
// 默认值
// ==========================================
pub mod defaults {
    pub const EDITABLE_TIPO: &str = "REVISÃO";
    pub const DEFAULT_ACTOR: &str = "sistema";
    pub const PBKDF2_ITERATIONS: u32 = 100_000;
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 打开独立连接
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 复用已有连接
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 读取 global scope 的配置值
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')
            "#,
            params![key, value],
        )?;
        tracing::info!(key, value, "配置已更新");
        Ok(())
    }

    /// 全部 global 配置快照
    pub fn get_config_snapshot(&self) -> ConfigResult<BTreeMap<String, String>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows.into_iter().collect())
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> ConfigResult<String> {
        Ok(self
            .get_global_config_value(key)?
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default.to_string()))
    }
}

#[async_trait]
impl ForecastConfigReader for ConfigManager {
    async fn get_editable_tipo(&self) -> ConfigResult<String> {
        self.get_config_or_default(config_keys::EDITABLE_TIPO, defaults::EDITABLE_TIPO)
    }

    async fn get_zero_weight_policy(&self) -> ConfigResult<ZeroWeightPolicy> {
        let raw = self.get_config_or_default(
            config_keys::ZERO_WEIGHT_POLICY,
            ZeroWeightPolicy::default().as_str(),
        )?;
        // 无法识别的值回退默认策略
        Ok(ZeroWeightPolicy::parse(&raw).unwrap_or_else(|| {
            tracing::warn!(value = %raw, "无法识别的零权重策略，使用默认值");
            ZeroWeightPolicy::default()
        }))
    }

    async fn get_default_actor(&self) -> ConfigResult<String> {
        self.get_config_or_default(config_keys::DEFAULT_ACTOR, defaults::DEFAULT_ACTOR)
    }

    async fn get_pbkdf2_iterations(&self) -> ConfigResult<u32> {
        let raw = self.get_config_or_default(
            config_keys::PBKDF2_ITERATIONS,
            &defaults::PBKDF2_ITERATIONS.to_string(),
        )?;
        Ok(raw
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .unwrap_or(defaults::PBKDF2_ITERATIONS))
    }

    async fn get_identity_backend(&self) -> ConfigResult<IdentityBackend> {
        let raw = self.get_config_or_default(
            config_keys::IDENTITY_BACKEND,
            IdentityBackend::RemoteStore.as_str(),
        )?;
        IdentityBackend::parse(&raw)
            .ok_or_else(|| format!("无效的身份后端配置: {}", raw).into())
    }
}
