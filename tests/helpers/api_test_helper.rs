// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 提供API层集成测试的通用辅助函数
// ==========================================

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tempfile::NamedTempFile;

use sop_forecast::api::{AuthApi, ForecastApi};
use sop_forecast::config::ForecastConfigReader;
use sop_forecast::db::open_sqlite_connection;
use sop_forecast::identity::IdentityProvider;
use sop_forecast::repository::{
    ForecastLogRepository, ForecastStore, ProductRepository, SqliteForecastStore, UserRepository,
};

use super::mock_config::MockConfig;
use super::test_helpers;

/// API测试环境
pub struct ApiTestEnv {
    pub db_path: String,
    pub conn: Arc<Mutex<Connection>>,
    pub forecast_api: Arc<ForecastApi>,
    pub auth_api: Arc<AuthApi>,

    // Repository层（用于测试数据准备与校验）
    pub store: Arc<SqliteForecastStore>,

    // 临时文件（确保生命周期）
    _temp_file: NamedTempFile,
}

impl ApiTestEnv {
    /// 默认配置 + 2025 年参考数据
    pub fn new() -> Result<Self, String> {
        Self::with_config(MockConfig::default())
    }

    pub fn with_config(config: MockConfig) -> Result<Self, String> {
        let (temp_file, db_path) =
            test_helpers::create_test_db().map_err(|e| format!("创建测试数据库失败: {}", e))?;

        let conn = open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        test_helpers::seed_reference_2025(&conn).map_err(|e| format!("写入参考数据失败: {}", e))?;

        let store = Arc::new(SqliteForecastStore::from_connection(conn.clone()));
        let config: Arc<dyn ForecastConfigReader> = Arc::new(config);

        let forecast_store: Arc<dyn ForecastStore> = store.clone();
        let forecast_api = Arc::new(ForecastApi::new(
            forecast_store,
            Arc::new(ProductRepository::new(conn.clone())),
            Arc::new(ForecastLogRepository::new(conn.clone())),
            config.clone(),
        ));

        let provider = IdentityProvider::RemoteStore(Arc::new(UserRepository::new(conn.clone())));
        let auth_api = Arc::new(AuthApi::new(Arc::new(provider), config));

        Ok(Self {
            db_path,
            conn,
            forecast_api,
            auth_api,
            store,
            _temp_file: temp_file,
        })
    }
}
