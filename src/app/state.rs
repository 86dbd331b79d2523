// ==========================================
// S&OP 预测录入系统 - 应用状态
// ==========================================
// 职责: 打开数据库、装配仓储/引擎/API 实例
// 所有仓储共享同一连接（Arc<Mutex<Connection>>）
// ==========================================

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::api::{AuthApi, ForecastApi};
use crate::config::{ConfigManager, ForecastConfigReader};
use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::types::IdentityBackend;
use crate::domain::user::UserRecord;
use crate::identity::IdentityProvider;
use crate::perf::install_sqlite_tracing;
use crate::repository::{
    ForecastLogRepository, ForecastStore, ForecastValueRepository, GroupRepository,
    MonthConfigRepository, ProductRepository, SqliteForecastStore, UserRepository,
};

/// LocalList 后端的用户文件（JSON 数组，元素为 UserRecord）
pub const LOCAL_USERS_ENV: &str = "SOP_FORECAST_LOCAL_USERS";

/// 应用状态
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 共享连接
    pub conn: Arc<Mutex<Connection>>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 预测录入API
    pub forecast_api: Arc<ForecastApi>,

    /// 认证API
    pub auth_api: Arc<AuthApi>,

    /// 产品仓储（参考数据导入用）
    pub product_repo: Arc<ProductRepository>,

    /// 数据存取（分组/月份配置/数值/日志）
    pub store: Arc<SqliteForecastStore>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 1. 打开连接并建表（幂等）
    /// 2. 初始化所有Repository
    /// 3. 按配置选定身份后端
    /// 4. 创建API实例
    pub async fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let mut conn =
            open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("建表失败: {}", e))?;
        install_sqlite_tracing(&mut conn);

        Self::from_connection(db_path, Arc::new(Mutex::new(conn))).await
    }

    /// 复用已建表的连接装配状态
    pub async fn from_connection(
        db_path: String,
        conn: Arc<Mutex<Connection>>,
    ) -> Result<Self, String> {
        // ==========================================
        // 初始化Repository层
        // ==========================================
        let product_repo = Arc::new(ProductRepository::new(conn.clone()));
        let log_repo = Arc::new(ForecastLogRepository::new(conn.clone()));
        let store = Arc::new(SqliteForecastStore::new(
            Arc::new(GroupRepository::new(conn.clone())),
            Arc::new(MonthConfigRepository::new(conn.clone())),
            Arc::new(ForecastValueRepository::new(conn.clone())),
            log_repo.clone(),
        ));

        let config_manager = Arc::new(ConfigManager::from_connection(conn.clone()));
        let config: Arc<dyn ForecastConfigReader> = config_manager.clone();

        // ==========================================
        // 身份后端
        // ==========================================
        let backend = config
            .get_identity_backend()
            .await
            .map_err(|e| format!("身份后端配置无效: {}", e))?;
        let provider = match backend {
            IdentityBackend::RemoteStore => {
                IdentityProvider::RemoteStore(Arc::new(UserRepository::new(conn.clone())))
            }
            IdentityBackend::LocalList => IdentityProvider::LocalList(load_local_users()?),
        };
        tracing::info!(backend = %backend, "身份后端已选定");

        // ==========================================
        // 创建API实例
        // ==========================================
        let forecast_store: Arc<dyn ForecastStore> = store.clone();
        let forecast_api = Arc::new(ForecastApi::new(
            forecast_store,
            product_repo.clone(),
            log_repo,
            config.clone(),
        ));
        let auth_api = Arc::new(AuthApi::new(Arc::new(provider), config));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            conn,
            config_manager,
            forecast_api,
            auth_api,
            product_repo,
            store,
        })
    }
}

/// 读取 LocalList 用户；未设置环境变量时为空列表
fn load_local_users() -> Result<Vec<UserRecord>, String> {
    match std::env::var(LOCAL_USERS_ENV) {
        Ok(path) if !path.trim().is_empty() => read_users_file(Path::new(path.trim())),
        _ => {
            tracing::warn!("{} 未设置，本地用户列表为空", LOCAL_USERS_ENV);
            Ok(Vec::new())
        }
    }
}

/// 从 JSON 文件读取用户列表
pub fn read_users_file(path: &Path) -> Result<Vec<UserRecord>, String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("无法读取用户文件 {}: {}", path.display(), e))?;
    let users: Vec<UserRecord> =
        serde_json::from_str(&raw).map_err(|e| format!("用户文件格式错误: {}", e))?;
    tracing::info!(count = users.len(), "已加载本地用户");
    Ok(users)
}

/// 获取默认数据库路径
///
/// # 优先级
/// 1. 环境变量 SOP_FORECAST_DB_PATH
/// 2. 用户数据目录下 sop-forecast/sop_forecast.db
/// 3. 当前目录 ./sop_forecast.db
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var("SOP_FORECAST_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./sop_forecast.db");

    if let Some(data_dir) = dirs::data_dir() {
        #[cfg(debug_assertions)]
        let dir = data_dir.join("sop-forecast-dev");
        #[cfg(not(debug_assertions))]
        let dir = data_dir.join("sop-forecast");

        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("sop_forecast.db");
        }
    }

    path.to_string_lossy().to_string()
}
