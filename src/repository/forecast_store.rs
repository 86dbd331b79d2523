// ==========================================
// S&OP 预测录入系统 - 预测持久化协作者
// ==========================================
// 职责: 编辑器/重分配器所需的最小数据访问接口
// 实现者: SqliteForecastStore（聚合各 rusqlite 仓储）
// 红线: 不含业务规则，只做数据读写
// ==========================================

use std::sync::Arc;

use crate::domain::forecast::{ForecastKey, Group, MonthConfigMap, ProductValueMap};
use crate::domain::forecast_log::ForecastLogEntry;
use crate::repository::error::RepositoryResult;
use crate::repository::{
    ForecastLogRepository, ForecastValueRepository, GroupRepository, MonthConfigRepository,
};

// ==========================================
// ForecastStore Trait
// ==========================================
pub trait ForecastStore: Send + Sync {
    /// 某产品的全部预测值
    fn read_forecast_values(&self, produto: &str) -> RepositoryResult<ProductValueMap>;

    /// 单个存储值（从未设置返回 None）
    fn read_forecast_value(&self, key: &ForecastKey) -> RepositoryResult<Option<f64>>;

    /// 全部分组（ano, id_tipo 升序）
    fn read_groups(&self) -> RepositoryResult<Vec<Group>>;

    /// 全部月份配置
    fn read_month_configurations(&self) -> RepositoryResult<MonthConfigMap>;

    /// 写入预测值（后写覆盖）
    fn upsert_forecast_value(&self, key: &ForecastKey, valor: f64) -> RepositoryResult<()>;

    /// 追加日志
    fn append_log_entry(&self, entry: &ForecastLogEntry) -> RepositoryResult<()>;
}

// ==========================================
// SqliteForecastStore
// ==========================================
#[derive(Clone)]
pub struct SqliteForecastStore {
    pub group_repo: Arc<GroupRepository>,
    pub month_config_repo: Arc<MonthConfigRepository>,
    pub value_repo: Arc<ForecastValueRepository>,
    pub log_repo: Arc<ForecastLogRepository>,
}

impl SqliteForecastStore {
    pub fn new(
        group_repo: Arc<GroupRepository>,
        month_config_repo: Arc<MonthConfigRepository>,
        value_repo: Arc<ForecastValueRepository>,
        log_repo: Arc<ForecastLogRepository>,
    ) -> Self {
        Self {
            group_repo,
            month_config_repo,
            value_repo,
            log_repo,
        }
    }

    /// 所有仓储共享同一连接
    pub fn from_connection(conn: Arc<std::sync::Mutex<rusqlite::Connection>>) -> Self {
        Self::new(
            Arc::new(GroupRepository::new(conn.clone())),
            Arc::new(MonthConfigRepository::new(conn.clone())),
            Arc::new(ForecastValueRepository::new(conn.clone())),
            Arc::new(ForecastLogRepository::new(conn)),
        )
    }
}

impl ForecastStore for SqliteForecastStore {
    fn read_forecast_values(&self, produto: &str) -> RepositoryResult<ProductValueMap> {
        self.value_repo.find_by_product(produto)
    }

    fn read_forecast_value(&self, key: &ForecastKey) -> RepositoryResult<Option<f64>> {
        self.value_repo.find_one(key)
    }

    fn read_groups(&self) -> RepositoryResult<Vec<Group>> {
        self.group_repo.list_ordered()
    }

    fn read_month_configurations(&self) -> RepositoryResult<MonthConfigMap> {
        self.month_config_repo.list_all()
    }

    fn upsert_forecast_value(&self, key: &ForecastKey, valor: f64) -> RepositoryResult<()> {
        self.value_repo.upsert(key, valor)
    }

    fn append_log_entry(&self, entry: &ForecastLogEntry) -> RepositoryResult<()> {
        self.log_repo.append(entry).map(|_| ())
    }
}
