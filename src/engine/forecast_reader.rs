// ==========================================
// S&OP 预测录入系统 - 预测读取（Forecast Store 读路径）
// ==========================================
// 纯读取，无副作用
// 显示口径: 缺失值按 0；审计口径: 缺失值为 None（由 CellEditor 读取）
// ==========================================

use std::sync::Arc;

use crate::domain::forecast::{Group, MonthConfigMap, ProductValueMap, YearConfig};
use crate::engine::error::EngineResult;
use crate::repository::ForecastStore;

pub struct ForecastReader {
    store: Arc<dyn ForecastStore>,
}

impl ForecastReader {
    pub fn new(store: Arc<dyn ForecastStore>) -> Self {
        Self { store }
    }

    /// (ano, id_tipo, mes) → 数值
    pub fn get_values(&self, produto: &str) -> EngineResult<ProductValueMap> {
        Ok(self.store.read_forecast_values(produto)?)
    }

    /// 分组列表（ano, id_tipo 升序）
    pub fn get_groups(&self) -> EngineResult<Vec<Group>> {
        Ok(self.store.read_groups()?)
    }

    /// (ano, mes) → MonthConfiguration
    pub fn get_month_configurations(&self) -> EngineResult<MonthConfigMap> {
        Ok(self.store.read_month_configurations()?)
    }

    /// 某一年的配置视图；该年未配置时返回 None
    pub fn get_year_config(&self, ano: i32) -> EngineResult<Option<YearConfig>> {
        let configs = self.get_month_configurations()?;
        Ok(YearConfig::from_map(&configs, ano))
    }
}
