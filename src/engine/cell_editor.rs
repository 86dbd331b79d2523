// ==========================================
// S&OP 预测录入系统 - 单元格编辑器
// ==========================================
// 职责: 写入单个月份的值 + 追加一条变更日志
// 顺序: 读旧值 → UPSERT 新值 → 追加日志
// 值写入与日志写入不在同一事务；日志失败时返回 AuditAppendFailed
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::forecast::{ForecastKey, Group};
use crate::domain::forecast_log::ForecastLogEntry;
use crate::domain::types::{LogOrigin, Mes};
use crate::engine::error::{EngineError, EngineResult};
use crate::repository::ForecastStore;

/// 一次已提交的单元格写入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellCommit {
    pub key: ForecastKey,
    pub valor_anterior: Option<f64>,
    pub valor_novo: f64,
    pub log_id: String,
}

pub struct CellEditor {
    store: Arc<dyn ForecastStore>,
}

impl CellEditor {
    pub fn new(store: Arc<dyn ForecastStore>) -> Self {
        Self { store }
    }

    /// 设置单元格值
    ///
    /// # 参数
    /// - `produto`: 产品编码
    /// - `group`: 行分组
    /// - `mes`: 月份
    /// - `valor`: 新值（输入解析由 api 层负责）
    /// - `actor`: 操作人
    #[instrument(skip(self, group), fields(ano = group.ano, id_tipo = group.id_tipo))]
    pub fn set_cell(
        &self,
        produto: &str,
        group: &Group,
        mes: Mes,
        valor: f64,
        actor: &str,
    ) -> EngineResult<CellCommit> {
        let key = ForecastKey::for_group(produto, group, mes);
        self.commit(key, valor, actor, LogOrigin::CellEdit)
    }

    /// 单元格写入的公共路径（编辑器与重分配器共用）
    pub(crate) fn commit(
        &self,
        key: ForecastKey,
        valor: f64,
        actor: &str,
        origem: LogOrigin,
    ) -> EngineResult<CellCommit> {
        let valor_anterior = self.store.read_forecast_value(&key)?;

        self.store.upsert_forecast_value(&key, valor)?;

        let entry = ForecastLogEntry::new(key.clone(), valor_anterior, valor, actor).with_origin(origem);
        if let Err(e) = self.store.append_log_entry(&entry) {
            tracing::warn!(
                produto = %key.produto,
                ano = key.ano,
                id_tipo = key.id_tipo,
                mes = %key.mes,
                error = %e,
                "预测值已写入，但日志追加失败"
            );
            return Err(EngineError::AuditAppendFailed { key, source: e });
        }

        tracing::info!(
            produto = %key.produto,
            ano = key.ano,
            id_tipo = key.id_tipo,
            mes = %key.mes,
            valor_anterior = ?valor_anterior,
            valor_novo = valor,
            origem = %origem,
            "单元格已提交"
        );

        Ok(CellCommit {
            key,
            valor_anterior,
            valor_novo: valor,
            log_id: entry.log_id,
        })
    }
}
