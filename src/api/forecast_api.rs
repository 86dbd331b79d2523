// ==========================================
// S&OP 预测录入系统 - 预测录入 API
// ==========================================
// 职责:
// 1. 产品列表、预测表格（每个分组一行，十二个月 + 合计）
// 2. 单元格编辑（原始字符串 → 数值，非数字按 0）
// 3. 年度总量重分配
// 4. 变更日志查询
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult, Notification};
use crate::api::input::{parse_mes, parse_numeric_input};
use crate::config::ForecastConfigReader;
use crate::domain::forecast::{
    value_or_zero, ForecastKey, Group, MonthConfigMap, ProductValueMap,
};
use crate::domain::forecast_log::ForecastLogEntry;
use crate::domain::product::Produto;
use crate::domain::types::Mes;
use crate::engine::{CellCommit, CellEditor, ForecastReader, RedistributionOutcome, TotalRedistributor};
use crate::i18n::t_with_args;
use crate::perf::PerfGuard;
use crate::repository::{ForecastLogRepository, ForecastStore, ProductRepository};

/// 日志查询默认条数
pub const DEFAULT_LOG_LIMIT: usize = 100;

// ==========================================
// DTO
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthCellView {
    pub mes: Mes,
    pub valor: f64,
    pub realizado: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRowView {
    pub group: Group,
    pub editable: bool,
    pub cells: Vec<MonthCellView>,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastTable {
    pub produto: String,
    pub rows: Vec<ForecastRowView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetCellRequest {
    pub produto: String,
    pub ano: i32,
    pub id_tipo: i32,
    pub mes: String,
    pub raw_value: String,
    pub actor: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetCellResponse {
    pub commit: CellCommit,
    pub row: ForecastRowView,
    pub notification: Notification,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetTotalRequest {
    pub produto: String,
    pub ano: i32,
    pub id_tipo: i32,
    pub raw_total: String,
    pub actor: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetTotalResponse {
    pub outcome: RedistributionOutcome,
    pub row: ForecastRowView,
    pub notification: Notification,
}

// ==========================================
// ForecastApi
// ==========================================

pub struct ForecastApi {
    reader: ForecastReader,
    editor: CellEditor,
    redistributor: TotalRedistributor,
    product_repo: Arc<ProductRepository>,
    log_repo: Arc<ForecastLogRepository>,
    config: Arc<dyn ForecastConfigReader>,
}

impl ForecastApi {
    pub fn new(
        store: Arc<dyn ForecastStore>,
        product_repo: Arc<ProductRepository>,
        log_repo: Arc<ForecastLogRepository>,
        config: Arc<dyn ForecastConfigReader>,
    ) -> Self {
        Self {
            reader: ForecastReader::new(store.clone()),
            editor: CellEditor::new(store.clone()),
            redistributor: TotalRedistributor::new(store),
            product_repo,
            log_repo,
            config,
        }
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 启用的产品列表
    pub fn list_products(&self) -> ApiResult<Vec<Produto>> {
        Ok(self.product_repo.list_active()?)
    }

    /// 产品的预测表格
    pub async fn get_forecast_table(&self, produto: &str) -> ApiResult<ForecastTable> {
        let produto = require_produto(produto)?;
        let _perf = PerfGuard::new("get_forecast_table");

        let editable_tipo = self.editable_tipo().await?;
        let groups = self.reader.get_groups()?;
        let configs = self.reader.get_month_configurations()?;
        let values = self.reader.get_values(produto)?;

        let rows = groups
            .into_iter()
            .map(|g| build_row(g, &values, &configs, &editable_tipo))
            .collect();

        Ok(ForecastTable {
            produto: produto.to_string(),
            rows,
        })
    }

    /// 某产品最近的变更日志
    pub fn list_logs_by_product(
        &self,
        produto: &str,
        limit: Option<usize>,
    ) -> ApiResult<Vec<ForecastLogEntry>> {
        let produto = require_produto(produto)?;
        Ok(self
            .log_repo
            .find_by_product(produto, limit.unwrap_or(DEFAULT_LOG_LIMIT))?)
    }

    /// 单元格的全部变更日志
    pub fn list_logs_by_cell(
        &self,
        produto: &str,
        ano: i32,
        id_tipo: i32,
        mes: &str,
    ) -> ApiResult<Vec<ForecastLogEntry>> {
        let produto = require_produto(produto)?;
        let key = ForecastKey::new(produto, ano, id_tipo, parse_mes(mes)?);
        Ok(self.log_repo.find_by_cell(&key)?)
    }

    /// 最近的变更日志（全部产品）
    pub fn list_recent_logs(&self, limit: Option<usize>) -> ApiResult<Vec<ForecastLogEntry>> {
        Ok(self.log_repo.find_recent(limit.unwrap_or(DEFAULT_LOG_LIMIT))?)
    }

    pub fn count_logs(&self) -> ApiResult<i64> {
        Ok(self.log_repo.count()?)
    }

    // ==========================================
    // 写入
    // ==========================================

    /// 编辑单元格
    ///
    /// # 返回
    /// - 已提交的写入 + 刷新后的整行
    /// - Err(NotEditable): 行类型不可编辑
    pub async fn set_cell(&self, req: SetCellRequest) -> ApiResult<SetCellResponse> {
        let produto = require_produto(&req.produto)?;
        let mes = parse_mes(&req.mes)?;
        let valor = parse_numeric_input(&req.raw_value);
        let _perf = PerfGuard::new("set_cell");

        let editable_tipo = self.editable_tipo().await?;
        let group = self.find_group(req.ano, req.id_tipo)?;
        if !group.is_editable(&editable_tipo) {
            return Err(ApiError::NotEditable { tipo: group.tipo });
        }
        let actor = self.resolve_actor(req.actor.as_deref()).await?;

        let commit = self.editor.set_cell(produto, &group, mes, valor, &actor)?;
        let row = self.refresh_row(produto, group, &editable_tipo)?;

        Ok(SetCellResponse {
            commit,
            row,
            notification: Notification::info(t_with_args(
                "notify.cell_saved",
                &[("mes", mes.as_str())],
            )),
        })
    }

    /// 设置年度总量并重分配到开放月份
    pub async fn set_total(&self, req: SetTotalRequest) -> ApiResult<SetTotalResponse> {
        let produto = require_produto(&req.produto)?;
        let new_total = parse_numeric_input(&req.raw_total);
        let _perf = PerfGuard::new("set_total");

        let editable_tipo = self.editable_tipo().await?;
        let policy = self
            .config
            .get_zero_weight_policy()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        let group = self.find_group(req.ano, req.id_tipo)?;
        let actor = self.resolve_actor(req.actor.as_deref()).await?;

        let outcome = self.redistributor.set_total(
            produto,
            &group,
            new_total,
            &actor,
            &editable_tipo,
            policy,
        )?;

        let notification = match &outcome {
            RedistributionOutcome::NoConfiguration { ano } => Notification::warning(t_with_args(
                "notify.no_configuration",
                &[("ano", ano.to_string().as_str())],
            )),
            RedistributionOutcome::NoOpenMonths { ano, .. } => Notification::info(t_with_args(
                "notify.no_open_months",
                &[("ano", ano.to_string().as_str())],
            )),
            RedistributionOutcome::Applied { commits, .. } => Notification::info(t_with_args(
                "notify.total_applied",
                &[("count", commits.len().to_string().as_str())],
            )),
        };
        let row = self.refresh_row(produto, group, &editable_tipo)?;

        Ok(SetTotalResponse {
            outcome,
            row,
            notification,
        })
    }

    // ==========================================
    // 内部辅助
    // ==========================================

    async fn editable_tipo(&self) -> ApiResult<String> {
        self.config
            .get_editable_tipo()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))
    }

    async fn resolve_actor(&self, actor: Option<&str>) -> ApiResult<String> {
        match actor.map(str::trim).filter(|a| !a.is_empty()) {
            Some(a) => Ok(a.to_string()),
            None => self
                .config
                .get_default_actor()
                .await
                .map_err(|e| ApiError::ConfigError(e.to_string())),
        }
    }

    fn find_group(&self, ano: i32, id_tipo: i32) -> ApiResult<Group> {
        self.reader
            .get_groups()?
            .into_iter()
            .find(|g| g.ano == ano && g.id_tipo == id_tipo)
            .ok_or_else(|| ApiError::NotFound(format!("grupo(ano={}, id_tipo={})", ano, id_tipo)))
    }

    fn refresh_row(&self, produto: &str, group: Group, editable_tipo: &str) -> ApiResult<ForecastRowView> {
        let values = self.reader.get_values(produto)?;
        let configs = self.reader.get_month_configurations()?;
        Ok(build_row(group, &values, &configs, editable_tipo))
    }
}

fn require_produto(produto: &str) -> ApiResult<&str> {
    let trimmed = produto.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidInput("产品编码不能为空".to_string()));
    }
    Ok(trimmed)
}

/// 组装一行显示数据（缺失值按 0）
fn build_row(
    group: Group,
    values: &ProductValueMap,
    configs: &MonthConfigMap,
    editable_tipo: &str,
) -> ForecastRowView {
    let cells: Vec<MonthCellView> = Mes::ALL
        .iter()
        .map(|m| MonthCellView {
            mes: *m,
            valor: value_or_zero(values, group.ano, group.id_tipo, *m),
            realizado: configs
                .get(&(group.ano, *m))
                .map(|c| c.realizado)
                .unwrap_or(false),
        })
        .collect();
    let total = cells.iter().map(|c| c.valor).sum();
    let editable = group.is_editable(editable_tipo);

    ForecastRowView {
        group,
        editable,
        cells,
        total,
    }
}
