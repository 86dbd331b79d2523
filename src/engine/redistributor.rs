// ==========================================
// S&OP 预测录入系统 - 年度总量重分配器
// ==========================================
// 职责: 给定可编辑行的新年度总量，按 pct_atual 比例重算所有开放月份
// 红线: 已实现月份 (realizado) 永不修改
// 精度: 逐月 round1（一位小数，远离零舍入），不对总量做二次校正
// ==========================================
// 步骤:
// 1. 取该年月份配置；无配置 → 不做任何写入
// 2. realized_total = 已实现月份当前存储值之和
// 3. remaining = new_total - realized_total
// 4. open_weight_sum = 开放月份 pct_atual 之和；为 0 时按 ZeroWeightPolicy
// 5. 开放月份新值 = round1(remaining * pct_atual / open_weight_sum)
// 6. 按 JAN..DEZ 逐月经 CellEditor 提交（值 + 日志）
// ==========================================

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::forecast::{row_values, ForecastKey, Group, YearConfig};
use crate::domain::types::{LogOrigin, Mes, ZeroWeightPolicy};
use crate::engine::cell_editor::{CellCommit, CellEditor};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::forecast_reader::ForecastReader;
use crate::repository::ForecastStore;

/// 保留一位小数，远离零舍入（f64::round 即远离零）
pub fn round1(value: f64) -> f64 {
    let rounded = (value * 10.0).round() / 10.0;
    // 避免 -0.0 进入存储
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

// ==========================================
// RedistributionPlan - 重分配计划（纯计算结果）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedistributionPlan {
    pub ano: i32,
    pub new_total: f64,
    pub realized_total: f64,
    pub remaining: f64,
    pub open_weight_sum: f64,
    /// 权重和为 0 时实际采用的策略
    pub zero_weight_policy_applied: Option<ZeroWeightPolicy>,
    /// 开放月份 → 新值（JAN..DEZ 顺序）
    pub assignments: Vec<(Mes, f64)>,
}

impl RedistributionPlan {
    /// 开放月份新值之和
    pub fn assigned_total(&self) -> f64 {
        self.assignments.iter().map(|(_, v)| v).sum()
    }

    /// 重分配后整行合计
    pub fn resulting_row_total(&self) -> f64 {
        self.realized_total + self.assigned_total()
    }
}

/// 计算重分配计划（不读写存储）
///
/// # 参数
/// - `year`: 该年月份配置
/// - `row`: 该行十二个月的当前存储值（None = 从未设置）
/// - `new_total`: 新年度总量
/// - `policy`: 开放权重和为 0 时的策略
pub fn plan_redistribution(
    year: &YearConfig,
    row: &BTreeMap<Mes, Option<f64>>,
    new_total: f64,
    policy: ZeroWeightPolicy,
) -> EngineResult<RedistributionPlan> {
    if !new_total.is_finite() {
        return Err(EngineError::NonFiniteTotal(new_total));
    }

    let realized_total: f64 = year
        .realized_months()
        .iter()
        .map(|m| row.get(m).copied().flatten().unwrap_or(0.0))
        .sum();
    let remaining = new_total - realized_total;

    let open_months = year.open_months();
    let open_weight_sum = year.open_weight_sum();

    let mut plan = RedistributionPlan {
        ano: year.ano,
        new_total,
        realized_total,
        remaining,
        open_weight_sum,
        zero_weight_policy_applied: None,
        assignments: Vec::with_capacity(open_months.len()),
    };

    if open_months.is_empty() {
        return Ok(plan);
    }

    if open_weight_sum > 0.0 {
        for mes in open_months {
            let share = year.month(mes).pct_atual / open_weight_sum;
            plan.assignments.push((mes, round1(remaining * share)));
        }
        return Ok(plan);
    }

    match policy {
        ZeroWeightPolicy::Reject => Err(EngineError::ZeroOpenWeight { ano: year.ano }),
        ZeroWeightPolicy::Even => {
            let each = round1(remaining / open_months.len() as f64);
            plan.zero_weight_policy_applied = Some(ZeroWeightPolicy::Even);
            plan.assignments = open_months.into_iter().map(|m| (m, each)).collect();
            Ok(plan)
        }
    }
}

// ==========================================
// RedistributionOutcome - 重分配结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RedistributionOutcome {
    /// 该年无月份配置，未写入任何值
    NoConfiguration { ano: i32 },
    /// 全部月份已实现，未写入任何值
    NoOpenMonths { ano: i32, realized_total: f64 },
    /// 已逐月提交
    Applied {
        plan: RedistributionPlan,
        commits: Vec<CellCommit>,
    },
}

// ==========================================
// TotalRedistributor - 年度总量重分配器
// ==========================================
pub struct TotalRedistributor {
    reader: ForecastReader,
    editor: CellEditor,
}

impl TotalRedistributor {
    pub fn new(store: Arc<dyn ForecastStore>) -> Self {
        Self {
            reader: ForecastReader::new(store.clone()),
            editor: CellEditor::new(store),
        }
    }

    /// 设置年度总量
    ///
    /// # 参数
    /// - `editable_tipo`: 可编辑类型标签（配置项）
    /// - `policy`: 零权重策略（配置项）
    ///
    /// # 返回
    /// - `Ok(RedistributionOutcome)`: 执行结果
    /// - `Err(NotEditable)`: 行类型不可编辑
    /// - `Err(PartialRedistribution)`: 中途失败，已提交部分月份
    ///   （`written` 含日志追加失败但值已写入的月份）
    #[instrument(skip(self, group), fields(ano = group.ano, id_tipo = group.id_tipo))]
    pub fn set_total(
        &self,
        produto: &str,
        group: &Group,
        new_total: f64,
        actor: &str,
        editable_tipo: &str,
        policy: ZeroWeightPolicy,
    ) -> EngineResult<RedistributionOutcome> {
        if !group.is_editable(editable_tipo) {
            return Err(EngineError::NotEditable {
                tipo: group.tipo.clone(),
                editable_tipo: editable_tipo.to_string(),
            });
        }

        let year = match self.reader.get_year_config(group.ano)? {
            Some(year) => year,
            None => {
                tracing::warn!(ano = group.ano, "该年份无月份配置，重分配未执行");
                return Ok(RedistributionOutcome::NoConfiguration { ano: group.ano });
            }
        };

        let values = self.reader.get_values(produto)?;
        let row = row_values(&values, group);
        let plan = plan_redistribution(&year, &row, new_total, policy)?;

        if plan.assignments.is_empty() {
            tracing::info!(ano = group.ano, "全部月份已实现，重分配无可写月份");
            return Ok(RedistributionOutcome::NoOpenMonths {
                ano: group.ano,
                realized_total: plan.realized_total,
            });
        }

        if let Some(applied) = plan.zero_weight_policy_applied {
            tracing::warn!(ano = group.ano, policy = %applied, "开放月份权重之和为 0，按策略分配");
        }

        let total = plan.assignments.len();
        let mut commits = Vec::with_capacity(total);
        for (mes, valor) in &plan.assignments {
            let key = ForecastKey::for_group(produto, group, *mes);
            match self
                .editor
                .commit(key, *valor, actor, LogOrigin::TotalRedistribution)
            {
                Ok(commit) => commits.push(commit),
                Err(e) if commits.is_empty() => return Err(e),
                Err(e) => {
                    // 日志失败时本月的值已落库
                    let written = match e {
                        EngineError::AuditAppendFailed { .. } => commits.len() + 1,
                        _ => commits.len(),
                    };
                    return Err(EngineError::PartialRedistribution {
                        committed: commits.len(),
                        written,
                        total,
                        source: Box::new(e),
                    });
                }
            }
        }

        tracing::info!(
            produto,
            ano = group.ano,
            new_total,
            realized_total = plan.realized_total,
            resulting_total = plan.resulting_row_total(),
            months = total,
            "年度总量已重分配"
        );

        Ok(RedistributionOutcome::Applied { plan, commits })
    }
}
