// ==========================================
// S&OP 预测录入系统 - 引擎层错误类型
// ==========================================

use crate::domain::forecast::ForecastKey;
use crate::repository::error::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// 行类型不可编辑
    #[error("行不可编辑: tipo={tipo} (可编辑类型={editable_tipo})")]
    NotEditable { tipo: String, editable_tipo: String },

    /// 开放月份权重和为 0 且策略为 REJECT
    #[error("开放月份权重之和为 0: ano={ano}")]
    ZeroOpenWeight { ano: i32 },

    #[error("年度总量不是有限数值: {0}")]
    NonFiniteTotal(f64),

    /// 值已写入，日志追加失败（可容忍的不一致）
    #[error("预测值已写入但日志追加失败: {key:?}: {source}")]
    AuditAppendFailed {
        key: ForecastKey,
        #[source]
        source: RepositoryError,
    },

    /// 重分配中途失败：前 committed 个月值与日志均已提交，
    /// 前 written 个月的值已写入（written >= committed）
    #[error("重分配部分完成: 已提交 {committed}/{total} 个月, 已写入 {written} 个月: {source}")]
    PartialRedistribution {
        committed: usize,
        written: usize,
        total: usize,
        #[source]
        source: Box<EngineError>,
    },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type EngineResult<T> = Result<T, EngineError>;
