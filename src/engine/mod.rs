// ==========================================
// S&OP 预测录入系统 - 引擎层
// ==========================================
// 职责: 预测读取、单元格编辑、年度总量重分配
// 红线: 引擎只通过 ForecastStore 访问数据
// 红线: 已实现月份不受重分配影响
// ==========================================

pub mod cell_editor;
pub mod error;
pub mod forecast_reader;
pub mod redistributor;


pub use cell_editor::{CellCommit, CellEditor};
pub use error::{EngineError, EngineResult};
pub use forecast_reader::ForecastReader;
pub use redistributor::{
    plan_redistribution, round1, RedistributionOutcome, RedistributionPlan, TotalRedistributor,
};
