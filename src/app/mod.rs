// ==========================================
// S&OP 预测录入系统 - 应用层
// ==========================================
// 职责: 装配应用状态，供 CLI 与导入工具使用
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, read_users_file, AppState, LOCAL_USERS_ENV};
