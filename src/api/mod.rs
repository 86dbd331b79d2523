// ==========================================
// S&OP 预测录入系统 - API 层
// ==========================================
// 职责: 展示协作者调用的业务接口
// 输入为原始字符串，输出为 DTO + 用户通知
// ==========================================

pub mod auth_api;
pub mod error;
pub mod forecast_api;
pub mod input;

// 重导出核心类型
pub use auth_api::{AuthApi, LoginRequest, RegisterRequest};
pub use error::{ApiError, ApiResult, Notification, NotificationLevel};
pub use forecast_api::{
    ForecastApi, ForecastRowView, ForecastTable, MonthCellView, SetCellRequest, SetCellResponse,
    SetTotalRequest, SetTotalResponse,
};
pub use input::{parse_mes, parse_numeric_input};
