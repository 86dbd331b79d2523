// ==========================================
// S&OP 预测录入系统 - 导入层
// ==========================================
// 职责: 从 CSV 导入参考数据（产品、分组、月份配置）
// ==========================================

pub mod error;
pub mod file_parser;
pub mod reference_importer;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use file_parser::{detect_delimiter, CsvParser, RawRecord};
pub use reference_importer::{ImportSummary, ReferenceImporter};
