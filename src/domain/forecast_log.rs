// ==========================================
// S&OP 预测录入系统 - 预测变更日志领域模型
// ==========================================
// 红线: 每次提交的单元格写入必须有一条日志
// 用途: 审计追踪（诊断用，非权威数据）
// 对齐: forecast_log 表
// ==========================================

use crate::domain::forecast::ForecastKey;
use crate::domain::types::LogOrigin;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// ForecastLogEntry - 预测变更日志
// ==========================================
// 只追加，不修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastLogEntry {
    pub log_id: String,
    pub key: ForecastKey,
    pub valor_anterior: Option<f64>, // 写入前的存储值（从未设置则为 None）
    pub valor_novo: f64,
    pub actor: String,
    pub log_ts: NaiveDateTime,
    pub origem: LogOrigin,
}

impl ForecastLogEntry {
    /// 创建新的日志条目（时间戳取当前 UTC）
    ///
    /// # 参数
    /// - `key`: 预测值主键
    /// - `valor_anterior`: 写入前的存储值
    /// - `valor_novo`: 写入的新值
    /// - `actor`: 操作人
    pub fn new(
        key: ForecastKey,
        valor_anterior: Option<f64>,
        valor_novo: f64,
        actor: impl Into<String>,
    ) -> Self {
        Self {
            log_id: uuid::Uuid::new_v4().to_string(),
            key,
            valor_anterior,
            valor_novo,
            actor: actor.into(),
            log_ts: chrono::Utc::now().naive_utc(),
            origem: LogOrigin::CellEdit,
        }
    }

    pub fn with_origin(mut self, origem: LogOrigin) -> Self {
        self.origem = origem;
        self
    }

    /// 变化量（从未设置按 0 计）
    pub fn delta(&self) -> f64 {
        self.valor_novo - self.valor_anterior.unwrap_or(0.0)
    }

    /// 简短描述文本
    pub fn summary_text(&self) -> String {
        let before = self
            .valor_anterior
            .map(|v| format!("{:.1}", v))
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{} {}/{}/{}: {} → {:.1} ({})",
            self.key.produto,
            self.key.ano,
            self.key.id_tipo,
            self.key.mes,
            before,
            self.valor_novo,
            self.actor
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Mes;

    #[test]
    fn test_new_entry_defaults_to_cell_edit() {
        let key = ForecastKey::new("P001", 2025, 3, Mes::Mar);
        let entry = ForecastLogEntry::new(key, None, 4.0, "ana");
        assert_eq!(entry.origem, LogOrigin::CellEdit);
        assert_eq!(entry.delta(), 4.0);
        assert!(entry.summary_text().contains("- → 4.0"));

        let entry = entry.with_origin(LogOrigin::TotalRedistribution);
        assert_eq!(entry.origem, LogOrigin::TotalRedistribution);
    }
}
