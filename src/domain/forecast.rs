// ==========================================
// S&OP 预测录入系统 - 预测领域模型
// ==========================================
// Group / MonthConfiguration / ForecastValue
// 红线: 已实现月份 (realizado) 不受重分配影响
// ==========================================

use crate::domain::types::Mes;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// Group - 预测行分组
// ==========================================
// 一行 = (年份, 类型ID, 类型标签)；类型决定可编辑性
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Group {
    pub ano: i32,
    pub id_tipo: i32,
    pub tipo: String,
}

impl Group {
    pub fn new(ano: i32, id_tipo: i32, tipo: impl Into<String>) -> Self {
        Self {
            ano,
            id_tipo,
            tipo: tipo.into(),
        }
    }

    /// 标签比较忽略首尾空白与大小写
    pub fn is_editable(&self, editable_tipo: &str) -> bool {
        self.tipo.trim().to_uppercase() == editable_tipo.trim().to_uppercase()
    }
}

// ==========================================
// MonthConfiguration - 月份配置
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthConfiguration {
    pub pct_atual: f64, // 重分配权重 [0,1]
    pub realizado: bool, // 已实现（关闭）
}

impl MonthConfiguration {
    pub fn open(pct_atual: f64) -> Self {
        Self {
            pct_atual,
            realizado: false,
        }
    }

    pub fn realized() -> Self {
        Self {
            pct_atual: 0.0,
            realizado: true,
        }
    }
}

/// (ano, mes) → MonthConfiguration
pub type MonthConfigMap = BTreeMap<(i32, Mes), MonthConfiguration>;

// ==========================================
// YearConfig - 单一年份的月份配置视图
// ==========================================
// 已配置年份中缺失的月份按"开放、权重0"处理
#[derive(Debug, Clone, PartialEq)]
pub struct YearConfig {
    pub ano: i32,
    months: BTreeMap<Mes, MonthConfiguration>,
}

impl YearConfig {
    /// 从全量配置中截取某一年；该年无任何配置时返回 None
    pub fn from_map(configs: &MonthConfigMap, ano: i32) -> Option<Self> {
        let months: BTreeMap<Mes, MonthConfiguration> = configs
            .iter()
            .filter(|((a, _), _)| *a == ano)
            .map(|((_, m), c)| (*m, *c))
            .collect();

        if months.is_empty() {
            None
        } else {
            Some(Self { ano, months })
        }
    }

    pub fn month(&self, mes: Mes) -> MonthConfiguration {
        self.months
            .get(&mes)
            .copied()
            .unwrap_or_else(|| MonthConfiguration::open(0.0))
    }

    pub fn is_realized(&self, mes: Mes) -> bool {
        self.month(mes).realizado
    }

    /// 开放月份（JAN..DEZ 顺序）
    pub fn open_months(&self) -> Vec<Mes> {
        Mes::ALL
            .iter()
            .copied()
            .filter(|m| !self.is_realized(*m))
            .collect()
    }

    /// 已实现月份（JAN..DEZ 顺序）
    pub fn realized_months(&self) -> Vec<Mes> {
        Mes::ALL
            .iter()
            .copied()
            .filter(|m| self.is_realized(*m))
            .collect()
    }

    pub fn open_weight_sum(&self) -> f64 {
        self.open_months()
            .iter()
            .map(|m| self.month(*m).pct_atual)
            .sum()
    }
}

// ==========================================
// ForecastKey - 预测值主键
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ForecastKey {
    pub produto: String,
    pub ano: i32,
    pub id_tipo: i32,
    pub mes: Mes,
}

impl ForecastKey {
    pub fn new(produto: impl Into<String>, ano: i32, id_tipo: i32, mes: Mes) -> Self {
        Self {
            produto: produto.into(),
            ano,
            id_tipo,
            mes,
        }
    }

    pub fn for_group(produto: &str, group: &Group, mes: Mes) -> Self {
        Self::new(produto, group.ano, group.id_tipo, mes)
    }
}

// ==========================================
// ForecastValue - 预测值
// ==========================================
// 主键唯一，后写覆盖
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastValue {
    pub key: ForecastKey,
    pub valor: f64,
    pub updated_at: Option<NaiveDateTime>,
}

/// (ano, id_tipo, mes) → 数值（单一产品）
pub type ProductValueMap = BTreeMap<(i32, i32, Mes), f64>;

/// 读取显示值：缺失按 0 处理
pub fn value_or_zero(values: &ProductValueMap, ano: i32, id_tipo: i32, mes: Mes) -> f64 {
    values.get(&(ano, id_tipo, mes)).copied().unwrap_or(0.0)
}

/// 一行十二个月的存储值（None = 从未设置）
pub fn row_values(values: &ProductValueMap, group: &Group) -> BTreeMap<Mes, Option<f64>> {
    Mes::ALL
        .iter()
        .map(|m| (*m, values.get(&(group.ano, group.id_tipo, *m)).copied()))
        .collect()
}
