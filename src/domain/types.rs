// ==========================================
// S&OP 预测录入系统 - 领域类型定义
// ==========================================
// 月份、零权重策略、身份后端、日志来源
// 存储格式: 大写字符串 (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 月份 (Mes)
// ==========================================
// 存储为葡语三字母缩写 JAN..DEZ
// 排序即业务顺序（重分配按此顺序逐月提交）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mes {
    Jan,
    Fev,
    Mar,
    Abr,
    Mai,
    Jun,
    Jul,
    Ago,
    Set,
    Out,
    Nov,
    Dez,
}

impl Mes {
    /// 全年十二个月（JAN..DEZ）
    pub const ALL: [Mes; 12] = [
        Mes::Jan,
        Mes::Fev,
        Mes::Mar,
        Mes::Abr,
        Mes::Mai,
        Mes::Jun,
        Mes::Jul,
        Mes::Ago,
        Mes::Set,
        Mes::Out,
        Mes::Nov,
        Mes::Dez,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mes::Jan => "JAN",
            Mes::Fev => "FEV",
            Mes::Mar => "MAR",
            Mes::Abr => "ABR",
            Mes::Mai => "MAI",
            Mes::Jun => "JUN",
            Mes::Jul => "JUL",
            Mes::Ago => "AGO",
            Mes::Set => "SET",
            Mes::Out => "OUT",
            Mes::Nov => "NOV",
            Mes::Dez => "DEZ",
        }
    }

    /// 从字符串解析（忽略大小写与首尾空白）
    pub fn parse(s: &str) -> Option<Self> {
        let upper = s.trim().to_uppercase();
        Mes::ALL.iter().copied().find(|m| m.as_str() == upper)
    }

    /// 月序号 1..=12
    pub fn number(&self) -> u32 {
        *self as u32 + 1
    }

    /// 从月序号 1..=12 构造
    pub fn from_number(n: u32) -> Option<Self> {
        if (1..=12).contains(&n) {
            Some(Mes::ALL[(n - 1) as usize])
        } else {
            None
        }
    }
}

impl fmt::Display for Mes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 零权重策略 (Zero Weight Policy)
// ==========================================
// 开放月份 pct_atual 之和为 0 时的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ZeroWeightPolicy {
    Even,   // 平均分配到所有开放月份
    Reject, // 拒绝操作，不写入任何值
}

impl ZeroWeightPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZeroWeightPolicy::Even => "EVEN",
            ZeroWeightPolicy::Reject => "REJECT",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "EVEN" => Some(ZeroWeightPolicy::Even),
            "REJECT" => Some(ZeroWeightPolicy::Reject),
            _ => None,
        }
    }
}

impl Default for ZeroWeightPolicy {
    fn default() -> Self {
        ZeroWeightPolicy::Even
    }
}

impl fmt::Display for ZeroWeightPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 身份后端 (Identity Backend)
// ==========================================
// 部署时选定，二选一
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IdentityBackend {
    LocalList,   // 进程内用户列表
    RemoteStore, // usuario 表
}

impl IdentityBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityBackend::LocalList => "LOCAL_LIST",
            IdentityBackend::RemoteStore => "REMOTE_STORE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "LOCAL_LIST" => Some(IdentityBackend::LocalList),
            "REMOTE_STORE" => Some(IdentityBackend::RemoteStore),
            _ => None,
        }
    }
}

impl fmt::Display for IdentityBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 日志来源 (Log Origin)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogOrigin {
    CellEdit,            // 单元格编辑
    TotalRedistribution, // 年度总量重分配
}

impl LogOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogOrigin::CellEdit => "CELL_EDIT",
            LogOrigin::TotalRedistribution => "TOTAL_REDISTRIBUTION",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CELL_EDIT" => Some(LogOrigin::CellEdit),
            "TOTAL_REDISTRIBUTION" => Some(LogOrigin::TotalRedistribution),
            _ => None,
        }
    }
}

impl fmt::Display for LogOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
