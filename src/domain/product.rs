// ==========================================
// S&OP 预测录入系统 - 产品
// ==========================================

use serde::{Deserialize, Serialize};

/// 产品（参考数据）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Produto {
    pub codigo: String,
    pub descricao: String,
    pub ativo: bool,
}

impl Produto {
    pub fn new(codigo: impl Into<String>, descricao: impl Into<String>) -> Self {
        Self {
            codigo: codigo.into(),
            descricao: descricao.into(),
            ativo: true,
        }
    }
}
