// ==========================================
// S&OP 预测录入系统 - 参考数据导入
// ==========================================
// 目录下可选文件（缺失则跳过）:
// - produtos.csv: codigo, descricao[, ativo]
// - grupos.csv:   ano, id_tipo, tipo
// - meses.csv:    ano, mes, pct_atual, realizado
// 写入方式: UPSERT（可重复导入）
// ==========================================

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::forecast::{Group, MonthConfiguration};
use crate::domain::product::Produto;
use crate::domain::types::Mes;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{CsvParser, RawRecord};
use crate::repository::{GroupRepository, MonthConfigRepository, ProductRepository};

pub const PRODUTOS_FILE: &str = "produtos.csv";
pub const GRUPOS_FILE: &str = "grupos.csv";
pub const MESES_FILE: &str = "meses.csv";

/// 导入统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub produtos: usize,
    pub grupos: usize,
    pub meses: usize,
}

pub struct ReferenceImporter {
    product_repo: Arc<ProductRepository>,
    group_repo: Arc<GroupRepository>,
    month_config_repo: Arc<MonthConfigRepository>,
}

impl ReferenceImporter {
    pub fn new(
        product_repo: Arc<ProductRepository>,
        group_repo: Arc<GroupRepository>,
        month_config_repo: Arc<MonthConfigRepository>,
    ) -> Self {
        Self {
            product_repo,
            group_repo,
            month_config_repo,
        }
    }

    /// 导入目录下的全部参考数据文件
    #[tracing::instrument(skip(self), fields(dir = %dir.display()))]
    pub fn import_dir(&self, dir: &Path) -> ImportResult<ImportSummary> {
        let mut summary = ImportSummary::default();

        if let Some(records) = read_optional(&dir.join(PRODUTOS_FILE))? {
            summary.produtos = self.import_produtos(&records)?;
        }
        if let Some(records) = read_optional(&dir.join(GRUPOS_FILE))? {
            summary.grupos = self.import_grupos(&records)?;
        }
        if let Some(records) = read_optional(&dir.join(MESES_FILE))? {
            summary.meses = self.import_meses(&records)?;
        }

        tracing::info!(
            produtos = summary.produtos,
            grupos = summary.grupos,
            meses = summary.meses,
            "参考数据导入完成"
        );
        Ok(summary)
    }

    pub fn import_produtos(&self, records: &[RawRecord]) -> ImportResult<usize> {
        for r in records {
            let row = r.line;
            let codigo = required(r, PRODUTOS_FILE, row, "codigo")?;
            let descricao = r.get("descricao").cloned().unwrap_or_default();
            let ativo = match r.get("ativo").filter(|v| !v.is_empty()) {
                Some(v) => parse_flag(v, PRODUTOS_FILE, row, "ativo")?,
                None => true,
            };
            self.product_repo.upsert(&Produto {
                codigo: codigo.to_string(),
                descricao,
                ativo,
            })?;
        }
        Ok(records.len())
    }

    pub fn import_grupos(&self, records: &[RawRecord]) -> ImportResult<usize> {
        for r in records {
            let row = r.line;
            let ano = parse_int(required(r, GRUPOS_FILE, row, "ano")?, GRUPOS_FILE, row, "ano")?;
            let id_tipo = parse_int(
                required(r, GRUPOS_FILE, row, "id_tipo")?,
                GRUPOS_FILE,
                row,
                "id_tipo",
            )?;
            let tipo = required(r, GRUPOS_FILE, row, "tipo")?;
            self.group_repo.upsert(&Group::new(ano, id_tipo, tipo))?;
        }
        Ok(records.len())
    }

    pub fn import_meses(&self, records: &[RawRecord]) -> ImportResult<usize> {
        for r in records {
            let row = r.line;
            let ano = parse_int(required(r, MESES_FILE, row, "ano")?, MESES_FILE, row, "ano")?;
            let mes_raw = required(r, MESES_FILE, row, "mes")?;
            let mes = Mes::parse(mes_raw).ok_or_else(|| conversion(MESES_FILE, row, "mes", mes_raw))?;
            let pct_atual = match r.get("pct_atual").filter(|v| !v.is_empty()) {
                Some(v) => parse_weight(v, MESES_FILE, row, "pct_atual")?,
                None => 0.0,
            };
            let realizado = match r.get("realizado").filter(|v| !v.is_empty()) {
                Some(v) => parse_flag(v, MESES_FILE, row, "realizado")?,
                None => false,
            };
            self.month_config_repo.upsert(
                ano,
                mes,
                &MonthConfiguration {
                    pct_atual,
                    realizado,
                },
            )?;
        }
        Ok(records.len())
    }
}

fn read_optional(path: &Path) -> ImportResult<Option<Vec<RawRecord>>> {
    if !path.exists() {
        tracing::warn!(file = %path.display(), "文件不存在，跳过");
        return Ok(None);
    }
    CsvParser.parse_to_raw_records(path).map(Some)
}

fn required<'a>(r: &'a RawRecord, file: &str, row: usize, field: &str) -> ImportResult<&'a str> {
    match r.get(field).map(String::as_str) {
        Some(v) if !v.is_empty() => Ok(v),
        Some(_) => Err(conversion(file, row, field, "")),
        None => Err(ImportError::MissingColumn {
            file: file.to_string(),
            column: field.to_string(),
        }),
    }
}

fn conversion(file: &str, row: usize, field: &str, value: &str) -> ImportError {
    ImportError::TypeConversionError {
        file: file.to_string(),
        row,
        field: field.to_string(),
        message: format!("无效值 '{}'", value),
    }
}

fn parse_int(v: &str, file: &str, row: usize, field: &str) -> ImportResult<i32> {
    v.parse::<i32>().map_err(|_| conversion(file, row, field, v))
}

/// 支持逗号小数点（0,25）
fn parse_decimal(v: &str, file: &str, row: usize, field: &str) -> ImportResult<f64> {
    let normalized = if v.contains(',') {
        v.replace('.', "").replace(',', ".")
    } else {
        v.to_string()
    };
    match normalized.parse::<f64>() {
        Ok(x) if x.is_finite() => Ok(x),
        _ => Err(conversion(file, row, field, v)),
    }
}

/// 权重必须位于 [0,1]
fn parse_weight(v: &str, file: &str, row: usize, field: &str) -> ImportResult<f64> {
    let w = parse_decimal(v, file, row, field)?;
    if !(0.0..=1.0).contains(&w) {
        return Err(ImportError::TypeConversionError {
            file: file.to_string(),
            row,
            field: field.to_string(),
            message: format!("权重超出 [0,1]: '{}'", v),
        });
    }
    Ok(w)
}

fn parse_flag(v: &str, file: &str, row: usize, field: &str) -> ImportResult<bool> {
    match v.to_uppercase().as_str() {
        "1" | "S" | "SIM" | "Y" | "YES" | "TRUE" | "X" => Ok(true),
        "0" | "N" | "NAO" | "NÃO" | "NO" | "FALSE" => Ok(false),
        _ => Err(conversion(file, row, field, v)),
    }
}
