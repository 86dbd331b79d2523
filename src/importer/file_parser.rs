// ==========================================
// S&OP 预测录入系统 - CSV 解析
// ==========================================
// 分隔符: 根据表头行自动识别 ';' 或 ','
// 输出: 每行一个 表头 → 值 映射（值已去首尾空白）
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// 一行原始记录（表头小写）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    /// 源文件中的行号（从 1 开始，表头为第 1 行）
    pub line: usize,
    pub fields: HashMap<String, String>,
}

impl RawRecord {
    pub fn get(&self, column: &str) -> Option<&String> {
        self.fields.get(column)
    }
}

/// 表头含 ';' 时按分号分隔，否则按逗号
pub fn detect_delimiter(header_line: &str) -> u8 {
    if header_line.contains(';') {
        b';'
    } else {
        b','
    }
}

pub struct CsvParser;

impl CsvParser {
    pub fn parse_to_raw_records(&self, path: &Path) -> ImportResult<Vec<RawRecord>> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let mut header_line = String::new();
        BufReader::new(File::open(path)?).read_line(&mut header_line)?;
        let delimiter = detect_delimiter(&header_line);

        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_lowercase())
            .collect();

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(records.len() + 2);
            let mut row_map = HashMap::new();

            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(header.clone(), value.trim().to_string());
                }
            }

            // 跳过完全空白的行
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            records.push(RawRecord {
                line,
                fields: row_map,
            });
        }

        Ok(records)
    }
}
