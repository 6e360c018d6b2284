// ==========================================
// 商品目录表格导入 - 文件解析器实现
// ==========================================
// 支持: 工作簿 (.xlsx/.xls/.ods，字节 / 路径 / base64) / CSV / 商品 JSON 字典
// 输出: RawRow（列头 → 单元格），行号按原始表格计（表头为第 1 行）
// ==========================================

use crate::domain::record::{CellValue, RawRow};
use crate::importer::error::{ImportError, ImportResult};
use base64::Engine as _;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::debug;

// ==========================================
// WorkbookInput - 工作簿输入形态
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkbookInput {
    Bytes(Vec<u8>),
    Path(PathBuf),
    /// 字符串输入: 存在的文件路径优先，否则按 base64 解码
    Encoded(String),
}

impl WorkbookInput {
    /// 读取为原始字节
    pub fn into_bytes(self) -> ImportResult<Vec<u8>> {
        match self {
            WorkbookInput::Bytes(bytes) => Ok(bytes),
            WorkbookInput::Path(path) => read_file(&path),
            WorkbookInput::Encoded(text) => {
                let candidate = Path::new(text.trim());
                if candidate.is_file() {
                    debug!(path = %candidate.display(), "字符串输入按文件路径读取");
                    return read_file(candidate);
                }
                base64::engine::general_purpose::STANDARD
                    .decode(text.trim())
                    .map_err(|e| ImportError::InvalidWorkbookInput(e.to_string()))
            }
        }
    }
}

fn read_file(path: &Path) -> ImportResult<Vec<u8>> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(std::fs::read(path)?)
}

// ==========================================
// Workbook - 已解析的工作簿
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<RawRow>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// 按表单名查找（大小写敏感）
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    /// 从字节解析整个工作簿（格式自动识别）
    pub fn parse_workbook(&self, bytes: Vec<u8>) -> ImportResult<Workbook> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
            .map_err(|e| ImportError::WorkbookParseError(e.to_string()))?;

        let mut sheets = Vec::new();
        for sheet_name in workbook.sheet_names() {
            let range = workbook
                .worksheet_range(&sheet_name)
                .map_err(|e| ImportError::WorkbookParseError(e.to_string()))?;

            // 区域起点之前的空行不计入，行号按表格实际位置换算
            let header_row_number = range.start().map(|(r, _)| r as usize + 1).unwrap_or(1);

            let mut rows_iter = range.rows();
            let headers: Vec<String> = match rows_iter.next() {
                Some(header_row) => header_row
                    .iter()
                    .map(|cell| cell.to_string().trim().to_string())
                    .collect(),
                None => {
                    // 空表单
                    sheets.push(Sheet {
                        name: sheet_name,
                        rows: Vec::new(),
                    });
                    continue;
                }
            };

            let mut rows = Vec::new();
            for (offset, data_row) in rows_iter.enumerate() {
                let mut row = RawRow::new(header_row_number + offset + 1);
                for (col_idx, cell) in data_row.iter().enumerate() {
                    match headers.get(col_idx) {
                        Some(header) if !header.is_empty() => {
                            row.insert(header.clone(), convert_cell(cell));
                        }
                        _ => {}
                    }
                }

                // 跳过完全空白的行
                if row.is_blank() {
                    continue;
                }
                rows.push(row);
            }

            debug!(sheet = %sheet_name, rows = rows.len(), "表单解析完成");
            sheets.push(Sheet {
                name: sheet_name,
                rows,
            });
        }

        Ok(Workbook { sheets })
    }
}

/// calamine 单元格 → CellValue
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Error(_) => CellValue::Empty,
        other => CellValue::Text(other.to_string()),
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
// 用于只有商品行的批量导入（与商品 JSON 字典同等对待）
pub struct CsvParser;

impl CsvParser {
    pub fn parse_rows(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            let mut row = RawRow::new(row_idx + 2);

            for (col_idx, value) in record.iter().enumerate() {
                match headers.get(col_idx) {
                    Some(header) if !header.is_empty() => {
                        row.insert(header.clone(), CellValue::Text(value.to_string()));
                    }
                    _ => {}
                }
            }

            // 跳过完全空白的行
            if row.is_blank() {
                continue;
            }
            rows.push(row);
        }

        Ok(rows)
    }
}

// ==========================================
// 商品 JSON 字典
// ==========================================

/// 解析商品字典数组
///
/// 数组元素可以是 JSON 对象，也可以是内容为 JSON 对象的字符串
pub fn parse_product_dictionaries(json: &str) -> ImportResult<Vec<RawRow>> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    match value {
        serde_json::Value::Array(items) => product_rows_from_values(items),
        _ => Err(ImportError::JsonParseError(
            "商品输入必须是 JSON 数组".to_string(),
        )),
    }
}

/// 将已解析的 JSON 值转换为原始行（序号从 1 开始）
pub fn product_rows_from_values(items: Vec<serde_json::Value>) -> ImportResult<Vec<RawRow>> {
    let mut rows = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        let item = match item {
            serde_json::Value::String(text) => serde_json::from_str(&text)?,
            other => other,
        };

        let serde_json::Value::Object(map) = item else {
            return Err(ImportError::JsonParseError(format!(
                "第 {} 个商品不是 JSON 对象",
                idx + 1
            )));
        };

        let mut row = RawRow::new(idx + 1);
        for (key, value) in map.iter() {
            row.insert(key.clone(), CellValue::from_json(value));
        }
        rows.push(row);
    }
    Ok(rows)
}
