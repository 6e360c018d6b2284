// ==========================================
// 商品目录表格导入 - 单元格清洗器
// ==========================================
// 职责: TRIM / NULL 标准化 / 多值拆分 / 小数与整数解析 / slug 生成
// ==========================================

use crate::domain::record::CellValue;
use rust_decimal::Decimal;
use std::str::FromStr;

pub struct DataCleaner;

impl DataCleaner {
    /// 标准化 NULL 值（空值/空白 → None，否则去首尾空白）
    pub fn normalize_null(&self, value: Option<&CellValue>) -> Option<String> {
        value.and_then(|v| v.as_text())
    }

    /// 拆分多值单元格
    ///
    /// - 含逗号的文本: 按逗号拆分，逐项 TRIM，丢弃空项
    /// - 列表（JSON 输入）: 逐项渲染，丢弃空项
    /// - 其他标量: 单值列表
    pub fn split_multi_value(&self, value: &CellValue) -> Vec<String> {
        match value {
            CellValue::Text(s) if s.contains(',') => s
                .split(',')
                .map(|part| part.trim())
                .filter(|part| !part.is_empty())
                .map(|part| part.to_string())
                .collect(),
            CellValue::List(items) => items.iter().filter_map(|v| v.as_text()).collect(),
            other => other.as_text().into_iter().collect(),
        }
    }

    /// 取逗号分隔列表的第一项
    pub fn first_list_item(&self, value: &str) -> String {
        value.split(',').next().unwrap_or("").trim().to_string()
    }

    /// 解析精确小数（不经浮点舍入）
    ///
    /// 浮点单元格按最短十进制表示转换（19.99 → "19.99"）
    pub fn parse_decimal(&self, value: &CellValue) -> Result<Decimal, String> {
        let text = match value {
            CellValue::Float(f) => f.to_string(),
            other => other.as_text().unwrap_or_default(),
        };
        match Decimal::from_str(&text).or_else(|_| Decimal::from_scientific(&text)) {
            Ok(decimal) => Ok(decimal),
            Err(_) => Err(text),
        }
    }

    /// 解析整数数量
    ///
    /// 接受整数与小数部分为 0 的浮点（Excel 数字单元格）；负数原样保留
    pub fn parse_quantity(&self, value: &CellValue) -> Result<i32, String> {
        match value {
            CellValue::Int(i) => i32::try_from(*i).map_err(|_| i.to_string()),
            CellValue::Float(f) if f.fract() == 0.0 && f.is_finite() => {
                let as_int = *f as i64;
                i32::try_from(as_int).map_err(|_| f.to_string())
            }
            other => {
                let text = other.as_text().unwrap_or_default();
                match text.parse::<i32>() {
                    Ok(quantity) => Ok(quantity),
                    Err(_) => Err(text),
                }
            }
        }
    }

    /// 由名称生成 slug（小写，非字母数字折叠为单个 '-'）
    pub fn slugify(&self, value: &str) -> String {
        let mut slug = String::with_capacity(value.len());
        let mut pending_dash = false;
        for ch in value.trim().chars() {
            if ch.is_alphanumeric() {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.extend(ch.to_lowercase());
            } else {
                pending_dash = true;
            }
        }
        slug
    }
}
