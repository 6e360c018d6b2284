// ==========================================
// 商品目录表格导入 - 行与规范化记录
// ==========================================
// RawRow: 表格原始行（列头 → 单元格），仅在导入流程内存活
// Normalized*Record: 已解析为目录标识的创建请求，单次消费
// ==========================================

use crate::domain::types::{AttributeScope, InputType, SheetKind};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// CellValue - 单元格值
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    List(Vec<CellValue>),
}

impl CellValue {
    /// 空值判定：Empty / 纯空白文本 / 全空列表
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::List(items) => items.iter().all(|v| v.is_empty()),
            _ => false,
        }
    }

    /// 按表格显示的样子渲染为文本（空值返回 None）
    ///
    /// 整数值的浮点数按整数渲染（Excel 数字单元格统一读为浮点）
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            CellValue::Int(i) => Some(i.to_string()),
            CellValue::Float(f) => Some(render_float(*f)),
            CellValue::Bool(b) => Some(if *b { "true" } else { "false" }.to_string()),
            CellValue::List(items) => {
                let parts: Vec<String> = items.iter().filter_map(|v| v.as_text()).collect();
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.join(", "))
                }
            }
        }
    }

    /// 从 JSON 值转换（商品字典输入）
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => CellValue::Empty,
            serde_json::Value::Bool(b) => CellValue::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => CellValue::Int(i),
                None => n.as_f64().map(CellValue::Float).unwrap_or(CellValue::Empty),
            },
            serde_json::Value::String(s) => CellValue::Text(s.clone()),
            serde_json::Value::Array(items) => {
                CellValue::List(items.iter().map(CellValue::from_json).collect())
            }
            other => CellValue::Text(other.to_string()),
        }
    }
}

fn render_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_text().unwrap_or_default())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

// ==========================================
// RawRow - 原始行
// ==========================================
// 保持列顺序；固定列按列头精确（大小写敏感）读取
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    pub row_number: usize, // 原始表格行号（表头为第 1 行）
    cells: Vec<(String, CellValue)>,
}

impl RawRow {
    pub fn new(row_number: usize) -> Self {
        Self {
            row_number,
            cells: Vec::new(),
        }
    }

    /// 以 (列头, 值) 列表构造
    pub fn from_pairs<K, V, I>(row_number: usize, pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<CellValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut row = Self::new(row_number);
        for (k, v) in pairs {
            row.insert(k, v);
        }
        row
    }

    /// 插入单元格；同名列头覆盖旧值但保留原位置
    pub fn insert(&mut self, header: impl Into<String>, value: impl Into<CellValue>) {
        let header = header.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(h, _)| *h == header) {
            Some(slot) => slot.1 = value,
            None => self.cells.push((header, value)),
        }
    }

    pub fn get(&self, header: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(h, _)| h == header).map(|(_, v)| v)
    }

    pub fn contains_key(&self, header: &str) -> bool {
        self.cells.iter().any(|(h, _)| h == header)
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(h, _)| h.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(h, v)| (h.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// 全部单元格为空
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, v)| v.is_empty())
    }
}

// ==========================================
// 属性值载荷 (Typed Value Payload)
// ==========================================
// 封闭集合：每种输入类型对应一个载荷键
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRef {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeValuePayload {
    Dropdown(ValueRef),
    Multiselect(ValueRef),
    Swatch(ValueRef),
    Boolean(ValueRef),
    Date(ValueRef),
    DateTime(ValueRef),
    Numeric(ValueRef),
    RichText(ValueRef),
    PlainText(ValueRef),
    Reference(ValueRef),
    File(ValueRef),
}

impl AttributeValuePayload {
    /// 按属性输入类型分派载荷键
    pub fn for_input_type(input_type: &InputType, value_id: impl Into<String>) -> Self {
        let value = ValueRef { id: value_id.into() };
        match input_type {
            InputType::Dropdown => AttributeValuePayload::Dropdown(value),
            InputType::Multiselect => AttributeValuePayload::Multiselect(value),
            InputType::Swatch => AttributeValuePayload::Swatch(value),
            InputType::Boolean => AttributeValuePayload::Boolean(value),
            InputType::Date => AttributeValuePayload::Date(value),
            InputType::DateTime => AttributeValuePayload::DateTime(value),
            InputType::Numeric => AttributeValuePayload::Numeric(value),
            InputType::RichText => AttributeValuePayload::RichText(value),
            InputType::PlainText => AttributeValuePayload::PlainText(value),
            InputType::Reference => AttributeValuePayload::Reference(value),
            InputType::File => AttributeValuePayload::File(value),
            // 未知输入类型：显式回退到 dropdown
            InputType::Unknown(_) => AttributeValuePayload::Dropdown(value),
        }
    }

    pub fn value_id(&self) -> &str {
        match self {
            AttributeValuePayload::Dropdown(v)
            | AttributeValuePayload::Multiselect(v)
            | AttributeValuePayload::Swatch(v)
            | AttributeValuePayload::Boolean(v)
            | AttributeValuePayload::Date(v)
            | AttributeValuePayload::DateTime(v)
            | AttributeValuePayload::Numeric(v)
            | AttributeValuePayload::RichText(v)
            | AttributeValuePayload::PlainText(v)
            | AttributeValuePayload::Reference(v)
            | AttributeValuePayload::File(v) => &v.id,
        }
    }
}

// ==========================================
// NormalizedAttributeEntry - 规范化属性条目
// ==========================================
// 序列化形状: {"id": "<属性>", "dropdown": {"id": "<值>"}}
// 红线: 属性与值均在目录中命中才会产生
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedAttributeEntry {
    pub id: String,
    #[serde(flatten)]
    pub payload: AttributeValuePayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaInput {
    pub media_url: String,
    pub alt: String,
}

// ==========================================
// 渠道上架条目
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductChannelListing {
    pub channel_id: String,
    pub is_published: bool,
    pub visible_in_listings: bool,
    pub is_available_for_purchase: bool,
    // 提交时才盖章，规范化阶段始终为空（保证幂等）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_for_purchase_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantChannelListing {
    pub channel_id: String,
    pub price: Decimal,      // 精确小数，不经浮点
    pub cost_price: Decimal, // 缺省为 0
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockInput {
    pub warehouse: String,
    pub quantity: i32,
}

// ==========================================
// NormalizedVariantRecord - 规范化变体记录
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedVariantRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub channel_listings: Vec<VariantChannelListing>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stocks: Vec<StockInput>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<NormalizedAttributeEntry>,

    // 元信息
    #[serde(skip)]
    pub row_number: usize,
}

// ==========================================
// NormalizedProductRecord - 规范化商品记录
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedProductRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<MediaInput>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub channel_listings: Vec<ProductChannelListing>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<NormalizedAttributeEntry>,
    // 仅在启用变体关联时填充
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<NormalizedVariantRecord>,

    // 元信息
    #[serde(skip)]
    pub row_number: usize,
}

// ==========================================
// SkipReason - 行级可恢复问题
// ==========================================
// 跳过的只是可选字段或单个属性值，整行永不丢弃
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkipReason {
    UnknownAttributeValue {
        column: String,
        value: String,
    },
    ScopeMismatch {
        column: String,
        attribute_id: String,
        expected: AttributeScope,
    },
    UnknownProductType {
        name: String,
    },
    NoChannel {
        requested: Option<String>,
    },
    NoWarehouse {
        requested: Option<String>,
    },
    InvalidPrice {
        column: String,
        value: String,
    },
    InvalidQuantity {
        value: String,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnknownAttributeValue { column, value } => {
                write!(f, "属性值未找到 (列 {}): {}", column, value)
            }
            SkipReason::ScopeMismatch {
                column,
                attribute_id,
                expected,
            } => write!(
                f,
                "属性作用域不符 (列 {}, 属性 {}): 期望 {}",
                column, attribute_id, expected
            ),
            SkipReason::UnknownProductType { name } => write!(f, "商品类型未找到: {}", name),
            SkipReason::NoChannel { requested } => match requested {
                Some(name) => write!(f, "渠道未找到: {}", name),
                None => write!(f, "目录中没有任何渠道"),
            },
            SkipReason::NoWarehouse { requested } => match requested {
                Some(name) => write!(f, "仓库未找到: {}", name),
                None => write!(f, "目录中没有任何仓库"),
            },
            SkipReason::InvalidPrice { column, value } => {
                write!(f, "价格无法解析为小数 (列 {}): {}", column, value)
            }
            SkipReason::InvalidQuantity { value } => write!(f, "库存数量无法解析为整数: {}", value),
        }
    }
}

/// 带行定位的跳过记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSkip {
    pub sheet: SheetKind,
    pub row_number: usize,
    pub reason: SkipReason,
}
