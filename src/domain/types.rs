// ==========================================
// 商品目录表格导入 - 领域类型定义
// ==========================================
// 职责: 属性输入类型 / 属性作用域 / 默认查找策略 / 表单类型
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 属性输入类型 (Input Type)
// ==========================================
// 决定属性值载荷的形状；目录中出现未知标签时保留原文，
// 由载荷分派走显式的 dropdown 回退分支
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    Dropdown,
    Multiselect,
    Swatch,
    Boolean,
    Date,
    DateTime,
    Numeric,
    RichText,
    PlainText,
    Reference,
    File,
    Unknown(String),
}

impl InputType {
    /// 从目录存储的标签解析（大小写不敏感，未知标签不报错）
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "dropdown" => InputType::Dropdown,
            "multiselect" => InputType::Multiselect,
            "swatch" => InputType::Swatch,
            "boolean" => InputType::Boolean,
            "date" => InputType::Date,
            "date_time" => InputType::DateTime,
            "numeric" => InputType::Numeric,
            "rich_text" => InputType::RichText,
            "plain_text" => InputType::PlainText,
            "reference" => InputType::Reference,
            "file" => InputType::File,
            _ => InputType::Unknown(tag.trim().to_string()),
        }
    }

    pub fn as_tag(&self) -> &str {
        match self {
            InputType::Dropdown => "dropdown",
            InputType::Multiselect => "multiselect",
            InputType::Swatch => "swatch",
            InputType::Boolean => "boolean",
            InputType::Date => "date",
            InputType::DateTime => "date_time",
            InputType::Numeric => "numeric",
            InputType::RichText => "rich_text",
            InputType::PlainText => "plain_text",
            InputType::Reference => "reference",
            InputType::File => "file",
            InputType::Unknown(tag) => tag.as_str(),
        }
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_tag())
    }
}

// ==========================================
// 属性作用域 (Attribute Scope)
// ==========================================
// 红线: 商品级属性不得出现在变体记录上，反之亦然
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeScope {
    Product,
    Variant,
}

impl fmt::Display for AttributeScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeScope::Product => write!(f, "PRODUCT"),
            AttributeScope::Variant => write!(f, "VARIANT"),
        }
    }
}

impl FromStr for AttributeScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PRODUCT" => Ok(AttributeScope::Product),
            "VARIANT" => Ok(AttributeScope::Variant),
            other => Err(format!("未知属性作用域: {}", other)),
        }
    }
}

// ==========================================
// 渠道/仓库默认查找策略
// ==========================================
// UseFirst: 兼容历史行为，始终取目录中的第一个
// MatchByName: 按表格给出的名称匹配
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupStrategy {
    #[default]
    UseFirst,
    MatchByName,
}

impl fmt::Display for LookupStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupStrategy::UseFirst => write!(f, "use_first"),
            LookupStrategy::MatchByName => write!(f, "match_by_name"),
        }
    }
}

impl FromStr for LookupStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "use_first" | "usefirst" | "first" => Ok(LookupStrategy::UseFirst),
            "match_by_name" | "matchbyname" | "name" => Ok(LookupStrategy::MatchByName),
            other => Err(format!("未知查找策略: {}", other)),
        }
    }
}

// ==========================================
// 表单类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SheetKind {
    Products,
    Variants,
}

impl SheetKind {
    /// 工作簿中的表单名（大小写敏感）
    pub fn sheet_name(&self) -> &'static str {
        match self {
            SheetKind::Products => "Products",
            SheetKind::Variants => "Variants",
        }
    }
}

impl fmt::Display for SheetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sheet_name())
    }
}
