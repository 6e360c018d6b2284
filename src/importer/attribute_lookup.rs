// ==========================================
// 商品目录表格导入 - 属性目录查找
// ==========================================
// 职责:
// - 列头是否命中已知属性（大小写不敏感）
// - 行是商品行还是变体行（字面 "Variant ID" / "variant_id" 列）
// - 单元格值是否命中该属性的已知属性值（精确匹配）
// 红线: 快照每批只读一次，整批只读共享
// ==========================================

use crate::domain::catalog::{
    AttributeDefinition, AttributeValue, Channel, ProductType, Warehouse,
};
use crate::domain::record::RawRow;
use crate::domain::types::LookupStrategy;
use std::collections::HashMap;

/// 标记变体行的列名（字面、大小写敏感）
pub const VARIANT_MARKER_COLUMNS: [&str; 2] = ["Variant ID", "variant_id"];

// ==========================================
// AttributeCatalog - 属性/属性值快照
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct AttributeCatalog {
    attributes: Vec<AttributeDefinition>,
    // attribute_id → 该属性的属性值（存储顺序）
    values: HashMap<String, Vec<AttributeValue>>,
}

impl AttributeCatalog {
    pub fn new(attributes: Vec<AttributeDefinition>, values: Vec<AttributeValue>) -> Self {
        let mut by_attribute: HashMap<String, Vec<AttributeValue>> = HashMap::new();
        for value in values {
            by_attribute
                .entry(value.attribute_id.clone())
                .or_default()
                .push(value);
        }
        Self {
            attributes,
            values: by_attribute,
        }
    }

    pub fn attributes(&self) -> &[AttributeDefinition] {
        &self.attributes
    }

    pub fn attribute(&self, attribute_id: &str) -> Option<&AttributeDefinition> {
        self.attributes.iter().find(|a| a.id == attribute_id)
    }

    /// 按列头查找属性（大小写不敏感；同名时目录顺序第一个胜出）
    pub fn find_by_header(&self, header: &str) -> Option<&AttributeDefinition> {
        let header_lower = header.to_lowercase();
        self.attributes
            .iter()
            .find(|a| a.name.to_lowercase() == header_lower)
    }

    /// 按显示名精确查找属性值
    pub fn find_value(&self, attribute_id: &str, name: &str) -> Option<&AttributeValue> {
        self.values
            .get(attribute_id)
            .and_then(|values| values.iter().find(|v| v.name == name))
    }
}

// ==========================================
// CatalogSnapshot - 单批导入的目录只读快照
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    pub attributes: AttributeCatalog,
    pub product_types: Vec<ProductType>,
    pub channels: Vec<Channel>,
    pub warehouses: Vec<Warehouse>,
}

impl CatalogSnapshot {
    /// 按名称精确查找商品类型
    pub fn find_product_type(&self, name: &str) -> Option<&ProductType> {
        self.product_types.iter().find(|t| t.name == name)
    }

    /// 按策略解析渠道
    ///
    /// - UseFirst: 忽略给出的名称，取第一个渠道
    /// - MatchByName: 按名称或 slug 匹配（大小写不敏感）；未给名称时回退第一个
    pub fn resolve_channel(
        &self,
        strategy: LookupStrategy,
        requested: Option<&str>,
    ) -> Option<&Channel> {
        match (strategy, requested) {
            (LookupStrategy::MatchByName, Some(name)) => {
                let wanted = name.trim().to_lowercase();
                self.channels.iter().find(|c| {
                    c.name.to_lowercase() == wanted || c.slug.to_lowercase() == wanted
                })
            }
            _ => self.channels.first(),
        }
    }

    /// 按策略解析仓库（规则同渠道，按名称匹配）
    pub fn resolve_warehouse(
        &self,
        strategy: LookupStrategy,
        requested: Option<&str>,
    ) -> Option<&Warehouse> {
        match (strategy, requested) {
            (LookupStrategy::MatchByName, Some(name)) => {
                let wanted = name.trim().to_lowercase();
                self.warehouses
                    .iter()
                    .find(|w| w.name.to_lowercase() == wanted)
            }
            _ => self.warehouses.first(),
        }
    }
}

// ==========================================
// ColumnMapping - 列头 → 属性标识
// ==========================================
// 顺序: 目录属性顺序（决定输出属性条目顺序）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    pub is_variant_row: bool,
    pub product_columns: Vec<(String, String)>,
    pub variant_columns: Vec<(String, String)>,
}

impl ColumnMapping {
    /// 列头是否为属性列（无论归入哪一侧）
    pub fn is_attribute_column(&self, header: &str) -> bool {
        self.product_columns
            .iter()
            .chain(self.variant_columns.iter())
            .any(|(h, _)| h == header)
    }
}

/// 判定是否为变体行
pub fn is_variant_row(row: &RawRow) -> bool {
    VARIANT_MARKER_COLUMNS
        .iter()
        .any(|marker| row.contains_key(marker))
}

/// 构建属性列映射
///
/// 每列经 find_by_header 找到属性；一个属性只取第一列，一列只归属一个属性。
/// 输出按目录属性顺序。变体行的命中列全部归入 variant_columns，否则归入 product_columns。
pub fn build_mapping(row: &RawRow, catalog: &AttributeCatalog) -> ColumnMapping {
    let is_variant = is_variant_row(row);
    let mut matched: Vec<(usize, String, String)> = Vec::new();

    for header in row.headers() {
        let Some(attribute) = catalog.find_by_header(header) else {
            continue;
        };
        if matched.iter().any(|(_, _, id)| *id == attribute.id) {
            continue;
        }
        let position = catalog
            .attributes()
            .iter()
            .position(|a| a.id == attribute.id)
            .unwrap_or(usize::MAX);
        matched.push((position, header.to_string(), attribute.id.clone()));
    }

    matched.sort_by_key(|(position, _, _)| *position);
    let matched: Vec<(String, String)> = matched
        .into_iter()
        .map(|(_, header, id)| (header, id))
        .collect();

    if is_variant {
        ColumnMapping {
            is_variant_row: true,
            product_columns: Vec::new(),
            variant_columns: matched,
        }
    } else {
        ColumnMapping {
            is_variant_row: false,
            product_columns: matched,
            variant_columns: Vec::new(),
        }
    }
}
