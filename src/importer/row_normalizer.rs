// ==========================================
// 商品目录表格导入 - 行规范化器
// ==========================================
// 职责: 原始行 → 商品/变体创建请求
// 固定列按列头精确读取；命中属性的列只交给属性值解析器，不参与固定列读取
// 红线: 空单元格不产生任何输出；作用域不符的属性条目丢弃
// ==========================================

use crate::config::ImportConfig;
use crate::domain::record::{
    CellValue, MediaInput, NormalizedAttributeEntry, NormalizedProductRecord, NormalizedVariantRecord,
    ProductChannelListing, RawRow, SkipReason, StockInput, VariantChannelListing,
};
use crate::domain::types::{AttributeScope, LookupStrategy};
use crate::importer::attribute_lookup::{build_mapping, CatalogSnapshot, ColumnMapping};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::value_resolver::{resolve_attribute_entries, Resolution};
use rust_decimal::Decimal;
use tracing::{debug, warn};

// ==========================================
// 固定列名（大小写敏感）
// ==========================================
pub mod columns {
    pub const PRODUCT_ID: &str = "Product ID";
    pub const PRODUCT_NAME: &str = "Product Name";
    pub const PRODUCT_TYPE: &str = "Product Type";
    pub const CHANNEL_LIST: &str = "Channel List";
    pub const THUMBNAIL: &str = "Thumbnail";
    pub const THUMBNAIL_HOVERED: &str = "Thumbnail Hovered";

    pub const VARIANT_NAME: &str = "Variant Name";
    pub const SKU: &str = "SKU";
    pub const PRICE: &str = "Price";
    pub const COST_PRICE: &str = "Cost Price";
    pub const INVENTORY: &str = "Inventory";
    pub const WAREHOUSE: &str = "Warehouse";
}

/// 单行规范化产物
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedRecord {
    Product(NormalizedProductRecord),
    Variant(NormalizedVariantRecord),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowOutcome {
    pub record: NormalizedRecord,
    pub skipped: Vec<SkipReason>,
}

// ==========================================
// RowNormalizer - 行规范化器
// ==========================================
pub struct RowNormalizer<'a> {
    catalog: &'a CatalogSnapshot,
    config: &'a ImportConfig,
    cleaner: DataCleaner,
}

impl<'a> RowNormalizer<'a> {
    pub fn new(catalog: &'a CatalogSnapshot, config: &'a ImportConfig) -> Self {
        Self {
            catalog,
            config,
            cleaner: DataCleaner,
        }
    }

    /// 规范化单行
    ///
    /// # 参数
    /// - row: 原始行
    /// - is_variant: 调用方（表单）决定记录类型
    pub fn normalize_row(&self, row: &RawRow, is_variant: bool) -> RowOutcome {
        let mut skipped = Vec::new();
        let record = if is_variant {
            NormalizedRecord::Variant(self.normalize_variant(row, &mut skipped))
        } else {
            NormalizedRecord::Product(self.normalize_product(row, &mut skipped))
        };
        RowOutcome { record, skipped }
    }

    // ==========================================
    // 商品行
    // ==========================================
    fn normalize_product(
        &self,
        row: &RawRow,
        skipped: &mut Vec<SkipReason>,
    ) -> NormalizedProductRecord {
        let mapping = build_mapping(row, &self.catalog.attributes);
        if mapping.is_variant_row && !mapping.variant_columns.is_empty() {
            debug!(row = row.row_number, "商品表中出现变体标记列，属性列不计入商品");
        }

        let mut record = NormalizedProductRecord {
            row_number: row.row_number,
            ..Default::default()
        };

        let name = self.text(row, &mapping, columns::PRODUCT_NAME);
        record.product_reference = self.text(row, &mapping, columns::PRODUCT_ID);
        record.slug = name
            .as_deref()
            .map(|n| self.cleaner.slugify(n))
            .filter(|s| !s.is_empty());

        if let Some(type_name) = self.text(row, &mapping, columns::PRODUCT_TYPE) {
            match self.catalog.find_product_type(&type_name) {
                Some(product_type) => record.product_type = Some(product_type.id.clone()),
                None => {
                    warn!(row = row.row_number, product_type = %type_name, "商品类型未找到，忽略该字段");
                    skipped.push(SkipReason::UnknownProductType { name: type_name });
                }
            }
        }

        if let Some(channel_cell) = self.text(row, &mapping, columns::CHANNEL_LIST) {
            let requested = self.cleaner.first_list_item(&channel_cell);
            let requested = Some(requested.as_str()).filter(|s| !s.is_empty());
            match self.channel_id(row, requested, skipped) {
                Some(channel_id) => {
                    record.channel_listings.push(ProductChannelListing {
                        channel_id,
                        is_published: true,
                        visible_in_listings: true,
                        is_available_for_purchase: true,
                        available_for_purchase_at: None,
                    });
                }
                None => debug!(row = row.row_number, "未解析到渠道，不生成商品上架条目"),
            }
        }

        let product_name = name.clone().unwrap_or_default();
        if let Some(url) = self.text(row, &mapping, columns::THUMBNAIL) {
            record.media.push(MediaInput {
                media_url: url,
                alt: product_name.clone(),
            });
        }
        if let Some(url) = self.text(row, &mapping, columns::THUMBNAIL_HOVERED) {
            record.media.push(MediaInput {
                media_url: url,
                alt: format!("{} - Hover", product_name),
            });
        }

        record.name = name;
        record.attributes = self.collect_attributes(
            row,
            &mapping.product_columns,
            AttributeScope::Product,
            skipped,
        );

        record
    }

    // ==========================================
    // 变体行
    // ==========================================
    fn normalize_variant(
        &self,
        row: &RawRow,
        skipped: &mut Vec<SkipReason>,
    ) -> NormalizedVariantRecord {
        let mapping = build_mapping(row, &self.catalog.attributes);
        if !mapping.is_variant_row && !mapping.product_columns.is_empty() {
            debug!(row = row.row_number, "变体行缺少 Variant ID 列，属性列不计入变体");
        }

        let mut record = NormalizedVariantRecord {
            row_number: row.row_number,
            name: self.text(row, &mapping, columns::VARIANT_NAME),
            sku: self.text(row, &mapping, columns::SKU),
            product_reference: self.text(row, &mapping, columns::PRODUCT_ID),
            ..Default::default()
        };

        if let Some(listing) = self.variant_listing(row, &mapping, skipped) {
            record.channel_listings.push(listing);
        }

        if let Some(stock) = self.variant_stock(row, &mapping, skipped) {
            record.stocks.push(stock);
        }
        record.attributes = self.collect_attributes(
            row,
            &mapping.variant_columns,
            AttributeScope::Variant,
            skipped,
        );

        record
    }

    /// 价格 / 成本价 → 变体渠道价格条目
    ///
    /// 两列任一非空即生成；缺失的一列按 0；任一列无法解析则整条不生成
    fn variant_listing(
        &self,
        row: &RawRow,
        mapping: &ColumnMapping,
        skipped: &mut Vec<SkipReason>,
    ) -> Option<VariantChannelListing> {
        let price_cell = self.cell(row, mapping, columns::PRICE);
        let cost_cell = self.cell(row, mapping, columns::COST_PRICE);
        if price_cell.is_none() && cost_cell.is_none() {
            return None;
        }

        let requested = self
            .text(row, mapping, columns::CHANNEL_LIST)
            .map(|c| self.cleaner.first_list_item(&c))
            .filter(|s| !s.is_empty());
        let channel_id = self.channel_id(row, requested.as_deref(), skipped)?;

        let mut amounts = [Decimal::ZERO; 2];
        for (slot, (column, cell)) in amounts
            .iter_mut()
            .zip([(columns::PRICE, price_cell), (columns::COST_PRICE, cost_cell)])
        {
            let Some(cell) = cell else {
                continue;
            };
            match self.cleaner.parse_decimal(cell) {
                Ok(amount) => *slot = amount,
                Err(raw) => {
                    warn!(row = row.row_number, column = column, value = %raw, "价格无法解析，不生成价格条目");
                    skipped.push(SkipReason::InvalidPrice {
                        column: column.to_string(),
                        value: raw,
                    });
                    return None;
                }
            }
        }

        Some(VariantChannelListing {
            channel_id,
            price: amounts[0],
            cost_price: amounts[1],
        })
    }

    /// 库存 → 仓库库存条目
    fn variant_stock(
        &self,
        row: &RawRow,
        mapping: &ColumnMapping,
        skipped: &mut Vec<SkipReason>,
    ) -> Option<StockInput> {
        let cell = self.cell(row, mapping, columns::INVENTORY)?;

        let requested = self.text(row, mapping, columns::WAREHOUSE);
        let warehouse = match self
            .catalog
            .resolve_warehouse(self.config.warehouse_strategy, requested.as_deref())
        {
            Some(warehouse) => warehouse.id.clone(),
            None => {
                let requested = self.requested_for(self.config.warehouse_strategy, requested);
                warn!(row = row.row_number, requested = ?requested, "仓库未找到，不生成库存条目");
                skipped.push(SkipReason::NoWarehouse { requested });
                return None;
            }
        };

        match self.cleaner.parse_quantity(cell) {
            Ok(quantity) => {
                if quantity < 0 {
                    warn!(row = row.row_number, quantity = quantity, "库存数量为负数，按原值保留");
                }
                Some(StockInput {
                    warehouse,
                    quantity,
                })
            }
            Err(raw) => {
                warn!(row = row.row_number, value = %raw, "库存数量无法解析，不生成库存条目");
                skipped.push(SkipReason::InvalidQuantity { value: raw });
                None
            }
        }
    }

    /// 按策略解析渠道标识；未命中记录跳过原因
    fn channel_id(
        &self,
        row: &RawRow,
        requested: Option<&str>,
        skipped: &mut Vec<SkipReason>,
    ) -> Option<String> {
        match self
            .catalog
            .resolve_channel(self.config.channel_strategy, requested)
        {
            Some(channel) => Some(channel.id.clone()),
            None => {
                let requested =
                    self.requested_for(self.config.channel_strategy, requested.map(str::to_string));
                warn!(row = row.row_number, requested = ?requested, "渠道未找到");
                skipped.push(SkipReason::NoChannel { requested });
                None
            }
        }
    }

    // UseFirst 下名称不参与查找，跳过原因里不记录
    fn requested_for(&self, strategy: LookupStrategy, requested: Option<String>) -> Option<String> {
        match strategy {
            LookupStrategy::UseFirst => None,
            LookupStrategy::MatchByName => requested,
        }
    }

    /// 解析属性列并按作用域过滤
    fn collect_attributes(
        &self,
        row: &RawRow,
        attribute_columns: &[(String, String)],
        expected: AttributeScope,
        skipped: &mut Vec<SkipReason>,
    ) -> Vec<NormalizedAttributeEntry> {
        let catalog = &self.catalog.attributes;
        let mut entries = Vec::new();

        for resolution in resolve_attribute_entries(row, attribute_columns, catalog) {
            match resolution {
                Resolution::Resolved(entry) => {
                    let in_scope = catalog
                        .attribute(&entry.id)
                        .map(|a| a.scope == expected)
                        .unwrap_or(false);
                    if in_scope {
                        entries.push(entry);
                    } else {
                        let column = attribute_columns
                            .iter()
                            .find(|(_, id)| *id == entry.id)
                            .map(|(h, _)| h.clone())
                            .unwrap_or_default();
                        warn!(
                            row = row.row_number,
                            column = %column,
                            attribute_id = %entry.id,
                            expected = %expected,
                            "属性作用域不符，丢弃该条目"
                        );
                        let reason = SkipReason::ScopeMismatch {
                            column,
                            attribute_id: entry.id,
                            expected,
                        };
                        // 多值列同一属性只记录一次
                        if !skipped.contains(&reason) {
                            skipped.push(reason);
                        }
                    }
                }
                Resolution::Skipped(reason) => skipped.push(reason),
            }
        }

        entries
    }

    // ===== 固定列读取（属性列视为不存在） =====

    fn cell<'r>(
        &self,
        row: &'r RawRow,
        mapping: &ColumnMapping,
        column: &str,
    ) -> Option<&'r CellValue> {
        if mapping.is_attribute_column(column) {
            return None;
        }
        row.get(column).filter(|v| !v.is_empty())
    }

    fn text(&self, row: &RawRow, mapping: &ColumnMapping, column: &str) -> Option<String> {
        self.cleaner.normalize_null(self.cell(row, mapping, column))
    }
}
