// ==========================================
// 商品目录表格导入 - 批次驱动
// ==========================================
// 职责: 输入源 → 表单/行 → 规范化记录
// 流程: 读取输入 → 表单校验（致命）→ 逐行规范化（保持顺序）→ 可选变体关联
// 红线: 缺少 Products / Variants 表单时在处理任何行之前失败
// ==========================================

use crate::config::ImportConfig;
use crate::domain::record::{NormalizedProductRecord, NormalizedVariantRecord, RawRow, RowSkip};
use crate::domain::types::SheetKind;
use crate::importer::attribute_lookup::CatalogSnapshot;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{CsvParser, ExcelParser, Workbook, WorkbookInput};
use crate::importer::row_normalizer::{NormalizedRecord, RowNormalizer};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, info, instrument, warn};

// ==========================================
// ImportSource - 输入源
// ==========================================
#[derive(Debug, Clone)]
pub enum ImportSource {
    /// 含 Products / Variants 两个表单的工作簿
    Workbook(WorkbookInput),
    /// 商品字典列表（不经过变体表单）
    Products(Vec<RawRow>),
    /// 商品行 CSV 文件（同商品字典）
    ProductsCsv(PathBuf),
}

impl ImportSource {
    pub fn kind(&self) -> &'static str {
        match self {
            ImportSource::Workbook(_) => "workbook",
            ImportSource::Products(_) => "products",
            ImportSource::ProductsCsv(_) => "products_csv",
        }
    }
}

// ==========================================
// ImportedBatch - 规范化结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportedBatch {
    pub products: Vec<NormalizedProductRecord>,
    pub variants: Vec<NormalizedVariantRecord>,
    pub skipped: Vec<RowSkip>,
}

// ==========================================
// BatchDriver - 批次驱动
// ==========================================
pub struct BatchDriver<'a> {
    catalog: &'a CatalogSnapshot,
    config: &'a ImportConfig,
}

impl<'a> BatchDriver<'a> {
    pub fn new(catalog: &'a CatalogSnapshot, config: &'a ImportConfig) -> Self {
        Self { catalog, config }
    }

    /// 执行一个批次的规范化
    #[instrument(skip(self, source), fields(source = source.kind()))]
    pub fn import_batch(&self, source: ImportSource) -> ImportResult<ImportedBatch> {
        match source {
            ImportSource::Workbook(input) => {
                let bytes = input.into_bytes()?;
                debug!(size = bytes.len(), "工作簿字节读取完成");
                let workbook = ExcelParser.parse_workbook(bytes)?;
                self.import_workbook(&workbook)
            }
            ImportSource::Products(rows) => Ok(self.import_product_rows(&rows)),
            ImportSource::ProductsCsv(path) => {
                let rows = CsvParser.parse_rows(&path)?;
                info!(path = %path.display(), rows = rows.len(), "CSV 商品行读取完成");
                Ok(self.import_product_rows(&rows))
            }
        }
    }

    /// 规范化已解析的工作簿
    pub fn import_workbook(&self, workbook: &Workbook) -> ImportResult<ImportedBatch> {
        // 两个表单都存在才开始处理
        let mut sheets = Vec::with_capacity(2);
        for kind in [SheetKind::Products, SheetKind::Variants] {
            let sheet = workbook.sheet(kind.sheet_name()).ok_or_else(|| {
                warn!(sheet = kind.sheet_name(), available = ?workbook.sheet_names(), "工作簿缺少表单");
                ImportError::MissingSheet(kind.sheet_name().to_string())
            })?;
            sheets.push((kind, sheet));
        }

        let normalizer = RowNormalizer::new(self.catalog, self.config);
        let mut batch = ImportedBatch::default();

        for (kind, sheet) in sheets {
            let is_variant = kind == SheetKind::Variants;
            for row in sheet.rows.iter().filter(|r| !r.is_blank()) {
                let outcome = normalizer.normalize_row(row, is_variant);
                batch.skipped.extend(outcome.skipped.into_iter().map(|reason| RowSkip {
                    sheet: kind,
                    row_number: row.row_number,
                    reason,
                }));
                match outcome.record {
                    NormalizedRecord::Product(product) => batch.products.push(product),
                    NormalizedRecord::Variant(variant) => batch.variants.push(variant),
                }
            }
        }

        if self.config.link_variants {
            let variants = std::mem::take(&mut batch.variants);
            batch.variants = link_variants(&mut batch.products, variants);
        }

        info!(
            products = batch.products.len(),
            variants = batch.variants.len(),
            skipped = batch.skipped.len(),
            "工作簿规范化完成"
        );
        Ok(batch)
    }

    /// 商品行直接规范化（无变体表单）
    fn import_product_rows(&self, rows: &[RawRow]) -> ImportedBatch {
        let normalizer = RowNormalizer::new(self.catalog, self.config);
        let mut batch = ImportedBatch::default();

        for row in rows.iter().filter(|r| !r.is_blank()) {
            let outcome = normalizer.normalize_row(row, false);
            batch.skipped.extend(outcome.skipped.into_iter().map(|reason| RowSkip {
                sheet: SheetKind::Products,
                row_number: row.row_number,
                reason,
            }));
            if let NormalizedRecord::Product(product) = outcome.record {
                batch.products.push(product);
            }
        }

        info!(
            products = batch.products.len(),
            skipped = batch.skipped.len(),
            "商品行规范化完成"
        );
        batch
    }
}

/// 按 product_reference 将变体挂到商品下
///
/// 同一引用对应多个商品时挂到第一个；未匹配的变体原样返回
fn link_variants(
    products: &mut [NormalizedProductRecord],
    variants: Vec<NormalizedVariantRecord>,
) -> Vec<NormalizedVariantRecord> {
    let mut by_reference: HashMap<String, usize> = HashMap::new();
    for (idx, product) in products.iter().enumerate() {
        if let Some(reference) = &product.product_reference {
            by_reference.entry(reference.clone()).or_insert(idx);
        }
    }

    let mut unmatched = Vec::new();
    for variant in variants {
        let target = variant
            .product_reference
            .as_ref()
            .and_then(|r| by_reference.get(r).copied());
        match target {
            Some(idx) => products[idx].variants.push(variant),
            None => unmatched.push(variant),
        }
    }

    if !unmatched.is_empty() {
        debug!(count = unmatched.len(), "部分变体未匹配到商品，保留在独立序列中");
    }
    unmatched
}
