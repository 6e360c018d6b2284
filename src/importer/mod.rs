// ==========================================
// 商品目录表格导入 - 导入层
// ==========================================
// 职责: 表格/商品字典 → 规范化创建请求 → 外部批量创建
// 支持: Excel 工作簿, CSV, 商品 JSON 字典
// ==========================================

// 模块声明
pub mod attribute_lookup;
pub mod batch_driver;
pub mod bulk_submission;
pub mod catalog_importer_impl;
pub mod catalog_importer_trait;
pub mod data_cleaner;
pub mod error;
pub mod file_parser;
pub mod row_normalizer;
pub mod value_resolver;

// 重导出核心类型
pub use attribute_lookup::{build_mapping, AttributeCatalog, CatalogSnapshot, ColumnMapping};
pub use batch_driver::{BatchDriver, ImportSource, ImportedBatch};
pub use bulk_submission::BulkSubmissionAdapter;
pub use catalog_importer_impl::{load_catalog_snapshot, CatalogImporterImpl};
pub use data_cleaner::DataCleaner;
pub use error::{ImportError, ImportResult};
pub use file_parser::{
    parse_product_dictionaries, CsvParser, ExcelParser, Sheet, Workbook, WorkbookInput,
};
pub use row_normalizer::{NormalizedRecord, RowNormalizer, RowOutcome};
pub use value_resolver::{resolve_attribute_entries, Resolution};

// 重导出 Trait 接口
pub use catalog_importer_trait::{CatalogImporter, ImportReport, ImportRequest, ProductBulkCreator};
