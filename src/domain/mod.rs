// ==========================================
// 商品目录表格导入 - 领域模型层
// ==========================================
// 职责: 定义目录快照元素、原始行、规范化记录、批量结果
// 红线: 不含数据访问逻辑,不含映射逻辑
// ==========================================

pub mod bulk;
pub mod catalog;
pub mod record;
pub mod types;

// 重导出核心类型
pub use bulk::{BulkErrorCode, BulkItemError, BulkItemResult, BulkResult};
pub use catalog::{
    AttributeDefinition, AttributeValue, Channel, ExistingChannelListing, ProductType, Warehouse,
};
pub use record::{
    AttributeValuePayload, CellValue, MediaInput, NormalizedAttributeEntry,
    NormalizedProductRecord, NormalizedVariantRecord, ProductChannelListing, RawRow, RowSkip,
    SkipReason, StockInput, ValueRef, VariantChannelListing,
};
pub use types::{AttributeScope, InputType, LookupStrategy, SheetKind};
