// ==========================================
// 商品目录表格导入 - 核心库
// ==========================================
// 系统定位: 表格 / 商品字典 → 目录创建请求的映射引擎
// 技术栈: Rust + SQLite（目录只读快照）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 目录只读访问
pub mod repository;

// 导入层 - 表格映射引擎
pub mod importer;

// 配置层 - 导入配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AttributeScope, InputType, LookupStrategy, SheetKind};

// 领域实体
pub use domain::{
    AttributeDefinition, AttributeValue, BulkResult, CellValue, NormalizedAttributeEntry,
    NormalizedProductRecord, NormalizedVariantRecord, RawRow, RowSkip, SkipReason,
};

// 导入
pub use importer::{
    BatchDriver, CatalogImporter, CatalogImporterImpl, ImportError, ImportReport, ImportRequest,
    ImportResult, ImportSource, ImportedBatch, ProductBulkCreator, WorkbookInput,
};

// 配置
pub use config::{ConfigManager, ImportConfig, ImportConfigReader};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "商品目录表格导入";
