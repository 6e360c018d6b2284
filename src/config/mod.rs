// ==========================================
// 商品目录表格导入 - 配置层
// ==========================================
// 职责: 导入配置管理（渠道/仓库查找策略、变体关联、对账开关）
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod import_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use import_config_trait::{ImportConfig, ImportConfigReader};
