// ==========================================
// 商品目录表格导入 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::domain::types::LookupStrategy;
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ==========================================
// ImportConfig - 单次导入使用的配置快照
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// 渠道查找策略（默认 UseFirst，兼容历史行为）
    pub channel_strategy: LookupStrategy,
    /// 仓库查找策略（默认 UseFirst）
    pub warehouse_strategy: LookupStrategy,
    /// 是否按 Product ID 将变体挂到商品下（默认关闭：两条独立序列）
    pub link_variants: bool,
    /// 提交前是否读取已有渠道上架记录（默认关闭：对账为空操作）
    pub reconcile_existing_listings: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            channel_strategy: LookupStrategy::UseFirst,
            warehouse_strategy: LookupStrategy::UseFirst,
            link_variants: false,
            reconcile_existing_listings: false,
        }
    }
}

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）、ImportConfig（固定配置）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 获取渠道查找策略
    ///
    /// # 默认值
    /// - use_first
    async fn get_channel_strategy(&self) -> ImportResult<LookupStrategy>;

    /// 获取仓库查找策略
    ///
    /// # 默认值
    /// - use_first
    async fn get_warehouse_strategy(&self) -> ImportResult<LookupStrategy>;

    /// 是否启用变体 → 商品关联
    ///
    /// # 默认值
    /// - false
    async fn get_link_variants(&self) -> ImportResult<bool>;

    /// 是否启用已有渠道上架记录对账
    ///
    /// # 默认值
    /// - false
    async fn get_reconcile_existing_listings(&self) -> ImportResult<bool>;

    /// 一次性读取完整配置（每批一次）
    async fn load_import_config(&self) -> ImportResult<ImportConfig> {
        Ok(ImportConfig {
            channel_strategy: self.get_channel_strategy().await?,
            warehouse_strategy: self.get_warehouse_strategy().await?,
            link_variants: self.get_link_variants().await?,
            reconcile_existing_listings: self.get_reconcile_existing_listings().await?,
        })
    }
}

#[async_trait]
impl ImportConfigReader for ImportConfig {
    async fn get_channel_strategy(&self) -> ImportResult<LookupStrategy> {
        Ok(self.channel_strategy)
    }

    async fn get_warehouse_strategy(&self) -> ImportResult<LookupStrategy> {
        Ok(self.warehouse_strategy)
    }

    async fn get_link_variants(&self) -> ImportResult<bool> {
        Ok(self.link_variants)
    }

    async fn get_reconcile_existing_listings(&self) -> ImportResult<bool> {
        Ok(self.reconcile_existing_listings)
    }
}
