// ==========================================
// 商品目录表格导入 - 目录 Repository Trait
// ==========================================
// 职责: 定义目录只读数据访问接口（不包含映射逻辑）
// 红线: 导入核心对目录只读，从不写入
// ==========================================

use crate::domain::catalog::{
    AttributeDefinition, AttributeValue, Channel, ExistingChannelListing, ProductType, Warehouse,
};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// CatalogRepository Trait
// ==========================================
// 实现者: CatalogRepositoryImpl（使用 rusqlite）
// 顺序约定: 所有列表按目录存储顺序返回，“第一个”即存储顺序第一条
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// 全部属性定义
    async fn list_attributes(&self) -> RepositoryResult<Vec<AttributeDefinition>>;

    /// 全部属性值
    async fn list_attribute_values(&self) -> RepositoryResult<Vec<AttributeValue>>;

    async fn list_product_types(&self) -> RepositoryResult<Vec<ProductType>>;

    async fn list_channels(&self) -> RepositoryResult<Vec<Channel>>;

    async fn list_warehouses(&self) -> RepositoryResult<Vec<Warehouse>>;

    /// 查询某商品已存在的渠道上架记录
    ///
    /// # 参数
    /// - product_reference: 商品外部引用（表格中的 Product ID）
    async fn list_product_channel_listings(
        &self,
        product_reference: &str,
    ) -> RepositoryResult<Vec<ExistingChannelListing>>;
}
