// ==========================================
// 商品目录表格导入 - 导入器实现
// ==========================================
// 职责: 整合导入流程，从请求到批量创建结果
// 流程: 请求校验 → 配置读取 → 目录快照 → 批次规范化 → 批量提交 → 报告
// ==========================================

use crate::config::{ImportConfig, ImportConfigReader};
use crate::importer::attribute_lookup::{AttributeCatalog, CatalogSnapshot};
use crate::importer::batch_driver::{BatchDriver, ImportSource, ImportedBatch};
use crate::importer::bulk_submission::BulkSubmissionAdapter;
use crate::importer::catalog_importer_trait::{
    CatalogImporter, ImportReport, ImportRequest, ProductBulkCreator,
};
use crate::importer::error::{ImportError, ImportResult};
use crate::repository::CatalogRepository;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// 一次性加载目录快照
pub async fn load_catalog_snapshot(repo: &dyn CatalogRepository) -> ImportResult<CatalogSnapshot> {
    let attributes = repo.list_attributes().await?;
    let values = repo.list_attribute_values().await?;
    let product_types = repo.list_product_types().await?;
    let channels = repo.list_channels().await?;
    let warehouses = repo.list_warehouses().await?;

    debug!(
        attributes = attributes.len(),
        values = values.len(),
        product_types = product_types.len(),
        channels = channels.len(),
        warehouses = warehouses.len(),
        "目录快照加载完成"
    );
    if channels.is_empty() {
        warn!("目录中没有任何渠道，所有上架条目都将被跳过");
    }

    Ok(CatalogSnapshot {
        attributes: AttributeCatalog::new(attributes, values),
        product_types,
        channels,
        warehouses,
    })
}

// ==========================================
// CatalogImporterImpl - 导入器实现
// ==========================================
pub struct CatalogImporterImpl<C>
where
    C: ImportConfigReader,
{
    // 目录只读访问
    repo: Arc<dyn CatalogRepository>,

    // 配置读取器
    config: C,

    // 外部批量创建协作方
    creator: Arc<dyn ProductBulkCreator>,
}

impl<C> CatalogImporterImpl<C>
where
    C: ImportConfigReader,
{
    /// 创建新的 CatalogImporter 实例
    ///
    /// # 参数
    /// - repo: 目录仓储
    /// - config: 配置读取器
    /// - creator: 批量创建协作方
    pub fn new(
        repo: Arc<dyn CatalogRepository>,
        config: C,
        creator: Arc<dyn ProductBulkCreator>,
    ) -> Self {
        Self {
            repo,
            config,
            creator,
        }
    }

    /// 只做规范化，不提交（用于预览）
    pub async fn normalize(&self, source: ImportSource) -> ImportResult<(ImportConfig, ImportedBatch)> {
        let config = self.config.load_import_config().await?;
        debug!(config = ?config, "导入配置读取完成");

        let snapshot = load_catalog_snapshot(self.repo.as_ref()).await?;
        let batch = BatchDriver::new(&snapshot, &config).import_batch(source)?;
        Ok((config, batch))
    }
}

#[async_trait]
impl<C> CatalogImporter for CatalogImporterImpl<C>
where
    C: ImportConfigReader,
{
    #[instrument(skip(self, request), fields(batch_id))]
    async fn import(&self, request: ImportRequest) -> ImportResult<ImportReport> {
        let start_time = Instant::now();

        // === 请求校验 ===
        let actor = request
            .actor
            .filter(|a| !a.trim().is_empty())
            .ok_or(ImportError::MissingActor)?;
        let source = request.source.ok_or(ImportError::NoInput)?;

        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());
        info!(batch_id = %batch_id, actor = %actor, source = source.kind(), "开始导入商品目录");

        // === 规范化 ===
        let (config, batch) = self.normalize(source).await?;
        let product_count = batch.products.len();
        let variant_count = batch.variants.len()
            + batch
                .products
                .iter()
                .map(|p| p.variants.len())
                .sum::<usize>();

        // === 批量提交 ===
        let adapter = BulkSubmissionAdapter::new(
            self.repo.clone(),
            self.creator.clone(),
            config.reconcile_existing_listings,
        );
        let bulk_result = adapter.submit(batch.products).await;

        let elapsed_ms = start_time.elapsed().as_millis() as u64;
        info!(
            batch_id = %batch_id,
            products = product_count,
            variants = variant_count,
            skipped = batch.skipped.len(),
            created = bulk_result.count,
            elapsed_ms = elapsed_ms,
            "商品目录导入完成"
        );

        Ok(ImportReport {
            batch_id,
            actor,
            products: product_count,
            variants: variant_count,
            skipped: batch.skipped,
            bulk_result,
            elapsed_ms,
        })
    }
}
