// ==========================================
// 商品目录表格导入 - 批量提交适配器
// ==========================================
// 职责: 规范化商品 → 外部批量创建协作方
// 流程: 渠道上架对账（可选，只读）→ 提交时间盖章 → 调用协作方 → 汇总结果
// 红线: 逐条失败只上报不抛出；协作方调用失败也按逐条失败上报
// ==========================================

use crate::domain::bulk::{BulkErrorCode, BulkItemError, BulkItemResult, BulkResult};
use crate::domain::record::NormalizedProductRecord;
use crate::importer::catalog_importer_trait::ProductBulkCreator;
use crate::repository::CatalogRepository;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

pub struct BulkSubmissionAdapter {
    repo: Arc<dyn CatalogRepository>,
    creator: Arc<dyn ProductBulkCreator>,
    reconcile_existing_listings: bool,
}

impl BulkSubmissionAdapter {
    pub fn new(
        repo: Arc<dyn CatalogRepository>,
        creator: Arc<dyn ProductBulkCreator>,
        reconcile_existing_listings: bool,
    ) -> Self {
        Self {
            repo,
            creator,
            reconcile_existing_listings,
        }
    }

    /// 提交商品批量创建
    ///
    /// # 返回
    /// - BulkResult: count 为成功数；results 与输入一一对应
    #[instrument(skip_all, fields(products = products.len()))]
    pub async fn submit(&self, mut products: Vec<NormalizedProductRecord>) -> BulkResult {
        if products.is_empty() {
            debug!("没有商品需要提交");
            return BulkResult::default();
        }

        if self.reconcile_existing_listings {
            self.reconcile_channel_listings(&products).await;
        }

        // 上架时间只在出站请求上盖章
        let now = Utc::now();
        for product in products.iter_mut() {
            for listing in product.channel_listings.iter_mut() {
                listing.available_for_purchase_at = Some(now);
            }
        }

        let submitted = products.len();
        let results = match self.creator.bulk_create(products).await {
            Ok(results) => complete_results(results, submitted),
            Err(e) => {
                error!(error = %e, "批量创建调用失败，全部商品标记为失败");
                (0..submitted)
                    .map(|index| {
                        BulkItemResult::failed(
                            index,
                            BulkItemError {
                                path: None,
                                message: e.to_string(),
                                code: BulkErrorCode::Unavailable,
                            },
                        )
                    })
                    .collect()
            }
        };

        let result = BulkResult::from_results(results);
        info!(
            submitted = submitted,
            created = result.count,
            failed = result.failed_count(),
            "批量提交完成"
        );
        result
    }

    /// 读取已有渠道上架记录（只读，仅记录日志）
    async fn reconcile_channel_listings(&self, products: &[NormalizedProductRecord]) {
        for product in products.iter().filter(|p| !p.channel_listings.is_empty()) {
            let Some(reference) = product.product_reference.as_deref() else {
                continue;
            };

            match self.repo.list_product_channel_listings(reference).await {
                Ok(existing) => {
                    let already_listed = product
                        .channel_listings
                        .iter()
                        .filter(|l| existing.iter().any(|e| e.channel_id == l.channel_id))
                        .count();
                    debug!(
                        product_reference = reference,
                        existing = existing.len(),
                        already_listed = already_listed,
                        "渠道上架对账"
                    );
                }
                Err(e) => {
                    warn!(product_reference = reference, error = %e, "读取已有渠道上架记录失败，跳过对账");
                }
            }
        }
    }
}

/// 按输入下标补齐结果；协作方漏报的条目按失败处理
fn complete_results(mut results: Vec<BulkItemResult>, submitted: usize) -> Vec<BulkItemResult> {
    results.retain(|r| r.index < submitted);
    results.sort_by_key(|r| r.index);
    results.dedup_by_key(|r| r.index);

    if results.len() == submitted {
        return results;
    }

    warn!(
        submitted = submitted,
        returned = results.len(),
        "批量创建结果数与提交数不一致"
    );
    let mut completed = Vec::with_capacity(submitted);
    let mut returned = results.into_iter().peekable();
    for index in 0..submitted {
        match returned.next_if(|r| r.index == index) {
            Some(result) => completed.push(result),
            None => completed.push(BulkItemResult::failed(
                index,
                BulkItemError {
                    path: None,
                    message: "批量创建未返回该条结果".to_string(),
                    code: BulkErrorCode::Unavailable,
                },
            )),
        }
    }
    completed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_catalog_schema;
    use crate::domain::catalog::{
        AttributeDefinition, AttributeValue, Channel, ExistingChannelListing, ProductType,
        Warehouse,
    };
    use crate::domain::record::ProductChannelListing;
    use crate::repository::error::RepositoryResult;
    use crate::importer::error::{ImportError, ImportResult};
    use crate::repository::CatalogRepositoryImpl;
    use async_trait::async_trait;
    use rusqlite::Connection;
    use std::sync::Mutex;

    // 记录收到的请求；名称为 "dup" 的商品返回逐条错误
    #[derive(Default)]
    struct RecordingCreator {
        received: Mutex<Vec<NormalizedProductRecord>>,
        fail_transport: bool,
    }

    #[async_trait]
    impl ProductBulkCreator for RecordingCreator {
        async fn bulk_create(
            &self,
            products: Vec<NormalizedProductRecord>,
        ) -> ImportResult<Vec<BulkItemResult>> {
            if self.fail_transport {
                return Err(ImportError::BulkCreateError("connection refused".to_string()));
            }
            let results = products
                .iter()
                .enumerate()
                .map(|(index, p)| {
                    if p.name.as_deref() == Some("dup") {
                        BulkItemResult::failed(
                            index,
                            BulkItemError {
                                path: Some("slug".to_string()),
                                message: "slug already exists".to_string(),
                                code: BulkErrorCode::Unique,
                            },
                        )
                    } else {
                        BulkItemResult::created(index, format!("prod-{}", index))
                    }
                })
                .collect();
            self.received.lock().unwrap().extend(products);
            Ok(results)
        }
    }

    // 只记录上架查询的目录桩；P-1 已在 CH1 上架
    #[derive(Default)]
    struct ListingLookupRepo {
        queried: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CatalogRepository for ListingLookupRepo {
        async fn list_attributes(&self) -> RepositoryResult<Vec<AttributeDefinition>> {
            Ok(Vec::new())
        }

        async fn list_attribute_values(&self) -> RepositoryResult<Vec<AttributeValue>> {
            Ok(Vec::new())
        }

        async fn list_product_types(&self) -> RepositoryResult<Vec<ProductType>> {
            Ok(Vec::new())
        }

        async fn list_channels(&self) -> RepositoryResult<Vec<Channel>> {
            Ok(Vec::new())
        }

        async fn list_warehouses(&self) -> RepositoryResult<Vec<Warehouse>> {
            Ok(Vec::new())
        }

        async fn list_product_channel_listings(
            &self,
            product_reference: &str,
        ) -> RepositoryResult<Vec<ExistingChannelListing>> {
            self.queried
                .lock()
                .unwrap()
                .push(product_reference.to_string());
            if product_reference == "ref-shirt" {
                return Ok(vec![ExistingChannelListing {
                    product_reference: product_reference.to_string(),
                    channel_id: "CH1".to_string(),
                    is_published: true,
                }]);
            }
            Ok(Vec::new())
        }
    }

    fn repo() -> Arc<dyn CatalogRepository> {
        let conn = Connection::open_in_memory().unwrap();
        init_catalog_schema(&conn).unwrap();
        Arc::new(CatalogRepositoryImpl::from_connection(Arc::new(Mutex::new(conn))).unwrap())
    }

    fn product(name: &str) -> NormalizedProductRecord {
        NormalizedProductRecord {
            name: Some(name.to_string()),
            product_reference: Some(format!("ref-{}", name)),
            channel_listings: vec![ProductChannelListing {
                channel_id: "CH1".to_string(),
                is_published: true,
                visible_in_listings: true,
                is_available_for_purchase: true,
                available_for_purchase_at: None,
            }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_per_item_errors_are_reported() {
        let creator = Arc::new(RecordingCreator::default());
        let adapter = BulkSubmissionAdapter::new(repo(), creator.clone(), true);

        let result = adapter
            .submit(vec![product("shirt"), product("dup"), product("mug")])
            .await;

        assert_eq!(result.count, 2);
        assert_eq!(result.failed_count(), 1);
        assert_eq!(result.results[1].errors[0].code, BulkErrorCode::Unique);

        // 出站请求带上架时间
        let received = creator.received.lock().unwrap();
        assert_eq!(received.len(), 3);
        assert!(received
            .iter()
            .all(|p| p.channel_listings[0].available_for_purchase_at.is_some()));
    }

    #[tokio::test]
    async fn test_transport_failure_marks_every_item() {
        let creator = Arc::new(RecordingCreator {
            fail_transport: true,
            ..Default::default()
        });
        let adapter = BulkSubmissionAdapter::new(repo(), creator, false);

        let result = adapter.submit(vec![product("a"), product("b")]).await;

        assert_eq!(result.count, 0);
        assert_eq!(result.results.len(), 2);
        assert!(result
            .results
            .iter()
            .all(|r| r.errors[0].code == BulkErrorCode::Unavailable));
    }

    #[tokio::test]
    async fn test_empty_batch_skips_collaborator() {
        let creator = Arc::new(RecordingCreator {
            fail_transport: true,
            ..Default::default()
        });
        let adapter = BulkSubmissionAdapter::new(repo(), creator, false);

        let result = adapter.submit(Vec::new()).await;
        assert_eq!(result, BulkResult::default());
    }

    #[test]
    fn test_complete_results_fills_missing_indexes() {
        let results = complete_results(vec![BulkItemResult::created(1, "p1")], 3);
        assert_eq!(results.len(), 3);
        assert!(!results[0].is_success());
        assert!(results[1].is_success());
        assert_eq!(results[2].index, 2);
    }

    #[tokio::test]
    async fn test_reconciliation_reads_listings_without_changing_requests() {
        let lookup = Arc::new(ListingLookupRepo::default());
        let creator = Arc::new(RecordingCreator::default());
        let adapter = BulkSubmissionAdapter::new(lookup.clone(), creator.clone(), true);

        let unlisted = NormalizedProductRecord {
            channel_listings: Vec::new(),
            ..product("mug")
        };
        let no_reference = NormalizedProductRecord {
            product_reference: None,
            ..product("cap")
        };
        let input = vec![product("shirt"), unlisted, no_reference];

        let result = adapter.submit(input.clone()).await;
        assert_eq!(result.count, 3);

        // 只查询有上架条目且带引用的商品
        assert_eq!(*lookup.queried.lock().unwrap(), vec!["ref-shirt".to_string()]);

        // 出站请求除上架时间外与输入一致
        let mut received = creator.received.lock().unwrap().clone();
        for product in received.iter_mut() {
            for listing in product.channel_listings.iter_mut() {
                assert!(listing.available_for_purchase_at.is_some());
                listing.available_for_purchase_at = None;
            }
        }
        assert_eq!(received, input);
    }

    #[tokio::test]
    async fn test_reconciliation_disabled_skips_lookup() {
        let lookup = Arc::new(ListingLookupRepo::default());
        let creator = Arc::new(RecordingCreator::default());
        let adapter = BulkSubmissionAdapter::new(lookup.clone(), creator, false);

        adapter.submit(vec![product("shirt")]).await;
        assert!(lookup.queried.lock().unwrap().is_empty());
    }
}
