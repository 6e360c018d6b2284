// ==========================================
// CatalogImporter 集成测试
// ==========================================
// 测试目标: 验证从工作簿/商品字典到批量创建结果的完整流程
// 夹具: tests/fixtures/catalog_import.xlsx（Products + Variants）
//       tests/fixtures/products_only.xlsx（缺少 Variants 表单）
// ==========================================


use base64::Engine as _;
use catalog_sheet_import::config::{config_keys, ConfigManager};
use catalog_sheet_import::domain::{BulkErrorCode, SheetKind, SkipReason};
use catalog_sheet_import::importer::{
    load_catalog_snapshot, BatchDriver, CatalogImporter, CatalogImporterImpl, ImportError,
    ImportRequest, ImportSource, WorkbookInput,
};
use catalog_sheet_import::logging;
use catalog_sheet_import::repository::CatalogRepositoryImpl;
use catalog_sheet_import::ImportConfig;
use serde_json::json;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::NamedTempFile;
use test_helpers::{create_test_db, insert_test_config, seed_catalog, MockBulkCreator};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// 创建测试用的 CatalogImporter 实例
fn create_test_importer(
    db_path: &str,
    creator: Arc<MockBulkCreator>,
) -> CatalogImporterImpl<ConfigManager> {
    let repo = CatalogRepositoryImpl::new(db_path).expect("Failed to create CatalogRepository");
    let config = ConfigManager::new(db_path).expect("Failed to create ConfigManager");
    CatalogImporterImpl::new(Arc::new(repo), config, creator)
}

fn workbook_request(name: &str) -> ImportRequest {
    ImportRequest::new(
        "admin@example.com",
        ImportSource::Workbook(WorkbookInput::Path(fixture(name))),
    )
}

#[tokio::test]
async fn test_workbook_import_end_to_end() {
    logging::init_test();
    let (_temp_file, db_path) = create_test_db().unwrap();
    seed_catalog(&db_path).unwrap();

    let creator = Arc::new(MockBulkCreator::default());
    let importer = create_test_importer(&db_path, creator.clone());

    let report = importer
        .import(workbook_request("catalog_import.xlsx"))
        .await
        .unwrap();

    assert!(!report.batch_id.is_empty());
    assert_eq!(report.actor, "admin@example.com");
    assert_eq!(report.products, 2);
    assert_eq!(report.variants, 3);
    assert_eq!(report.bulk_result.count, 2);

    // 行级跳过: 按表单、行号顺序
    let skipped: Vec<(SheetKind, usize, SkipReason)> = report
        .skipped
        .iter()
        .map(|s| (s.sheet, s.row_number, s.reason.clone()))
        .collect();
    assert_eq!(
        skipped,
        vec![
            (
                SheetKind::Products,
                2,
                SkipReason::UnknownAttributeValue {
                    column: "Material".to_string(),
                    value: "Silk".to_string(),
                }
            ),
            (
                SheetKind::Products,
                4,
                SkipReason::UnknownProductType {
                    name: "Trousers".to_string(),
                }
            ),
            (
                SheetKind::Products,
                4,
                SkipReason::UnknownAttributeValue {
                    column: "Color".to_string(),
                    value: "blue".to_string(),
                }
            ),
            (
                SheetKind::Variants,
                3,
                SkipReason::UnknownAttributeValue {
                    column: "Size".to_string(),
                    value: "M".to_string(),
                }
            ),
        ]
    );

    // 出站请求
    let received = creator.received();
    assert_eq!(received.len(), 2);

    let mut first = serde_json::to_value(&received[0]).unwrap();
    let stamped = first["channel_listings"][0]
        .as_object_mut()
        .unwrap()
        .remove("available_for_purchase_at");
    assert!(stamped.is_some());
    assert_eq!(
        first,
        json!({
            "name": "Blue Shirt",
            "product_type": "pt-shirt",
            "slug": "blue-shirt",
            "product_reference": "P-1",
            "media": [{"media_url": "https://cdn.example/p1.png", "alt": "Blue Shirt"}],
            "channel_listings": [{
                "channel_id": "ch-default",
                "is_published": true,
                "visible_in_listings": true,
                "is_available_for_purchase": true
            }],
            "attributes": [
                {"id": "attr-color", "dropdown": {"id": "val-red"}},
                {"id": "attr-material", "multiselect": {"id": "val-cotton"}}
            ]
        })
    );

    assert!(received[1].product_type.is_none());
    assert!(received[1].media.is_empty());
    assert_eq!(received[1].attributes.len(), 1);
}

#[tokio::test]
async fn test_workbook_variants_normalization() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    seed_catalog(&db_path).unwrap();

    let importer = create_test_importer(&db_path, Arc::new(MockBulkCreator::default()));
    let (_, batch) = importer
        .normalize(ImportSource::Workbook(WorkbookInput::Path(fixture(
            "catalog_import.xlsx",
        ))))
        .await
        .unwrap();

    assert_eq!(batch.variants.len(), 3);
    assert_eq!(
        serde_json::to_value(&batch.variants[0]).unwrap(),
        json!({
            "name": "Widget",
            "sku": "SKU-1",
            "product_reference": "P-1",
            "channel_listings": [{"channel_id": "ch-default", "price": "19.99", "cost_price": "0"}],
            "stocks": [{"warehouse": "wh-main", "quantity": 10}],
            "attributes": [{"id": "attr-size", "dropdown": {"id": "val-xl"}}]
        })
    );

    // 负库存原样保留
    assert_eq!(batch.variants[1].stocks[0].quantity, -2);
    assert_eq!(
        serde_json::to_value(&batch.variants[1].channel_listings).unwrap(),
        json!([{"channel_id": "ch-default", "price": "45", "cost_price": "20.5"}])
    );

    // 无价格、无库存的变体不带占位
    assert_eq!(
        serde_json::to_value(&batch.variants[2]).unwrap(),
        json!({"name": "Orphan", "sku": "SKU-3", "product_reference": "P-404"})
    );
}

#[tokio::test]
async fn test_missing_variants_sheet_fails_before_submission() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    seed_catalog(&db_path).unwrap();

    let creator = Arc::new(MockBulkCreator::default());
    let importer = create_test_importer(&db_path, creator.clone());

    let result = importer.import(workbook_request("products_only.xlsx")).await;

    assert!(matches!(result, Err(ImportError::MissingSheet(ref name)) if name == "Variants"));
    assert!(creator.received().is_empty());
}

#[tokio::test]
async fn test_request_validation() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    seed_catalog(&db_path).unwrap();
    let importer = create_test_importer(&db_path, Arc::new(MockBulkCreator::default()));

    let no_actor = ImportRequest {
        actor: None,
        source: Some(ImportSource::Products(Vec::new())),
    };
    assert!(matches!(
        importer.import(no_actor).await,
        Err(ImportError::MissingActor)
    ));

    let no_input = ImportRequest {
        actor: Some("admin".to_string()),
        source: None,
    };
    assert!(matches!(
        importer.import(no_input).await,
        Err(ImportError::NoInput)
    ));
}

#[tokio::test]
async fn test_products_json_input() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    seed_catalog(&db_path).unwrap();

    let creator = Arc::new(MockBulkCreator::default());
    let importer = create_test_importer(&db_path, creator.clone());

    let rows = catalog_sheet_import::importer::parse_product_dictionaries(
        r#"[
            {"Product Name": "Shirt", "Material": ["Linen", "Cotton"], "Channel List": "default"},
            {"Product Name": "Shirt", "Color": "Blue"}
        ]"#,
    )
    .unwrap();

    let report = importer
        .import(ImportRequest::new("admin", ImportSource::Products(rows)))
        .await
        .unwrap();

    assert_eq!(report.products, 2);
    assert_eq!(report.variants, 0);
    // 第二个商品 slug 重复，逐条失败而非整批失败
    assert_eq!(report.bulk_result.count, 1);
    assert_eq!(
        report.bulk_result.results[1].errors[0].code,
        BulkErrorCode::Unique
    );

    let received = creator.received();
    let value_ids: Vec<String> = received[0]
        .attributes
        .iter()
        .map(|a| a.payload.value_id().to_string())
        .collect();
    assert_eq!(value_ids, vec!["val-linen", "val-cotton"]);
}

#[tokio::test]
async fn test_config_match_by_name_and_link_variants() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    seed_catalog(&db_path).unwrap();
    insert_test_config(&db_path, config_keys::CHANNEL_STRATEGY, "match_by_name").unwrap();
    insert_test_config(&db_path, config_keys::LINK_VARIANTS, "true").unwrap();
    insert_test_config(&db_path, config_keys::RECONCILE_EXISTING_LISTINGS, "true").unwrap();

    let creator = Arc::new(MockBulkCreator::default());
    let importer = create_test_importer(&db_path, creator.clone());

    let report = importer
        .import(workbook_request("catalog_import.xlsx"))
        .await
        .unwrap();
    assert_eq!(report.variants, 3);

    let received = creator.received();
    assert_eq!(received[0].channel_listings[0].channel_id, "ch-default");
    assert_eq!(received[1].channel_listings[0].channel_id, "ch-outlet");
    assert_eq!(received[0].variants.len(), 1);
    assert_eq!(received[0].variants[0].sku.as_deref(), Some("SKU-1"));
    assert_eq!(received[1].variants.len(), 1);
}

#[tokio::test]
async fn test_bulk_creator_unavailable_reports_every_item() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    seed_catalog(&db_path).unwrap();

    let importer = create_test_importer(&db_path, Arc::new(MockBulkCreator::unavailable()));
    let report = importer
        .import(workbook_request("catalog_import.xlsx"))
        .await
        .unwrap();

    assert_eq!(report.bulk_result.count, 0);
    assert_eq!(report.bulk_result.failed_count(), 2);
    assert!(report
        .bulk_result
        .results
        .iter()
        .all(|r| r.errors[0].code == BulkErrorCode::Unavailable));
}

#[tokio::test]
async fn test_workbook_encoded_inputs() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    seed_catalog(&db_path).unwrap();
    let importer = create_test_importer(&db_path, Arc::new(MockBulkCreator::default()));

    let bytes = std::fs::read(fixture("catalog_import.xlsx")).unwrap();
    let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);

    let (_, from_base64) = importer
        .normalize(ImportSource::Workbook(WorkbookInput::Encoded(encoded)))
        .await
        .unwrap();
    let (_, from_path_string) = importer
        .normalize(ImportSource::Workbook(WorkbookInput::Encoded(
            fixture("catalog_import.xlsx").display().to_string(),
        )))
        .await
        .unwrap();
    let (_, from_bytes) = importer
        .normalize(ImportSource::Workbook(WorkbookInput::Bytes(bytes)))
        .await
        .unwrap();

    assert_eq!(from_base64, from_bytes);
    assert_eq!(from_path_string, from_bytes);

    let invalid = importer
        .normalize(ImportSource::Workbook(WorkbookInput::Encoded(
            "no such file, not base64".to_string(),
        )))
        .await;
    assert!(matches!(invalid, Err(ImportError::InvalidWorkbookInput(_))));
}

#[tokio::test]
async fn test_products_csv_source() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    seed_catalog(&db_path).unwrap();
    let importer = create_test_importer(&db_path, Arc::new(MockBulkCreator::default()));

    let mut csv_file = NamedTempFile::new().unwrap();
    writeln!(csv_file, "Product Name,Product Type,Color,Material").unwrap();
    writeln!(csv_file, "Oxford,Shirt,Red,\"Cotton, Linen\"").unwrap();
    writeln!(csv_file, ",,,").unwrap();

    let (_, batch) = importer
        .normalize(ImportSource::ProductsCsv(csv_file.path().to_path_buf()))
        .await
        .unwrap();

    assert_eq!(batch.products.len(), 1);
    assert_eq!(batch.products[0].product_type.as_deref(), Some("pt-shirt"));
    assert_eq!(batch.products[0].attributes.len(), 3);
    assert!(batch.skipped.is_empty());
}

#[tokio::test]
async fn test_workbook_normalization_is_idempotent() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    seed_catalog(&db_path).unwrap();

    let repo = CatalogRepositoryImpl::new(&db_path).unwrap();
    let snapshot = load_catalog_snapshot(&repo).await.unwrap();
    let config = ImportConfig::default();
    let driver = BatchDriver::new(&snapshot, &config);

    let run = || {
        let batch = driver
            .import_batch(ImportSource::Workbook(WorkbookInput::Path(fixture(
                "catalog_import.xlsx",
            ))))
            .unwrap();
        serde_json::to_vec(&batch).unwrap()
    };

    assert_eq!(run(), run());
}
