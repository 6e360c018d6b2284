// ==========================================
// 商品目录表格导入 - 命令行入口
// ==========================================
// 用途: 预览（dry run）。规范化表格并以 JSON 输出，不调用批量创建
//
// 用法:
//   catalog-sheet-import <file> [--db <path>] [--products-json] [--link-variants] [--match-by-name]
//
// - <file>: .xlsx/.xls/.ods 工作簿，.csv 商品行，或 --products-json 时的商品字典 JSON
// - --db: 目录 SQLite 路径（默认: 用户数据目录 / CATALOG_SHEET_IMPORT_DB_PATH）
// ==========================================

use anyhow::{bail, Context};
use catalog_sheet_import::config::{ConfigManager, ImportConfigReader};
use catalog_sheet_import::db::{get_default_db_path, init_catalog_schema, open_sqlite_connection};
use catalog_sheet_import::importer::{
    load_catalog_snapshot, parse_product_dictionaries, BatchDriver, ImportSource, WorkbookInput,
};
use catalog_sheet_import::repository::CatalogRepositoryImpl;
use catalog_sheet_import::{logging, LookupStrategy};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct CliArgs {
    file: Option<PathBuf>,
    db_path: Option<String>,
    products_json: bool,
    link_variants: bool,
    match_by_name: bool,
}

fn parse_args() -> anyhow::Result<CliArgs> {
    let mut cli = CliArgs::default();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--db" => {
                let path = args.next().context("--db 需要一个路径参数")?;
                cli.db_path = Some(path);
            }
            "--products-json" => cli.products_json = true,
            "--link-variants" => cli.link_variants = true,
            "--match-by-name" => cli.match_by_name = true,
            flag if flag.starts_with("--") => bail!("未知参数: {}", flag),
            file => {
                if cli.file.is_some() {
                    bail!("只能指定一个输入文件");
                }
                cli.file = Some(PathBuf::from(file));
            }
        }
    }

    Ok(cli)
}

fn build_source(cli: &CliArgs, file: PathBuf) -> anyhow::Result<ImportSource> {
    if cli.products_json {
        let json = std::fs::read_to_string(&file)
            .with_context(|| format!("无法读取商品 JSON: {}", file.display()))?;
        return Ok(ImportSource::Products(parse_product_dictionaries(&json)?));
    }

    let is_csv = file
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if is_csv {
        Ok(ImportSource::ProductsCsv(file))
    } else {
        Ok(ImportSource::Workbook(WorkbookInput::Path(file)))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let cli = parse_args()?;
    let Some(file) = cli.file.clone() else {
        bail!("用法: catalog-sheet-import <file> [--db <path>] [--products-json] [--link-variants] [--match-by-name]");
    };

    let db_path = cli.db_path.clone().unwrap_or_else(get_default_db_path);
    tracing::info!(version = catalog_sheet_import::VERSION, db_path = %db_path, "商品目录表格导入（预览）");

    let conn = open_sqlite_connection(&db_path)
        .with_context(|| format!("无法打开数据库: {}", db_path))?;
    init_catalog_schema(&conn).context("目录表初始化失败")?;
    let conn = Arc::new(Mutex::new(conn));

    // 配置: config_kv 为基础，命令行开关覆盖
    let config_manager = ConfigManager::from_connection(conn.clone())?;
    let mut config = config_manager.load_import_config().await?;
    if cli.link_variants {
        config.link_variants = true;
    }
    if cli.match_by_name {
        config.channel_strategy = LookupStrategy::MatchByName;
        config.warehouse_strategy = LookupStrategy::MatchByName;
    }

    let repo = CatalogRepositoryImpl::from_connection(conn)?;
    let snapshot = load_catalog_snapshot(&repo).await?;

    let source = build_source(&cli, file)?;
    let batch = BatchDriver::new(&snapshot, &config).import_batch(source)?;

    for skip in &batch.skipped {
        tracing::warn!(sheet = %skip.sheet, row = skip.row_number, "{}", skip.reason);
    }

    println!("{}", serde_json::to_string_pretty(&batch)?);
    Ok(())
}
