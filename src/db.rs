// ==========================================
// 商品目录表格导入 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 提供目录只读表 + config_kv 的建表脚本（测试 / 命令行本地库使用）
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 CATALOG_SHEET_IMPORT_DB_PATH → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("CATALOG_SHEET_IMPORT_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./catalog.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("catalog-sheet-import");
        // 目录创建失败时回退当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("catalog.db");
        }
    }

    path.to_string_lossy().to_string()
}

/// 初始化目录 schema（幂等）
///
/// “第一个渠道/仓库”按插入顺序（rowid）定义
pub fn init_catalog_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS attribute (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            input_type TEXT NOT NULL DEFAULT 'dropdown',
            scope TEXT NOT NULL DEFAULT 'PRODUCT'
        );

        CREATE TABLE IF NOT EXISTS attribute_value (
            id TEXT PRIMARY KEY,
            attribute_id TEXT NOT NULL REFERENCES attribute(id) ON DELETE CASCADE,
            name TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_attribute_value_attr
            ON attribute_value(attribute_id);

        CREATE TABLE IF NOT EXISTS product_type (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS channel (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            slug TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS warehouse (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS product_channel_listing (
            product_reference TEXT NOT NULL,
            channel_id TEXT NOT NULL REFERENCES channel(id),
            is_published INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (product_reference, channel_id)
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;

    Ok(())
}
