// ==========================================
// 商品目录表格导入 - 日志系统初始化
// ==========================================
// 使用 tracing 和 tracing-subscriber
// 日志输出到 stderr，stdout 留给命令行的 JSON 结果
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 初始化日志系统
///
/// # 环境变量
/// - RUST_LOG: 日志级别过滤器（默认: info）
/// - CATALOG_SHEET_IMPORT_LOG_FORMAT: `json` 输出 JSON 行，其他值为文本
///   例如: RUST_LOG=debug 或 RUST_LOG=catalog_sheet_import=trace
///
/// # 示例
/// ```no_run
/// use catalog_sheet_import::logging;
/// logging::init();
/// ```
pub fn init() {
    // 从环境变量读取日志级别，默认为 info
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true);

    // CATALOG_SHEET_IMPORT_LOG_FORMAT=json 时输出结构化 JSON 行
    if wants_json(std::env::var(LOG_FORMAT_ENV).ok().as_deref()) {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// 日志格式环境变量
pub const LOG_FORMAT_ENV: &str = "CATALOG_SHEET_IMPORT_LOG_FORMAT";

fn wants_json(value: Option<&str>) -> bool {
    value
        .map(|v| v.trim().eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// 初始化测试环境的日志系统
///
/// 使用更详细的日志级别，便于调试
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
