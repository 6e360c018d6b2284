// ==========================================
// 商品目录表格导入 - 仓储层错误类型
// ==========================================
// 仓储只做目录只读查询，错误只覆盖连接、锁、查询与存量数据
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 连接 =====
    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    // ===== 查询 =====
    #[error("目录表不存在（未初始化 schema?）: {0}")]
    CatalogTableMissing(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    // ===== 存量数据 =====
    #[error("字段值错误 (field={field}): {message}")]
    FieldValueError { field: String, message: String },
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("no such table") => {
                RepositoryError::CatalogTableMissing(msg)
            }
            rusqlite::Error::SqliteFailure(_, Some(msg)) => RepositoryError::DatabaseQueryError(msg),
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
