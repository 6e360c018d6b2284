// ==========================================
// 商品目录表格导入 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 此处只有致命错误（终止整批）；
//       行级问题见 domain::record::SkipReason，逐条结果见 domain::bulk
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 输入相关错误 =====
    #[error("未提供有效输入: 需要工作簿或商品列表")]
    NoInput,

    #[error("请求上下文中缺少操作人")]
    MissingActor,

    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("工作簿输入无效: {0}（需要文件、路径或 base64 字符串）")]
    InvalidWorkbookInput(String),

    #[error("工作簿加载失败: {0}")]
    WorkbookParseError(String),

    #[error("工作簿中缺少表单 '{0}'")]
    MissingSheet(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("商品 JSON 解析失败: {0}")]
    JsonParseError(String),

    // ===== 协作方错误 =====
    #[error("目录快照加载失败: {0}")]
    CatalogLoadError(String),

    #[error("批量创建调用失败: {0}")]
    BulkCreateError(String),

    // ===== 配置错误 =====
    #[error("配置读取失败 (key: {key}): {message}")]
    ConfigReadError { key: String, message: String },

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::WorkbookParseError(err.to_string())
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::JsonParseError(err.to_string())
    }
}

impl From<base64::DecodeError> for ImportError {
    fn from(err: base64::DecodeError) -> Self {
        ImportError::InvalidWorkbookInput(err.to_string())
    }
}

impl From<crate::repository::error::RepositoryError> for ImportError {
    fn from(err: crate::repository::error::RepositoryError) -> Self {
        ImportError::CatalogLoadError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
