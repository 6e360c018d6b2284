// ==========================================
// 商品目录表格导入 - 批量创建结果
// ==========================================
// 用途: 下游批量创建协作方的逐条结果（上报而不抛出）
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BulkErrorCode {
    Invalid,
    Required,
    NotFound,
    Unique,
    Unavailable, // 协作方整体不可用，逐条标记
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkItemError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub message: String,
    pub code: BulkErrorCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkItemResult {
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<BulkItemError>,
}

impl BulkItemResult {
    pub fn created(index: usize, product_id: impl Into<String>) -> Self {
        Self {
            index,
            product_id: Some(product_id.into()),
            errors: Vec::new(),
        }
    }

    pub fn failed(index: usize, error: BulkItemError) -> Self {
        Self {
            index,
            product_id: None,
            errors: vec![error],
        }
    }

    pub fn is_success(&self) -> bool {
        self.product_id.is_some() && self.errors.is_empty()
    }
}

// ==========================================
// BulkResult - 批量提交汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkResult {
    pub count: usize, // 成功创建数
    pub results: Vec<BulkItemResult>,
}

impl BulkResult {
    pub fn from_results(results: Vec<BulkItemResult>) -> Self {
        let count = results.iter().filter(|r| r.is_success()).count();
        Self { count, results }
    }

    pub fn failed_count(&self) -> usize {
        self.results.len() - self.count
    }
}
