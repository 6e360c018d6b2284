// ==========================================
// 商品目录表格导入 - 导入接口 Trait
// ==========================================
// 职责: 定义导入主接口与批量创建协作方接口（不包含实现）
// ==========================================

use crate::domain::bulk::{BulkItemResult, BulkResult};
use crate::domain::record::{NormalizedProductRecord, RowSkip};
use crate::importer::batch_driver::ImportSource;
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use serde::Serialize;

// ==========================================
// ImportRequest - 导入请求
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ImportRequest {
    /// 操作人（缺失即拒绝）
    pub actor: Option<String>,
    /// 输入源（缺失即拒绝）
    pub source: Option<ImportSource>,
}

impl ImportRequest {
    pub fn new(actor: impl Into<String>, source: ImportSource) -> Self {
        Self {
            actor: Some(actor.into()),
            source: Some(source),
        }
    }
}

// ==========================================
// ImportReport - 导入报告
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub batch_id: String,
    pub actor: String,
    pub products: usize,
    // 规范化得到的变体总数；未挂到商品下的变体不提交
    pub variants: usize,
    pub skipped: Vec<RowSkip>,
    pub bulk_result: BulkResult,
    pub elapsed_ms: u64,
}

// ==========================================
// CatalogImporter Trait
// ==========================================
// 用途: 导入主接口
// 实现者: CatalogImporterImpl
#[async_trait]
pub trait CatalogImporter: Send + Sync {
    /// 执行一次导入
    ///
    /// # 返回
    /// - Ok(ImportReport): 行级跳过与逐条创建结果都在报告内
    /// - Err: 致命错误（缺少操作人/输入、表单缺失、工作簿无法读取、目录加载失败）
    ///
    /// # 导入流程
    /// 1. 请求校验
    /// 2. 读取导入配置（一次）
    /// 3. 加载目录快照（一次）
    /// 4. 批次规范化
    /// 5. 批量提交
    async fn import(&self, request: ImportRequest) -> ImportResult<ImportReport>;
}

// ==========================================
// ProductBulkCreator Trait
// ==========================================
// 用途: 外部批量创建协作方
// 约定: 返回结果与输入一一对应（index 为输入下标）；
//       Err 只表示调用本身失败（传输层），逐条错误放在结果里
#[async_trait]
pub trait ProductBulkCreator: Send + Sync {
    async fn bulk_create(
        &self,
        products: Vec<NormalizedProductRecord>,
    ) -> ImportResult<Vec<BulkItemResult>>;
}
