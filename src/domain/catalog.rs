// ==========================================
// 商品目录表格导入 - 目录领域模型
// ==========================================
// 用途: 导入开始时一次性读取的目录快照元素（只读）
// 来源: CatalogRepository
// ==========================================

use crate::domain::types::{AttributeScope, InputType};
use serde::{Deserialize, Serialize};

// ==========================================
// AttributeDefinition - 属性定义
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    pub id: String,            // 目录标识
    pub name: String,          // 显示名（列头匹配，大小写不敏感）
    pub input_type: InputType, // 输入类型，决定载荷形状
    pub scope: AttributeScope, // 商品级 / 变体级
}

// ==========================================
// AttributeValue - 属性值
// ==========================================
// 多对一关联 AttributeDefinition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeValue {
    pub id: String,
    pub attribute_id: String,
    pub name: String, // 单元格中出现的文本（精确匹配）
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductType {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: String,
    pub name: String,
}

// ==========================================
// ExistingChannelListing - 已持久化的商品渠道上架记录
// ==========================================
// 用途: 提交前的只读对账（幂等重导入的挂载点）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingChannelListing {
    pub product_reference: String,
    pub channel_id: String,
    pub is_published: bool,
}
