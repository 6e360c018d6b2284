// ==========================================
// 商品目录表格导入 - 数据仓储层
// ==========================================
// 职责: 目录只读访问（属性/属性值/商品类型/渠道/仓库/已有上架记录）
// 红线: Repository 不含映射规则，只做数据读取
// ==========================================

pub mod catalog_repo;
pub mod catalog_repo_impl;
pub mod error;

pub use catalog_repo::CatalogRepository;
pub use catalog_repo_impl::CatalogRepositoryImpl;
pub use error::{RepositoryError, RepositoryResult};
