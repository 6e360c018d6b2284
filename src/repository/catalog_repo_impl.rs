// ==========================================
// 商品目录表格导入 - 目录 Repository 实现 (SQLite)
// ==========================================

use crate::db::{configure_sqlite_connection, open_sqlite_connection};
use crate::domain::catalog::{
    AttributeDefinition, AttributeValue, Channel, ExistingChannelListing, ProductType, Warehouse,
};
use crate::domain::types::{AttributeScope, InputType};
use crate::repository::catalog_repo::CatalogRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// CatalogRepositoryImpl
// ==========================================
pub struct CatalogRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl CatalogRepositoryImpl {
    /// 创建新的 Repository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建（会再次应用统一 PRAGMA，幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
        }
        Ok(Self { conn })
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

#[async_trait]
impl CatalogRepository for CatalogRepositoryImpl {
    async fn list_attributes(&self) -> RepositoryResult<Vec<AttributeDefinition>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT id, name, input_type, scope FROM attribute ORDER BY rowid")?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut attributes = Vec::new();
        for row in rows {
            let (id, name, input_type, scope) = row?;
            let scope = scope
                .parse::<AttributeScope>()
                .map_err(|message| RepositoryError::FieldValueError {
                    field: "attribute.scope".to_string(),
                    message,
                })?;
            attributes.push(AttributeDefinition {
                id,
                name,
                input_type: InputType::from_tag(&input_type),
                scope,
            });
        }

        Ok(attributes)
    }

    async fn list_attribute_values(&self) -> RepositoryResult<Vec<AttributeValue>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT id, attribute_id, name FROM attribute_value ORDER BY rowid")?;

        let values = stmt
            .query_map([], |row| {
                Ok(AttributeValue {
                    id: row.get(0)?,
                    attribute_id: row.get(1)?,
                    name: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(values)
    }

    async fn list_product_types(&self) -> RepositoryResult<Vec<ProductType>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT id, name FROM product_type ORDER BY rowid")?;

        let types = stmt
            .query_map([], |row| {
                Ok(ProductType {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(types)
    }

    async fn list_channels(&self) -> RepositoryResult<Vec<Channel>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT id, name, slug FROM channel ORDER BY rowid")?;

        let channels = stmt
            .query_map([], |row| {
                Ok(Channel {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    slug: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(channels)
    }

    async fn list_warehouses(&self) -> RepositoryResult<Vec<Warehouse>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT id, name FROM warehouse ORDER BY rowid")?;

        let warehouses = stmt
            .query_map([], |row| {
                Ok(Warehouse {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(warehouses)
    }

    async fn list_product_channel_listings(
        &self,
        product_reference: &str,
    ) -> RepositoryResult<Vec<ExistingChannelListing>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT product_reference, channel_id, is_published
            FROM product_channel_listing
            WHERE product_reference = ?1
            ORDER BY rowid
            "#,
        )?;

        let listings = stmt
            .query_map(params![product_reference], |row| {
                Ok(ExistingChannelListing {
                    product_reference: row.get(0)?,
                    channel_id: row.get(1)?,
                    is_published: row.get::<_, i64>(2)? != 0,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(listings)
    }
}
