// ==========================================
// 商品目录表格导入 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、写入
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::db::{configure_sqlite_connection, open_sqlite_connection};
use crate::domain::types::LookupStrategy;
use crate::importer::error::{ImportError, ImportResult};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};
use tracing::warn;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ImportResult<Self> {
        let conn = open_sqlite_connection(db_path).map_err(|e| ImportError::ConfigReadError {
            key: "*".to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ImportResult<Self> {
        {
            let guard = conn.lock().map_err(|e| ImportError::ConfigReadError {
                key: "*".to_string(),
                message: format!("锁获取失败: {}", e),
            })?;
            configure_sqlite_connection(&guard).map_err(|e| ImportError::ConfigReadError {
                key: "*".to_string(),
                message: e.to_string(),
            })?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> ImportResult<Option<String>> {
        let conn = self.conn.lock().map_err(|e| ImportError::ConfigReadError {
            key: key.to_string(),
            message: format!("锁获取失败: {}", e),
        })?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(ImportError::ConfigReadError {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// 写入 global scope 配置（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> ImportResult<()> {
        let conn = self.conn.lock().map_err(|e| ImportError::ConfigReadError {
            key: key.to_string(),
            message: format!("锁获取失败: {}", e),
        })?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )
        .map_err(|e| ImportError::ConfigReadError {
            key: key.to_string(),
            message: e.to_string(),
        })?;

        Ok(())
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> ImportResult<String> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    fn get_strategy(&self, key: &str) -> ImportResult<LookupStrategy> {
        let value = self.get_config_or_default(key, "use_first")?;
        match value.parse::<LookupStrategy>() {
            Ok(strategy) => Ok(strategy),
            Err(message) => {
                // 非法值回退默认
                warn!(key = key, value = %value, message = %message, "配置值非法，使用默认值");
                Ok(LookupStrategy::UseFirst)
            }
        }
    }

    fn get_flag(&self, key: &str) -> ImportResult<bool> {
        let value = self.get_config_or_default(key, "false")?;
        match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "y" => Ok(true),
            "0" | "false" | "no" | "n" | "" => Ok(false),
            _ => {
                warn!(key = key, value = %value, "配置值非法，使用默认值");
                Ok(false)
            }
        }
    }
}

#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_channel_strategy(&self) -> ImportResult<LookupStrategy> {
        self.get_strategy(config_keys::CHANNEL_STRATEGY)
    }

    async fn get_warehouse_strategy(&self) -> ImportResult<LookupStrategy> {
        self.get_strategy(config_keys::WAREHOUSE_STRATEGY)
    }

    async fn get_link_variants(&self) -> ImportResult<bool> {
        self.get_flag(config_keys::LINK_VARIANTS)
    }

    async fn get_reconcile_existing_listings(&self) -> ImportResult<bool> {
        self.get_flag(config_keys::RECONCILE_EXISTING_LISTINGS)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 渠道 / 仓库默认查找策略
    pub const CHANNEL_STRATEGY: &str = "import/channel_strategy";
    pub const WAREHOUSE_STRATEGY: &str = "import/warehouse_strategy";

    // 变体关联
    pub const LINK_VARIANTS: &str = "import/link_variants";

    // 已有上架记录对账
    pub const RECONCILE_EXISTING_LISTINGS: &str = "import/reconcile_existing_listings";
}
