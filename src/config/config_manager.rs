// ==========================================
// 室内设计项目管理 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、写入
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::import_config_trait::{ConfigResult, ImportConfigReader};
use crate::db::open_sqlite_connection;
use crate::domain::{ExpectedHeaderSet, ImportPolicy};
use crate::i18n;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// 批量物品导入模板名
pub const BULK_ITEMS_TEMPLATE: &str = "bulk_items";

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
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> ConfigResult<String> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at)
             VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;

        Ok(())
    }

    /// 获取所有配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 写入导入批次报告，便于追溯当时生效的配置
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt = conn
            .prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&config_map)?)
    }
}

// ==========================================
// ImportConfigReader Trait 实现
// ==========================================
#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_locale(&self) -> ConfigResult<String> {
        let value = self.get_config_or_default(config_keys::IMPORT_LOCALE, i18n::DEFAULT_LOCALE)?;
        Ok(i18n::resolve_locale(&value).to_string())
    }

    async fn get_import_policy(&self) -> ConfigResult<ImportPolicy> {
        let value = self.get_config_or_default(config_keys::IMPORT_POLICY, "VALID_SUBSET")?;
        match value.parse::<ImportPolicy>() {
            Ok(policy) => Ok(policy),
            Err(_) => {
                tracing::warn!(
                    config_key = config_keys::IMPORT_POLICY,
                    raw_value = %value,
                    "导入策略配置无效，使用默认值"
                );
                Ok(ImportPolicy::default())
            }
        }
    }

    async fn get_expected_headers(&self, template: &str) -> ConfigResult<ExpectedHeaderSet> {
        let key = config_keys::expected_headers(template);
        if let Some(value) = self.get_config_value(&key)? {
            let headers = ExpectedHeaderSet::from_csv_list(&value);
            if !headers.is_empty() {
                return Ok(headers);
            }
        }

        match template {
            BULK_ITEMS_TEMPLATE => Ok(ExpectedHeaderSet::bulk_items()),
            other => Err(format!("未知导入模板: {}", other).into()),
        }
    }

    async fn get_actor(&self) -> ConfigResult<String> {
        let value = self.get_config_or_default(config_keys::IMPORT_ACTOR, "system")?;
        let trimmed = value.trim();
        Ok(if trimmed.is_empty() { "system" } else { trimmed }.to_string())
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    pub const IMPORT_LOCALE: &str = "import.locale";
    pub const IMPORT_POLICY: &str = "import.policy";
    pub const IMPORT_ACTOR: &str = "import.actor";

    /// 模板表头键: import.expected_headers.{template}
    pub fn expected_headers(template: &str) -> String {
        format!("import.expected_headers.{}", template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[tokio::test]
    async fn test_defaults_when_keys_absent() {
        let manager = setup_manager();

        assert_eq!(manager.get_locale().await.unwrap(), "en");
        assert_eq!(
            manager.get_import_policy().await.unwrap(),
            ImportPolicy::ValidSubset
        );
        assert_eq!(
            manager.get_expected_headers(BULK_ITEMS_TEMPLATE).await.unwrap(),
            ExpectedHeaderSet::bulk_items()
        );
        assert_eq!(manager.get_actor().await.unwrap(), "system");
    }

    #[tokio::test]
    async fn test_stored_values_override_defaults() {
        let manager = setup_manager();
        manager.set_config_value(config_keys::IMPORT_LOCALE, "es-MX").unwrap();
        manager
            .set_config_value(config_keys::IMPORT_POLICY, "all_or_nothing")
            .unwrap();
        manager.set_config_value(config_keys::IMPORT_ACTOR, "ana").unwrap();

        assert_eq!(manager.get_locale().await.unwrap(), "es");
        assert_eq!(
            manager.get_import_policy().await.unwrap(),
            ImportPolicy::AllOrNothing
        );
        assert_eq!(manager.get_actor().await.unwrap(), "ana");
    }

    #[tokio::test]
    async fn test_invalid_policy_falls_back() {
        let manager = setup_manager();
        manager.set_config_value(config_keys::IMPORT_POLICY, "SOMETIMES").unwrap();

        assert_eq!(
            manager.get_import_policy().await.unwrap(),
            ImportPolicy::ValidSubset
        );
    }

    #[tokio::test]
    async fn test_expected_headers_from_config() {
        let manager = setup_manager();
        manager
            .set_config_value(&config_keys::expected_headers("rooms"), "area, name ,")
            .unwrap();

        let headers = manager.get_expected_headers("rooms").await.unwrap();
        assert_eq!(headers, ExpectedHeaderSet::new(["area", "name"]));

        assert!(manager.get_expected_headers("unknown").await.is_err());
    }

    #[test]
    fn test_config_snapshot() {
        let manager = setup_manager();
        manager.set_config_value(config_keys::IMPORT_ACTOR, "ana").unwrap();
        manager.set_config_value(config_keys::IMPORT_ACTOR, "luis").unwrap();

        let snapshot = manager.get_config_snapshot().unwrap();
        let parsed: HashMap<String, String> = serde_json::from_str(&snapshot).unwrap();
        assert_eq!(parsed.get(config_keys::IMPORT_ACTOR).map(String::as_str), Some("luis"));
        assert_eq!(parsed.len(), 1);
    }
}
