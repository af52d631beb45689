// ==========================================
// 室内设计项目管理 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享连接，按需组装导入器
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::config::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::ImportPolicy;
use crate::importer::{ImportError, ImportResult, ItemImporterImpl, ItemRowValidator, UniversalFileParser};
use crate::repository::{ActionLogRepository, ItemImportRepositoryImpl};

/// 默认组装的导入器类型
pub type DefaultItemImporter = ItemImporterImpl<ItemImportRepositoryImpl, ConfigManager>;

/// 调用方覆写项（CLI 参数等）
#[derive(Debug, Clone, Default)]
pub struct ImportOverrides {
    pub locale: Option<String>,
    pub policy: Option<ImportPolicy>,
    pub template: Option<String>,
}

/// 应用状态
///
/// 持有共享数据库连接；仓储与导入器共用同一连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 共享连接
    conn: Arc<Mutex<Connection>>,

    /// 操作日志仓储（用于审计查询）
    pub action_log_repo: Arc<ActionLogRepository>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库连接并应用统一 PRAGMA
    /// 2. 建表（幂等）
    pub fn new(db_path: String) -> ImportResult<Self> {
        tracing::info!(db_path = %db_path, "初始化AppState");

        let conn = open_sqlite_connection(&db_path)?;
        init_schema(&conn)?;
        let conn = Arc::new(Mutex::new(conn));

        Ok(Self {
            db_path,
            action_log_repo: Arc::new(ActionLogRepository::new(conn.clone())),
            conn,
        })
    }

    /// 组装导入器（CSV/TSV/Excel 自动识别）
    pub fn item_importer(&self, overrides: ImportOverrides) -> ImportResult<DefaultItemImporter> {
        let repo = ItemImportRepositoryImpl::from_connection(self.conn.clone());
        let config = ConfigManager::from_connection(self.conn.clone())
            .map_err(|e| ImportError::Other(anyhow::anyhow!("配置管理器初始化失败: {}", e)))?;

        let mut importer = ItemImporterImpl::new(
            repo,
            config,
            Box::new(UniversalFileParser),
            Box::new(ItemRowValidator),
        );
        if let Some(locale) = overrides.locale {
            importer = importer.with_locale(locale);
        }
        if let Some(policy) = overrides.policy {
            importer = importer.with_policy(policy);
        }
        if let Some(template) = overrides.template {
            importer = importer.with_template(template);
        }
        Ok(importer)
    }
}

/// 默认数据库路径
///
/// 优先级: INTERIOR_PM_DB_PATH 环境变量 → 用户数据目录 → ./interior_pm.db
pub fn get_default_db_path() -> String {
    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var("INTERIOR_PM_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./interior_pm.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("interior-pm");
        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("interior_pm.db");
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::config_keys;
    use crate::importer::ItemImporter;
    use crate::repository::ItemImportRepository;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    #[tokio::test]
    async fn test_app_state_imports_into_shared_db() {
        let db = NamedTempFile::new().unwrap();
        let state = AppState::new(db.path().to_string_lossy().to_string()).unwrap();

        let importer = state
            .item_importer(ImportOverrides {
                locale: Some("es".to_string()),
                ..ImportOverrides::default()
            })
            .unwrap();

        let report = importer
            .import_from_str(
                "area,item_name,description,category,cost\nSala,Sofa,,Muebles,10\nSala,,,,1\n",
                "inline.csv",
                "p1",
            )
            .await
            .unwrap();

        assert_eq!(report.summary.created, 1);
        assert_eq!(report.row_errors[0].messages, vec!["nombre requerido".to_string()]);
        assert_eq!(
            importer.repository().count_items_by_project("p1").await.unwrap(),
            1
        );

        let logs = state.action_log_repo.find_by_project("p1", 10).unwrap();
        assert_eq!(logs.len(), 1);
    }

    #[tokio::test]
    async fn test_check_file_follows_configured_template() {
        let db = NamedTempFile::new().unwrap();
        let state = AppState::new(db.path().to_string_lossy().to_string()).unwrap();
        ConfigManager::from_connection(state.conn.clone())
            .unwrap()
            .set_config_value(&config_keys::expected_headers("quick"), "item_name,cost")
            .unwrap();

        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "item_name,cost").unwrap();
        writeln!(file, "Sofa,150.5").unwrap();

        let preview = state
            .item_importer(ImportOverrides {
                template: Some("quick".to_string()),
                ..ImportOverrides::default()
            })
            .unwrap()
            .check_file(file.path())
            .await
            .unwrap();
        assert!(preview.is_clean());
        assert_eq!(preview.valid_rows.len(), 1);

        let preview = state
            .item_importer(ImportOverrides::default())
            .unwrap()
            .check_file(file.path())
            .await
            .unwrap();
        assert!(preview.header_rejected);
        assert_eq!(
            preview.errors[0],
            "missing columns: area, description, category"
        );
    }
}
