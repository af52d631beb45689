// ==========================================
// 室内设计项目管理 - 物品导入 Repository 实现
// ==========================================
// 职责: 实现导入相关数据访问（使用 rusqlite）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::{
    ActionLog, ImportBatch, ImportStatus, RowInsertOutcome, RowInsertStatus, ValidRow,
};
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::item_import_repo::ItemImportRepository;
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, Transaction};
use std::sync::{Arc, Mutex};
use tracing::warn;
use uuid::Uuid;

fn parse_import_status(raw: &str) -> ImportStatus {
    match raw.trim() {
        "COMPLETED" => ImportStatus::Completed,
        "PARTIAL" => ImportStatus::Partial,
        _ => ImportStatus::Rejected,
    }
}

// ==========================================
// ItemImportRepositoryImpl
// ==========================================
pub struct ItemImportRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
    action_log_repo: ActionLogRepository,
}

impl ItemImportRepositoryImpl {
    /// 创建新的 Repository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self::from_connection(Arc::new(Mutex::new(conn))))
    }

    /// 从已有连接创建（与其他仓储共享连接）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            action_log_repo: ActionLogRepository::new(conn.clone()),
            conn,
        }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 在事务中逐行插入物品
    ///
    /// 单行语句失败只回滚该语句，事务继续
    fn create_many_tx(
        tx: &Transaction,
        project_id: &str,
        batch_id: &str,
        rows: &[ValidRow],
    ) -> RepositoryResult<Vec<RowInsertOutcome>> {
        let mut stmt = tx.prepare(
            r#"
            INSERT INTO project_item (
                item_id, project_id, area, item_name, description,
                category, cost, import_batch_id, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )?;

        let created_at = Utc::now().to_rfc3339();
        let mut outcomes = Vec::with_capacity(rows.len());
        for row in rows {
            let item_id = Uuid::new_v4().to_string();
            let result = stmt.execute(params![
                item_id,
                project_id,
                row.item.area,
                row.item.item_name,
                row.item.description,
                row.item.category.label(),
                row.item.cost,
                batch_id,
                created_at,
            ]);

            let status = match result {
                Ok(_) => RowInsertStatus::Created { item_id },
                Err(e) => {
                    let reason = RepositoryError::from(e).to_string();
                    warn!(row_number = row.row_number, reason = %reason, "物品写入失败");
                    RowInsertStatus::Failed { reason }
                }
            };
            outcomes.push(RowInsertOutcome {
                row_number: row.row_number,
                status,
            });
        }

        Ok(outcomes)
    }
}

#[async_trait]
impl ItemImportRepository for ItemImportRepositoryImpl {
    /// 批量创建物品（事务化，逐行结果）
    async fn create_many(
        &self,
        project_id: &str,
        batch_id: &str,
        rows: &[ValidRow],
    ) -> RepositoryResult<Vec<RowInsertOutcome>> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let outcomes = Self::create_many_tx(&tx, project_id, batch_id, rows)?;

        tx.commit()?;
        Ok(outcomes)
    }

    async fn insert_batch(&self, batch: &ImportBatch) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO import_batch (
                batch_id, project_id, source_name, status, total_rows,
                success_rows, failed_rows, imported_at, imported_by,
                elapsed_ms, report_json
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                batch.batch_id,
                batch.project_id,
                batch.source_name,
                batch.status.as_str(),
                batch.total_rows,
                batch.success_rows,
                batch.failed_rows,
                batch.imported_at,
                batch.imported_by,
                batch.elapsed_ms,
                batch.report_json,
            ],
        )?;

        Ok(())
    }

    async fn get_recent_batches(
        &self,
        project_id: &str,
        limit: usize,
    ) -> RepositoryResult<Vec<ImportBatch>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT batch_id, project_id, source_name, status, total_rows,
                   success_rows, failed_rows, imported_at, imported_by,
                   elapsed_ms, report_json
            FROM import_batch
            WHERE project_id = ?1
            ORDER BY imported_at DESC, rowid DESC
            LIMIT ?2
            "#,
        )?;

        let batches = stmt
            .query_map(params![project_id, limit as i64], |row| {
                let status: String = row.get(3)?;
                Ok(ImportBatch {
                    batch_id: row.get(0)?,
                    project_id: row.get(1)?,
                    source_name: row.get(2)?,
                    status: parse_import_status(&status),
                    total_rows: row.get(4)?,
                    success_rows: row.get(5)?,
                    failed_rows: row.get(6)?,
                    imported_at: row.get(7)?,
                    imported_by: row.get(8)?,
                    elapsed_ms: row.get(9)?,
                    report_json: row.get(10)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(batches)
    }

    async fn record_action(&self, log: &ActionLog) -> RepositoryResult<()> {
        self.action_log_repo.insert(log)?;
        Ok(())
    }

    async fn count_items_by_project(&self, project_id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM project_item WHERE project_id = ?1",
            params![project_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ParsedCategory, ValidatedItemRow};

    fn setup_repo() -> ItemImportRepositoryImpl {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        crate::db::init_schema(&conn).unwrap();
        ItemImportRepositoryImpl::from_connection(Arc::new(Mutex::new(conn)))
    }

    fn valid_row(row_number: usize, name: &str, cost: f64) -> ValidRow {
        ValidRow {
            row_number,
            item: ValidatedItemRow {
                area: "Sala".to_string(),
                item_name: name.to_string(),
                description: String::new(),
                category: ParsedCategory::Muebles,
                cost,
            },
        }
    }

    fn batch(batch_id: &str, status: ImportStatus) -> ImportBatch {
        ImportBatch {
            batch_id: batch_id.to_string(),
            project_id: "p1".to_string(),
            source_name: Some("items.csv".to_string()),
            status,
            total_rows: 3,
            success_rows: 2,
            failed_rows: 1,
            imported_at: Some(Utc::now()),
            imported_by: Some("tester".to_string()),
            elapsed_ms: Some(5),
            report_json: None,
        }
    }

    #[tokio::test]
    async fn test_create_many_reports_per_row_outcomes() {
        let repo = setup_repo();
        // 绕过行校验构造非法成本，验证单行失败不影响其他行
        let rows = vec![
            valid_row(1, "Sofa", 150.5),
            valid_row(2, "Broken", -1.0),
            valid_row(3, "Lamp", 20.0),
        ];

        let outcomes = repo.create_many("p1", "b1", &rows).await.unwrap();

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].is_created());
        assert!(!outcomes[1].is_created());
        assert!(outcomes[2].is_created());
        assert_eq!(outcomes[1].row_number, 2);
        assert_eq!(repo.count_items_by_project("p1").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_items_stored_with_category_label() {
        let repo = setup_repo();
        repo.create_many("p1", "b1", &[valid_row(1, "Sofa", 1.0)])
            .await
            .unwrap();

        let conn = repo.get_conn().unwrap();
        let category: String = conn
            .query_row("SELECT category FROM project_item", [], |row| row.get(0))
            .unwrap();
        assert_eq!(category, "Muebles");
    }

    #[tokio::test]
    async fn test_insert_and_list_batches() {
        let repo = setup_repo();
        repo.insert_batch(&batch("b1", ImportStatus::Partial)).await.unwrap();
        repo.insert_batch(&batch("b2", ImportStatus::Rejected)).await.unwrap();

        let batches = repo.get_recent_batches("p1", 10).await.unwrap();
        assert_eq!(batches.len(), 2);
        assert!(batches.iter().any(|b| b.status == ImportStatus::Partial));
        assert!(batches.iter().any(|b| b.status == ImportStatus::Rejected));

        assert!(repo.get_recent_batches("other", 10).await.unwrap().is_empty());
    }

    #[test]
    fn test_parse_import_status() {
        assert_eq!(parse_import_status("COMPLETED"), ImportStatus::Completed);
        assert_eq!(parse_import_status("PARTIAL"), ImportStatus::Partial);
        assert_eq!(parse_import_status("???"), ImportStatus::Rejected);
    }
}
