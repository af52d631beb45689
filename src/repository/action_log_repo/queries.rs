use super::core::ActionLogRepository;
use crate::domain::action_log::ActionLog;
use crate::repository::error::RepositoryResult;
use chrono::NaiveDateTime;
use rusqlite::{params, Result as SqliteResult, Row};

const SELECT_COLUMNS: &str = r#"
    SELECT action_id, project_id, action_type, action_ts, actor,
           payload_json, detail
    FROM action_log
"#;

impl ActionLogRepository {
    /// 按 action_id 查询单个日志
    pub fn find_by_id(&self, action_id: &str) -> RepositoryResult<Option<ActionLog>> {
        let conn = self.get_conn()?;

        let sql = format!("{} WHERE action_id = ?", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;

        match stmt.query_row(params![action_id], |row| self.map_row(row)) {
            Ok(log) => Ok(Some(log)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询指定项目的操作日志（最新在前）
    pub fn find_by_project(&self, project_id: &str, limit: usize) -> RepositoryResult<Vec<ActionLog>> {
        let conn = self.get_conn()?;

        let sql = format!(
            "{} WHERE project_id = ? ORDER BY action_ts DESC, rowid DESC LIMIT ?",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;

        let logs = stmt
            .query_map(params![project_id, limit as i64], |row| self.map_row(row))?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(logs)
    }

    /// 映射数据库行到 ActionLog
    fn map_row(&self, row: &Row) -> SqliteResult<ActionLog> {
        let action_ts_str: String = row.get(3)?;
        let payload_json_str: Option<String> = row.get(5)?;

        // 解析时间戳（兼容无毫秒的历史数据）
        let action_ts = NaiveDateTime::parse_from_str(&action_ts_str, "%Y-%m-%d %H:%M:%S%.f")
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
            })?;

        Ok(ActionLog {
            action_id: row.get(0)?,
            project_id: row.get(1)?,
            action_type: row.get(2)?,
            action_ts,
            actor: row.get(4)?,
            payload_json: payload_json_str.and_then(|s| serde_json::from_str(&s).ok()),
            detail: row.get(6)?,
        })
    }
}
