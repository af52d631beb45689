// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、临时文件等功能
// ==========================================

#![allow(dead_code)]

use interior_pm::db::{init_schema, open_sqlite_connection};
use std::error::Error;
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_string_lossy().to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 写入临时数据文件（指定扩展名）
pub fn write_temp_file(suffix: &str, content: &str) -> Result<NamedTempFile, Box<dyn Error>> {
    let mut file = Builder::new().suffix(suffix).tempfile()?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    Ok(file)
}

/// 统计表行数
pub fn count_rows(db_path: &str, table: &str) -> Result<i64, Box<dyn Error>> {
    let conn = open_sqlite_connection(db_path)?;
    let count = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
    Ok(count)
}
