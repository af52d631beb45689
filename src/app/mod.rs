// ==========================================
// 室内设计项目管理 - 应用层
// ==========================================
// 职责: 组装数据库连接、仓储、配置与导入器
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState, DefaultItemImporter, ImportOverrides};
