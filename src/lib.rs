// ==========================================
// 室内设计项目管理 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 范围: 项目物品批量导入（CSV/TSV/Excel → 校验 → 落库）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{
    ActionLog, ActionType, ExpectedHeaderSet, ImportPolicy, ImportPreview, ImportReport,
    ImportStatus, ParseOutcome, ParsedCategory, RawRecord, RowError, ValidatedItemRow,
};

// 导入
pub use importer::{ImportError, ImportResult, ItemImporter, ItemImporterImpl};

// 仓储
pub use repository::{ItemImportRepository, ItemImportRepositoryImpl, RepositoryError};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "interior-pm";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
