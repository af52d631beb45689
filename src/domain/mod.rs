// ==========================================
// 室内设计项目管理 - 领域模型层
// ==========================================
// 职责: 定义导入管道的领域实体与类型
// 红线: 不含数据访问逻辑,不含导入流程逻辑
// ==========================================

pub mod action_log;
pub mod import;
pub mod item;

// 重导出核心类型
pub use action_log::{ActionLog, ActionType};
pub use import::{
    ImportBatch, ImportPolicy, ImportPreview, ImportReport, ImportStatus, ImportSummary,
    ParseOutcome, RowError, RowInsertOutcome, RowInsertStatus,
};
pub use item::{
    fields, ExpectedHeaderSet, ParsedCategory, RawRecord, ValidRow, ValidatedItemRow,
    BULK_ITEM_HEADERS,
};
