// ==========================================
// 室内设计项目管理 - 导入层
// ==========================================
// 职责: 批量物品导入（解析 → 表头校验 → 行校验 → 落库）
// 支持: CSV, TSV, Excel
// ==========================================

// 模块声明
pub mod error;
pub mod file_parser;
pub mod item_importer_impl;
pub mod item_importer_trait;
pub mod preview;
pub mod result_validator;
pub mod row_validator;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use item_importer_impl::ItemImporterImpl;
pub use preview::{preview_file, preview_outcome};
pub use result_validator::{
    missing_columns, missing_columns_diagnostic, no_data_diagnostic, validate_parse_result,
};
pub use row_validator::{validate_rows, ItemRowValidator, RowValidation};

// 重导出 Trait 接口
pub use item_importer_trait::{FileParser, ItemImporter, RowValidator};
