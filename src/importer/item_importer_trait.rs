// ==========================================
// 室内设计项目管理 - 物品导入 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// ==========================================

use crate::domain::{ImportReport, ParseOutcome, RawRecord, RowError, ValidatedItemRow};
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use std::path::Path;

// ==========================================
// ItemImporter Trait
// ==========================================
// 用途: 批量物品导入主接口
// 实现者: ItemImporterImpl
#[async_trait]
pub trait ItemImporter: Send + Sync {
    /// 从文件导入项目物品
    ///
    /// # 参数
    /// - file_path: 文件路径（.csv/.tsv/.xlsx/.xls）
    /// - project_id: 目标项目
    ///
    /// # 返回
    /// - Ok(ImportReport): 导入结果（含批次级诊断、行错误、汇总统计）
    /// - Err: 数据库等基础设施错误
    ///
    /// # 导入流程
    /// 1. 文件读取与解析
    /// 2. 表头完整性 + 空文件检查
    /// 3. 逐行类型转换与必填校验
    /// 4. 按导入策略决定落库范围
    /// 5. 批量落库 + 批次记录 + 操作日志
    async fn import_from_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
        project_id: &str,
    ) -> ImportResult<ImportReport>;

    /// 从内存中的 CSV 文本导入项目物品
    ///
    /// # 参数
    /// - text: CSV 文本（第一行为表头）
    /// - source_name: 来源名称（记录到批次）
    /// - project_id: 目标项目
    async fn import_from_str(
        &self,
        text: &str,
        source_name: &str,
        project_id: &str,
    ) -> ImportResult<ImportReport>;

    /// 批量导入多个文件（并发执行）
    ///
    /// # 说明
    /// - 每个文件的导入是独立的，互不影响
    /// - 如果某个文件导入失败，不影响其他文件
    async fn batch_import<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<P>,
        project_id: &str,
    ) -> Vec<Result<ImportReport, String>>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: CsvParser / ExcelParser / UniversalFileParser
#[async_trait]
pub trait FileParser: Send + Sync {
    /// 解析文件为原始行记录
    ///
    /// # 返回
    /// - ParseOutcome: 读取失败时无数据且仅含一条错误
    async fn parse_file(&self, file_path: &Path, locale: &str) -> ParseOutcome<RawRecord>;
}

// ==========================================
// RowValidator Trait
// ==========================================
// 用途: 单行校验接口（阶段 2）
// 实现者: ItemRowValidator
pub trait RowValidator: Send + Sync {
    /// 校验单行记录
    ///
    /// # 参数
    /// - record: 原始行记录
    /// - row_number: 行号（用于行错误）
    /// - locale: 错误信息语言
    fn validate_row(
        &self,
        record: &RawRecord,
        row_number: usize,
        locale: &str,
    ) -> Result<ValidatedItemRow, RowError>;
}
