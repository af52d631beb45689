// ==========================================
// 室内设计项目管理 - 导入校验预览
// ==========================================
// 阶段 0-2 合并: 解析 → 表头/空文件检查 → 逐行校验
// 不访问存储；导入器与 check 命令共用
// ==========================================

use crate::domain::{ExpectedHeaderSet, ImportPreview, ParseOutcome, RawRecord};
use crate::importer::item_importer_trait::{FileParser, RowValidator};
use crate::importer::result_validator::validate_parse_result;
use crate::importer::row_validator::validate_rows;
use std::path::Path;
use tracing::debug;

/// 读取失败的终止性结果: 无表头、无数据、至少一条错误
fn is_read_failure(outcome: &ParseOutcome<RawRecord>) -> bool {
    outcome.headers.is_empty() && outcome.data.is_empty() && outcome.has_errors()
}

/// 对解析结果执行表头校验与行校验
///
/// - 读取失败: 原样返回该错误，跳过后续校验
/// - 缺失列/无数据: 标记 header_rejected，不做行校验
pub fn preview_outcome(
    outcome: ParseOutcome<RawRecord>,
    expected: &ExpectedHeaderSet,
    validator: &dyn RowValidator,
    locale: &str,
) -> ImportPreview {
    if is_read_failure(&outcome) {
        return ImportPreview {
            read_failed: true,
            errors: outcome.errors,
            ..ImportPreview::default()
        };
    }

    let parse_error_count = outcome.errors.len();
    let validated = validate_parse_result(outcome, expected, locale);
    let header_rejected = validated.errors.len() > parse_error_count;

    let total_rows = validated.data.len();
    if header_rejected {
        debug!(errors = validated.errors.len(), "表头校验未通过");
        return ImportPreview {
            headers: validated.headers,
            total_rows,
            header_rejected: true,
            errors: validated.errors,
            ..ImportPreview::default()
        };
    }

    let rows = validate_rows(validator, &validated.data, locale);
    debug!(
        valid = rows.valid.len(),
        invalid = rows.errors.len(),
        "行校验完成"
    );

    ImportPreview {
        headers: validated.headers,
        total_rows,
        read_failed: false,
        header_rejected: false,
        errors: validated.errors,
        valid_rows: rows.valid,
        row_errors: rows.errors,
    }
}

/// 解析文件并生成校验预览
pub async fn preview_file(
    parser: &dyn FileParser,
    validator: &dyn RowValidator,
    file_path: &Path,
    expected: &ExpectedHeaderSet,
    locale: &str,
) -> ImportPreview {
    let outcome = parser.parse_file(file_path, locale).await;
    preview_outcome(outcome, expected, validator, locale)
}
