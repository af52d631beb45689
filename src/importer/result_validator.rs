// ==========================================
// 室内设计项目管理 - 解析结果校验器
// ==========================================
// 阶段 1: 表头完整性 + 空文件检查
// 两项检查互相独立，各自返回 0 或 1 条诊断，由调用方拼接
// 不删除、不修改解析阶段已有的错误，只追加
// ==========================================

use crate::domain::{ExpectedHeaderSet, ParseOutcome};
use crate::i18n::{tr, tr_with_args};
use std::collections::HashSet;

/// 计算缺失的期望表头（按期望顺序）
pub fn missing_columns<'a>(observed: &[String], expected: &'a ExpectedHeaderSet) -> Vec<&'a str> {
    let observed: HashSet<&str> = observed.iter().map(String::as_str).collect();
    expected.iter().filter(|h| !observed.contains(h)).collect()
}

/// 缺失列诊断: "missing columns: a, b, c"
pub fn missing_columns_diagnostic(
    observed: &[String],
    expected: &ExpectedHeaderSet,
    locale: &str,
) -> Option<String> {
    let missing = missing_columns(observed, expected);
    if missing.is_empty() {
        return None;
    }
    Some(tr_with_args(
        locale,
        "import.missing_columns",
        &[("columns", &missing.join(", "))],
    ))
}

/// 空文件诊断: "file contains no data"
pub fn no_data_diagnostic(data_len: usize, locale: &str) -> Option<String> {
    (data_len == 0).then(|| tr(locale, "import.no_data"))
}

/// 校验解析结果，返回追加诊断后的结果
pub fn validate_parse_result<T>(
    outcome: ParseOutcome<T>,
    expected: &ExpectedHeaderSet,
    locale: &str,
) -> ParseOutcome<T> {
    let header_diagnostic = missing_columns_diagnostic(&outcome.headers, expected, locale);
    let data_diagnostic = no_data_diagnostic(outcome.data.len(), locale);

    let ParseOutcome {
        headers,
        data,
        mut errors,
    } = outcome;
    errors.extend(header_diagnostic);
    errors.extend(data_diagnostic);

    ParseOutcome::new(headers, data, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RawRecord;
    use crate::importer::file_parser::CsvParser;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_missing_columns_in_expected_order() {
        let expected = ExpectedHeaderSet::bulk_items();
        let observed = headers(&["cost", "item_name"]);

        assert_eq!(
            missing_columns(&observed, &expected),
            vec!["area", "description", "category"]
        );
    }

    #[test]
    fn test_missing_columns_diagnostic_text() {
        let expected = ExpectedHeaderSet::bulk_items();
        let observed = headers(&["item_name", "cost"]);

        let msg = missing_columns_diagnostic(&observed, &expected, "en").unwrap();
        assert_eq!(msg, "missing columns: area, description, category");
    }

    #[test]
    fn test_complete_headers_produce_no_diagnostic() {
        let expected = ExpectedHeaderSet::new(["item_name", "cost"]);
        let observed = headers(&["cost", "extra", "item_name"]);

        assert!(missing_columns_diagnostic(&observed, &expected, "en").is_none());
    }

    #[test]
    fn test_no_data_diagnostic() {
        assert_eq!(no_data_diagnostic(0, "en").as_deref(), Some("file contains no data"));
        assert!(no_data_diagnostic(1, "en").is_none());
    }

    #[test]
    fn test_both_checks_fire_independently() {
        let outcome: ParseOutcome<RawRecord> = CsvParser::new().parse_str("item_name\n", "en");
        let expected = ExpectedHeaderSet::new(["item_name", "cost"]);

        let validated = validate_parse_result(outcome, &expected, "en");

        assert_eq!(
            validated.errors,
            vec![
                "missing columns: cost".to_string(),
                "file contains no data".to_string()
            ]
        );
    }

    #[test]
    fn test_existing_errors_are_preserved_and_data_kept() {
        let outcome = ParseOutcome::new(
            headers(&["item_name"]),
            vec![1, 2],
            vec!["row 2: broken".to_string()],
        );
        let expected = ExpectedHeaderSet::new(["item_name", "cost"]);

        let validated = validate_parse_result(outcome, &expected, "en");

        assert_eq!(validated.data, vec![1, 2]);
        assert_eq!(validated.errors[0], "row 2: broken");
        assert_eq!(validated.errors[1], "missing columns: cost");
        assert_eq!(validated.errors.len(), 2);
    }

    #[test]
    fn test_localized_diagnostics() {
        let expected = ExpectedHeaderSet::new(["cost"]);
        let validated = validate_parse_result(ParseOutcome::<u8>::new(vec![], vec![], vec![]), &expected, "es");

        assert_eq!(validated.errors.len(), 2);
        assert!(validated.errors[0].starts_with("columnas faltantes"));
        assert_eq!(validated.errors[1], "el archivo no contiene datos");
    }
}
