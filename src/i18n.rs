// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持英文（默认）和西班牙文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// 注意: 导入诊断统一显式传入 locale，不修改全局语言
// ==========================================

/// 默认语言
pub const DEFAULT_LOCALE: &str = "en";

/// 支持的语言列表
pub const SUPPORTED_LOCALES: &[&str] = &["en", "es"];

/// 规范化语言代码
///
/// - "es-MX" / "ES" → "es"
/// - 不支持的语言 → DEFAULT_LOCALE
pub fn resolve_locale(locale: &str) -> &'static str {
    let primary = locale
        .trim()
        .split(['-', '_'])
        .next()
        .unwrap_or("")
        .to_lowercase();

    SUPPORTED_LOCALES
        .iter()
        .copied()
        .find(|l| *l == primary)
        .unwrap_or(DEFAULT_LOCALE)
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use interior_pm::i18n::tr;
/// let msg = tr("es", "row.name_required");
/// ```
pub fn tr(locale: &str, key: &str) -> String {
    let locale = resolve_locale(locale);
    rust_i18n::t!(key, locale = locale).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use interior_pm::i18n::tr_with_args;
/// let msg = tr_with_args("en", "import.missing_columns", &[("columns", "area, cost")]);
/// ```
pub fn tr_with_args(locale: &str, key: &str, args: &[(&str, &str)]) -> String {
    let mut result = tr(locale, key);
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_locale() {
        assert_eq!(resolve_locale("en"), "en");
        assert_eq!(resolve_locale("es-MX"), "es");
        assert_eq!(resolve_locale(" ES "), "es");
        assert_eq!(resolve_locale("zh-CN"), "en");
        assert_eq!(resolve_locale(""), "en");
    }

    #[test]
    fn test_translate_spanish() {
        assert_eq!(tr("es", "row.name_required"), "nombre requerido");
        assert_eq!(tr("es-MX", "import.no_data"), "el archivo no contiene datos");
    }

    #[test]
    fn test_translate_validation_messages() {
        assert_eq!(tr("en", "row.name_required"), "name required");
        assert_eq!(tr("en", "row.cost_negative"), "cost must be ≥ 0");
        assert_eq!(tr("en", "import.no_data"), "file contains no data");
    }

    #[test]
    fn test_translate_with_args() {
        let msg = tr_with_args("en", "import.missing_columns", &[("columns", "area, cost")]);
        assert_eq!(msg, "missing columns: area, cost");

        let msg = tr_with_args("es", "import.missing_columns", &[("columns", "area")]);
        assert!(msg.contains("columnas faltantes"));
        assert!(msg.contains("area"));

        let msg = tr_with_args("es", "import.unsupported_format", &[("ext", "pdf")]);
        assert_eq!(
            msg,
            "formato de archivo no soportado: pdf (se esperaba .csv, .tsv, .txt, .xlsx o .xls)"
        );
    }

    #[test]
    fn test_unknown_locale_falls_back_to_english() {
        assert_eq!(tr("fr", "row.name_required"), "name required");
    }
}
