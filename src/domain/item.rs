// ==========================================
// 室内设计项目管理 - 项目物品领域模型
// ==========================================
// 职责: 导入行记录、物品分类、校验后物品行、期望表头
// 红线: 不含数据访问逻辑
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ==========================================
// RawRecord - 原始行记录
// ==========================================
// 用途: 文件解析产物（表头 → 值，均已 TRIM）
// 生命周期: 仅在单次导入流程内
pub type RawRecord = HashMap<String, String>;

// ==========================================
// 标准字段名（批量物品导入模板）
// ==========================================
pub mod fields {
    pub const AREA: &str = "area";
    pub const ITEM_NAME: &str = "item_name";
    pub const DESCRIPTION: &str = "description";
    pub const CATEGORY: &str = "category";
    pub const COST: &str = "cost";
}

/// 批量物品导入模板的表头（顺序即错误提示顺序）
pub const BULK_ITEM_HEADERS: [&str; 5] = [
    fields::AREA,
    fields::ITEM_NAME,
    fields::DESCRIPTION,
    fields::CATEGORY,
    fields::COST,
];

// ==========================================
// ExpectedHeaderSet - 期望表头集合
// ==========================================
// 由调用方按导入模板提供，有序
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedHeaderSet(Vec<String>);

impl ExpectedHeaderSet {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(headers.into_iter().map(Into::into).collect())
    }

    /// 批量物品导入模板
    pub fn bulk_items() -> Self {
        Self::new(BULK_ITEM_HEADERS)
    }

    /// 从逗号分隔的配置值解析（忽略空项）
    pub fn from_csv_list(value: &str) -> Self {
        Self::new(
            value
                .split(',')
                .map(str::trim)
                .filter(|h| !h.is_empty()),
        )
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ==========================================
// ParsedCategory - 物品分类（封闭集合）
// ==========================================
// 未识别或缺失的输入一律归为 Otro
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ParsedCategory {
    Muebles,
    #[serde(rename = "Decoración")]
    Decoracion,
    Accesorios,
    Materiales,
    #[serde(rename = "Mano de Obra")]
    ManoDeObra,
    #[default]
    Otro,
}

impl ParsedCategory {
    pub const ALL: [ParsedCategory; 6] = [
        ParsedCategory::Muebles,
        ParsedCategory::Decoracion,
        ParsedCategory::Accesorios,
        ParsedCategory::Materiales,
        ParsedCategory::ManoDeObra,
        ParsedCategory::Otro,
    ];

    /// 分类标签（与存储/界面一致）
    pub fn label(&self) -> &'static str {
        match self {
            ParsedCategory::Muebles => "Muebles",
            ParsedCategory::Decoracion => "Decoración",
            ParsedCategory::Accesorios => "Accesorios",
            ParsedCategory::Materiales => "Materiales",
            ParsedCategory::ManoDeObra => "Mano de Obra",
            ParsedCategory::Otro => "Otro",
        }
    }

    /// 精确匹配标签（区分大小写与重音）
    pub fn from_label(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.label() == value)
    }

    /// 宽松转换: 空白/缺失/未知 → Otro，不报错
    pub fn coerce(value: Option<&str>) -> Self {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .and_then(Self::from_label)
            .unwrap_or_default()
    }
}

impl fmt::Display for ParsedCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ==========================================
// ValidatedItemRow - 校验后的物品行
// ==========================================
// 用途: 类型转换 + 必填校验之后，可直接落库
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedItemRow {
    pub area: String,             // 区域（默认空串）
    pub item_name: String,        // 物品名称（必填，非空）
    pub description: String,      // 描述（默认空串）
    pub category: ParsedCategory, // 分类
    pub cost: f64,                // 成本（>= 0，无法解析时为 0）
}

// ==========================================
// ValidRow - 带行号的校验通过记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidRow {
    pub row_number: usize, // 数据行序号（从 1 开始，不含表头与空行）
    pub item: ValidatedItemRow,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_label_exact() {
        assert_eq!(
            ParsedCategory::from_label("Decoración"),
            Some(ParsedCategory::Decoracion)
        );
        assert_eq!(
            ParsedCategory::from_label("Mano de Obra"),
            Some(ParsedCategory::ManoDeObra)
        );
        assert_eq!(ParsedCategory::from_label("muebles"), None);
        assert_eq!(ParsedCategory::from_label("Iluminación"), None);
    }

    #[test]
    fn test_category_coerce_defaults_to_otro() {
        assert_eq!(ParsedCategory::coerce(None), ParsedCategory::Otro);
        assert_eq!(ParsedCategory::coerce(Some("   ")), ParsedCategory::Otro);
        assert_eq!(ParsedCategory::coerce(Some("Lámparas")), ParsedCategory::Otro);
        assert_eq!(
            ParsedCategory::coerce(Some("  Muebles ")),
            ParsedCategory::Muebles
        );
    }

    #[test]
    fn test_category_serde_uses_labels() {
        let json = serde_json::to_string(&ParsedCategory::ManoDeObra).unwrap();
        assert_eq!(json, "\"Mano de Obra\"");

        let parsed: ParsedCategory = serde_json::from_str("\"Decoración\"").unwrap();
        assert_eq!(parsed, ParsedCategory::Decoracion);
    }

    #[test]
    fn test_expected_headers_from_config_list() {
        let headers = ExpectedHeaderSet::from_csv_list(" item_name , cost ,, ");
        assert_eq!(headers.as_slice(), &["item_name".to_string(), "cost".to_string()]);
        assert_eq!(ExpectedHeaderSet::bulk_items().len(), 5);
    }
}
