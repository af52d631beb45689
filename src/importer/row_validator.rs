// ==========================================
// 室内设计项目管理 - 行校验器实现
// ==========================================
// 阶段 2: 单行类型转换 + 必填校验
// ==========================================
// 宽松转换（不报错）:
// - area / description 缺失或空白 → ""
// - category 空白或未知 → Otro
// - cost 缺失或无法解析 → 0
// 严格拒绝（行错误）:
// - item_name 缺失或空白 → "name required"
// - cost < 0 → "cost must be ≥ 0"
// ==========================================

use crate::domain::{fields, ParsedCategory, RawRecord, RowError, ValidRow, ValidatedItemRow};
use crate::i18n::tr;
use crate::importer::item_importer_trait::RowValidator;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct ItemRowValidator;

impl ItemRowValidator {
    /// 提取字段（空白 → None）
    fn get_string<'a>(&self, record: &'a RawRecord, key: &str) -> Option<&'a str> {
        record
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// 解析成本: 缺失/无法解析/NaN/+inf → 0
    ///
    /// 负值（含溢出为 -inf 的输入）保留符号，交由非负校验拒绝
    fn parse_cost(&self, value: Option<&str>) -> f64 {
        value
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite() || *v == f64::NEG_INFINITY)
            .unwrap_or(0.0)
    }
}

impl RowValidator for ItemRowValidator {
    fn validate_row(
        &self,
        record: &RawRecord,
        row_number: usize,
        locale: &str,
    ) -> Result<ValidatedItemRow, RowError> {
        let mut messages = Vec::new();

        let item_name = self.get_string(record, fields::ITEM_NAME);
        if item_name.is_none() {
            messages.push(tr(locale, "row.name_required"));
        }

        let cost = self.parse_cost(self.get_string(record, fields::COST));
        if cost < 0.0 {
            messages.push(tr(locale, "row.cost_negative"));
        }

        match item_name {
            Some(name) if messages.is_empty() => Ok(ValidatedItemRow {
                area: self.get_string(record, fields::AREA).unwrap_or_default().to_string(),
                item_name: name.to_string(),
                description: self
                    .get_string(record, fields::DESCRIPTION)
                    .unwrap_or_default()
                    .to_string(),
                category: ParsedCategory::coerce(record.get(fields::CATEGORY).map(String::as_str)),
                // -0.0 归一为 0
                cost: cost + 0.0,
            }),
            _ => {
                debug!(row_number, messages = ?messages, "行校验失败");
                Err(RowError {
                    row_number,
                    item_name: item_name.map(str::to_string),
                    messages,
                })
            }
        }
    }
}

/// 行校验分组结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowValidation {
    pub valid: Vec<ValidRow>,
    pub errors: Vec<RowError>,
}

/// 逐行校验（行之间互不影响，保持原顺序）
///
/// 行号从 1 开始，对应解析后的数据行序号
pub fn validate_rows<V>(validator: &V, records: &[RawRecord], locale: &str) -> RowValidation
where
    V: RowValidator + ?Sized,
{
    let mut result = RowValidation::default();
    for (idx, record) in records.iter().enumerate() {
        let row_number = idx + 1;
        match validator.validate_row(record, row_number, locale) {
            Ok(item) => result.valid.push(ValidRow { row_number, item }),
            Err(e) => result.errors.push(e),
        }
    }
    result
}
