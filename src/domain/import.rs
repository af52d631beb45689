// ==========================================
// 室内设计项目管理 - 导入领域模型
// ==========================================
// 职责: 解析结果、行级错误、导入策略、批次与导入报告
// ==========================================

use crate::domain::item::ValidRow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// ParseOutcome - 解析/校验结果
// ==========================================
// 不变量: errors 含"缺失列"诊断时 data 仍可能非空，
//         调用方需先检查 errors 再信任 data 的字段完整性
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseOutcome<T> {
    pub headers: Vec<String>, // 实际表头（已 TRIM，源文件顺序）
    pub data: Vec<T>,         // 记录序列
    pub errors: Vec<String>,  // 诊断信息（按产生顺序）
}

impl<T> ParseOutcome<T> {
    pub fn new(headers: Vec<String>, data: Vec<T>, errors: Vec<String>) -> Self {
        Self {
            headers,
            data,
            errors,
        }
    }

    /// 终止性失败（读取失败）: 无数据，仅一条错误
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            headers: Vec::new(),
            data: Vec::new(),
            errors: vec![error.into()],
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

// ==========================================
// RowError - 行级校验错误
// ==========================================
// 仅作用于单条记录，不中断整个批次
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    pub row_number: usize,         // 数据行序号（从 1 开始）
    pub item_name: Option<String>, // 物品名称（如可解析）
    pub messages: Vec<String>,     // 字段错误信息（已本地化）
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}: {}", self.row_number, self.messages.join("; "))
    }
}

// ==========================================
// ImportPolicy - 行错误处理策略
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportPolicy {
    #[default]
    ValidSubset, // 导入通过校验的行，报告失败行
    AllOrNothing, // 任一行失败则整批拒绝
}

impl ImportPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportPolicy::ValidSubset => "VALID_SUBSET",
            ImportPolicy::AllOrNothing => "ALL_OR_NOTHING",
        }
    }
}

impl FromStr for ImportPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "VALID_SUBSET" => Ok(ImportPolicy::ValidSubset),
            "ALL_OR_NOTHING" => Ok(ImportPolicy::AllOrNothing),
            other => Err(format!("unknown import policy: {}", other)),
        }
    }
}

// ==========================================
// RowInsertOutcome - 单行落库结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowInsertStatus {
    Created { item_id: String },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowInsertOutcome {
    pub row_number: usize,
    #[serde(flatten)]
    pub status: RowInsertStatus,
}

impl RowInsertOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self.status, RowInsertStatus::Created { .. })
    }
}

// ==========================================
// ImportStatus - 导入状态
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportStatus {
    Completed, // 全部行落库
    Partial,   // 部分行落库（存在行错误）
    Rejected,  // 整批拒绝（结构/表头错误或 ALL_OR_NOTHING）
}

impl ImportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportStatus::Completed => "COMPLETED",
            ImportStatus::Partial => "PARTIAL",
            ImportStatus::Rejected => "REJECTED",
        }
    }
}

// ==========================================
// ImportBatch - 导入批次
// ==========================================
// 对齐: import_batch 表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportBatch {
    pub batch_id: String,                   // 批次 ID（UUID）
    pub project_id: String,                 // 目标项目
    pub source_name: Option<String>,        // 源文件名
    pub status: ImportStatus,               // 导入状态
    pub total_rows: i32,                    // 数据行数
    pub success_rows: i32,                  // 成功落库行数
    pub failed_rows: i32,                   // 失败行数（校验 + 落库）
    pub imported_at: Option<DateTime<Utc>>, // 导入时间
    pub imported_by: Option<String>,        // 导入人
    pub elapsed_ms: Option<i32>,            // 导入耗时（毫秒）
    pub report_json: Option<String>,        // 诊断报告 JSON
}

// ==========================================
// ImportSummary - 导入汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub total_rows: usize, // 数据行数
    pub valid_rows: usize, // 通过行校验
    pub created: usize,    // 成功落库
    pub failed: usize,     // 行校验失败 + 落库失败
}

// ==========================================
// ImportPreview - 校验预览（不落库）
// ==========================================
// 用途: 解析 + 表头校验 + 行校验的合并结果，导入与 check 共用
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportPreview {
    pub headers: Vec<String>,
    pub total_rows: usize,
    pub read_failed: bool,        // 读取失败（终止性）
    pub header_rejected: bool,    // 缺失列或无数据
    pub errors: Vec<String>,      // 批次级诊断（解析 + 表头）
    pub valid_rows: Vec<ValidRow>,
    pub row_errors: Vec<RowError>,
}

impl ImportPreview {
    /// 是否存在阻断整批的诊断
    pub fn is_blocked(&self) -> bool {
        self.read_failed || self.header_rejected
    }

    /// 无任何诊断
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.row_errors.is_empty()
    }
}

// ==========================================
// ImportReport - 导入结果
// ==========================================
// 用途: 导入接口返回值
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub batch: ImportBatch,
    pub summary: ImportSummary,
    pub errors: Vec<String>,             // 批次级诊断（结构/表头/拒绝原因）
    pub row_errors: Vec<RowError>,       // 行级错误（校验 + 落库）
    pub created_item_ids: Vec<String>,   // 新建物品 ID
    pub elapsed_time: std::time::Duration,
}

impl ImportReport {
    pub fn status(&self) -> ImportStatus {
        self.batch.status
    }
}
