// ==========================================
// 室内设计项目管理 - 操作日志（审计）领域模型
// ==========================================
// 红线: 所有批量写入必须记录
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// ==========================================
// ActionLog - 操作日志
// ==========================================
// 对齐: action_log 表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLog {
    pub action_id: String,              // 日志ID
    pub project_id: Option<String>,     // 关联项目
    pub action_type: String,            // 操作类型（存储为字符串）
    pub action_ts: NaiveDateTime,       // 操作时间戳
    pub actor: String,                  // 操作人
    pub payload_json: Option<JsonValue>, // 操作参数 (JSON)
    pub detail: Option<String>,         // 详细描述
}

// ==========================================
// ActionType - 操作类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    BulkImport,         // 批量导入物品
    BulkImportRejected, // 批量导入被拒绝
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::BulkImport => "BULK_IMPORT",
            ActionType::BulkImportRejected => "BULK_IMPORT_REJECTED",
        }
    }
}
