// ==========================================
// 室内设计项目管理 - 操作日志数据仓储
// ==========================================
// 对齐: action_log 表
// 红线: 所有批量写入必须记录
// ==========================================

mod core;
mod queries;


pub use self::core::ActionLogRepository;
