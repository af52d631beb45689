// ==========================================
// 室内设计项目管理 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::domain::{ExpectedHeaderSet, ImportPolicy};
use async_trait::async_trait;
use std::error::Error;

/// 配置读取结果
pub type ConfigResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入模块所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    // ===== 本地化 =====

    /// 获取诊断信息语言
    ///
    /// # 返回
    /// - 已规范化的语言代码（"en" / "es"）
    ///
    /// # 默认值
    /// - en
    async fn get_locale(&self) -> ConfigResult<String>;

    // ===== 导入策略 =====

    /// 获取行错误处理策略
    ///
    /// # 返回
    /// - ImportPolicy::ValidSubset: 写入合法行，报告错误行
    /// - ImportPolicy::AllOrNothing: 任一行错误则整批拒绝
    ///
    /// # 默认值
    /// - VALID_SUBSET
    async fn get_import_policy(&self) -> ConfigResult<ImportPolicy>;

    /// 获取导入模板的期望表头
    ///
    /// # 参数
    /// - template: 模板名（如 "bulk_items"）
    ///
    /// # 默认值
    /// - bulk_items: area,item_name,description,category,cost
    async fn get_expected_headers(&self, template: &str) -> ConfigResult<ExpectedHeaderSet>;

    // ===== 审计 =====

    /// 获取审计日志中的操作人
    ///
    /// # 默认值
    /// - system
    async fn get_actor(&self) -> ConfigResult<String>;
}
