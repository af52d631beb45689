// ==========================================
// 室内设计项目管理 - 物品导入 Repository Trait
// ==========================================
// 职责: 定义导入相关数据访问接口（不包含业务逻辑）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::{ActionLog, ImportBatch, RowInsertOutcome, ValidRow};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// ItemImportRepository Trait
// ==========================================
// 用途: 批量导入的存储后端
// 实现者: ItemImportRepositoryImpl（使用 rusqlite）
#[async_trait]
pub trait ItemImportRepository: Send + Sync {
    // ===== 批量写入 =====

    /// 批量创建项目物品
    ///
    /// # 参数
    /// - project_id: 目标项目
    /// - batch_id: 导入批次（写入物品行用于追溯）
    /// - rows: 已通过行校验的记录
    ///
    /// # 返回
    /// - Ok(Vec<RowInsertOutcome>): 逐行成功/失败（单行失败不影响其他行）
    /// - Err: 连接/事务级错误
    async fn create_many(
        &self,
        project_id: &str,
        batch_id: &str,
        rows: &[ValidRow],
    ) -> RepositoryResult<Vec<RowInsertOutcome>>;

    // ===== 批次管理 =====

    /// 插入导入批次记录
    async fn insert_batch(&self, batch: &ImportBatch) -> RepositoryResult<()>;

    /// 查询项目最近的导入批次
    ///
    /// # 参数
    /// - project_id: 项目
    /// - limit: 返回记录数限制
    async fn get_recent_batches(
        &self,
        project_id: &str,
        limit: usize,
    ) -> RepositoryResult<Vec<ImportBatch>>;

    // ===== 审计 =====

    /// 记录操作日志
    async fn record_action(&self, log: &ActionLog) -> RepositoryResult<()>;

    // ===== 查询 =====

    /// 统计项目物品数
    async fn count_items_by_project(&self, project_id: &str) -> RepositoryResult<usize>;
}
