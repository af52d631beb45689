// ==========================================
// 室内设计项目管理 - 物品批量导入器实现
// ==========================================
// 职责: 整合导入流程，从文件到数据库
// 流程: 解析 → 表头校验 → 行校验 → 策略判定 → 落库 → 批次记录 → 操作日志
// ==========================================
// 策略:
// - 读取失败 / 缺失列 / 无数据: 整批拒绝，不落库
// - 行错误: VALID_SUBSET 写入合法行；ALL_OR_NOTHING 整批拒绝
// - 每次导入均写入 import_batch 与 action_log
// ==========================================

use crate::config::{ImportConfigReader, BULK_ITEMS_TEMPLATE};
use crate::domain::{
    ActionLog, ActionType, ExpectedHeaderSet, ImportBatch, ImportPolicy, ImportPreview,
    ImportReport, ImportStatus, ImportSummary, RowError, RowInsertStatus,
};
use crate::i18n::{self, tr, tr_with_args};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::CsvParser;
use crate::importer::item_importer_trait::{FileParser, ItemImporter, RowValidator};
use crate::importer::preview::{preview_file, preview_outcome};
use crate::repository::ItemImportRepository;
use chrono::Utc;
use serde_json::json;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// ImportContext - 单次导入生效的配置
// ==========================================
struct ImportContext {
    locale: String,
    policy: ImportPolicy,
    expected: ExpectedHeaderSet,
    actor: String,
}

/// 计数/耗时写入 i32 列时饱和到 i32::MAX
fn saturating_i32<T: TryInto<i32>>(value: T) -> i32 {
    value.try_into().unwrap_or(i32::MAX)
}

// ==========================================
// ItemImporterImpl - 物品批量导入器实现
// ==========================================
pub struct ItemImporterImpl<R, C>
where
    R: ItemImportRepository,
    C: ImportConfigReader,
{
    // 数据访问层
    import_repo: R,

    // 配置读取器
    config: C,

    // 导入组件
    file_parser: Box<dyn FileParser>,
    row_validator: Box<dyn RowValidator>,

    // 导入模板（决定期望表头）
    template: String,

    // 调用方覆写（优先于配置）
    locale_override: Option<String>,
    policy_override: Option<ImportPolicy>,
}

impl<R, C> ItemImporterImpl<R, C>
where
    R: ItemImportRepository,
    C: ImportConfigReader,
{
    /// 创建新的 ItemImporter 实例
    ///
    /// # 参数
    /// - import_repo: 导入数据仓储
    /// - config: 配置读取器
    /// - file_parser: 文件解析器
    /// - row_validator: 行校验器
    pub fn new(
        import_repo: R,
        config: C,
        file_parser: Box<dyn FileParser>,
        row_validator: Box<dyn RowValidator>,
    ) -> Self {
        Self {
            import_repo,
            config,
            file_parser,
            row_validator,
            template: BULK_ITEMS_TEMPLATE.to_string(),
            locale_override: None,
            policy_override: None,
        }
    }

    /// 指定导入模板
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// 覆写诊断语言
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale_override = Some(locale.into());
        self
    }

    /// 覆写导入策略
    pub fn with_policy(mut self, policy: ImportPolicy) -> Self {
        self.policy_override = Some(policy);
        self
    }

    /// 数据仓储（供调用方查询批次/计数）
    pub fn repository(&self) -> &R {
        &self.import_repo
    }

    /// 读取本次导入生效的配置
    async fn load_context(&self) -> ImportResult<ImportContext> {
        let locale = match &self.locale_override {
            Some(locale) => i18n::resolve_locale(locale).to_string(),
            None => self.config.get_locale().await.map_err(|e| ImportError::ConfigReadError {
                key: "import.locale".to_string(),
                message: e.to_string(),
            })?,
        };

        let policy = match self.policy_override {
            Some(policy) => policy,
            None => self
                .config
                .get_import_policy()
                .await
                .map_err(|e| ImportError::ConfigReadError {
                    key: "import.policy".to_string(),
                    message: e.to_string(),
                })?,
        };

        let expected = self
            .config
            .get_expected_headers(&self.template)
            .await
            .map_err(|e| ImportError::ConfigReadError {
                key: format!("import.expected_headers.{}", self.template),
                message: e.to_string(),
            })?;

        let actor = self
            .config
            .get_actor()
            .await
            .map_err(|e| ImportError::ConfigReadError {
                key: "import.actor".to_string(),
                message: e.to_string(),
            })?;

        Ok(ImportContext {
            locale,
            policy,
            expected,
            actor,
        })
    }

    /// 仅校验文件（不落库）
    pub async fn check_file(&self, file_path: &Path) -> ImportResult<ImportPreview> {
        let ctx = self.load_context().await?;
        Ok(preview_file(
            self.file_parser.as_ref(),
            self.row_validator.as_ref(),
            file_path,
            &ctx.expected,
            &ctx.locale,
        )
        .await)
    }

    /// 按策略处理校验结果并落库
    #[instrument(skip_all, fields(batch_id = %batch_id, project_id = %project_id))]
    async fn commit_preview(
        &self,
        ctx: &ImportContext,
        preview: ImportPreview,
        batch_id: String,
        source_name: &str,
        project_id: &str,
        start_time: Instant,
    ) -> ImportResult<ImportReport> {
        let ImportPreview {
            total_rows,
            read_failed,
            header_rejected,
            mut errors,
            valid_rows,
            mut row_errors,
            ..
        } = preview;

        // === 步骤 1: 整批拒绝判定 ===
        let rejection = if read_failed {
            warn!(errors = ?errors, "文件读取失败，整批拒绝");
            Some(errors.first().cloned().unwrap_or_default())
        } else if header_rejected {
            warn!(errors = ?errors, "表头校验未通过，整批拒绝");
            Some(tr(&ctx.locale, "import.header_rejected"))
        } else if ctx.policy == ImportPolicy::AllOrNothing && !row_errors.is_empty() {
            let message = tr_with_args(
                &ctx.locale,
                "import.rows_rejected",
                &[("count", &row_errors.len().to_string())],
            );
            warn!(invalid = row_errors.len(), "存在行错误，ALL_OR_NOTHING 整批拒绝");
            errors.push(message.clone());
            Some(message)
        } else {
            None
        };

        // === 步骤 2: 落库 ===
        let mut created_item_ids = Vec::new();
        if rejection.is_none() && !valid_rows.is_empty() {
            debug!(rows = valid_rows.len(), "写入物品");
            let outcomes = self
                .import_repo
                .create_many(project_id, &batch_id, &valid_rows)
                .await?;

            for (outcome, row) in outcomes.into_iter().zip(valid_rows.iter()) {
                match outcome.status {
                    RowInsertStatus::Created { item_id } => created_item_ids.push(item_id),
                    RowInsertStatus::Failed { reason } => row_errors.push(RowError {
                        row_number: outcome.row_number,
                        item_name: Some(row.item.item_name.clone()),
                        messages: vec![reason],
                    }),
                }
            }
            row_errors.sort_by_key(|e| e.row_number);
            info!(created = created_item_ids.len(), "物品写入完成");
        }

        let created = created_item_ids.len();
        let status = if rejection.is_some() || (created == 0 && !row_errors.is_empty()) {
            ImportStatus::Rejected
        } else if row_errors.is_empty() && errors.is_empty() {
            ImportStatus::Completed
        } else {
            ImportStatus::Partial
        };

        let summary = ImportSummary {
            total_rows,
            valid_rows: valid_rows.len(),
            created,
            failed: row_errors.len(),
        };

        // === 步骤 3: 记录批次信息 ===
        let elapsed_time = start_time.elapsed();
        let report_json = json!({
            "policy": ctx.policy.as_str(),
            "locale": ctx.locale,
            "errors": errors,
            "row_errors": row_errors,
        });
        let batch = ImportBatch {
            batch_id: batch_id.clone(),
            project_id: project_id.to_string(),
            source_name: Some(source_name.to_string()),
            status,
            total_rows: saturating_i32(total_rows),
            success_rows: saturating_i32(created),
            failed_rows: saturating_i32(row_errors.len()),
            imported_at: Some(Utc::now()),
            imported_by: Some(ctx.actor.clone()),
            elapsed_ms: Some(saturating_i32(elapsed_time.as_millis())),
            report_json: Some(report_json.to_string()),
        };
        self.import_repo.insert_batch(&batch).await?;

        // === 步骤 4: 操作日志 ===
        let action_type = if status == ImportStatus::Rejected {
            ActionType::BulkImportRejected
        } else {
            ActionType::BulkImport
        };
        let log = ActionLog {
            action_id: Uuid::new_v4().to_string(),
            project_id: Some(project_id.to_string()),
            action_type: action_type.as_str().to_string(),
            action_ts: Utc::now().naive_utc(),
            actor: ctx.actor.clone(),
            payload_json: Some(json!({
                "batch_id": batch_id,
                "source_name": source_name,
                "status": status.as_str(),
                "total_rows": total_rows,
                "created": created,
                "failed": row_errors.len(),
            })),
            detail: rejection,
        };
        self.import_repo.record_action(&log).await?;

        info!(
            batch_id = %batch_id,
            status = status.as_str(),
            total = total_rows,
            created = created,
            failed = row_errors.len(),
            elapsed_ms = elapsed_time.as_millis(),
            "物品批量导入完成"
        );

        Ok(ImportReport {
            batch,
            summary,
            errors,
            row_errors,
            created_item_ids,
            elapsed_time,
        })
    }
}

#[async_trait::async_trait]
impl<R, C> ItemImporter for ItemImporterImpl<R, C>
where
    R: ItemImportRepository + Send + Sync,
    C: ImportConfigReader + Send + Sync,
{
    #[instrument(skip_all, fields(project_id = %project_id))]
    async fn import_from_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
        project_id: &str,
    ) -> ImportResult<ImportReport> {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        let path = file_path.as_ref();
        let source_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        info!(batch_id = %batch_id, file = %path.display(), "开始导入物品数据");
        let ctx = self.load_context().await?;

        let preview = preview_file(
            self.file_parser.as_ref(),
            self.row_validator.as_ref(),
            path,
            &ctx.expected,
            &ctx.locale,
        )
        .await;

        self.commit_preview(&ctx, preview, batch_id, &source_name, project_id, start_time)
            .await
    }

    #[instrument(skip_all, fields(project_id = %project_id, bytes = text.len()))]
    async fn import_from_str(
        &self,
        text: &str,
        source_name: &str,
        project_id: &str,
    ) -> ImportResult<ImportReport> {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();

        info!(batch_id = %batch_id, source = %source_name, "开始导入物品文本");
        let ctx = self.load_context().await?;

        let outcome = CsvParser::new().parse_str(text, &ctx.locale);
        let preview = preview_outcome(
            outcome,
            &ctx.expected,
            self.row_validator.as_ref(),
            &ctx.locale,
        );

        self.commit_preview(&ctx, preview, batch_id, source_name, project_id, start_time)
            .await
    }

    async fn batch_import<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<P>,
        project_id: &str,
    ) -> Vec<Result<ImportReport, String>> {
        use futures::future::join_all;

        info!(count = file_paths.len(), "开始批量导入文件");

        // 为每个文件创建导入任务
        let import_tasks = file_paths.into_iter().map(|path| {
            let path_str = path.as_ref().display().to_string();
            async move {
                match self.import_from_file(path, project_id).await {
                    Ok(report) => {
                        info!(
                            file = %path_str,
                            status = report.status().as_str(),
                            created = report.summary.created,
                            "文件导入结束"
                        );
                        Ok(report)
                    }
                    Err(e) => {
                        error!(file = %path_str, error = %e, "文件导入失败");
                        Err(format!("{}: {}", path_str, e))
                    }
                }
            }
        });

        // 并发执行所有导入任务
        let results = join_all(import_tasks).await;

        info!(
            total = results.len(),
            success = results.iter().filter(|r| r.is_ok()).count(),
            failed = results.iter().filter(|r| r.is_err()).count(),
            "批量导入完成"
        );

        results
    }
}
