// ==========================================
// 室内设计项目管理 - 命令行主入口
// ==========================================
// 子命令:
// - import: 校验并导入物品
// - check:  按配置模板仅校验，不落库
// ==========================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use interior_pm::app::{get_default_db_path, AppState, ImportOverrides};
use interior_pm::domain::{ImportPolicy, ImportPreview, ImportReport, ImportStatus};
use interior_pm::importer::ItemImporter;
use interior_pm::logging;

use crate::cli::{CheckArgs, Cli, Command, ImportArgs};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_json);

    tracing::info!(version = interior_pm::VERSION, "{} 启动", interior_pm::APP_NAME);

    let ok = match cli.command {
        Command::Import(args) => run_import(args).await?,
        Command::Check(args) => run_check(args).await?,
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

/// 导入文件；返回是否无拒绝
async fn run_import(args: ImportArgs) -> Result<bool> {
    let db_path = args.db.unwrap_or_else(get_default_db_path);
    tracing::info!(db_path = %db_path, "使用数据库");

    let state = AppState::new(db_path).context("无法初始化AppState")?;
    let importer = state.item_importer(ImportOverrides {
        locale: args.locale,
        policy: args.all_or_nothing.then_some(ImportPolicy::AllOrNothing),
        template: None,
    })?;

    let report = importer
        .import_from_file(&args.file, &args.project)
        .await
        .with_context(|| format!("导入失败: {}", args.file.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(report.status() != ImportStatus::Rejected)
}

/// 校验文件；返回是否无任何诊断
async fn run_check(args: CheckArgs) -> Result<bool> {
    let db_path = args.db.unwrap_or_else(get_default_db_path);
    tracing::info!(db_path = %db_path, "使用数据库");

    let state = AppState::new(db_path).context("无法初始化AppState")?;
    let importer = state.item_importer(ImportOverrides {
        locale: args.locale,
        policy: None,
        template: args.template,
    })?;

    let preview = importer
        .check_file(&args.file)
        .await
        .with_context(|| format!("校验失败: {}", args.file.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&preview)?);
    } else {
        print_preview(&preview);
    }

    Ok(preview.is_clean())
}

fn print_report(report: &ImportReport) {
    println!("batch:   {}", report.batch.batch_id);
    println!("status:  {}", report.status().as_str());
    println!(
        "rows:    {} total, {} valid, {} created, {} failed",
        report.summary.total_rows,
        report.summary.valid_rows,
        report.summary.created,
        report.summary.failed
    );
    for error in &report.errors {
        println!("error:   {}", error);
    }
    for row_error in &report.row_errors {
        println!("row:     {}", row_error);
    }
}

fn print_preview(preview: &ImportPreview) {
    println!(
        "rows:    {} total, {} valid, {} invalid",
        preview.total_rows,
        preview.valid_rows.len(),
        preview.row_errors.len()
    );
    for error in &preview.errors {
        println!("error:   {}", error);
    }
    for row_error in &preview.row_errors {
        println!("row:     {}", row_error);
    }
}
