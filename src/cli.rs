// ==========================================
// 室内设计项目管理 - 命令行参数定义
// ==========================================

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "interior-pm",
    version,
    about = "Bulk item import for interior design projects",
    long_about = "Validate and import project items from CSV, TSV or Excel files.\n\n\
                  Expected columns: area, item_name, description, category, cost."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Emit logs as JSON lines.
    #[arg(long = "log-json", global = true)]
    pub log_json: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a file and import its valid rows into a project.
    Import(ImportArgs),

    /// Validate a file against the configured template without importing it.
    Check(CheckArgs),
}

#[derive(Args)]
pub struct ImportArgs {
    /// File to import (.csv, .tsv, .txt, .xlsx, .xls).
    #[arg(long, value_name = "PATH")]
    pub file: PathBuf,

    /// Target project id.
    #[arg(long, value_name = "ID")]
    pub project: String,

    /// Database path (default: INTERIOR_PM_DB_PATH or the user data dir).
    #[arg(long, value_name = "PATH")]
    pub db: Option<String>,

    /// Diagnostic language (en, es).
    #[arg(long, value_name = "LOCALE")]
    pub locale: Option<String>,

    /// Reject the whole file when any row fails validation.
    #[arg(long = "all-or-nothing")]
    pub all_or_nothing: bool,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CheckArgs {
    /// File to validate.
    #[arg(long, value_name = "PATH")]
    pub file: PathBuf,

    /// Database holding the import configuration (default: INTERIOR_PM_DB_PATH or the user data dir).
    #[arg(long, value_name = "PATH")]
    pub db: Option<String>,

    /// Import template whose expected columns are checked.
    #[arg(long, value_name = "NAME")]
    pub template: Option<String>,

    /// Diagnostic language (en, es).
    #[arg(long, value_name = "LOCALE")]
    pub locale: Option<String>,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}
