// ==========================================
// 室内设计项目管理 - 文件解析器实现
// ==========================================
// 阶段 0: 文件读取与解析
// 支持: CSV (.csv/.txt) / TSV (.tsv) / Excel (.xlsx/.xls)
// ==========================================
// 规则:
// - 第一行为表头，表头与字段值均 TRIM
// - 完全空白的行跳过
// - 重复表头: 同一行内后出现的列覆盖先出现的列（last value wins）
// - 读取失败: 无数据 + 单条错误（终止性结果）
// ==========================================

use crate::domain::{ParseOutcome, RawRecord};
use crate::i18n::{tr, tr_with_args};
use crate::importer::error::ImportResult;
use crate::importer::item_importer_trait::FileParser;
use async_trait::async_trait;
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// 将一行值按表头顺序映射为 RawRecord
///
/// - 超出表头宽度的值忽略
/// - 表头宽度内的原始值全部空白时返回 None（按原始值判断，不受重复表头覆盖影响）
fn row_to_record<I, S>(headers: &[String], values: I) -> Option<RawRecord>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut row_map = RawRecord::new();
    let mut any_non_empty = false;
    for (col_idx, value) in values.into_iter().enumerate() {
        if let Some(header) = headers.get(col_idx) {
            let value = value.as_ref().trim();
            any_non_empty |= !value.is_empty();
            row_map.insert(header.clone(), value.to_string());
        }
    }

    any_non_empty.then_some(row_map)
}

fn read_failed(locale: &str, reason: &str) -> String {
    tr_with_args(locale, "import.read_failed", &[("reason", reason)])
}

// ==========================================
// CSV Parser 实现
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct CsvParser {
    delimiter: u8,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定分隔符（如 TSV 使用 b'\t'）
    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// 解析内存中的文本（同步）
    pub fn parse_str(&self, text: &str, locale: &str) -> ParseOutcome<RawRecord> {
        self.parse_bytes(text.as_bytes(), locale)
    }

    /// 解析原始字节（同步）
    pub fn parse_bytes(&self, bytes: &[u8], locale: &str) -> ParseOutcome<RawRecord> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .delimiter(self.delimiter)
            .from_reader(bytes);

        // 读取表头
        let headers: Vec<String> = match reader.headers() {
            Ok(record) => record.iter().map(|h| h.trim().to_string()).collect(),
            Err(e) => {
                error!(error = %e, "表头读取失败");
                return ParseOutcome::failed(read_failed(locale, &e.to_string()));
            }
        };

        // 读取所有行
        let mut records = Vec::new();
        let mut errors = Vec::new();
        for result in reader.records() {
            match result {
                Ok(record) => {
                    if let Some(row_map) = row_to_record(&headers, record.iter()) {
                        records.push(row_map);
                    }
                }
                Err(e) => {
                    let line = e
                        .position()
                        .map(|p| p.line().to_string())
                        .unwrap_or_else(|| "?".to_string());
                    warn!(line = %line, error = %e, "CSV 行解析失败");
                    errors.push(tr_with_args(
                        locale,
                        "import.malformed_row",
                        &[("row", &line), ("reason", &e.to_string())],
                    ));
                }
            }
        }

        debug!(
            columns = headers.len(),
            rows = records.len(),
            errors = errors.len(),
            "CSV 解析完成"
        );

        ParseOutcome::new(headers, records, errors)
    }
}

#[async_trait]
impl FileParser for CsvParser {
    async fn parse_file(&self, file_path: &Path, locale: &str) -> ParseOutcome<RawRecord> {
        match tokio::fs::read(file_path).await {
            Ok(bytes) => self.parse_bytes(&bytes, locale),
            Err(e) => {
                error!(file = %file_path.display(), error = %e, "文件读取失败");
                ParseOutcome::failed(read_failed(locale, &e.to_string()))
            }
        }
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
// 读取第一个工作表，第一行为表头
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcelParser;

/// 工作表读取结果（表头, 数据行）; None 表示工作簿无工作表
type SheetRows = Option<(Vec<String>, Vec<Vec<String>>)>;

/// 单元格转文本: 整数值的浮点单元格不带小数部分（80.0 → "80"）
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{}", *f as i64)
        }
        other => other.to_string(),
    }
}

impl ExcelParser {
    fn read_first_sheet(path: &Path) -> ImportResult<SheetRows> {
        let mut workbook = open_workbook_auto(path)?;

        let sheet_names = workbook.sheet_names();
        let Some(sheet_name) = sheet_names.first().cloned() else {
            return Ok(None);
        };

        let range = workbook.worksheet_range(&sheet_name)?;

        let mut rows = range
            .rows()
            .map(|row| row.iter().map(cell_text).collect::<Vec<_>>());

        let headers = rows
            .next()
            .map(|row| row.iter().map(|h| h.trim().to_string()).collect())
            .unwrap_or_default();

        Ok(Some((headers, rows.collect())))
    }
}

#[async_trait]
impl FileParser for ExcelParser {
    async fn parse_file(&self, file_path: &Path, locale: &str) -> ParseOutcome<RawRecord> {
        let path: PathBuf = file_path.to_path_buf();
        let joined = tokio::task::spawn_blocking(move || Self::read_first_sheet(&path)).await;

        let sheet = match joined {
            Ok(Ok(Some(sheet))) => sheet,
            Ok(Ok(None)) => return ParseOutcome::failed(tr(locale, "import.no_worksheet")),
            Ok(Err(e)) => {
                error!(file = %file_path.display(), error = %e, "Excel 读取失败");
                return ParseOutcome::failed(read_failed(locale, &e.to_string()));
            }
            Err(e) => {
                error!(file = %file_path.display(), error = %e, "Excel 读取任务失败");
                return ParseOutcome::failed(read_failed(locale, &e.to_string()));
            }
        };

        let (headers, rows) = sheet;
        let records: Vec<RawRecord> = rows
            .iter()
            .filter_map(|row| row_to_record(&headers, row))
            .collect();

        debug!(columns = headers.len(), rows = records.len(), "Excel 解析完成");
        ParseOutcome::new(headers, records, Vec::new())
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct UniversalFileParser;

#[async_trait]
impl FileParser for UniversalFileParser {
    async fn parse_file(&self, file_path: &Path, locale: &str) -> ParseOutcome<RawRecord> {
        let ext = file_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" | "txt" => CsvParser::new().parse_file(file_path, locale).await,
            "tsv" => CsvParser::with_delimiter(b'\t').parse_file(file_path, locale).await,
            "xlsx" | "xls" => ExcelParser.parse_file(file_path, locale).await,
            _ => {
                warn!(file = %file_path.display(), ext = %ext, "文件格式不支持");
                ParseOutcome::failed(tr_with_args(
                    locale,
                    "import.unsupported_format",
                    &[("ext", &ext)],
                ))
            }
        }
    }
}
