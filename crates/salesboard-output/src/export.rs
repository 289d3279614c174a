//! CSV and JSON exports of a dashboard query.
//!
//! Two exports exist for every query:
//!
//! - the filtered rows, in the same shape as the input dataset
//! - the (month, segment, channel) summary of those rows
//!
//! CSV output is UTF-8 with a header row and `.` as decimal separator.

use salesboard_data::{Month, SalesRecord};
use salesboard_engine::{DashboardReport, SummaryGroup};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

/// File stem of the filtered rows export.
pub const FILTERED_FILE_STEM: &str = "filtered";

/// File stem of the summary export.
pub const SUMMARY_FILE_STEM: &str = "summary";

const FILTERED_HEADERS: [&str; 7] = [
    "branch",
    "segment",
    "channel",
    "period",
    "total_amount",
    "b2b_enabled",
    "b2b_billed_amount",
];

const SUMMARY_HEADERS: [&str; 7] = [
    "month",
    "segment",
    "channel",
    "total_sales",
    "b2b_billed_amount_sum",
    "enabled_pct",
    "b2b_pct",
];

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Output was not valid UTF-8.
    #[error("Encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }

    /// File name for an export stem, e.g. `filtered.csv`.
    pub fn file_name(&self, stem: &str) -> String {
        format!("{stem}.{}", self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" | "pretty_json" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn to_csv<T: Serialize>(
    headers: &[&str],
    rows: impl IntoIterator<Item = T>,
) -> Result<String, ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(vec![]);
    wtr.write_record(headers)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

fn to_json<T: Serialize + ?Sized>(value: &T, format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(value)?),
        _ => Ok(serde_json::to_string(value)?),
    }
}

/// Every row matching a query, unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredRowsExport<'a> {
    rows: Vec<&'a SalesRecord>,
}

impl<'a> FilteredRowsExport<'a> {
    /// Export the given rows.
    pub const fn new(rows: Vec<&'a SalesRecord>) -> Self {
        Self { rows }
    }

    /// Export the current-window rows of a report.
    pub fn from_report(report: &DashboardReport<'a>) -> Self {
        Self::new(report.matched_rows.clone())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no rows. The export still carries a header.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Exporter for FilteredRowsExport<'_> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => to_csv(&FILTERED_HEADERS, &self.rows),
            ExportFormat::Json | ExportFormat::PrettyJson => to_json(&self.rows, format),
        }
    }
}

/// One (month, segment, channel) row of the summary export.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SummaryRow {
    /// Month.
    pub month: Month,

    /// Segment.
    pub segment: String,

    /// Channel.
    pub channel: String,

    /// Sum of total amounts.
    pub total_sales: f64,

    /// Sum of B2B billed amounts.
    pub b2b_billed_amount_sum: f64,

    /// Share of enabled rows × 100; empty for a group without rows.
    pub enabled_pct: Option<f64>,

    /// Billed over total × 100.
    pub b2b_pct: f64,
}

impl From<&SummaryGroup> for SummaryRow {
    fn from(group: &SummaryGroup) -> Self {
        Self {
            month: group.month,
            segment: group.segment.clone(),
            channel: group.channel.clone(),
            total_sales: group.metrics.total_sales,
            b2b_billed_amount_sum: group.metrics.b2b_billed,
            enabled_pct: group.metrics.enabled_pct,
            b2b_pct: group.metrics.b2b_pct,
        }
    }
}

/// Summary of a query's rows per (month, segment, channel).
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryExport {
    rows: Vec<SummaryRow>,
}

impl SummaryExport {
    /// Export precomputed summary groups.
    pub fn from_groups(groups: &[SummaryGroup]) -> Self {
        Self {
            rows: groups.iter().map(SummaryRow::from).collect(),
        }
    }

    /// Export the summary of a report's current window.
    pub fn from_report(report: &DashboardReport<'_>) -> Self {
        Self::from_groups(&report.summary())
    }

    /// Summary rows.
    pub fn rows(&self) -> &[SummaryRow] {
        &self.rows
    }
}

impl Exporter for SummaryExport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => to_csv(&SUMMARY_HEADERS, &self.rows),
            ExportFormat::Json | ExportFormat::PrettyJson => to_json(&self.rows, format),
        }
    }
}

/// Paths written by [`write_exports`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    /// Filtered rows file.
    pub filtered: PathBuf,

    /// Summary file.
    pub summary: PathBuf,
}

/// Write both exports of a report into `dir`, creating it if needed.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or a file cannot be
/// written.
pub fn write_exports(
    report: &DashboardReport<'_>,
    dir: &Path,
    format: ExportFormat,
) -> Result<ExportPaths, ExportError> {
    std::fs::create_dir_all(dir)?;

    let paths = ExportPaths {
        filtered: dir.join(format.file_name(FILTERED_FILE_STEM)),
        summary: dir.join(format.file_name(SUMMARY_FILE_STEM)),
    };

    let filtered = FilteredRowsExport::from_report(report);
    filtered.export_to_file(&paths.filtered, format)?;

    let summary = SummaryExport::from_report(report);
    summary.export_to_file(&paths.summary, format)?;

    info!(
        dir = %dir.display(),
        filtered_rows = filtered.len(),
        summary_rows = summary.rows().len(),
        "wrote exports"
    );

    Ok(paths)
}
