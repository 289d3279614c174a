#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/salesboard/salesboard/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod report;
pub mod summary;

pub use export::{
    ExportError, ExportFormat, ExportPaths, Exporter, FilteredRowsExport, SummaryExport,
    SummaryRow, write_exports,
};
pub use report::{Report, ReportBuilder, ReportError};
pub use summary::{
    BreakdownRow, BreakdownTable, KpiCard, KpiSummary, RowPreview, format_delta, format_money,
    format_pct,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
