//! Error types for dataset loading.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataLoadError>;

/// Errors that can occur while loading or writing a sales dataset.
///
/// Any of these aborts the load: a table is either fully loaded or not
/// returned at all.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// Source file does not exist
    #[error("Dataset not found: {path}")]
    NotFound {
        /// Path that was looked up
        path: String,
    },

    /// Required columns are absent from the header row
    #[error("Missing required columns: {}", missing.join(", "))]
    MissingColumns {
        /// Canonical names of every missing column
        missing: Vec<String>,
    },

    /// A cell could not be interpreted
    #[error("Malformed value in row {row}, column '{column}': {reason}")]
    Malformed {
        /// 1-based data row (header excluded)
        row: usize,
        /// Canonical column name
        column: String,
        /// What was wrong with the value
        reason: String,
    },

    /// Period value is not a recognizable month
    #[error("Invalid period '{0}': expected YYYY-MM or YYYY-MM-DD")]
    InvalidPeriod(String),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
