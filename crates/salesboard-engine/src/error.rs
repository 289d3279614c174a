//! Error types for the comparison engine.

use salesboard_data::Month;
use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors raised while building queries or loading engine configuration.
///
/// Empty selections and zero denominators are not errors; they are
/// represented in the results themselves.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Range start is after its end
    #[error("Invalid month range: start {start} is after end {end}")]
    InvalidRange {
        /// Requested first month
        start: Month,
        /// Requested last month
        end: Month,
    },

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
