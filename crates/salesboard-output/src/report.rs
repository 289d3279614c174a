//! JSON report envelope.

use chrono::{DateTime, Utc};
use salesboard_data::Month;
use salesboard_engine::{DashboardReport, MonthRange};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A required builder field was not set.
    #[error("Missing report field: {0}")]
    MissingField(&'static str),
}

/// A dashboard report with generation metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Branch reported on.
    pub branch: String,

    /// Report generation timestamp.
    pub generated_at: DateTime<Utc>,

    /// First month of the reported window.
    pub window_start: Month,

    /// Last month of the reported window.
    pub window_end: Month,

    /// Report contents (JSON format).
    pub contents: serde_json::Value,
}

impl Report {
    /// Create a new report stamped with the current time.
    pub fn new(branch: String, window: MonthRange, contents: serde_json::Value) -> Self {
        Self {
            branch,
            generated_at: Utc::now(),
            window_start: window.start(),
            window_end: window.end(),
            contents,
        }
    }

    /// Convert report to JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the contents cannot be serialized.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to_file(&self, path: &Path) -> Result<(), ReportError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Builder for creating reports.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    branch: Option<String>,
    window: Option<MonthRange>,
    contents: Option<serde_json::Value>,
}

impl ReportBuilder {
    /// Create a new report builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder preset from a dashboard query, with the query as contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the query cannot be serialized.
    pub fn from_dashboard(report: &DashboardReport<'_>) -> Result<Self, ReportError> {
        Ok(Self::new()
            .branch(report.criteria.branch.clone())
            .window(report.current_window)
            .contents(serde_json::to_value(report)?))
    }

    /// Set the branch.
    pub fn branch(mut self, branch: String) -> Self {
        self.branch = Some(branch);
        self
    }

    /// Set the reported window.
    pub const fn window(mut self, window: MonthRange) -> Self {
        self.window = Some(window);
        self
    }

    /// Set the report contents.
    pub fn contents(mut self, contents: serde_json::Value) -> Self {
        self.contents = Some(contents);
        self
    }

    /// Build the report.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::MissingField`] if no window was set.
    pub fn build(self) -> Result<Report, ReportError> {
        let window = self.window.ok_or(ReportError::MissingField("window"))?;
        Ok(Report::new(
            self.branch.unwrap_or_default(),
            window,
            self.contents.unwrap_or(serde_json::Value::Null),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> MonthRange {
        MonthRange::new(Month::new(2024, 11).unwrap(), Month::new(2025, 2).unwrap()).unwrap()
    }

    #[test]
    fn test_report_creation() {
        let report = Report::new("TALCA".to_string(), window(), serde_json::json!({"test": "data"}));

        assert_eq!(report.branch, "TALCA");
        assert_eq!(report.window_start.to_string(), "2024-11");
        assert_eq!(report.window_end.to_string(), "2025-02");
    }

    #[test]
    fn test_report_builder() {
        let report = ReportBuilder::new()
            .branch("CURICO".to_string())
            .window(window())
            .contents(serde_json::json!({"key": "value"}))
            .build()
            .unwrap();

        assert_eq!(report.branch, "CURICO");
        assert_eq!(report.contents["key"], "value");
    }

    #[test]
    fn test_builder_requires_window() {
        let err = ReportBuilder::new().branch("TALCA".to_string()).build().unwrap_err();
        assert!(matches!(err, ReportError::MissingField("window")));
    }

    #[test]
    fn test_json_round_trip() {
        let report = Report::new("TALCA".to_string(), window(), serde_json::Value::Null);
        let json = report.to_json().unwrap();
        let parsed: Report = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.branch, report.branch);
        assert_eq!(parsed.window_start, report.window_start);
        assert_eq!(parsed.generated_at, report.generated_at);
    }
}
