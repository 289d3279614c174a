//! Dashboard defaults.

use crate::error::{EngineError, Result};
use crate::filter::FilterCriteria;
use crate::window::MonthRange;
use salesboard_data::Dimensions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Initial selection shown before the user picks any filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Preferred branch (default: TALCA)
    pub default_branch: String,
    /// Preferred segments (default: TRADICIONAL)
    pub default_segments: Vec<String>,
    /// Length of the default window in months (default: 6)
    pub default_window_months: u32,
    /// Maximum rows in a detail preview (default: 2000)
    pub preview_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_branch: "TALCA".to_string(),
            default_segments: vec!["TRADICIONAL".to_string()],
            default_window_months: 6,
            preview_rows: 2000,
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config file. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// sets `default_window_months` to 0.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        debug!(path = %path.as_ref().display(), "loaded dashboard config");
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] for a zero-length default window.
    pub fn validate(&self) -> Result<()> {
        if self.default_window_months == 0 {
            return Err(EngineError::Config(
                "default_window_months must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Default criteria for a dataset, or `None` if it has no rows.
    ///
    /// - branch: the configured one if present, else the first in sort order
    /// - segments: the configured ones that occur in the data (may be empty)
    /// - channels: all of them
    /// - months: the last `default_window_months` months of the data, never
    ///   starting before the first month
    pub fn default_criteria(&self, dims: &Dimensions) -> Option<FilterCriteria> {
        let (first, last) = dims.period_bounds?;

        let branch = if dims.branches.contains(&self.default_branch) {
            self.default_branch.clone()
        } else {
            dims.branches.first()?.clone()
        };

        let segments = self
            .default_segments
            .iter()
            .filter(|s| dims.segments.contains(*s))
            .cloned();

        let range = MonthRange::ending_at(last, self.default_window_months).clamp_start(first);

        Some(FilterCriteria::new(
            branch,
            segments,
            dims.channels.iter().cloned(),
            range,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use salesboard_data::{Month, SalesRecord};

    fn m(year: i32, month: u32) -> Month {
        Month::new(year, month).unwrap()
    }

    fn dims(branches: &[&str], segments: &[&str], first: Month, last: Month) -> Dimensions {
        let mut records = Vec::new();
        for branch in branches {
            for segment in segments {
                for period in [first, last] {
                    records.push(SalesRecord::new(
                        branch.to_string(),
                        segment.to_string(),
                        "KKAA".to_string(),
                        period,
                        1.0,
                        false,
                        0.0,
                    ));
                }
            }
        }
        Dimensions::from_records(&records)
    }

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.default_branch, "TALCA");
        assert_eq!(config.default_segments, vec!["TRADICIONAL"]);
        assert_eq!(config.default_window_months, 6);
        assert_eq!(config.preview_rows, 2000);
    }

    #[test]
    fn test_default_criteria_prefers_configured_values() {
        let dims = dims(
            &["CURICO", "TALCA"],
            &["MAYORISTA", "TRADICIONAL"],
            m(2024, 1),
            m(2025, 5),
        );
        let criteria = DashboardConfig::default().default_criteria(&dims).unwrap();

        assert_eq!(criteria.branch, "TALCA");
        assert_eq!(criteria.segments.len(), 1);
        assert!(criteria.segments.contains("TRADICIONAL"));
        assert_eq!(criteria.channels, dims.channels);
        assert_eq!(criteria.range.start(), m(2024, 12));
        assert_eq!(criteria.range.end(), m(2025, 5));
    }

    #[test]
    fn test_default_criteria_falls_back() {
        let dims = dims(&["PARRAL", "CURICO"], &["OTROS"], m(2024, 1), m(2024, 3));
        let criteria = DashboardConfig::default().default_criteria(&dims).unwrap();

        assert_eq!(criteria.branch, "CURICO");
        assert!(criteria.segments.is_empty());
        assert_eq!(criteria.range.start(), m(2024, 1));
        assert_eq!(criteria.range.len(), 3);
    }

    #[test]
    fn test_default_criteria_for_empty_table() {
        let config = DashboardConfig::default();
        assert!(config.default_criteria(&Dimensions::default()).is_none());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: DashboardConfig =
            serde_json::from_str(r#"{"default_branch": "LINARES"}"#).unwrap();
        assert_eq!(config.default_branch, "LINARES");
        assert_eq!(config.default_window_months, 6);
    }

    #[test]
    fn test_from_json_file() {
        let path = std::env::temp_dir().join(format!(
            "salesboard_config_{}.json",
            std::process::id()
        ));

        std::fs::write(&path, r#"{"default_window_months": 0}"#).unwrap();
        let err = DashboardConfig::from_json_file(&path).unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));

        std::fs::write(&path, r#"{"default_window_months": 3, "preview_rows": 10}"#).unwrap();
        let config = DashboardConfig::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.default_window_months, 3);
        assert_eq!(config.preview_rows, 10);
    }
}
