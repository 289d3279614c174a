//! Resolution of config files, loader options and filter arguments.

use clap::Args;
use salesboard_data::{BilledAmountPolicy, Dimensions, LoaderConfig, Month};
use salesboard_engine::{DashboardConfig, EngineError, FilterCriteria, MonthRange};
use std::path::{Path, PathBuf};
use tracing::debug;

/// `<config_dir>/salesboard/config.json`, if the platform has a config dir.
pub(crate) fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("salesboard").join("config.json"))
}

/// Load the dashboard config.
///
/// An explicit path must exist. Without one the default location is used
/// when present, otherwise built-in defaults apply.
pub(crate) fn load_dashboard_config(explicit: Option<&Path>) -> Result<DashboardConfig, EngineError> {
    if let Some(path) = explicit {
        return DashboardConfig::from_json_file(path);
    }

    default_config_path().filter(|p| p.is_file()).map_or_else(
        || Ok(DashboardConfig::default()),
        |path| {
            debug!(path = %path.display(), "using default config file");
            DashboardConfig::from_json_file(path)
        },
    )
}

pub(crate) fn loader_config(delimiter: char, clamp_billed: bool) -> Result<LoaderConfig, String> {
    let delimiter = u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| format!("delimiter must be a single ASCII character, got '{delimiter}'"))?;

    Ok(LoaderConfig {
        delimiter,
        billed_policy: if clamp_billed {
            BilledAmountPolicy::Clamp
        } else {
            BilledAmountPolicy::Keep
        },
    })
}

pub(crate) fn parse_month(value: &str) -> Result<Month, String> {
    Month::parse(value).map_err(|e| e.to_string())
}

/// Filter options shared by `report` and `export`.
#[derive(Debug, Clone, Args)]
pub(crate) struct FilterArgs {
    /// Branch (default: configured branch, else the first one in the data)
    #[arg(long)]
    pub(crate) branch: Option<String>,

    /// Segment to include; repeat for several (default: configured segments)
    #[arg(long = "segment")]
    pub(crate) segments: Vec<String>,

    /// Channel to include; repeat for several (default: all channels)
    #[arg(long = "channel")]
    pub(crate) channels: Vec<String>,

    /// First month, YYYY-MM
    #[arg(long, value_parser = parse_month)]
    pub(crate) from: Option<Month>,

    /// Last month, YYYY-MM (default: latest month in the data)
    #[arg(long, value_parser = parse_month)]
    pub(crate) to: Option<Month>,
}

impl FilterArgs {
    /// Merge explicit arguments over the dataset defaults.
    ///
    /// Returns `Ok(None)` for an empty dataset.
    pub(crate) fn resolve(
        &self,
        config: &DashboardConfig,
        dims: &Dimensions,
    ) -> Result<Option<FilterCriteria>, EngineError> {
        let Some(defaults) = config.default_criteria(dims) else {
            return Ok(None);
        };

        let end = self.to.unwrap_or_else(|| defaults.range.end());
        let range = match self.from {
            Some(start) => MonthRange::new(start, end)?,
            None if self.to.is_some() => {
                MonthRange::ending_at(end, config.default_window_months)
            }
            None => defaults.range,
        };

        let branch = self.branch.clone().unwrap_or(defaults.branch);
        let segments = if self.segments.is_empty() {
            defaults.segments
        } else {
            self.segments.iter().cloned().collect()
        };
        let channels = if self.channels.is_empty() {
            defaults.channels
        } else {
            self.channels.iter().cloned().collect()
        };

        Ok(Some(FilterCriteria::new(branch, segments, channels, range)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use salesboard_data::SalesRecord;

    fn m(year: i32, month: u32) -> Month {
        Month::new(year, month).unwrap()
    }

    fn dims() -> Dimensions {
        let records: Vec<SalesRecord> = [m(2024, 1), m(2024, 12)]
            .into_iter()
            .map(|period| {
                SalesRecord::new(
                    "TALCA".to_string(),
                    "TRADICIONAL".to_string(),
                    "KKAA".to_string(),
                    period,
                    1.0,
                    false,
                    0.0,
                )
            })
            .collect();
        Dimensions::from_records(&records)
    }

    fn args() -> FilterArgs {
        FilterArgs {
            branch: None,
            segments: Vec::new(),
            channels: Vec::new(),
            from: None,
            to: None,
        }
    }

    #[test]
    fn test_resolve_defaults() {
        let criteria = args()
            .resolve(&DashboardConfig::default(), &dims())
            .unwrap()
            .unwrap();
        assert_eq!(criteria.branch, "TALCA");
        assert_eq!(criteria.range, MonthRange::new(m(2024, 7), m(2024, 12)).unwrap());
    }

    #[test]
    fn test_resolve_overrides() {
        let args = FilterArgs {
            branch: Some("CURICO".to_string()),
            segments: vec!["OTROS".to_string()],
            to: Some(m(2024, 4)),
            ..args()
        };
        let criteria = args
            .resolve(&DashboardConfig::default(), &dims())
            .unwrap()
            .unwrap();

        assert_eq!(criteria.branch, "CURICO");
        assert!(criteria.segments.contains("OTROS"));
        assert_eq!(criteria.range, MonthRange::new(m(2023, 11), m(2024, 4)).unwrap());
    }

    #[test]
    fn test_resolve_reversed_range() {
        let args = FilterArgs {
            from: Some(m(2024, 6)),
            to: Some(m(2024, 2)),
            ..args()
        };
        let err = args.resolve(&DashboardConfig::default(), &dims()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidRange { .. }));
    }

    #[test]
    fn test_resolve_empty_dataset() {
        let resolved = args()
            .resolve(&DashboardConfig::default(), &Dimensions::default())
            .unwrap();
        assert!(resolved.is_none());
    }

    #[test]
    fn test_loader_config() {
        let config = loader_config(';', true).unwrap();
        assert_eq!(config.delimiter, b';');
        assert_eq!(config.billed_policy, BilledAmountPolicy::Clamp);
        assert!(loader_config('é', false).is_err());
    }
}
