#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/salesboard/salesboard/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod aggregate;
pub mod config;
pub mod delta;
pub mod error;
pub mod filter;
pub mod query;
pub mod window;

pub use aggregate::{
    Aggregate, GroupAggregate, GroupKey, SummaryGroup, aggregate, aggregate_by, summary_breakdown,
};
pub use config::DashboardConfig;
pub use delta::{Deltas, safe_percent_change};
pub use error::{EngineError, Result};
pub use filter::{FilterCriteria, Selection, apply_filter};
pub use query::{DashboardReport, run_query};
pub use window::{MonthRange, derive_previous_window, month_distance};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
