#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/salesboard/salesboard/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod loader;
pub mod month;
pub mod record;
pub mod synthetic;

pub use error::{DataLoadError, Result};
pub use loader::{BilledAmountPolicy, LoaderConfig, load, load_with_config};
pub use month::Month;
pub use record::{Dimensions, SalesRecord, SalesTable};
pub use synthetic::SyntheticConfig;

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
