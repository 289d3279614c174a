#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/salesboard/salesboard/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod dashboard;

// Re-export main types from sub-crates
pub use salesboard_data as data;
pub use salesboard_engine as engine;
pub use salesboard_output as output;

pub use dashboard::Dashboard;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
