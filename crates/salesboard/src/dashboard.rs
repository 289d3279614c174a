//! A loaded dataset together with its dashboard defaults.

use salesboard_data::{LoaderConfig, Result, SalesTable, load_with_config};
use salesboard_engine::{DashboardConfig, DashboardReport, FilterCriteria, run_query};
use std::path::Path;

/// Sales table plus dashboard configuration.
///
/// The table is immutable after loading, so one `Dashboard` can serve any
/// number of queries, including from several threads at once.
#[derive(Debug, Clone)]
pub struct Dashboard {
    table: SalesTable,
    config: DashboardConfig,
}

impl Dashboard {
    /// Wrap an already loaded table.
    pub const fn new(table: SalesTable, config: DashboardConfig) -> Self {
        Self { table, config }
    }

    /// Load a dataset with default loader and dashboard settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, &LoaderConfig::default(), DashboardConfig::default())
    }

    /// Load a dataset with explicit settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded.
    pub fn open_with(
        path: impl AsRef<Path>,
        loader: &LoaderConfig,
        config: DashboardConfig,
    ) -> Result<Self> {
        let table = load_with_config(path, loader)?;
        Ok(Self::new(table, config))
    }

    /// The loaded table.
    pub const fn table(&self) -> &SalesTable {
        &self.table
    }

    /// Dashboard settings.
    pub const fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Initial criteria for this dataset, `None` if it is empty.
    pub fn default_criteria(&self) -> Option<FilterCriteria> {
        self.config.default_criteria(self.table.dimensions())
    }

    /// Run a query.
    pub fn query(&self, criteria: &FilterCriteria) -> DashboardReport<'_> {
        run_query(&self.table, criteria)
    }
}
