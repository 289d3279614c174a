//! Synthetic demo dataset.
//!
//! Produces a deterministic, fully fictitious sales table for demos and
//! manual testing of the dashboard. Enabled customers bill a larger share
//! of their sales through B2B than non-enabled ones.

use crate::error::Result;
use crate::month::Month;
use crate::record::SalesRecord;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

const FIRST_MONTH: Month = match Month::new(2024, 1) {
    Some(m) => m,
    None => panic!("invalid first month"),
};

const LAST_MONTH: Month = match Month::new(2025, 5) {
    Some(m) => m,
    None => panic!("invalid last month"),
};

/// Configuration for the synthetic dataset generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntheticConfig {
    /// RNG seed (default: 7)
    pub seed: u64,
    /// Branches to generate
    pub branches: Vec<String>,
    /// Segments to generate
    pub segments: Vec<String>,
    /// Channels drawn uniformly per row
    pub channels: Vec<String>,
    /// First generated month (inclusive)
    pub first_month: Month,
    /// Last generated month (inclusive)
    pub last_month: Month,
    /// Minimum rows per (month, branch, segment), inclusive
    pub min_rows: u32,
    /// Maximum rows per (month, branch, segment), exclusive
    pub max_rows: u32,
    /// Probability that a customer is B2B enabled
    pub enabled_probability: f64,
    /// Mean of the normally distributed row total
    pub total_mean: f64,
    /// Standard deviation of the row total; draws are clipped at zero
    pub total_std_dev: f64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        let owned = |values: &[&str]| -> Vec<String> { values.iter().map(|v| v.to_string()).collect() };
        Self {
            seed: 7,
            branches: owned(&["TALCA", "CURICO", "LINARES", "PARRAL"]),
            segments: owned(&["TRADICIONAL", "MAYORISTA", "OTROS"]),
            channels: owned(&["MODERNO", "KKAA", "HORECA", "TT_RESTO"]),
            first_month: FIRST_MONTH,
            last_month: LAST_MONTH,
            min_rows: 80,
            max_rows: 160,
            enabled_probability: 0.6,
            total_mean: 240_000.0,
            total_std_dev: 90_000.0,
        }
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Generate records for every (month, branch, segment) combination.
///
/// The output depends only on the configuration, so the same seed always
/// yields the same table.
pub fn generate(config: &SyntheticConfig) -> Vec<SalesRecord> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut records = Vec::new();

    let span = config.first_month.months_until(config.last_month);
    if span < 0 || config.channels.is_empty() || config.max_rows <= config.min_rows {
        return records;
    }

    let probability = config.enabled_probability.clamp(0.0, 1.0);
    let std_dev = config.total_std_dev.abs();

    for offset in 0..=span {
        let period = config.first_month.add_months(offset);
        for branch in &config.branches {
            for segment in &config.segments {
                let rows = rng.gen_range(config.min_rows..config.max_rows);
                for _ in 0..rows {
                    let enabled = rng.gen_bool(probability);
                    let z: f64 = rng.sample(StandardNormal);
                    let total = (config.total_mean + std_dev * z).max(0.0);
                    let share = if enabled {
                        rng.gen_range(0.2..0.6)
                    } else {
                        rng.gen_range(0.0..0.15)
                    };
                    let channel = &config.channels[rng.gen_range(0..config.channels.len())];

                    records.push(SalesRecord::new(
                        branch.clone(),
                        segment.clone(),
                        channel.clone(),
                        period,
                        round_cents(total),
                        enabled,
                        round_cents(total * share),
                    ));
                }
            }
        }
    }

    records
}

/// Write records as CSV with canonical headers.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_csv(records: &[SalesRecord], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = csv::Writer::from_path(path)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;

    info!(path = %path.display(), rows = records.len(), "wrote synthetic dataset");
    Ok(())
}
