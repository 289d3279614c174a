//! Dataset loading.
//!
//! Reads a delimited sales file with polars, resolves each logical column
//! under its canonical or legacy header, normalizes types with a lazy
//! `select`, and materializes the rows into typed [`SalesRecord`]s.
//!
//! Loading is all-or-nothing: the first bad cell aborts with a
//! [`DataLoadError`] naming the row and column.

use crate::error::{DataLoadError, Result};
use crate::month::Month;
use crate::record::{SalesRecord, SalesTable};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// What to do with rows whose B2B billed amount exceeds the total amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BilledAmountPolicy {
    /// Keep the values as they are and log a warning with the count.
    #[default]
    Keep,
    /// Clamp the billed amount to the total amount and log a warning.
    Clamp,
}

/// Configuration for the dataset loader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Field delimiter (default: `,`)
    pub delimiter: u8,
    /// Handling of billed amounts above the total (default: keep)
    pub billed_policy: BilledAmountPolicy,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            billed_policy: BilledAmountPolicy::Keep,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ColumnKind {
    Text,
    Amount,
    Flag,
}

impl ColumnKind {
    fn dtype(self) -> DataType {
        match self {
            Self::Text => DataType::String,
            Self::Amount => DataType::Float64,
            Self::Flag => DataType::Int64,
        }
    }
}

/// A logical column and the headers it may appear under.
#[derive(Debug)]
struct ColumnSpec {
    canonical: &'static str,
    legacy: &'static str,
    kind: ColumnKind,
}

const COLUMNS: [ColumnSpec; 7] = [
    ColumnSpec {
        canonical: "branch",
        legacy: "Sucursal",
        kind: ColumnKind::Text,
    },
    ColumnSpec {
        canonical: "segment",
        legacy: "Segmento",
        kind: ColumnKind::Text,
    },
    ColumnSpec {
        canonical: "channel",
        legacy: "Canal",
        kind: ColumnKind::Text,
    },
    ColumnSpec {
        canonical: "period",
        legacy: "Mes",
        kind: ColumnKind::Text,
    },
    ColumnSpec {
        canonical: "total_amount",
        legacy: "$ TOTAL",
        kind: ColumnKind::Amount,
    },
    ColumnSpec {
        canonical: "b2b_enabled",
        legacy: "Habilitado B2B",
        kind: ColumnKind::Flag,
    },
    ColumnSpec {
        canonical: "b2b_billed_amount",
        legacy: "$ FACT B2B",
        kind: ColumnKind::Amount,
    },
];

impl ColumnSpec {
    fn resolve(&self, df: &DataFrame) -> Option<&'static str> {
        [self.canonical, self.legacy]
            .into_iter()
            .find(|name| df.column(name).is_ok())
    }
}

/// Load a sales dataset with the default configuration.
///
/// # Errors
///
/// Returns [`DataLoadError`] if the file is missing, unreadable, lacks a
/// required column, or contains a value that cannot be interpreted.
pub fn load(path: impl AsRef<Path>) -> Result<SalesTable> {
    load_with_config(path, &LoaderConfig::default())
}

/// Load a sales dataset.
///
/// # Errors
///
/// Returns [`DataLoadError`] if the file is missing, unreadable, lacks a
/// required column, or contains a value that cannot be interpreted.
pub fn load_with_config(path: impl AsRef<Path>, config: &LoaderConfig) -> Result<SalesTable> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(DataLoadError::NotFound {
            path: path.display().to_string(),
        });
    }

    // Every column is read as text; `normalize` does the typing.
    let raw = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|opts| opts.with_separator(config.delimiter))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    debug!(path = %path.display(), rows = raw.height(), "read raw dataset");

    let normalized = normalize(raw)?;
    let records = materialize(&normalized, config.billed_policy)?;
    let table = SalesTable::new(records);

    let dims = table.dimensions();
    info!(
        path = %path.display(),
        rows = table.len(),
        branches = dims.branches.len(),
        segments = dims.segments.len(),
        channels = dims.channels.len(),
        "loaded sales dataset"
    );

    Ok(table)
}

/// Select every logical column under its canonical name with its target type.
///
/// Casts are non-strict: a cell that does not parse becomes null and is
/// reported as malformed by `materialize`.
fn normalize(raw: DataFrame) -> Result<DataFrame> {
    let mut missing = Vec::new();
    let mut exprs = Vec::with_capacity(COLUMNS.len());

    for spec in &COLUMNS {
        match spec.resolve(&raw) {
            Some(source) => exprs.push(
                col(source)
                    .cast(spec.kind.dtype())
                    .alias(spec.canonical),
            ),
            None => missing.push(spec.canonical.to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(DataLoadError::MissingColumns { missing });
    }

    Ok(raw.lazy().select(exprs).collect()?)
}

fn materialize(df: &DataFrame, policy: BilledAmountPolicy) -> Result<Vec<SalesRecord>> {
    let branches = df.column("branch")?.str()?;
    let segments = df.column("segment")?.str()?;
    let channels = df.column("channel")?.str()?;
    let periods = df.column("period")?.str()?;
    let totals = df.column("total_amount")?.f64()?;
    let flags = df.column("b2b_enabled")?.i64()?;
    let billed = df.column("b2b_billed_amount")?.f64()?;

    let mut records = Vec::with_capacity(df.height());
    let mut over_billed = 0usize;

    for i in 0..df.height() {
        let row = i + 1;

        let period_text = text(periods.get(i), row, "period")?;
        let period = Month::parse(&period_text).map_err(|e| DataLoadError::Malformed {
            row,
            column: "period".to_string(),
            reason: e.to_string(),
        })?;

        let total_amount = amount(totals.get(i), row, "total_amount")?;
        let mut b2b_billed_amount = amount(billed.get(i), row, "b2b_billed_amount")?;
        if b2b_billed_amount > total_amount {
            over_billed += 1;
            if policy == BilledAmountPolicy::Clamp {
                b2b_billed_amount = total_amount;
            }
        }

        records.push(SalesRecord {
            branch: text(branches.get(i), row, "branch")?,
            segment: text(segments.get(i), row, "segment")?,
            channel: text(channels.get(i), row, "channel")?,
            period,
            total_amount,
            b2b_enabled: flag(flags.get(i), row)?,
            b2b_billed_amount,
        });
    }

    if over_billed > 0 {
        warn!(
            rows = over_billed,
            policy = ?policy,
            "b2b_billed_amount exceeds total_amount"
        );
    }

    Ok(records)
}

fn malformed(row: usize, column: &str, reason: impl Into<String>) -> DataLoadError {
    DataLoadError::Malformed {
        row,
        column: column.to_string(),
        reason: reason.into(),
    }
}

fn text(value: Option<&str>, row: usize, column: &str) -> Result<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(malformed(row, column, "missing value")),
    }
}

fn amount(value: Option<f64>, row: usize, column: &str) -> Result<f64> {
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => Ok(v),
        Some(v) => Err(malformed(
            row,
            column,
            format!("expected a non-negative amount, got {v}"),
        )),
        None => Err(malformed(row, column, "missing or non-numeric value")),
    }
}

fn flag(value: Option<i64>, row: usize) -> Result<bool> {
    match value {
        Some(0) => Ok(false),
        Some(1) => Ok(true),
        Some(v) => Err(malformed(row, "b2b_enabled", format!("expected 0 or 1, got {v}"))),
        None => Err(malformed(row, "b2b_enabled", "missing or non-numeric value")),
    }
}
