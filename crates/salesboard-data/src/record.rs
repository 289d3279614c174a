//! Sales records and the immutable in-memory table.

use crate::month::Month;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One row of the sales dataset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SalesRecord {
    /// Branch (sucursal) the sale belongs to.
    pub branch: String,

    /// Customer segment.
    pub segment: String,

    /// Sales channel.
    pub channel: String,

    /// Month of the sale.
    pub period: Month,

    /// Total sale amount.
    pub total_amount: f64,

    /// Whether the customer is enabled for B2B ordering.
    #[serde(with = "flag")]
    pub b2b_enabled: bool,

    /// Portion of the amount billed through the B2B channel.
    pub b2b_billed_amount: f64,
}

impl SalesRecord {
    /// Create a new record.
    pub const fn new(
        branch: String,
        segment: String,
        channel: String,
        period: Month,
        total_amount: f64,
        b2b_enabled: bool,
        b2b_billed_amount: f64,
    ) -> Self {
        Self {
            branch,
            segment,
            channel,
            period,
            total_amount,
            b2b_enabled,
            b2b_billed_amount,
        }
    }
}

/// `0`/`1` on the wire, `bool` in memory.
mod flag {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub(super) fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(D::Error::custom(format!("expected 0 or 1, got {other}"))),
        }
    }
}

/// Distinct categorical values and month bounds observed in a table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dimensions {
    /// Sorted distinct branches.
    pub branches: BTreeSet<String>,

    /// Sorted distinct segments.
    pub segments: BTreeSet<String>,

    /// Sorted distinct channels.
    pub channels: BTreeSet<String>,

    /// Earliest and latest month, `None` for an empty table.
    pub period_bounds: Option<(Month, Month)>,
}

impl Dimensions {
    /// Collect dimensions from a set of records.
    pub fn from_records(records: &[SalesRecord]) -> Self {
        let mut dims = Self::default();

        for record in records {
            dims.branches.insert(record.branch.clone());
            dims.segments.insert(record.segment.clone());
            dims.channels.insert(record.channel.clone());

            dims.period_bounds = Some(match dims.period_bounds {
                Some((first, last)) => (first.min(record.period), last.max(record.period)),
                None => (record.period, record.period),
            });
        }

        dims
    }

    /// Earliest month in the data.
    pub fn first_month(&self) -> Option<Month> {
        self.period_bounds.map(|(first, _)| first)
    }

    /// Latest month in the data.
    pub fn last_month(&self) -> Option<Month> {
        self.period_bounds.map(|(_, last)| last)
    }
}

/// The loaded dataset.
///
/// Built once and never mutated afterwards, so a single table can back any
/// number of concurrent queries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesTable {
    records: Vec<SalesRecord>,
    dimensions: Dimensions,
}

impl SalesTable {
    /// Build a table, deriving its dimensions.
    pub fn new(records: Vec<SalesRecord>) -> Self {
        let dimensions = Dimensions::from_records(&records);
        Self {
            records,
            dimensions,
        }
    }

    /// All records in load order.
    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    /// Distinct values observed at load time.
    pub const fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over records in load order.
    pub fn iter(&self) -> std::slice::Iter<'_, SalesRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a SalesTable {
    type Item = &'a SalesRecord;
    type IntoIter = std::slice::Iter<'a, SalesRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
