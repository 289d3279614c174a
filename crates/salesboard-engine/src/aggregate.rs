//! KPI aggregation, whole-selection and grouped.
//!
//! Three metrics are computed for any set of records:
//!
//! - `total_sales`: sum of `total_amount` (0 when empty)
//! - `enabled_pct`: share of B2B-enabled rows × 100 (`None` when empty)
//! - `b2b_pct`: billed B2B amount over total amount × 100 (0 when the total
//!   is 0)
//!
//! Grouped breakdowns also carry `pct_b2b`, the group's billed amount as a
//! share of the *whole* input's total amount. Summed over the groups of one
//! key it gives back the overall `b2b_pct`.

use salesboard_data::{Month, SalesRecord};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Metrics for one set of records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Aggregate {
    /// Number of records aggregated.
    pub row_count: usize,

    /// Sum of `total_amount`.
    pub total_sales: f64,

    /// Sum of `b2b_billed_amount`.
    pub b2b_billed: f64,

    /// Percentage of B2B-enabled records; absent for an empty set.
    pub enabled_pct: Option<f64>,

    /// B2B billed amount as a percentage of total sales.
    pub b2b_pct: f64,
}

impl Aggregate {
    /// Whether no records contributed.
    pub const fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Billed amount as a percentage of an outside total, 0 if that total
    /// is not positive.
    pub fn share_of(&self, grand_total: f64) -> f64 {
        if grand_total > 0.0 {
            100.0 * self.b2b_billed / grand_total
        } else {
            0.0
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    rows: usize,
    enabled: usize,
    total: f64,
    billed: f64,
}

impl Accumulator {
    fn push(&mut self, record: &SalesRecord) {
        self.rows += 1;
        self.enabled += usize::from(record.b2b_enabled);
        self.total += record.total_amount;
        self.billed += record.b2b_billed_amount;
    }

    fn finish(self) -> Aggregate {
        let enabled_pct =
            (self.rows > 0).then(|| self.enabled as f64 / self.rows as f64 * 100.0);
        let b2b_pct = if self.total > 0.0 {
            self.billed / self.total * 100.0
        } else {
            0.0
        };

        Aggregate {
            row_count: self.rows,
            total_sales: self.total,
            b2b_billed: self.billed,
            enabled_pct,
            b2b_pct,
        }
    }
}

/// Aggregate a set of records.
///
/// # Examples
///
/// ```
/// use salesboard_engine::aggregate;
///
/// let empty = aggregate(std::iter::empty());
/// assert_eq!(empty.total_sales, 0.0);
/// assert_eq!(empty.b2b_pct, 0.0);
/// assert_eq!(empty.enabled_pct, None);
/// ```
pub fn aggregate<'a, I>(records: I) -> Aggregate
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    let mut acc = Accumulator::default();
    for record in records {
        acc.push(record);
    }
    acc.finish()
}

/// Categorical key for grouped breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    /// Group by month; groups ordered chronologically.
    Month,
    /// Group by segment; groups ordered by sales, largest first.
    Segment,
    /// Group by channel; groups ordered by sales, largest first.
    Channel,
}

impl GroupKey {
    /// Column name of the key.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Month => "month",
            Self::Segment => "segment",
            Self::Channel => "channel",
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Metrics for one group of a breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupAggregate {
    /// Group value (`YYYY-MM` for months).
    pub label: String,

    /// The group's own metrics.
    pub metrics: Aggregate,

    /// Group billed amount as a percentage of the whole input's total sales.
    pub pct_b2b: f64,
}

/// Metrics for one (month, segment, channel) combination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryGroup {
    /// Month of the group.
    pub month: Month,

    /// Segment of the group.
    pub segment: String,

    /// Channel of the group.
    pub channel: String,

    /// The group's own metrics.
    pub metrics: Aggregate,
}

fn group<'r, K, F>(records: &[&'r SalesRecord], key_fn: F) -> BTreeMap<K, Accumulator>
where
    K: Ord,
    F: Fn(&'r SalesRecord) -> K,
{
    let mut groups: BTreeMap<K, Accumulator> = BTreeMap::new();
    for &record in records {
        groups.entry(key_fn(record)).or_default().push(record);
    }
    groups
}

fn finish_groups<K: ToString>(
    groups: BTreeMap<K, Accumulator>,
    grand_total: f64,
) -> Vec<GroupAggregate> {
    groups
        .into_iter()
        .map(|(key, acc)| {
            let metrics = acc.finish();
            GroupAggregate {
                label: key.to_string(),
                pct_b2b: metrics.share_of(grand_total),
                metrics,
            }
        })
        .collect()
}

/// Aggregate per distinct value of `key`.
///
/// Each group's `pct_b2b` is relative to the total sales of all `records`,
/// not to the group's own total.
pub fn aggregate_by<'a, I>(records: I, key: GroupKey) -> Vec<GroupAggregate>
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    let records: Vec<&'a SalesRecord> = records.into_iter().collect();
    let grand_total = aggregate(records.iter().copied()).total_sales;

    let mut groups = match key {
        GroupKey::Month => finish_groups(group(&records, |r| r.period), grand_total),
        GroupKey::Segment => finish_groups(group(&records, |r| r.segment.as_str()), grand_total),
        GroupKey::Channel => finish_groups(group(&records, |r| r.channel.as_str()), grand_total),
    };

    if key != GroupKey::Month {
        groups.sort_by(|a, b| {
            b.metrics
                .total_sales
                .total_cmp(&a.metrics.total_sales)
                .then_with(|| a.label.cmp(&b.label))
        });
    }

    groups
}

/// Aggregate per (month, segment, channel), ordered by that triple.
pub fn summary_breakdown<'a, I>(records: I) -> Vec<SummaryGroup>
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    let records: Vec<&'a SalesRecord> = records.into_iter().collect();

    group(&records, |r| (r.period, r.segment.as_str(), r.channel.as_str()))
        .into_iter()
        .map(|((month, segment, channel), acc)| SummaryGroup {
            month,
            segment: segment.to_string(),
            channel: channel.to_string(),
            metrics: acc.finish(),
        })
        .collect()
}
