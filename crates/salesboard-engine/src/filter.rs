//! Record-level filtering.

use crate::window::MonthRange;
use salesboard_data::{Dimensions, SalesRecord};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

/// Filter criteria for one query.
///
/// A record is selected when its branch equals `branch`, its segment is in
/// `segments`, its channel is in `channels` and its period falls in
/// `range`. An empty `segments` or `channels` set therefore selects nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    /// Branch to report on.
    pub branch: String,

    /// Segments to include.
    pub segments: BTreeSet<String>,

    /// Channels to include.
    pub channels: BTreeSet<String>,

    /// Months to include.
    pub range: MonthRange,
}

impl FilterCriteria {
    /// Create filter criteria.
    ///
    /// # Examples
    ///
    /// ```
    /// use salesboard_data::Month;
    /// use salesboard_engine::{FilterCriteria, MonthRange};
    ///
    /// let range = MonthRange::single(Month::new(2025, 1).unwrap());
    /// let criteria = FilterCriteria::new("TALCA", ["TRADICIONAL"], ["KKAA", "HORECA"], range);
    ///
    /// assert_eq!(criteria.branch, "TALCA");
    /// assert_eq!(criteria.channels.len(), 2);
    /// ```
    pub fn new<S, C>(branch: impl Into<String>, segments: S, channels: C, range: MonthRange) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            branch: branch.into(),
            segments: segments.into_iter().map(Into::into).collect(),
            channels: channels.into_iter().map(Into::into).collect(),
            range,
        }
    }

    /// Same categorical filters over a different month range.
    pub fn with_range(&self, range: MonthRange) -> Self {
        Self {
            range,
            ..self.clone()
        }
    }

    /// Whether a record satisfies every condition.
    pub fn matches(&self, record: &SalesRecord) -> bool {
        record.branch == self.branch
            && self.segments.contains(&record.segment)
            && self.channels.contains(&record.channel)
            && self.range.contains(record.period)
    }

    /// Requested values that never occur in the data, as `kind 'value'`
    /// labels. Such values are legal; they just match nothing.
    pub fn unknown_values(&self, dims: &Dimensions) -> Vec<String> {
        let mut unknown = Vec::new();

        if !dims.branches.contains(&self.branch) {
            unknown.push(format!("branch '{}'", self.branch));
        }
        unknown.extend(
            self.segments
                .difference(&dims.segments)
                .map(|s| format!("segment '{s}'")),
        );
        unknown.extend(
            self.channels
                .difference(&dims.channels)
                .map(|c| format!("channel '{c}'")),
        );

        unknown
    }
}

/// Records matching a filter, borrowed from the table in table order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection<'a> {
    rows: Vec<&'a SalesRecord>,
}

impl<'a> Selection<'a> {
    /// Matched rows.
    pub fn rows(&self) -> &[&'a SalesRecord] {
        &self.rows
    }

    /// Consume the selection, returning the matched rows.
    pub fn into_rows(self) -> Vec<&'a SalesRecord> {
        self.rows
    }

    /// Number of matched rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether nothing matched. This is a valid outcome, not an error.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over matched rows.
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, &'a SalesRecord>> {
        self.rows.iter().copied()
    }
}

impl<'s, 'a> IntoIterator for &'s Selection<'a> {
    type Item = &'a SalesRecord;
    type IntoIter = std::iter::Copied<std::slice::Iter<'s, &'a SalesRecord>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> FromIterator<&'a SalesRecord> for Selection<'a> {
    fn from_iter<I: IntoIterator<Item = &'a SalesRecord>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

/// Select the records satisfying `criteria`.
///
/// Accepts a table, a slice of records or another selection. Returns an
/// empty selection when nothing matches.
pub fn apply_filter<'a, I>(records: I, criteria: &FilterCriteria) -> Selection<'a>
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    let selection: Selection<'a> = records
        .into_iter()
        .filter(|record| criteria.matches(record))
        .collect();

    debug!(
        branch = %criteria.branch,
        range = %criteria.range,
        rows = selection.len(),
        "applied filter"
    );

    selection
}
