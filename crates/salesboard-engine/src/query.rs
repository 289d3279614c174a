//! One dashboard query: current window, previous window and breakdowns.

use crate::aggregate::{Aggregate, GroupAggregate, GroupKey, SummaryGroup, aggregate, aggregate_by, summary_breakdown};
use crate::delta::Deltas;
use crate::filter::{FilterCriteria, apply_filter};
use crate::window::MonthRange;
use salesboard_data::{SalesRecord, SalesTable};
use serde::Serialize;
use tracing::{debug, warn};

/// Everything a dashboard shows for one set of criteria.
///
/// Borrows the matched rows from the table it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport<'a> {
    /// Criteria of the current window.
    pub criteria: FilterCriteria,

    /// Requested months.
    pub current_window: MonthRange,

    /// Comparison months, same length, immediately before.
    pub previous_window: MonthRange,

    /// KPIs of the current window.
    pub current: Aggregate,

    /// KPIs of the previous window.
    pub previous: Aggregate,

    /// Current versus previous.
    pub deltas: Deltas,

    /// Per-month KPIs of the current window.
    pub monthly_series: Vec<GroupAggregate>,

    /// Per-segment KPIs of the current window.
    pub by_segment: Vec<GroupAggregate>,

    /// Per-channel KPIs of the current window.
    pub by_channel: Vec<GroupAggregate>,

    /// Current-window rows in table order.
    pub matched_rows: Vec<&'a SalesRecord>,
}

impl<'a> DashboardReport<'a> {
    /// Whether the current window matched no rows.
    ///
    /// Breakdowns are empty in that case and should not be shown.
    pub fn is_empty(&self) -> bool {
        self.matched_rows.is_empty()
    }

    /// Per (month, segment, channel) KPIs of the current window.
    pub fn summary(&self) -> Vec<SummaryGroup> {
        summary_breakdown(self.matched_rows.iter().copied())
    }

    /// Up to `limit` current-window rows, most recent month first.
    pub fn latest_rows(&self, limit: usize) -> Vec<&'a SalesRecord> {
        let mut rows = self.matched_rows.clone();
        rows.sort_by(|a, b| b.period.cmp(&a.period));
        rows.truncate(limit);
        rows
    }
}

/// Run a query against a loaded table.
///
/// Zero matches in either window is a normal outcome: the aggregates are
/// empty and the deltas fall back to 0.
pub fn run_query<'a>(table: &'a SalesTable, criteria: &FilterCriteria) -> DashboardReport<'a> {
    let unknown = criteria.unknown_values(table.dimensions());
    if !unknown.is_empty() {
        warn!(values = %unknown.join(", "), "filter values not present in the data");
    }

    let current_window = criteria.range;
    let previous_window = current_window.previous();

    let current_rows = apply_filter(table, criteria);
    let previous_rows = apply_filter(table, &criteria.with_range(previous_window));

    let current = aggregate(&current_rows);
    let previous = aggregate(&previous_rows);
    let deltas = Deltas::between(&current, &previous);

    debug!(
        current = %current_window,
        previous = %previous_window,
        current_rows = current_rows.len(),
        previous_rows = previous_rows.len(),
        "computed dashboard query"
    );

    DashboardReport {
        criteria: criteria.clone(),
        current_window,
        previous_window,
        current,
        previous,
        deltas,
        monthly_series: aggregate_by(&current_rows, GroupKey::Month),
        by_segment: aggregate_by(&current_rows, GroupKey::Segment),
        by_channel: aggregate_by(&current_rows, GroupKey::Channel),
        matched_rows: current_rows.into_rows(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use salesboard_data::Month;

    fn m(year: i32, month: u32) -> Month {
        Month::new(year, month).unwrap()
    }

    fn record(channel: &str, period: Month, total: f64, enabled: bool, billed: f64) -> SalesRecord {
        SalesRecord::new(
            "TALCA".to_string(),
            "TRADICIONAL".to_string(),
            channel.to_string(),
            period,
            total,
            enabled,
            billed,
        )
    }

    fn table() -> SalesTable {
        SalesTable::new(vec![
            record("KKAA", m(2024, 1), 100.0, false, 10.0),
            record("KKAA", m(2024, 2), 100.0, true, 20.0),
            record("KKAA", m(2024, 3), 150.0, true, 60.0),
            record("HORECA", m(2024, 4), 50.0, false, 0.0),
        ])
    }

    fn criteria(start: Month, end: Month) -> FilterCriteria {
        FilterCriteria::new(
            "TALCA",
            ["TRADICIONAL"],
            ["KKAA", "HORECA"],
            MonthRange::new(start, end).unwrap(),
        )
    }

    #[test]
    fn test_run_query() {
        let table = table();
        let report = run_query(&table, &criteria(m(2024, 3), m(2024, 4)));

        assert_eq!(report.previous_window, MonthRange::new(m(2024, 1), m(2024, 2)).unwrap());
        assert_eq!(report.matched_rows.len(), 2);
        assert_relative_eq!(report.current.total_sales, 200.0);
        assert_relative_eq!(report.previous.total_sales, 200.0);
        assert_eq!(report.deltas.total_sales, 0.0);
        assert_relative_eq!(report.current.b2b_pct, 30.0);
        assert_relative_eq!(report.previous.b2b_pct, 15.0);
        assert_relative_eq!(report.deltas.b2b_pct, 100.0);
        assert_eq!(report.monthly_series.len(), 2);
        assert_eq!(report.by_channel[0].label, "KKAA");
    }

    #[test]
    fn test_empty_report() {
        let table = table();
        let report = run_query(&table, &criteria(m(2025, 1), m(2025, 3)));

        assert!(report.is_empty());
        assert!(report.monthly_series.is_empty());
        assert!(report.summary().is_empty());
        assert_eq!(report.deltas, Deltas::default());
    }

    #[test]
    fn test_latest_rows() {
        let table = table();
        let report = run_query(&table, &criteria(m(2024, 1), m(2024, 4)));

        let latest = report.latest_rows(2);
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].period, m(2024, 4));
        assert_eq!(latest[1].period, m(2024, 3));

        assert_eq!(report.latest_rows(100).len(), 4);
    }

    #[test]
    fn test_report_serializes() {
        let table = table();
        let report = run_query(&table, &criteria(m(2024, 2), m(2024, 2)));
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["criteria"]["branch"], "TALCA");
        assert_eq!(json["current_window"]["start"], "2024-02");
        assert_eq!(json["previous_window"]["end"], "2024-01");
        assert_eq!(json["matched_rows"][0]["b2b_enabled"], 1);
    }
}
