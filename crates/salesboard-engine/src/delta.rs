//! Zero-safe period-over-period deltas.

use crate::aggregate::Aggregate;
use serde::Serialize;

/// Percentage change from `previous` to `current`.
///
/// Returns 0 when there is no usable baseline (absent, zero or non-finite)
/// and whenever the result itself would not be finite.
///
/// # Examples
///
/// ```
/// use salesboard_engine::safe_percent_change;
///
/// assert_eq!(safe_percent_change(110.0, Some(100.0)), 10.0);
/// assert_eq!(safe_percent_change(50.0, Some(0.0)), 0.0);
/// assert_eq!(safe_percent_change(50.0, None), 0.0);
/// assert_eq!(safe_percent_change(f64::NAN, Some(10.0)), 0.0);
/// ```
pub fn safe_percent_change(current: f64, previous: Option<f64>) -> f64 {
    let Some(previous) = previous.filter(|p| p.is_finite() && *p != 0.0) else {
        return 0.0;
    };

    let change = (current - previous) / previous * 100.0;
    if change.is_finite() { change } else { 0.0 }
}

/// Percentage changes of each KPI against the previous window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Deltas {
    /// Change in total sales.
    pub total_sales: f64,

    /// Change in the enabled percentage.
    pub enabled_pct: f64,

    /// Change in the B2B percentage.
    pub b2b_pct: f64,
}

impl Deltas {
    /// Compare two aggregates.
    ///
    /// An empty previous window has no baseline, so every delta is 0. The
    /// B2B percentage also has no baseline when previous sales total 0.
    pub fn between(current: &Aggregate, previous: &Aggregate) -> Self {
        let has_previous = !previous.is_empty();

        let prev_sales = has_previous.then_some(previous.total_sales);
        let prev_enabled = previous.enabled_pct.filter(|_| has_previous);
        let prev_b2b = (has_previous && previous.total_sales != 0.0).then_some(previous.b2b_pct);

        Self {
            total_sales: safe_percent_change(current.total_sales, prev_sales),
            enabled_pct: current
                .enabled_pct
                .map_or(0.0, |pct| safe_percent_change(pct, prev_enabled)),
            b2b_pct: safe_percent_change(current.b2b_pct, prev_b2b),
        }
    }
}
