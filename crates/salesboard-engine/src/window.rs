//! Month windows and previous-window derivation.
//!
//! The previous window of a query is the span of the same number of months
//! ending the month before the current window starts:
//!
//! ```text
//! current  = 2025-01 ..= 2025-06   (6 months)
//! previous = 2024-07 ..= 2024-12   (6 months)
//! ```
//!
//! A previous window reaching past the start of the data is still valid; it
//! just matches fewer (or no) records.

use crate::error::{EngineError, Result};
use salesboard_data::Month;
use serde::Serialize;
use std::fmt;

/// Inclusive span of months, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MonthRange {
    start: Month,
    end: Month,
}

impl MonthRange {
    /// Create a range.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidRange`] if `start` is after `end`.
    ///
    /// # Examples
    ///
    /// ```
    /// use salesboard_data::Month;
    /// use salesboard_engine::MonthRange;
    ///
    /// let jan = Month::new(2025, 1).unwrap();
    /// let jun = Month::new(2025, 6).unwrap();
    ///
    /// let range = MonthRange::new(jan, jun).unwrap();
    /// assert_eq!(range.len(), 6);
    /// assert!(MonthRange::new(jun, jan).is_err());
    /// ```
    pub fn new(start: Month, end: Month) -> Result<Self> {
        if start > end {
            return Err(EngineError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A single-month range.
    pub const fn single(month: Month) -> Self {
        Self {
            start: month,
            end: month,
        }
    }

    /// The `months` months ending at `end` (at least one).
    pub fn ending_at(end: Month, months: u32) -> Self {
        let back = i32::try_from(months.max(1) - 1).unwrap_or(i32::MAX);
        Self {
            start: end.add_months(-back),
            end,
        }
    }

    /// First month, inclusive.
    pub const fn start(&self) -> Month {
        self.start
    }

    /// Last month, inclusive.
    pub const fn end(&self) -> Month {
        self.end
    }

    /// Number of months covered, counting both ends.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> u32 {
        month_distance(self.start, self.end).unsigned_abs() + 1
    }

    /// Whether `month` falls inside the range.
    pub fn contains(&self, month: Month) -> bool {
        self.start <= month && month <= self.end
    }

    /// Same range with its start moved forward to `floor` if it begins
    /// earlier. Ranges entirely before `floor` collapse to `floor` itself.
    pub fn clamp_start(self, floor: Month) -> Self {
        if self.start >= floor {
            self
        } else {
            Self {
                start: floor,
                end: self.end.max(floor),
            }
        }
    }

    /// The immediately preceding range of equal length.
    pub fn previous(&self) -> Self {
        let (start, end) = derive_previous_window(self.start, self.end);
        Self { start, end }
    }

    /// Iterate over every month in the range.
    pub fn months(&self) -> impl Iterator<Item = Month> + use<> {
        let start = self.start;
        (0..self.len()).map(move |offset| start.add_months(offset as i32))
    }
}

impl fmt::Display for MonthRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Signed month distance from `start` to `end`.
pub fn month_distance(start: Month, end: Month) -> i32 {
    start.months_until(end)
}

/// Derive the comparison window preceding `start..=end`.
///
/// The result spans exactly as many months as the input and ends the month
/// before `start`, leaving no gap and no overlap. A reversed input is
/// treated as a single-month window.
pub fn derive_previous_window(start: Month, end: Month) -> (Month, Month) {
    let span = month_distance(start, end).max(0) + 1;
    let prev_end = start.add_months(-1);
    let prev_start = prev_end.add_months(-(span - 1));
    (prev_start, prev_end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn m(year: i32, month: u32) -> Month {
        Month::new(year, month).unwrap()
    }

    #[test]
    fn test_previous_of_half_year() {
        let (start, end) = derive_previous_window(m(2025, 1), m(2025, 6));
        assert_eq!(start, m(2024, 7));
        assert_eq!(end, m(2024, 12));
    }

    #[rstest]
    #[case(m(2025, 3), m(2025, 3))]
    #[case(m(2024, 2), m(2024, 4))]
    #[case(m(2023, 11), m(2025, 2))]
    #[case(m(2024, 1), m(2024, 12))]
    fn test_previous_has_same_length_and_is_adjacent(#[case] start: Month, #[case] end: Month) {
        let current = MonthRange::new(start, end).unwrap();
        let previous = current.previous();

        assert_eq!(previous.len(), current.len());
        assert_eq!(previous.end().add_months(1), current.start());
        assert!(previous.end() < current.start());
    }

    #[test]
    fn test_invalid_range() {
        let err = MonthRange::new(m(2025, 2), m(2025, 1)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidRange { .. }));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let range = MonthRange::new(m(2024, 3), m(2024, 5)).unwrap();
        assert!(range.contains(m(2024, 3)));
        assert!(range.contains(m(2024, 5)));
        assert!(!range.contains(m(2024, 2)));
        assert!(!range.contains(m(2024, 6)));
    }

    #[test]
    fn test_ending_at() {
        let range = MonthRange::ending_at(m(2025, 5), 6);
        assert_eq!(range.start(), m(2024, 12));
        assert_eq!(range.len(), 6);

        assert_eq!(MonthRange::ending_at(m(2025, 5), 0).len(), 1);
    }

    #[test]
    fn test_clamp_start() {
        let range = MonthRange::new(m(2023, 10), m(2024, 3)).unwrap();
        let clamped = range.clamp_start(m(2024, 1));
        assert_eq!(clamped.start(), m(2024, 1));
        assert_eq!(clamped.end(), m(2024, 3));

        let untouched = range.clamp_start(m(2023, 1));
        assert_eq!(untouched, range);
    }

    #[test]
    fn test_months_iterates_inclusively() {
        let range = MonthRange::new(m(2024, 11), m(2025, 2)).unwrap();
        let months: Vec<String> = range.months().map(|m| m.to_string()).collect();
        assert_eq!(months, vec!["2024-11", "2024-12", "2025-01", "2025-02"]);
    }

    #[test]
    fn test_display() {
        let range = MonthRange::new(m(2024, 11), m(2025, 2)).unwrap();
        assert_eq!(range.to_string(), "2024-11 to 2025-02");
    }
}
