//! Calendar months with whole-month arithmetic.
//!
//! Every period in a dataset is truncated to its month. Window arithmetic
//! (span lengths, previous windows) is done in month units here, never in
//! days, so a six-month window is six months regardless of month lengths.

use crate::error::{DataLoadError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar month, ordered chronologically.
///
/// Displays and serializes as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// Create a month. Returns `None` unless `month` is in `1..=12`.
    ///
    /// # Examples
    ///
    /// ```
    /// use salesboard_data::Month;
    ///
    /// let m = Month::new(2025, 1).unwrap();
    /// assert_eq!(m.to_string(), "2025-01");
    /// assert!(Month::new(2025, 13).is_none());
    /// ```
    pub const fn new(year: i32, month: u32) -> Option<Self> {
        if month >= 1 && month <= 12 {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// Month containing the given date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Parse `YYYY-MM`, `YYYY-MM-DD`, or a timestamp starting with
    /// `YYYY-MM-DD`. Day and time are discarded.
    ///
    /// # Examples
    ///
    /// ```
    /// use salesboard_data::Month;
    ///
    /// assert_eq!(Month::parse("2024-07").unwrap(), Month::new(2024, 7).unwrap());
    /// assert_eq!(Month::parse("2024-07-31").unwrap(), Month::new(2024, 7).unwrap());
    /// assert!(Month::parse("July 2024").is_err());
    /// ```
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();

        if let Ok(date) = NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d") {
            return Ok(Self::from_date(date));
        }

        // A longer value must be a date followed by a time part.
        let date_part = match (trimmed.get(..10), trimmed.get(10..)) {
            (Some(date), Some(rest)) if rest.is_empty() || rest.starts_with([' ', 'T']) => {
                Some(date)
            }
            _ => None,
        };

        date_part
            .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
            .map(Self::from_date)
            .ok_or_else(|| DataLoadError::InvalidPeriod(value.to_string()))
    }

    /// Calendar year.
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Month of the year, `1..=12`.
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// First day of the month.
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    const fn ordinal(self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    fn from_ordinal(ordinal: i64) -> Self {
        let year = ordinal.div_euclid(12);
        let year = i32::try_from(year).unwrap_or(if year < 0 { i32::MIN } else { i32::MAX });
        Self {
            year,
            month: ordinal.rem_euclid(12) as u32 + 1,
        }
    }

    /// Shift by `n` whole months (negative moves backwards).
    ///
    /// # Examples
    ///
    /// ```
    /// use salesboard_data::Month;
    ///
    /// let jan = Month::new(2025, 1).unwrap();
    /// assert_eq!(jan.add_months(-1), Month::new(2024, 12).unwrap());
    /// assert_eq!(jan.add_months(14), Month::new(2026, 3).unwrap());
    /// ```
    pub fn add_months(self, n: i32) -> Self {
        Self::from_ordinal(self.ordinal() + i64::from(n))
    }

    /// Signed number of months from `self` to `other`.
    pub fn months_until(self, other: Self) -> i32 {
        let diff = other.ordinal() - self.ordinal();
        i32::try_from(diff).unwrap_or(if diff < 0 { i32::MIN } else { i32::MAX })
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = DataLoadError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Month {
    type Error = DataLoadError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Month> for String {
    fn from(month: Month) -> Self {
        month.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn month(year: i32, month: u32) -> Month {
        Month::new(year, month).unwrap()
    }

    #[rstest]
    #[case("2024-01", 2024, 1)]
    #[case("2024-12", 2024, 12)]
    #[case(" 2025-03 ", 2025, 3)]
    #[case("2025-03-31", 2025, 3)]
    #[case("2025-03-01 00:00:00", 2025, 3)]
    #[case("2025-03-01T12:30:00", 2025, 3)]
    fn test_parse_truncates_to_month(#[case] input: &str, #[case] year: i32, #[case] m: u32) {
        assert_eq!(Month::parse(input).unwrap(), month(year, m));
    }

    #[rstest]
    #[case("")]
    #[case("2024")]
    #[case("2024-13")]
    #[case("03/2024")]
    #[case("2024-07-31garbage")]
    #[case("2024-07-31-05")]
    fn test_parse_rejects_garbage(#[case] input: &str) {
        assert!(matches!(
            Month::parse(input),
            Err(DataLoadError::InvalidPeriod(_))
        ));
    }

    #[test]
    fn test_ordering_is_chronological() {
        assert!(month(2024, 12) < month(2025, 1));
        assert!(month(2025, 1) < month(2025, 2));
    }

    #[test]
    fn test_add_months_crosses_years() {
        assert_eq!(month(2025, 1).add_months(-1), month(2024, 12));
        assert_eq!(month(2025, 1).add_months(-13), month(2023, 12));
        assert_eq!(month(2024, 11).add_months(3), month(2025, 2));
        assert_eq!(month(2024, 11).add_months(0), month(2024, 11));
    }

    #[test]
    fn test_months_until() {
        assert_eq!(month(2025, 1).months_until(month(2025, 6)), 5);
        assert_eq!(month(2025, 6).months_until(month(2025, 1)), -5);
        assert_eq!(month(2024, 7).months_until(month(2025, 7)), 12);
    }

    #[test]
    fn test_string_conversion_round_trip() {
        let text = String::from(month(2024, 3));
        assert_eq!(text, "2024-03");
        assert_eq!(Month::try_from(text).unwrap(), month(2024, 3));
    }

    #[test]
    fn test_first_day() {
        assert_eq!(
            month(2024, 2).first_day(),
            NaiveDate::from_ymd_opt(2024, 2, 1)
        );
    }
}
