//! Claim periods
//!
//! A claim is filed for one calendar month. `ClaimPeriod` always holds the
//! first day of that month, so period comparisons are month comparisons.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised when constructing a period
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeriodError {
    #[error("Invalid calendar month: {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },

    #[error("Period must start on the first day of a month, got {0}")]
    NotFirstOfMonth(NaiveDate),

    #[error("Period arithmetic out of range")]
    OutOfRange,
}

/// A calendar month, stored as its first day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "NaiveDate", into = "NaiveDate")]
pub struct ClaimPeriod(NaiveDate);

impl ClaimPeriod {
    /// Creates a period from a year and 1-based month
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or(PeriodError::InvalidMonth { year, month })
    }

    /// Returns the period containing the given date
    pub fn containing(date: NaiveDate) -> Self {
        // Day 1 exists in every month chrono can represent
        Self(date.with_day(1).unwrap_or(date))
    }

    /// Returns the first day of the period
    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns true if `date` falls in this calendar month
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// Returns the period `n` months before this one
    pub fn months_back(&self, n: u32) -> Result<Self, PeriodError> {
        self.0
            .checked_sub_months(Months::new(n))
            .map(Self)
            .ok_or(PeriodError::OutOfRange)
    }

    /// Returns the period following this one
    pub fn next(&self) -> Result<Self, PeriodError> {
        self.0
            .checked_add_months(Months::new(1))
            .map(Self)
            .ok_or(PeriodError::OutOfRange)
    }

    /// Chart label, e.g. `Oct 2026`
    pub fn short_label(&self) -> String {
        self.0.format("%b %Y").to_string()
    }

    /// Report label, e.g. `October 2026`
    pub fn long_label(&self) -> String {
        self.0.format("%B %Y").to_string()
    }
}

impl TryFrom<NaiveDate> for ClaimPeriod {
    type Error = PeriodError;

    fn try_from(date: NaiveDate) -> Result<Self, Self::Error> {
        if date.day() != 1 {
            return Err(PeriodError::NotFirstOfMonth(date));
        }
        Ok(Self(date))
    }
}

impl From<ClaimPeriod> for NaiveDate {
    fn from(period: ClaimPeriod) -> NaiveDate {
        period.0
    }
}

impl fmt::Display for ClaimPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_containing_normalizes_to_first_day() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let period = ClaimPeriod::containing(date);
        assert_eq!(period.first_day(), NaiveDate::from_ymd_opt(2026, 10, 1).unwrap());
        assert!(period.contains(date));
    }

    #[test]
    fn test_months_back_crosses_year() {
        let period = ClaimPeriod::new(2026, 2).unwrap();
        assert_eq!(period.months_back(3).unwrap(), ClaimPeriod::new(2025, 11).unwrap());
    }

    #[test]
    fn test_rejects_mid_month_date() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 2).unwrap();
        assert_eq!(ClaimPeriod::try_from(date), Err(PeriodError::NotFirstOfMonth(date)));
    }

    #[test]
    fn test_labels() {
        let period = ClaimPeriod::new(2026, 10).unwrap();
        assert_eq!(period.short_label(), "Oct 2026");
        assert_eq!(period.long_label(), "October 2026");
        assert_eq!(period.to_string(), "2026-10");
    }
}
