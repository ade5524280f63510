//! Time windows used by billing and reconciliation
//!
//! Two shapes are needed:
//! - `Period`: a half-open `[start, end)` UTC interval, used for invoice
//!   periods and project active windows
//! - `DateRange`: an inclusive range of calendar dates, used to select
//!   ledger entries for a report

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid period: start {start} must be before end {end}")]
    InvalidPeriod {
        start: String,
        end: String,
    },

    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange {
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("Date out of representable range: {0}")]
    OutOfRange(String),
}

/// A half-open UTC interval `[start, end)`
///
/// The start instant belongs to the period; the end instant belongs to
/// the next one. Consecutive monthly periods therefore share a boundary
/// without overlapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    /// Start of the period (inclusive)
    pub start: DateTime<Utc>,
    /// End of the period (exclusive)
    pub end: DateTime<Utc>,
}

impl Period {
    /// Creates a new period, rejecting empty or inverted intervals
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TemporalError> {
        if start >= end {
            return Err(TemporalError::InvalidPeriod {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Returns the calendar month (UTC) containing the given instant
    pub fn month_containing(at: DateTime<Utc>) -> Result<Self, TemporalError> {
        let first = NaiveDate::from_ymd_opt(at.year(), at.month(), 1)
            .ok_or_else(|| TemporalError::OutOfRange(at.to_string()))?;
        let next = if at.month() == 12 {
            NaiveDate::from_ymd_opt(at.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(at.year(), at.month() + 1, 1)
        }
        .ok_or_else(|| TemporalError::OutOfRange(at.to_string()))?;

        Self::new(start_of_day(first), start_of_day(next))
    }

    /// Returns true if the instant falls inside `[start, end)`
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end
    }

    /// Returns true if the two periods share at least one instant
    pub fn overlaps(&self, other: &Period) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Returns the same period with a different start
    pub fn with_start(&self, start: DateTime<Utc>) -> Result<Self, TemporalError> {
        Self::new(start, self.end)
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// An inclusive range of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TemporalError> {
        if start > end {
            return Err(TemporalError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns true if the date falls within the range (inclusive on both ends)
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of days covered, counting both ends
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Midnight UTC at the start of the given calendar date
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Absolute number of calendar days between two UTC instants
pub fn days_apart(a: DateTime<Utc>, b: DateTime<Utc>) -> i64 {
    (a.date_naive() - b.date_naive()).num_days().abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_month_containing_mid_month() {
        let period = Period::month_containing(Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap()).unwrap();
        assert_eq!(period.start, utc(2024, 3, 1));
        assert_eq!(period.end, utc(2024, 4, 1));
    }

    #[test]
    fn test_month_containing_december_rolls_year() {
        let period = Period::month_containing(utc(2024, 12, 31)).unwrap();
        assert_eq!(period.end, utc(2025, 1, 1));
    }

    #[test]
    fn test_period_is_half_open() {
        let period = Period::new(utc(2024, 1, 1), utc(2024, 2, 1)).unwrap();
        assert!(period.contains(utc(2024, 1, 1)));
        assert!(!period.contains(utc(2024, 2, 1)));
    }

    #[test]
    fn test_adjacent_periods_do_not_overlap() {
        let jan = Period::new(utc(2024, 1, 1), utc(2024, 2, 1)).unwrap();
        let feb = Period::new(utc(2024, 2, 1), utc(2024, 3, 1)).unwrap();
        assert!(!jan.overlaps(&feb));
        assert!(jan.overlaps(&jan));
    }

    #[test]
    fn test_days_apart_uses_calendar_dates() {
        let late = Utc.with_ymd_and_hms(2024, 3, 1, 23, 59, 0).unwrap();
        let early = Utc.with_ymd_and_hms(2024, 3, 2, 0, 1, 0).unwrap();
        assert_eq!(days_apart(late, early), 1);
        assert_eq!(days_apart(early, late), 1);
    }
}
