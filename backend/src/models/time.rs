//! Calendar date ranges and period-over-period window arithmetic.
//!
//! Dates are date-only (`YYYY-MM-DD`), so there is no timezone handling here.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{InsightError, InsightResult};

/// Wire format for every date in the API.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a strict `YYYY-MM-DD` calendar date.
///
/// Rejects anything chrono would otherwise tolerate (signed years, short
/// fields) so that what we accept is exactly what we emit.
pub fn parse_iso_date(value: &str) -> InsightResult<NaiveDate> {
    let bytes = value.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shaped {
        return Err(InsightError::invalid_range(format!(
            "'{}' is not a YYYY-MM-DD date",
            value
        )));
    }

    NaiveDate::parse_from_str(value, ISO_DATE_FORMAT).map_err(|_| {
        InsightError::invalid_range(format!("'{}' is not a valid calendar date", value))
    })
}

/// Inclusive reporting window `[start, end]`, with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateRange {
    start: String,
    end: String,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = InsightError;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        DateRange::parse(&raw.start, &raw.end)
    }
}

impl DateRange {
    /// Build a range, rejecting `end < start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> InsightResult<Self> {
        if end < start {
            return Err(InsightError::invalid_range(format!(
                "end {} is before start {}",
                end.format(ISO_DATE_FORMAT),
                start.format(ISO_DATE_FORMAT)
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse both boundaries from `YYYY-MM-DD` strings.
    pub fn parse(start: &str, end: &str) -> InsightResult<Self> {
        Self::new(parse_iso_date(start)?, parse_iso_date(end)?)
    }

    /// Reject ranges covering more than `max_days` calendar days.
    pub fn limit_days(self, max_days: u32) -> InsightResult<Self> {
        let max_days = u64::from(max_days.max(1));
        if self.day_count() > max_days {
            return Err(InsightError::invalid_range(format!(
                "range covers {} days, at most {} allowed",
                self.day_count(),
                max_days
            )));
        }
        Ok(self)
    }

    /// The `window_days`-long range ending on `end` (inclusive).
    ///
    /// A zero-day window is treated as a single day.
    pub fn trailing(end: NaiveDate, window_days: u32) -> Self {
        let back = u64::from(window_days.max(1) - 1);
        let start = end.checked_sub_days(Days::new(back)).unwrap_or(NaiveDate::MIN);
        Self { start, end }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// `end - start` in whole days (0 for a single-day range).
    pub fn span_days(&self) -> u64 {
        (self.end - self.start).num_days().unsigned_abs()
    }

    /// Inclusive number of calendar days covered.
    pub fn day_count(&self) -> u64 {
        self.span_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// The comparison window immediately preceding this one.
    ///
    /// Same inclusive length, ending the day before `start`: no overlap, no gap.
    pub fn shift_back(&self) -> Self {
        let shift = Days::new(self.day_count());
        // Only saturates at the chrono calendar floor.
        let start = self.start.checked_sub_days(shift).unwrap_or(NaiveDate::MIN);
        let end = self.end.checked_sub_days(shift).unwrap_or(NaiveDate::MIN);
        Self { start, end }
    }

    /// Every date in the range, ascending.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.format(ISO_DATE_FORMAT),
            self.end.format(ISO_DATE_FORMAT)
        )
    }
}

#[cfg(test)]
#[path = "time_tests.rs"]
mod time_tests;
