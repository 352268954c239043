//! Conversions between `YYYY-MM-DD` date keys and calendar dates.

use chrono::{Local, NaiveDate, TimeZone};

use crate::error::{ReportError, Result};

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Formats a calendar date as a zero-padded `YYYY-MM-DD` key.
pub fn to_date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parses a `YYYY-MM-DD` key.
pub fn parse_date_key(key: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(key.trim(), DATE_KEY_FORMAT)
        .map_err(|_| ReportError::InvalidDateKey(key.to_string()))
}

/// Local calendar day of an epoch-milliseconds timestamp.
///
/// Returns `None` for timestamps chrono cannot represent.
pub fn date_from_millis(millis: i64) -> Option<NaiveDate> {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.date_naive())
}

/// Long-form display of a date key, e.g. "Monday, January 15, 2024".
pub fn to_display_string(key: &str) -> Result<String> {
    parse_date_key(key).map(display_date)
}

pub(crate) fn display_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// Inclusive, single-pass sequence of days between two dates.
///
/// Yields nothing when `start` is after `end`.
#[derive(Debug, Clone)]
pub struct DateRange {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl DateRange {
    /// Adapts the range to date keys.
    pub fn keys(self) -> impl Iterator<Item = String> {
        self.map(to_date_key)
    }
}

impl Iterator for DateRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next.filter(|d| *d <= self.end)?;
        self.next = current.succ_opt();
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.next {
            Some(d) if d <= self.end => (self.end - d).num_days() as usize + 1,
            _ => 0,
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DateRange {}

/// Every day from `start` to `end`, both included.
pub fn enumerate_range(start: NaiveDate, end: NaiveDate) -> DateRange {
    DateRange { next: Some(start), end }
}

/// Like [`enumerate_range`], starting from date keys.
pub fn enumerate_range_keys(start_key: &str, end_key: &str) -> Result<DateRange> {
    Ok(enumerate_range(parse_date_key(start_key)?, parse_date_key(end_key)?))
}
