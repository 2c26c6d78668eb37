//! Canonical day keys for the daily-activity map.
//!
//! Day keys are `YYYY-MM-DD` strings and a day is addressable regardless of
//! time-of-day. The engine pins "today" to UTC day boundaries as its one
//! canonical clock; devices crossing timezones do not shift buckets.

use chrono::{NaiveDate, Utc};

use sigil_core::error::AnalyticsError;

const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Canonical `YYYY-MM-DD` key for a calendar date.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use sigil_analytics::date::day_key;
/// let d = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
/// assert_eq!(day_key(d), "2026-03-07");
/// ```
pub fn day_key(date: NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}

/// Parse a canonical day key back into a date.
pub fn parse_day_key(key: &str) -> Result<NaiveDate, AnalyticsError> {
    NaiveDate::parse_from_str(key, DAY_KEY_FORMAT)
        .map_err(|_| AnalyticsError::InvalidDayKey(key.to_string()))
}

/// The current UTC calendar date.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}
