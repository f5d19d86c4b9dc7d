//! Event date and time formats.
//!
//! Dates are stored as `DD/MM/YYYY` with no timezone; times are free text but
//! the creation and edit forms write `hh:mm AM - hh:mm PM` ranges.

use chrono::{NaiveDate, NaiveTime};

use crate::constants::{EVENT_DATE_FORMAT, EVENT_TIME_FORMAT, TIME_RANGE_SEPARATOR};
use crate::{PeekError, Result};

/// Parse a stored `DD/MM/YYYY` date. Single-digit day and month are accepted.
///
/// # Errors
/// Returns `PeekError::ParseFailed` for any other shape or an impossible date.
pub fn parse_event_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), EVENT_DATE_FORMAT)
        .map_err(|err| PeekError::ParseFailed(format!("invalid event date '{value}': {err}")))
}

/// Format a date the way the creation form stores it.
pub fn format_event_date(date: NaiveDate) -> String {
    date.format(EVENT_DATE_FORMAT).to_string()
}

/// Render a start/end pair as `hh:mm AM - hh:mm PM`.
pub fn format_time_range(start: NaiveTime, end: NaiveTime) -> String {
    format!(
        "{}{TIME_RANGE_SEPARATOR}{}",
        start.format(EVENT_TIME_FORMAT),
        end.format(EVENT_TIME_FORMAT)
    )
}

/// Split a formatted range back into its two times.
pub fn parse_time_range(value: &str) -> Option<(NaiveTime, NaiveTime)> {
    let (start, end) = value.split_once(TIME_RANGE_SEPARATOR)?;
    let start = NaiveTime::parse_from_str(start.trim(), EVENT_TIME_FORMAT).ok()?;
    let end = NaiveTime::parse_from_str(end.trim(), EVENT_TIME_FORMAT).ok()?;
    Some((start, end))
}
