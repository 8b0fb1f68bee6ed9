//! Date parsing for timestamps and RFC 3339 strings.
//!
//! A zero timestamp is rejected as likely-uninitialized input rather
//! than treated as the epoch. Absent or blank input is only legal when
//! the caller opts into nulls.
use chrono::{DateTime, TimeZone, Utc};

use crate::errors::DateParseError;

/// The two accepted date representations.
#[derive(Clone, Debug, PartialEq)]
pub enum DateInput {
    /// Seconds since the Unix epoch.
    Timestamp(i64),
    /// RFC 3339 text, e.g. `2023-01-01T00:00:00+00:00`.
    Text(String),
}

impl From<i64> for DateInput {
    fn from(value: i64) -> Self {
        DateInput::Timestamp(value)
    }
}

impl From<&str> for DateInput {
    fn from(value: &str) -> Self {
        DateInput::Text(value.to_owned())
    }
}

/// Parses an optional date input into a UTC datetime.
///
/// `None` (and blank text) yields `Ok(None)` when `allow_null` is set
/// and fails otherwise. No partial result is ever returned for a
/// malformed input.
pub fn parse_datetime(
    value: Option<&DateInput>,
    allow_null: bool,
) -> Result<Option<DateTime<Utc>>, DateParseError> {
    let input = match value {
        None => return handle_null(allow_null),
        Some(input) => input,
    };

    match input {
        DateInput::Timestamp(0) => Err(DateParseError::ZeroTimestamp),
        DateInput::Timestamp(ts) => Utc
            .timestamp_opt(*ts, 0)
            .single()
            .map(Some)
            .ok_or(DateParseError::OutOfRange(*ts)),
        DateInput::Text(text) if text.trim().is_empty() => handle_null(allow_null),
        DateInput::Text(text) => DateTime::parse_from_rfc3339(text)
            .map(|parsed| Some(parsed.with_timezone(&Utc)))
            .map_err(|source| DateParseError::Unparseable {
                value: text.clone(),
                source,
            }),
    }
}

fn handle_null(allow_null: bool) -> Result<Option<DateTime<Utc>>, DateParseError> {
    if allow_null {
        Ok(None)
    } else {
        Err(DateParseError::MissingValue)
    }
}
