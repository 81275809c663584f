//! Canonical timestamp encoding
//!
//! All timestamps are stored as `YYYY-MM-DD HH:MM:SS` strings in UTC, so
//! string comparison in SQL orders them chronologically.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Storage format for every datetime column
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Far-future sentinel: a record whose `soft_deleted_at` holds this value is not deleted
pub const MAX_DATETIME: &str = "9999-12-31 23:59:59";

/// Sentinel for "never happened" (e.g. a feed that was never fetched)
pub const NULL_DATETIME: &str = "0002-01-01 00:00:00";

/// Current UTC time in storage format
pub fn now_string() -> String {
    format_datetime(&Utc::now())
}

/// Format a timestamp in storage format
pub fn format_datetime(value: &DateTime<Utc>) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

/// Parse a storage-format timestamp
///
/// Also accepts RFC 3339 and the `YYYY-MM-DD HH:MM:SS +0000 UTC` shape some
/// drivers hand back. Returns `None` when nothing matches.
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim().trim_end_matches(" +0000 UTC");

    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, DATETIME_FORMAT) {
        return Some(naive.and_utc());
    }

    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Re-encode any timestamp `parse_datetime` accepts in storage format
pub fn canonicalize(value: &str) -> Option<String> {
    parse_datetime(value).map(|dt| format_datetime(&dt))
}
