//! Parsing of stored `loginTime` strings into epoch milliseconds.
//!
//! Accepted forms, tried in order: RFC 3339 (`2024-01-01T00:00:00Z`), RFC 2822
//! (`Mon, 01 Jan 2024 00:00:00 GMT`), ISO date-time without offset and a bare ISO
//! date.
//!
//! This is deliberately narrower than a browser's `Date.parse`. Forms without an
//! offset are read as UTC, where a browser reads date-times as local time. Loose
//! forms such as `2024/01/01` or `Jan 1 2024` are not accepted; callers fall back
//! to the current time for them.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const NAIVE_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

pub fn parse_login_time(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis() as f64);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.timestamp_millis() as f64);
    }
    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.and_utc().timestamp_millis() as f64);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis() as f64)
}
