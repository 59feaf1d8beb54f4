//! Parsing of `DAV:getlastmodified` values.

use chrono::{DateTime, NaiveDateTime, Utc};

/// rfc1123-date format (RFC 2616 §3.3.1).
pub const RFC1123_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// ## Summary
/// Parses an rfc1123-date string as a UTC datetime.
///
/// Values are not guaranteed to be well formed; anything that does not match
/// the format yields `None`.
#[must_use]
pub fn datetime_from_string(rfc1123_date: &str) -> Option<DateTime<Utc>> {
    match NaiveDateTime::parse_from_str(rfc1123_date.trim(), RFC1123_FORMAT) {
        Ok(naive) => Some(naive.and_utc()),
        Err(err) => {
            tracing::debug!(error = %err, value = %rfc1123_date, "Unparseable rfc1123 date");
            None
        }
    }
}
