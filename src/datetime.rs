//! Timestamp helpers for Mailroom.
//!
//! Records store `created_at`/`updated_at` as fixed-width RFC 3339 strings
//! in UTC with microsecond precision, so lexical order equals time order.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a UTC datetime as a fixed-width RFC 3339 string.
pub fn to_rfc3339(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Current time formatted for storage.
pub fn now_timestamp() -> String {
    to_rfc3339(&Utc::now())
}
