//! Text shared by every view of a stored response.

use chrono::{DateTime, TimeZone, Utc};

/// Heading of the review.
pub const REVIEW_HEADING: &str = "Your submission";

/// Shown in place of an empty answer.
pub const EMPTY_ANSWER: &str = "(empty)";

const TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Format a timestamp the way the review shows it, e.g. `3/1/2025, 10:00:00 AM`.
pub fn format_timestamp<Tz>(at: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    at.with_timezone(tz).format(TIMESTAMP_FORMAT).to_string()
}
