//! ISO-8601 timestamp helpers.
//!
//! Mirror timestamps are stored as RFC 3339 strings in UTC with millisecond
//! precision so that lexical order matches chronological order.

use chrono::{DateTime, SecondsFormat, Utc};

/// Returns the current time as an ISO-8601 string.
pub fn now() -> String {
    format(Utc::now())
}

/// Formats a UTC instant the way the mirror stores it.
pub fn format(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Converts unix milliseconds into an ISO-8601 string.
pub fn from_millis(millis: i64) -> Option<String> {
    DateTime::from_timestamp_millis(millis).map(format)
}

/// Normalizes a timestamp string to the stored format.
///
/// Strings that do not parse as RFC 3339 are kept verbatim.
pub fn normalize(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|parsed| format(parsed.with_timezone(&Utc)))
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_millis() {
        assert_eq!(
            from_millis(1_700_000_000_000).as_deref(),
            Some("2023-11-14T22:13:20.000Z")
        );
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("2024-01-01T02:00:00+02:00"), "2024-01-01T00:00:00.000Z");
        assert_eq!(normalize("yesterday"), "yesterday");
    }

    #[test]
    fn test_now_sorts_lexically() {
        let earlier = from_millis(1_000).unwrap_or_default();
        assert!(earlier < now());
    }
}
