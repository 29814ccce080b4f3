//! Serde helpers for provider timestamps.
//!
//! The provider sends unix milliseconds; older payloads and hand-written
//! fixtures carry ISO-8601 strings. Both normalise to the stored format.

use clerk_mirror_core::time;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserializes an optional timestamp, accepting numbers or strings.
///
/// Use with `#[serde(default, deserialize_with = "timestamp::optional")]`.
pub fn optional<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(from_value))
}

/// Converts a JSON timestamp value into an ISO-8601 string.
pub fn from_value(value: &Value) -> Option<String> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|f| f as i64))
            .and_then(time::from_millis),
        Value::String(raw) if !raw.is_empty() => Some(time::normalize(raw)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "optional")]
        at: Option<String>,
    }

    #[test]
    fn test_accepts_millis_and_strings() {
        let sample: Sample = serde_json::from_value(json!({"at": 1_700_000_000_000_i64})).unwrap();
        assert_eq!(sample.at.as_deref(), Some("2023-11-14T22:13:20.000Z"));

        let sample: Sample = serde_json::from_value(json!({"at": "2024-01-01T00:00:00Z"})).unwrap();
        assert_eq!(sample.at.as_deref(), Some("2024-01-01T00:00:00.000Z"));
    }

    #[test]
    fn test_missing_and_null() {
        let sample: Sample = serde_json::from_value(json!({})).unwrap();
        assert!(sample.at.is_none());
        let sample: Sample = serde_json::from_value(json!({"at": null})).unwrap();
        assert!(sample.at.is_none());
    }
}
