//! Helpers for the opaque metadata blobs carried by users and organizations.

use serde_json::{Map, Value};

/// Metadata key flagging a record synthesized ahead of its creation event.
pub const PLACEHOLDER_KEY: &str = "isPlaceholder";

/// Returns the metadata only when it is a non-empty object.
///
/// The provider sends `{}` for records without metadata; storing that would
/// overwrite meaningful values on merge.
pub fn non_empty(value: Option<Value>) -> Option<Value> {
    match value {
        Some(Value::Object(map)) if !map.is_empty() => Some(Value::Object(map)),
        _ => None,
    }
}

/// Returns true if the metadata carries the placeholder flag.
pub fn is_placeholder(metadata: Option<&Value>) -> bool {
    metadata
        .and_then(|m| m.get(PLACEHOLDER_KEY))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Metadata for a freshly synthesized placeholder record.
pub fn placeholder() -> Value {
    let mut map = Map::new();
    map.insert(PLACEHOLDER_KEY.to_string(), Value::Bool(true));
    Value::Object(map)
}

/// Removes the placeholder flag, dropping the blob if nothing else remains.
///
/// Returns true if a flag was removed.
pub fn clear_placeholder(metadata: &mut Option<Value>) -> bool {
    let Some(Value::Object(map)) = metadata else {
        return false;
    };
    let removed = map.remove(PLACEHOLDER_KEY).is_some();
    if map.is_empty() {
        *metadata = None;
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some(json!({}))), None);
        assert_eq!(non_empty(Some(json!({"plan": "pro"}))), Some(json!({"plan": "pro"})));
        assert_eq!(non_empty(Some(json!("text"))), None);
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn test_placeholder_roundtrip() {
        let mut metadata = Some(placeholder());
        assert!(is_placeholder(metadata.as_ref()));
        assert!(clear_placeholder(&mut metadata));
        assert!(metadata.is_none());
        assert!(!clear_placeholder(&mut metadata));
    }

    #[test]
    fn test_clear_placeholder_keeps_other_keys() {
        let mut metadata = Some(json!({"isPlaceholder": true, "tier": 2}));
        clear_placeholder(&mut metadata);
        assert_eq!(metadata, Some(json!({"tier": 2})));
    }
}
