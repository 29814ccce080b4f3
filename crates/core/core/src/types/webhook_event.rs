use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Processing status of an audited webhook event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebhookEventStatus {
    Processing,
    Processed,
    Failed,
    Ignored,
}

impl WebhookEventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Processed => "processed",
            Self::Failed => "failed",
            Self::Ignored => "ignored",
        }
    }
}

impl fmt::Display for WebhookEventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit record of one inbound, signature-verified webhook delivery.
///
/// Written once with status `processing`, then patched with the outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    pub id: String,
    /// Event type string, e.g. `user.created`.
    pub event_type: String,
    /// Delivery id assigned by the sender.
    pub event_id: String,
    /// Provider id of the affected object, empty when the payload has none.
    pub object_id: String,
    /// Object category derived from the event type, e.g. `user`.
    pub object_type: String,
    /// When the event was received.
    pub timestamp: String,
    /// Raw event payload.
    pub data: Value,
    pub status: WebhookEventStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl WebhookEvent {
    /// Creates an audit record in the `processing` state.
    pub fn processing(
        event_type: impl Into<String>,
        event_id: impl Into<String>,
        object_id: impl Into<String>,
        data: Value,
    ) -> Self {
        let event_type = event_type.into();
        let object_type = event_type
            .split('.')
            .next()
            .unwrap_or_default()
            .to_string();
        Self {
            id: super::new_id(),
            event_type,
            event_id: event_id.into(),
            object_id: object_id.into(),
            object_type,
            timestamp: crate::time::now(),
            data,
            status: WebhookEventStatus::Processing,
            error_message: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_processing_record() {
        let event = WebhookEvent::processing("organizationMembership.created", "msg_1", "orgmem_1", json!({}));
        assert_eq!(event.object_type, "organizationMembership");
        assert_eq!(event.status, WebhookEventStatus::Processing);
        assert!(event.error_message.is_none());
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(serde_json::to_value(WebhookEventStatus::Ignored).unwrap(), json!("ignored"));
    }
}
