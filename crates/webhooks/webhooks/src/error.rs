//! Webhook error types.

use clerk_mirror_core::MirrorError;
use thiserror::Error;

/// Result type for webhook operations.
pub type WebhookResult<T> = Result<T, WebhookError>;

/// Error type for webhook operations.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// One of `svix-id`, `svix-timestamp` or `svix-signature` is absent.
    #[error("Missing required Svix headers")]
    MissingHeaders,

    /// No signing secret is configured.
    #[error("Webhook secret not configured")]
    SecretNotConfigured,

    /// The configured signing secret is not valid base64.
    #[error("Invalid webhook secret: {0}")]
    InvalidSecret(String),

    /// Invalid signature.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Signature timestamp outside the tolerance window.
    #[error("Signature expired")]
    ExpiredSignature,

    /// The verified body is not a JSON webhook envelope.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// A recognized event carried a payload of the wrong shape.
    #[error("Invalid {event_type} payload: {reason}")]
    Validation { event_type: String, reason: String },

    /// The mirror store failed.
    #[error("Storage error: {0}")]
    Store(#[from] MirrorError),
}

impl WebhookError {
    /// Creates a new validation error.
    pub fn validation(event_type: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            event_type: event_type.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if the request was rejected before any processing.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::MissingHeaders
                | Self::SecretNotConfigured
                | Self::InvalidSecret(_)
                | Self::InvalidSignature
                | Self::ExpiredSignature
                | Self::InvalidPayload(_)
        )
    }

    /// Returns the HTTP status code the sender should see.
    pub fn status_code(&self) -> u16 {
        if self.is_rejection() { 400 } else { 500 }
    }
}

impl From<serde_json::Error> for WebhookError {
    fn from(err: serde_json::Error) -> Self {
        WebhookError::InvalidPayload(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(WebhookError::MissingHeaders.status_code(), 400);
        assert_eq!(WebhookError::InvalidSignature.status_code(), 400);
        assert_eq!(WebhookError::validation("user.created", "missing id").status_code(), 500);
        assert_eq!(WebhookError::Store(MirrorError::database("down")).status_code(), 500);
    }

    #[test]
    fn test_validation_message() {
        let err = WebhookError::validation("role.created", "missing field `key`");
        assert_eq!(err.to_string(), "Invalid role.created payload: missing field `key`");
    }
}
