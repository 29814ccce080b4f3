//! Webhook receiver for verifying incoming webhooks.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::WebhookConfig;
use crate::error::{WebhookError, WebhookResult};
use crate::signature::WebhookSigner;

/// Delivery id header.
pub const SVIX_ID: &str = "svix-id";
/// Delivery timestamp header (unix seconds).
pub const SVIX_TIMESTAMP: &str = "svix-timestamp";
/// Signature header.
pub const SVIX_SIGNATURE: &str = "svix-signature";

/// The three signature headers of a delivery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebhookHeaders {
    pub id: Option<String>,
    pub timestamp: Option<String>,
    pub signature: Option<String>,
}

impl WebhookHeaders {
    /// Creates a complete header set.
    pub fn new(
        id: impl Into<String>,
        timestamp: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            timestamp: Some(timestamp.into()),
            signature: Some(signature.into()),
        }
    }

    /// Collects the headers through a lookup function.
    pub fn from_fn<'a, F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let get = |name: &str| lookup(name).map(str::to_string);
        Self {
            id: get(SVIX_ID),
            timestamp: get(SVIX_TIMESTAMP),
            signature: get(SVIX_SIGNATURE),
        }
    }

    /// Returns the delivery id, or an empty string when absent.
    pub fn delivery_id(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }

    fn require(&self) -> WebhookResult<(&str, &str, &str)> {
        match (&self.id, &self.timestamp, &self.signature) {
            (Some(id), Some(timestamp), Some(signature))
                if !id.is_empty() && !timestamp.is_empty() && !signature.is_empty() =>
            {
                Ok((id, timestamp, signature))
            }
            _ => Err(WebhookError::MissingHeaders),
        }
    }
}

/// HTTP details of the request that triggered an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HttpRequestAttributes {
    #[serde(default)]
    pub client_ip: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

/// Sender-side attributes attached to an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventAttributes {
    #[serde(default)]
    pub http_request: Option<HttpRequestAttributes>,
}

/// Verified webhook envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEnvelope {
    /// Event type.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Event data.
    pub data: Value,
    /// Envelope object kind, `"event"`.
    #[serde(default)]
    pub object: Option<String>,
    /// Sender timestamp in unix milliseconds.
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub event_attributes: Option<EventAttributes>,
}

impl WebhookEnvelope {
    /// Provider id of the affected object, empty when the payload has none.
    pub fn object_id(&self) -> &str {
        self.data
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Client IP of the triggering request.
    pub fn client_ip(&self) -> Option<&str> {
        self.http_request().and_then(|r| r.client_ip.as_deref())
    }

    /// User agent of the triggering request.
    pub fn user_agent(&self) -> Option<&str> {
        self.http_request().and_then(|r| r.user_agent.as_deref())
    }

    fn http_request(&self) -> Option<&HttpRequestAttributes> {
        self.event_attributes
            .as_ref()
            .and_then(|a| a.http_request.as_ref())
    }
}

/// Webhook receiver for verifying incoming webhooks.
///
/// A receiver without a signer rejects every delivery.
#[derive(Debug, Clone)]
pub struct WebhookReceiver {
    signer: Option<WebhookSigner>,
    /// Tolerance for timestamp validation (in seconds).
    tolerance_secs: i64,
}

impl WebhookReceiver {
    /// Creates a receiver from configuration.
    pub fn new(config: &WebhookConfig) -> WebhookResult<Self> {
        let signer = config
            .signing_secret
            .as_deref()
            .filter(|secret| !secret.is_empty())
            .map(WebhookSigner::new)
            .transpose()?;
        Ok(Self {
            signer,
            tolerance_secs: config.tolerance_secs,
        })
    }

    /// Creates a receiver for a signing secret with the default tolerance.
    pub fn with_secret(secret: &str) -> WebhookResult<Self> {
        Self::new(&WebhookConfig::new().with_secret(secret))
    }

    /// Creates a receiver that rejects everything.
    pub fn unconfigured() -> Self {
        Self {
            signer: None,
            tolerance_secs: crate::config::DEFAULT_TOLERANCE_SECS,
        }
    }

    /// Sets the timestamp tolerance.
    pub fn with_tolerance(mut self, tolerance_secs: i64) -> Self {
        self.tolerance_secs = tolerance_secs;
        self
    }

    /// Returns true if a signing secret is configured.
    pub fn is_configured(&self) -> bool {
        self.signer.is_some()
    }

    /// Verifies a delivery against the current time and parses its envelope.
    pub fn verify(&self, headers: &WebhookHeaders, body: &[u8]) -> WebhookResult<WebhookEnvelope> {
        self.verify_at(headers, body, Utc::now().timestamp())
    }

    /// Verifies a delivery against `now` (unix seconds) and parses its envelope.
    pub fn verify_at(
        &self,
        headers: &WebhookHeaders,
        body: &[u8],
        now: i64,
    ) -> WebhookResult<WebhookEnvelope> {
        let (id, timestamp, signature) = headers.require()?;
        let signer = self.signer.as_ref().ok_or(WebhookError::SecretNotConfigured)?;

        signer.verify_header(id, timestamp, signature, body, self.tolerance_secs, now)?;

        // Parse payload
        Ok(serde_json::from_slice(body)?)
    }
}
