//! Framework-agnostic webhook endpoint.
//!
//! [`WebhookProcessor::handle`] is the single place where a delivery turns
//! into an HTTP status, a JSON body and an audit status.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};

use clerk_mirror_core::{MirrorStore, WebhookEventStatus};

use crate::audit::AuditLog;
use crate::config::{SyncOptions, WebhookConfig};
use crate::error::{WebhookError, WebhookResult};
use crate::event::ClerkEvent;
use crate::handlers::{EventContext, MirrorSync, SyncOutcome};
use crate::receiver::{WebhookEnvelope, WebhookHeaders, WebhookReceiver};

/// Status and JSON body to send back to the webhook sender.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookResponse {
    pub status: u16,
    pub body: Value,
}

impl WebhookResponse {
    fn success() -> Self {
        Self {
            status: 200,
            body: json!({ "status": "success" }),
        }
    }

    fn ignored(event_type: &str) -> Self {
        Self {
            status: 202,
            body: json!({ "status": "ignored", "eventType": event_type }),
        }
    }

    fn rejected(error: &WebhookError) -> Self {
        Self {
            status: error.status_code(),
            body: json!({ "error": error.to_string() }),
        }
    }

    fn failed(error: &WebhookError, event_type: &str) -> Self {
        Self {
            status: error.status_code(),
            body: json!({
                "error": "Processing error",
                "details": error.to_string(),
                "eventType": event_type,
            }),
        }
    }

    /// Returns true for 2xx responses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Verifies, audits, decodes and applies webhook deliveries.
#[derive(Debug, Clone)]
pub struct WebhookProcessor {
    receiver: WebhookReceiver,
    sync: MirrorSync,
    audit: AuditLog,
}

impl WebhookProcessor {
    /// Creates a processor from a receiver and a sync engine.
    pub fn new(receiver: WebhookReceiver, sync: MirrorSync) -> Self {
        let audit = AuditLog::new(sync.store().clone());
        Self {
            receiver,
            sync,
            audit,
        }
    }

    /// Builds a processor from configuration.
    pub fn from_config(
        config: &WebhookConfig,
        options: SyncOptions,
        store: Arc<dyn MirrorStore>,
    ) -> WebhookResult<Self> {
        let receiver = WebhookReceiver::new(config)?;
        Ok(Self::new(receiver, MirrorSync::with_options(store, options)))
    }

    /// The audit log.
    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    /// The sync engine.
    pub fn sync(&self) -> &MirrorSync {
        &self.sync
    }

    /// Handles one delivery against the current time.
    pub async fn handle(&self, headers: &WebhookHeaders, body: &[u8]) -> WebhookResponse {
        self.handle_at(headers, body, Utc::now().timestamp()).await
    }

    /// Handles one delivery, verifying the timestamp against `now` (unix seconds).
    pub async fn handle_at(
        &self,
        headers: &WebhookHeaders,
        body: &[u8],
        now: i64,
    ) -> WebhookResponse {
        // Nothing touches the store before the signature checks out.
        let envelope = match self.receiver.verify_at(headers, body, now) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(error = %e, "Webhook verification failed");
                return WebhookResponse::rejected(&e);
            }
        };

        let event_type = envelope.event_type.as_str();
        let audit_id = self
            .audit
            .record(event_type, headers.delivery_id(), envelope.object_id(), &envelope.data)
            .await;

        match self.process(&envelope).await {
            Ok(Some(outcome)) => {
                let note = outcome
                    .skip_reason()
                    .map(|reason| format!("skipped: {reason}"));
                if let SyncOutcome::Skipped { reason } = &outcome {
                    tracing::warn!(event_type, object_id = envelope.object_id(), %reason, "Webhook event skipped");
                } else {
                    tracing::info!(event_type, object_id = envelope.object_id(), "Webhook event processed");
                }
                self.audit
                    .complete(audit_id.as_deref(), WebhookEventStatus::Processed, note)
                    .await;
                WebhookResponse::success()
            }
            Ok(None) => {
                tracing::info!(event_type, "Received unhandled webhook event");
                self.audit
                    .complete(audit_id.as_deref(), WebhookEventStatus::Ignored, None)
                    .await;
                WebhookResponse::ignored(event_type)
            }
            Err(e) => {
                tracing::error!(event_type, error = %e, "Error processing webhook event");
                self.audit
                    .complete(audit_id.as_deref(), WebhookEventStatus::Failed, Some(e.to_string()))
                    .await;
                WebhookResponse::failed(&e, event_type)
            }
        }
    }

    async fn process(&self, envelope: &WebhookEnvelope) -> WebhookResult<Option<SyncOutcome>> {
        let event = ClerkEvent::decode(&envelope.event_type, &envelope.data)?;
        let context = EventContext {
            client_ip: envelope.client_ip().map(str::to_string),
            user_agent: envelope.user_agent().map(str::to_string),
        };
        Ok(self.sync.apply(&event, &context).await?)
    }
}
