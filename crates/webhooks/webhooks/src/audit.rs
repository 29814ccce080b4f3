//! Webhook audit log.
//!
//! Every verified delivery is recorded as `processing` before dispatch and
//! patched with its outcome afterwards. Failures to write the log are
//! reported through `tracing` and never abort processing.

use std::sync::Arc;

use serde_json::Value;

use clerk_mirror_core::{MirrorResult, MirrorStore, WebhookEvent, WebhookEventStatus};

/// Default number of records returned by [`AuditLog::recent`].
pub const DEFAULT_RECENT_LIMIT: usize = 50;
/// Default number of records returned by [`AuditLog::for_object`].
pub const DEFAULT_OBJECT_LIMIT: usize = 20;
/// Default number of records returned by [`AuditLog::by_type`].
pub const DEFAULT_TYPE_LIMIT: usize = 20;

/// Audit log over the `webhookEvents` table.
#[derive(Clone)]
pub struct AuditLog {
    store: Arc<dyn MirrorStore>,
}

impl AuditLog {
    /// Creates an audit log backed by a store.
    pub fn new(store: Arc<dyn MirrorStore>) -> Self {
        Self { store }
    }

    /// Records a delivery as `processing`.
    ///
    /// Returns the audit record id, or `None` if the write failed.
    pub async fn record(
        &self,
        event_type: &str,
        event_id: &str,
        object_id: &str,
        data: &Value,
    ) -> Option<String> {
        let event = WebhookEvent::processing(event_type, event_id, object_id, data.clone());
        match self.store.insert_webhook_event(&event).await {
            Ok(event) => Some(event.id),
            Err(e) => {
                tracing::error!(event_type, event_id, error = %e, "Failed to record webhook event");
                None
            }
        }
    }

    /// Patches a recorded delivery with its final status.
    pub async fn complete(
        &self,
        audit_id: Option<&str>,
        status: WebhookEventStatus,
        error_message: Option<String>,
    ) {
        let Some(audit_id) = audit_id else {
            return;
        };
        if let Err(e) = self.try_complete(audit_id, status, error_message).await {
            tracing::error!(audit_id, %status, error = %e, "Failed to update webhook event status");
        }
    }

    async fn try_complete(
        &self,
        audit_id: &str,
        status: WebhookEventStatus,
        error_message: Option<String>,
    ) -> MirrorResult<()> {
        let Some(mut event) = self.store.get_webhook_event(audit_id).await? else {
            tracing::warn!(audit_id, "Webhook event vanished before its status update");
            return Ok(());
        };
        event.status = status;
        event.error_message = error_message;
        self.store.update_webhook_event(&event).await?;
        Ok(())
    }

    /// Most recent records, newest first.
    pub async fn recent(&self, limit: Option<usize>) -> MirrorResult<Vec<WebhookEvent>> {
        self.store
            .recent_webhook_events(limit.unwrap_or(DEFAULT_RECENT_LIMIT))
            .await
    }

    /// Records for one provider object id, newest first.
    pub async fn for_object(
        &self,
        object_id: &str,
        limit: Option<usize>,
    ) -> MirrorResult<Vec<WebhookEvent>> {
        self.store
            .webhook_events_for_object(object_id, limit.unwrap_or(DEFAULT_OBJECT_LIMIT))
            .await
    }

    /// Records of one event type, newest first.
    pub async fn by_type(
        &self,
        event_type: &str,
        limit: Option<usize>,
    ) -> MirrorResult<Vec<WebhookEvent>> {
        self.store
            .webhook_events_by_type(event_type, limit.unwrap_or(DEFAULT_TYPE_LIMIT))
            .await
    }
}

impl std::fmt::Debug for AuditLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLog").finish_non_exhaustive()
    }
}
