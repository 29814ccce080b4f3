//! Operator API: webhook audit reads and system-role management.

use clerk_mirror_core::{Identity, MirrorError, MirrorResult, MirrorStore, WebhookEvent};
use clerk_mirror_webhooks::AuditLog;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::access::{require_super_admin, require_system_admin, require_user};

/// Requested change to a user's system-role flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemRoleUpdate {
    #[serde(default)]
    pub is_super_admin: Option<bool>,
    #[serde(default)]
    pub is_super_user: Option<bool>,
}

impl SystemRoleUpdate {
    /// Returns true if no flag is set.
    pub fn is_empty(&self) -> bool {
        self.is_super_admin.is_none() && self.is_super_user.is_none()
    }
}

/// Result of a write that may be a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl UpdateResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            reason: None,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            reason: Some(reason.into()),
        }
    }
}

/// Admin API service.
pub struct AdminApi {
    store: Arc<dyn MirrorStore>,
    audit: AuditLog,
}

impl AdminApi {
    /// Creates a new admin API.
    pub fn new(store: Arc<dyn MirrorStore>) -> Self {
        Self {
            audit: AuditLog::new(store.clone()),
            store,
        }
    }

    async fn require_system_admin(&self, identity: Option<&Identity>) -> MirrorResult<()> {
        let user = require_user(self.store.as_ref(), identity).await?;
        require_system_admin(&user)
    }

    /// Lists the most recent audit records, newest first.
    pub async fn recent_webhook_events(
        &self,
        identity: Option<&Identity>,
        limit: Option<usize>,
    ) -> MirrorResult<Vec<WebhookEvent>> {
        self.require_system_admin(identity).await?;
        self.audit.recent(limit).await
    }

    /// Lists the audit records for one provider object id.
    pub async fn webhook_events_for_object(
        &self,
        identity: Option<&Identity>,
        object_id: &str,
        limit: Option<usize>,
    ) -> MirrorResult<Vec<WebhookEvent>> {
        self.require_system_admin(identity).await?;
        self.audit.for_object(object_id, limit).await
    }

    /// Lists the audit records of one event type.
    pub async fn webhook_events_by_type(
        &self,
        identity: Option<&Identity>,
        event_type: &str,
        limit: Option<usize>,
    ) -> MirrorResult<Vec<WebhookEvent>> {
        self.require_system_admin(identity).await?;
        self.audit.by_type(event_type, limit).await
    }

    /// Sets a user's system-role flags. Super admins only.
    ///
    /// Flags left unset in `update` are kept. An empty update reports
    /// `no_updates_provided` without writing.
    pub async fn update_user_system_role(
        &self,
        identity: Option<&Identity>,
        user_id: &str,
        update: SystemRoleUpdate,
    ) -> MirrorResult<UpdateResult> {
        let caller = require_user(self.store.as_ref(), identity).await?;
        require_super_admin(&caller)?;

        let mut target = self
            .store
            .get_user(user_id)
            .await?
            .ok_or_else(|| MirrorError::not_found("user", "id", user_id))?;

        if update.is_empty() {
            return Ok(UpdateResult::failed("no_updates_provided"));
        }

        if let Some(flag) = update.is_super_admin {
            target.is_super_admin = Some(flag);
        }
        if let Some(flag) = update.is_super_user {
            target.is_super_user = Some(flag);
        }
        self.store.update_user(&target).await?;

        tracing::info!(
            actor = %caller.external_id,
            target = %target.external_id,
            is_super_admin = ?update.is_super_admin,
            is_super_user = ?update.is_super_user,
            "System role updated"
        );
        Ok(UpdateResult::ok())
    }
}

impl std::fmt::Debug for AdminApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminApi").finish_non_exhaustive()
    }
}
