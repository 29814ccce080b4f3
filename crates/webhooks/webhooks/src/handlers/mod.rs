//! Domain upsert and delete handlers.
//!
//! Every handler resolves references by provider id, looks for an existing
//! record, merges the payload into it (or inserts a new one) and returns a
//! [`SyncOutcome`]. Expected misses such as an unknown organization are
//! outcomes, not errors; only store failures propagate.

mod access;
mod invitations;
mod memberships;
mod organizations;
mod placeholder;
mod sessions;
mod users;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use clerk_mirror_core::{MirrorResult, MirrorStore};

use crate::config::SyncOptions;
use crate::event::ClerkEvent;

pub use memberships::split_composite_id;

/// Request-level facts that accompany an event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventContext {
    /// IP of the request that triggered the event.
    pub client_ip: Option<String>,
    /// User agent of the request that triggered the event.
    pub user_agent: Option<String>,
}

impl EventContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the client IP.
    pub fn with_client_ip(mut self, ip: impl Into<String>) -> Self {
        self.client_ip = Some(ip.into());
        self
    }

    /// Sets the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

/// Why a handler left the mirror untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    UserNotFound,
    OrganizationNotFound,
    MembershipNotFound,
    InvitationNotFound,
    SessionNotFound,
    PermissionNotFound,
    RoleNotFound,
    InvalidCompositeId,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserNotFound => "user_not_found",
            Self::OrganizationNotFound => "organization_not_found",
            Self::MembershipNotFound => "membership_not_found",
            Self::InvitationNotFound => "invitation_not_found",
            Self::SessionNotFound => "session_not_found",
            Self::PermissionNotFound => "permission_not_found",
            Self::RoleNotFound => "role_not_found",
            Self::InvalidCompositeId => "invalid_composite_id",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of applying one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// A record was inserted (`created`) or patched.
    Upserted { id: String, created: bool },
    /// A record was removed.
    Deleted { id: String },
    /// Nothing was written.
    Skipped { reason: SkipReason },
}

impl SyncOutcome {
    pub(crate) fn created(id: impl Into<String>) -> Self {
        Self::Upserted {
            id: id.into(),
            created: true,
        }
    }

    pub(crate) fn updated(id: impl Into<String>) -> Self {
        Self::Upserted {
            id: id.into(),
            created: false,
        }
    }

    pub(crate) fn deleted(id: impl Into<String>) -> Self {
        Self::Deleted { id: id.into() }
    }

    pub(crate) fn skipped(reason: SkipReason) -> Self {
        Self::Skipped { reason }
    }

    /// Returns true unless the handler skipped.
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Skipped { .. })
    }

    /// Local id of the affected record.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Upserted { id, .. } | Self::Deleted { id } => Some(id),
            Self::Skipped { .. } => None,
        }
    }

    /// The skip reason, if any.
    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            Self::Skipped { reason } => Some(*reason),
            _ => None,
        }
    }
}

/// Applies decoded events to the mirror store.
#[derive(Clone)]
pub struct MirrorSync {
    store: Arc<dyn MirrorStore>,
    options: SyncOptions,
}

impl MirrorSync {
    /// Creates a sync engine with default options.
    pub fn new(store: Arc<dyn MirrorStore>) -> Self {
        Self::with_options(store, SyncOptions::default())
    }

    /// Creates a sync engine with explicit options.
    pub fn with_options(store: Arc<dyn MirrorStore>, options: SyncOptions) -> Self {
        Self { store, options }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn MirrorStore> {
        &self.store
    }

    /// The sync options.
    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Routes an event to its handler.
    ///
    /// Returns `None` for unknown event types.
    pub async fn apply(
        &self,
        event: &ClerkEvent,
        context: &EventContext,
    ) -> MirrorResult<Option<SyncOutcome>> {
        let outcome = match event {
            ClerkEvent::UserUpserted(payload) => self.upsert_user(payload).await?,
            ClerkEvent::UserDeleted(payload) => self.delete_user(&payload.id).await?,
            ClerkEvent::Session { kind, payload } => {
                self.upsert_session(kind, payload, context).await?
            }
            ClerkEvent::OrganizationUpserted(payload) => self.upsert_organization(payload).await?,
            ClerkEvent::OrganizationDeleted(payload) => {
                self.delete_organization(&payload.id).await?
            }
            ClerkEvent::Invitation { kind, payload } => {
                self.upsert_invitation(*kind, payload, context).await?
            }
            ClerkEvent::MembershipUpserted(payload) => self.upsert_membership(payload).await?,
            ClerkEvent::MembershipDeleted(payload) => self.delete_membership(payload).await?,
            ClerkEvent::PermissionUpserted(payload) => self.upsert_permission(payload).await?,
            ClerkEvent::PermissionDeleted(payload) => self.delete_permission(&payload.id).await?,
            ClerkEvent::RoleUpserted(payload) => self.upsert_role(payload).await?,
            ClerkEvent::RoleDeleted(payload) => self.delete_role(&payload.id).await?,
            ClerkEvent::Unknown(_) => return Ok(None),
        };
        Ok(Some(outcome))
    }
}

impl fmt::Debug for MirrorSync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MirrorSync")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_reason_strings() {
        assert_eq!(SkipReason::InvalidCompositeId.as_str(), "invalid_composite_id");
        assert_eq!(
            serde_json::to_value(SkipReason::OrganizationNotFound).unwrap(),
            serde_json::json!("organization_not_found")
        );
    }

    #[test]
    fn test_outcome_accessors() {
        let outcome = SyncOutcome::created("abc");
        assert!(outcome.is_success());
        assert_eq!(outcome.id(), Some("abc"));

        let skipped = SyncOutcome::skipped(SkipReason::RoleNotFound);
        assert!(!skipped.is_success());
        assert_eq!(skipped.skip_reason(), Some(SkipReason::RoleNotFound));
    }
}
