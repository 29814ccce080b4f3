//! Mirrored record types.
//!
//! Every record has an opaque local `id` and, for entities owned by the
//! identity provider, an `external_id` that is the only stable join key to
//! the provider. Timestamps are ISO-8601 strings; `None` means unknown.

mod access;
mod invitation;
mod membership;
mod organization;
mod session;
mod user;
mod webhook_event;

pub mod metadata;

pub use access::{Permission, PermissionPatch, Role, RolePatch};
pub use invitation::{Invitation, InvitationPatch, InvitationStatus};
pub use membership::{Membership, MembershipPatch};
pub use organization::{Organization, OrganizationPatch};
pub use session::{Session, SessionPatch, SessionStatus};
pub use user::{User, UserPatch};
pub use webhook_event::{WebhookEvent, WebhookEventStatus};

/// Generates a new opaque local identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
