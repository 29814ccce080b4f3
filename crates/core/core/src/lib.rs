//! # Clerk Mirror Core
//!
//! Foundational types for the local mirror of identity-provider data.
//! It defines the mirrored records (`User`, `Organization`, memberships,
//! invitations, sessions, permissions, roles and the webhook audit record),
//! the explicit merge contract used by every upsert, the persisted schema
//! description, the error type, and the `MirrorStore` trait that storage
//! adapters implement.

pub mod error;
pub mod identity;
pub mod merge;
pub mod schema;
pub mod time;
pub mod traits;
pub mod types;

// Re-export commonly used items at the crate root
pub use error::{MirrorError, MirrorResult};
pub use identity::Identity;
pub use merge::Merge;
pub use schema::{mirror_schema, IndexDefinition, TableDefinition};
pub use traits::MirrorStore;
pub use types::{
    Invitation, InvitationPatch, InvitationStatus, Membership, MembershipPatch, Organization,
    OrganizationPatch, Permission, PermissionPatch, Role, RolePatch, Session, SessionPatch,
    SessionStatus, User, UserPatch, WebhookEvent, WebhookEventStatus,
};
