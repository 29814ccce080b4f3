//! # Clerk Mirror Admin
//!
//! Read and management APIs over the mirror. Every call takes the caller's
//! [`Identity`](clerk_mirror_core::Identity) and is gated by one of the
//! checks in [`access`]:
//! - [`AdminApi`]: webhook audit reads (system admins) and system-role
//!   updates (super admins)
//! - [`MirrorQueries`]: member-scoped reads and org-admin writes

pub mod access;
mod api;
mod queries;

pub use api::{AdminApi, SystemRoleUpdate, UpdateResult};
pub use queries::{MembershipRole, MirrorQueries, RoleWithPermissions};
