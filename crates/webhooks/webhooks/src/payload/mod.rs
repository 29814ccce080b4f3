//! Typed webhook payloads.
//!
//! Each struct lists the fields a handler reads. Required fields are plain
//! types, so decoding a payload doubles as its shape validation; everything
//! else is optional and defaults to `None`.

pub mod timestamp;

mod access;
mod invitation;
mod membership;
mod organization;
mod session;
mod user;

use serde::Deserialize;

pub use access::{EmbeddedPermission, PermissionPayload, RolePayload};
pub use invitation::InvitationPayload;
pub use membership::{MemberUserData, MembershipDeletedPayload, MembershipPayload, OrganizationRef};
pub use organization::OrganizationPayload;
pub use session::{DevicePayload, SessionActivity, SessionPayload, UserRef};
pub use user::{EmailAddressPayload, EmailVerification, UserPayload};

/// Payload of a deletion event: the provider only guarantees the id.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeletedPayload {
    pub id: String,
    #[serde(default)]
    pub deleted: Option<bool>,
}

/// Joins the non-empty parts of a name with a space.
pub(crate) fn join_name(first: Option<&str>, last: Option<&str>) -> Option<String> {
    let name = [first, last]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!name.is_empty()).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_name() {
        assert_eq!(join_name(Some("Ada"), Some("Lovelace")).as_deref(), Some("Ada Lovelace"));
        assert_eq!(join_name(None, Some("Lovelace")).as_deref(), Some("Lovelace"));
        assert_eq!(join_name(Some(" "), None), None);
    }
}
