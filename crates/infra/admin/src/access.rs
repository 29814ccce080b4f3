//! Authorization checks.
//!
//! Callers are identified by the provider subject and must be mirrored in
//! the `users` table before any check passes.

use clerk_mirror_core::{Identity, Membership, MirrorError, MirrorResult, MirrorStore, User};

/// Returns the identity or fails with `Unauthenticated`.
pub fn require_identity(identity: Option<&Identity>) -> MirrorResult<&Identity> {
    identity.ok_or(MirrorError::Unauthenticated)
}

/// Resolves the caller to its mirrored user.
pub async fn require_user(
    store: &dyn MirrorStore,
    identity: Option<&Identity>,
) -> MirrorResult<User> {
    let identity = require_identity(identity)?;
    store
        .find_user_by_external_id(&identity.subject)
        .await?
        .ok_or_else(|| MirrorError::not_found("user", "externalId", identity.subject.as_str()))
}

/// Returns the caller's membership in an organization.
pub async fn require_member(
    store: &dyn MirrorStore,
    user: &User,
    organization_id: &str,
) -> MirrorResult<Membership> {
    store
        .find_membership(&user.id, organization_id)
        .await?
        .ok_or_else(|| MirrorError::forbidden("User is not a member of this organization"))
}

/// Returns the caller's membership if it carries an admin role.
pub async fn require_org_admin(
    store: &dyn MirrorStore,
    user: &User,
    organization_id: &str,
) -> MirrorResult<Membership> {
    let membership = require_member(store, user, organization_id).await?;
    if !membership.is_admin() {
        return Err(MirrorError::forbidden("This action requires admin permissions"));
    }
    Ok(membership)
}

/// Requires a super admin or super user.
pub fn require_system_admin(user: &User) -> MirrorResult<()> {
    if user.has_system_admin_access() {
        Ok(())
    } else {
        Err(MirrorError::forbidden("System admin access required"))
    }
}

/// Requires a super admin.
pub fn require_super_admin(user: &User) -> MirrorResult<()> {
    if user.is_super_admin() {
        Ok(())
    } else {
        Err(MirrorError::forbidden("Only Super Admins can manage system roles"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_identity() {
        assert!(matches!(
            require_identity(None),
            Err(MirrorError::Unauthenticated)
        ));
    }

    #[test]
    fn test_system_roles() {
        let mut user = User::new("user_1", "Ada");
        assert!(require_system_admin(&user).is_err());

        user.is_super_user = Some(true);
        assert!(require_system_admin(&user).is_ok());
        assert_eq!(require_super_admin(&user).unwrap_err().status_code(), 403);

        user.is_super_admin = Some(true);
        assert!(require_super_admin(&user).is_ok());
    }
}
