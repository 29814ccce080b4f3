//! Member-scoped reads and writes over the mirror.

use std::sync::Arc;

use clerk_mirror_core::{
    Identity, Invitation, InvitationStatus, Membership, MirrorError, MirrorResult, MirrorStore,
    Organization, Permission, Role, Session, SessionStatus, User,
};
use serde::Serialize;

use crate::access::{require_member, require_org_admin, require_user};
use crate::api::UpdateResult;

/// The caller's standing in one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipRole {
    pub is_member: bool,
    pub role: Option<String>,
}

/// A role with its permission references resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleWithPermissions {
    #[serde(flatten)]
    pub role: Role,
    pub permissions: Vec<Permission>,
}

/// Queries over the mirror on behalf of an authenticated caller.
#[derive(Clone)]
pub struct MirrorQueries {
    store: Arc<dyn MirrorStore>,
}

impl MirrorQueries {
    pub fn new(store: Arc<dyn MirrorStore>) -> Self {
        Self { store }
    }

    fn store(&self) -> &dyn MirrorStore {
        self.store.as_ref()
    }

    // ==================== Users ====================

    /// The caller's own user record.
    pub async fn current_user(&self, identity: Option<&Identity>) -> MirrorResult<User> {
        require_user(self.store(), identity).await
    }

    /// A user by local id.
    pub async fn user_by_id(
        &self,
        identity: Option<&Identity>,
        user_id: &str,
    ) -> MirrorResult<Option<User>> {
        require_user(self.store(), identity).await?;
        self.store.get_user(user_id).await
    }

    // ==================== Organizations ====================

    /// Organizations the caller belongs to.
    ///
    /// Anonymous or unmirrored callers get an empty list.
    pub async fn organizations_for_current_user(
        &self,
        identity: Option<&Identity>,
    ) -> MirrorResult<Vec<Organization>> {
        let user = match require_user(self.store(), identity).await {
            Ok(user) => user,
            Err(MirrorError::Unauthenticated | MirrorError::NotFound { .. }) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut organizations = Vec::new();
        for membership in self.store.list_memberships_by_user(&user.id).await? {
            if let Some(organization) = self.store.get_organization(&membership.organization_id).await? {
                organizations.push(organization);
            }
        }
        Ok(organizations)
    }

    /// The caller's role in an organization.
    pub async fn role_in_organization(
        &self,
        identity: Option<&Identity>,
        organization_id: &str,
    ) -> MirrorResult<MembershipRole> {
        let user = require_user(self.store(), identity).await?;
        let membership = self.store.find_membership(&user.id, organization_id).await?;
        Ok(MembershipRole {
            is_member: membership.is_some(),
            role: membership.map(|m| m.role),
        })
    }

    /// An organization the caller belongs to.
    pub async fn organization(
        &self,
        identity: Option<&Identity>,
        organization_id: &str,
    ) -> MirrorResult<Option<Organization>> {
        let user = require_user(self.store(), identity).await?;
        require_member(self.store(), &user, organization_id).await?;
        self.store.get_organization(organization_id).await
    }

    /// Renames an organization. Org admins only.
    pub async fn update_organization_name(
        &self,
        identity: Option<&Identity>,
        organization_id: &str,
        name: Option<String>,
    ) -> MirrorResult<UpdateResult> {
        let user = require_user(self.store(), identity).await?;
        require_org_admin(self.store(), &user, organization_id).await?;

        let Some(name) = name.filter(|n| !n.is_empty()) else {
            return Ok(UpdateResult::ok());
        };
        let mut organization = self
            .store
            .get_organization(organization_id)
            .await?
            .ok_or_else(|| MirrorError::not_found("organization", "id", organization_id))?;
        organization.name = name;
        self.store.update_organization(&organization).await?;
        Ok(UpdateResult::ok())
    }

    // ==================== Memberships ====================

    /// Memberships of an organization the caller belongs to.
    pub async fn organization_memberships(
        &self,
        identity: Option<&Identity>,
        organization_id: &str,
    ) -> MirrorResult<Vec<Membership>> {
        let user = require_user(self.store(), identity).await?;
        require_member(self.store(), &user, organization_id).await?;
        self.store.list_memberships_by_organization(organization_id).await
    }

    /// The caller's memberships. Anonymous callers get an empty list.
    pub async fn memberships_for_current_user(
        &self,
        identity: Option<&Identity>,
    ) -> MirrorResult<Vec<Membership>> {
        match require_user(self.store(), identity).await {
            Ok(user) => self.store.list_memberships_by_user(&user.id).await,
            Err(MirrorError::Unauthenticated | MirrorError::NotFound { .. }) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Changes a member's role. Org admins only.
    ///
    /// The membership must belong to `organization_id`.
    pub async fn update_member_role(
        &self,
        identity: Option<&Identity>,
        organization_id: &str,
        membership_id: &str,
        role: &str,
    ) -> MirrorResult<UpdateResult> {
        let user = require_user(self.store(), identity).await?;
        require_org_admin(self.store(), &user, organization_id).await?;

        let mut membership = self
            .store
            .list_memberships_by_organization(organization_id)
            .await?
            .into_iter()
            .find(|m| m.id == membership_id)
            .ok_or_else(|| MirrorError::not_found("membership", "id", membership_id))?;
        membership.role = role.to_string();
        self.store.update_membership(&membership).await?;

        tracing::info!(
            actor = %user.external_id,
            organization_id,
            membership_id,
            role,
            "Member role updated"
        );
        Ok(UpdateResult::ok())
    }

    /// Adds a user to an organization or changes the existing role.
    ///
    /// Service-level operation; no caller check.
    pub async fn add_member(
        &self,
        user_id: &str,
        organization_id: &str,
        role: &str,
    ) -> MirrorResult<Membership> {
        match self.store.find_membership(user_id, organization_id).await? {
            Some(mut existing) => {
                existing.role = role.to_string();
                self.store.update_membership(&existing).await
            }
            None => {
                self.store
                    .insert_membership(&Membership::new(user_id, organization_id, role))
                    .await
            }
        }
    }

    /// Removes a user from an organization.
    ///
    /// Service-level operation; no caller check.
    pub async fn remove_member(
        &self,
        user_id: &str,
        organization_id: &str,
    ) -> MirrorResult<UpdateResult> {
        match self.store.find_membership(user_id, organization_id).await? {
            Some(membership) => {
                self.store.delete_membership(&membership.id).await?;
                Ok(UpdateResult::ok())
            }
            None => Ok(UpdateResult::failed("membership_not_found")),
        }
    }

    // ==================== Sessions ====================

    /// The caller's sessions, optionally with one status.
    pub async fn sessions_for_current_user(
        &self,
        identity: Option<&Identity>,
        status: Option<&SessionStatus>,
    ) -> MirrorResult<Vec<Session>> {
        match require_user(self.store(), identity).await {
            Ok(user) => self.store.list_sessions_by_user(&user.id, status).await,
            Err(MirrorError::Unauthenticated | MirrorError::NotFound { .. }) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Active sessions of `user_id`, or of the caller when `None`.
    pub async fn active_session_count(
        &self,
        identity: Option<&Identity>,
        user_id: Option<&str>,
    ) -> MirrorResult<usize> {
        let caller = require_user(self.store(), identity).await?;
        let target = user_id.unwrap_or(&caller.id);
        self.store.count_active_sessions(target).await
    }

    // ==================== Invitations ====================

    /// Pending invitations of an organization the caller belongs to.
    pub async fn pending_invitations(
        &self,
        identity: Option<&Identity>,
        organization_id: &str,
    ) -> MirrorResult<Vec<Invitation>> {
        let user = require_user(self.store(), identity).await?;
        require_member(self.store(), &user, organization_id).await?;
        self.store
            .list_invitations_by_organization(organization_id, Some(&InvitationStatus::Pending))
            .await
    }

    /// All invitations of an organization, optionally with one status. Org admins only.
    pub async fn organization_invitations(
        &self,
        identity: Option<&Identity>,
        organization_id: &str,
        status: Option<&InvitationStatus>,
    ) -> MirrorResult<Vec<Invitation>> {
        let user = require_user(self.store(), identity).await?;
        require_org_admin(self.store(), &user, organization_id).await?;
        self.store
            .list_invitations_by_organization(organization_id, status)
            .await
    }

    /// Invitations sent to an email address.
    pub async fn invitations_by_email(
        &self,
        identity: Option<&Identity>,
        email: &str,
    ) -> MirrorResult<Vec<Invitation>> {
        require_user(self.store(), identity).await?;
        self.store.list_invitations_by_email(email).await
    }

    // ==================== Roles & Permissions ====================

    pub async fn roles(&self, identity: Option<&Identity>) -> MirrorResult<Vec<Role>> {
        require_user(self.store(), identity).await?;
        self.store.list_roles().await
    }

    pub async fn role_by_key(
        &self,
        identity: Option<&Identity>,
        key: &str,
    ) -> MirrorResult<Option<Role>> {
        require_user(self.store(), identity).await?;
        self.store.find_role_by_key(key).await
    }

    pub async fn permission_by_key(
        &self,
        identity: Option<&Identity>,
        key: &str,
    ) -> MirrorResult<Option<Permission>> {
        require_user(self.store(), identity).await?;
        self.store.find_permission_by_key(key).await
    }

    /// A role with its permissions loaded. Dangling references are skipped.
    pub async fn role_with_permissions(
        &self,
        identity: Option<&Identity>,
        key: &str,
    ) -> MirrorResult<Option<RoleWithPermissions>> {
        require_user(self.store(), identity).await?;
        let Some(role) = self.store.find_role_by_key(key).await? else {
            return Ok(None);
        };

        let mut permissions = Vec::with_capacity(role.permission_ids.len());
        for id in &role.permission_ids {
            match self.store.get_permission(id).await? {
                Some(permission) => permissions.push(permission),
                None => tracing::debug!(role = %role.key, permission_id = %id, "Skipping dangling permission"),
            }
        }
        Ok(Some(RoleWithPermissions { role, permissions }))
    }
}

impl std::fmt::Debug for MirrorQueries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MirrorQueries").finish_non_exhaustive()
    }
}
