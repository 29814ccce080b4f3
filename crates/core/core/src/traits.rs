//! Storage trait for the mirror.
//!
//! Storage backends implement [`MirrorStore`] to persist mirrored records.
//! Each insert, update and delete is atomic for a single record; nothing
//! spans several records.

use async_trait::async_trait;

use crate::error::MirrorResult;
use crate::types::{
    Invitation, InvitationStatus, Membership, Organization, Permission, Role, Session,
    SessionStatus, User, WebhookEvent,
};

/// Trait for mirror storage backends.
///
/// Lookups return `Ok(None)` when nothing matches. `update_*` and
/// `delete_*` fail with `MirrorError::NotFound` when the record is gone.
/// Inserts fail with `MirrorError::Duplicate` on a unique index violation.
#[async_trait]
pub trait MirrorStore: Send + Sync {
    // ==================== User Operations ====================

    /// Inserts a new user.
    async fn insert_user(&self, user: &User) -> MirrorResult<User>;

    /// Gets a user by local id.
    async fn get_user(&self, id: &str) -> MirrorResult<Option<User>>;

    /// Gets a user by provider id.
    async fn find_user_by_external_id(&self, external_id: &str) -> MirrorResult<Option<User>>;

    /// Replaces an existing user.
    async fn update_user(&self, user: &User) -> MirrorResult<User>;

    /// Deletes a user by local id.
    async fn delete_user(&self, id: &str) -> MirrorResult<()>;

    // ==================== Organization Operations ====================

    /// Inserts a new organization.
    async fn insert_organization(&self, organization: &Organization) -> MirrorResult<Organization>;

    /// Gets an organization by local id.
    async fn get_organization(&self, id: &str) -> MirrorResult<Option<Organization>>;

    /// Gets an organization by provider id.
    async fn find_organization_by_external_id(
        &self,
        external_id: &str,
    ) -> MirrorResult<Option<Organization>>;

    /// Replaces an existing organization.
    async fn update_organization(&self, organization: &Organization) -> MirrorResult<Organization>;

    /// Deletes an organization by local id. Memberships are not touched.
    async fn delete_organization(&self, id: &str) -> MirrorResult<()>;

    // ==================== Membership Operations ====================

    /// Inserts a new membership.
    async fn insert_membership(&self, membership: &Membership) -> MirrorResult<Membership>;

    /// Gets a membership by provider id.
    async fn find_membership_by_external_id(
        &self,
        external_id: &str,
    ) -> MirrorResult<Option<Membership>>;

    /// Gets the membership joining a user and an organization.
    async fn find_membership(
        &self,
        user_id: &str,
        organization_id: &str,
    ) -> MirrorResult<Option<Membership>>;

    /// Lists the memberships of an organization.
    async fn list_memberships_by_organization(
        &self,
        organization_id: &str,
    ) -> MirrorResult<Vec<Membership>>;

    /// Lists the memberships of a user.
    async fn list_memberships_by_user(&self, user_id: &str) -> MirrorResult<Vec<Membership>>;

    /// Replaces an existing membership.
    async fn update_membership(&self, membership: &Membership) -> MirrorResult<Membership>;

    /// Deletes a membership by local id.
    async fn delete_membership(&self, id: &str) -> MirrorResult<()>;

    // ==================== Invitation Operations ====================

    /// Inserts a new invitation.
    async fn insert_invitation(&self, invitation: &Invitation) -> MirrorResult<Invitation>;

    /// Gets an invitation by provider id.
    async fn find_invitation_by_external_id(
        &self,
        external_id: &str,
    ) -> MirrorResult<Option<Invitation>>;

    /// Lists the invitations of an organization, optionally with one status.
    async fn list_invitations_by_organization(
        &self,
        organization_id: &str,
        status: Option<&InvitationStatus>,
    ) -> MirrorResult<Vec<Invitation>>;

    /// Lists the invitations sent to an email address.
    async fn list_invitations_by_email(&self, email: &str) -> MirrorResult<Vec<Invitation>>;

    /// Replaces an existing invitation.
    async fn update_invitation(&self, invitation: &Invitation) -> MirrorResult<Invitation>;

    /// Deletes an invitation by local id.
    async fn delete_invitation(&self, id: &str) -> MirrorResult<()>;

    // ==================== Session Operations ====================

    /// Inserts a new session.
    async fn insert_session(&self, session: &Session) -> MirrorResult<Session>;

    /// Gets a session by provider id.
    async fn find_session_by_external_id(&self, external_id: &str)
        -> MirrorResult<Option<Session>>;

    /// Lists the sessions of a user, optionally with one status.
    async fn list_sessions_by_user(
        &self,
        user_id: &str,
        status: Option<&SessionStatus>,
    ) -> MirrorResult<Vec<Session>>;

    /// Lists the sessions seen from an IP address.
    async fn list_sessions_by_ip(&self, ip_address: &str) -> MirrorResult<Vec<Session>>;

    /// Replaces an existing session.
    async fn update_session(&self, session: &Session) -> MirrorResult<Session>;

    /// Counts the active sessions of a user.
    async fn count_active_sessions(&self, user_id: &str) -> MirrorResult<usize> {
        Ok(self
            .list_sessions_by_user(user_id, Some(&SessionStatus::Active))
            .await?
            .len())
    }

    // ==================== Permission Operations ====================

    /// Inserts a new permission.
    async fn insert_permission(&self, permission: &Permission) -> MirrorResult<Permission>;

    /// Gets a permission by local id.
    async fn get_permission(&self, id: &str) -> MirrorResult<Option<Permission>>;

    /// Gets a permission by provider id.
    async fn find_permission_by_external_id(
        &self,
        external_id: &str,
    ) -> MirrorResult<Option<Permission>>;

    /// Gets a permission by key.
    async fn find_permission_by_key(&self, key: &str) -> MirrorResult<Option<Permission>>;

    /// Replaces an existing permission.
    async fn update_permission(&self, permission: &Permission) -> MirrorResult<Permission>;

    /// Deletes a permission by local id.
    async fn delete_permission(&self, id: &str) -> MirrorResult<()>;

    // ==================== Role Operations ====================

    /// Inserts a new role.
    async fn insert_role(&self, role: &Role) -> MirrorResult<Role>;

    /// Gets a role by provider id.
    async fn find_role_by_external_id(&self, external_id: &str) -> MirrorResult<Option<Role>>;

    /// Gets a role by key.
    async fn find_role_by_key(&self, key: &str) -> MirrorResult<Option<Role>>;

    /// Lists all roles.
    async fn list_roles(&self) -> MirrorResult<Vec<Role>>;

    /// Replaces an existing role.
    async fn update_role(&self, role: &Role) -> MirrorResult<Role>;

    /// Deletes a role by local id.
    async fn delete_role(&self, id: &str) -> MirrorResult<()>;

    // ==================== Webhook Event Operations ====================

    /// Inserts a new audit record.
    async fn insert_webhook_event(&self, event: &WebhookEvent) -> MirrorResult<WebhookEvent>;

    /// Gets an audit record by local id.
    async fn get_webhook_event(&self, id: &str) -> MirrorResult<Option<WebhookEvent>>;

    /// Replaces an existing audit record.
    async fn update_webhook_event(&self, event: &WebhookEvent) -> MirrorResult<WebhookEvent>;

    /// Lists the most recent audit records, newest first.
    async fn recent_webhook_events(&self, limit: usize) -> MirrorResult<Vec<WebhookEvent>>;

    /// Lists the audit records for one object id, newest first.
    async fn webhook_events_for_object(
        &self,
        object_id: &str,
        limit: usize,
    ) -> MirrorResult<Vec<WebhookEvent>>;

    /// Lists the audit records of one event type, newest first.
    async fn webhook_events_by_type(
        &self,
        event_type: &str,
        limit: usize,
    ) -> MirrorResult<Vec<WebhookEvent>>;
}
