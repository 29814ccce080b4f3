//! # Clerk Mirror Memory Adapter
//!
//! An in-memory `MirrorStore`, used by tests and by the development server.
//! Tables are built from the mirror schema and keep real secondary indexes,
//! so every lookup goes through an index rather than a table scan.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use clerk_mirror_adapter_memory::MemoryAdapter;
//! use clerk_mirror_core::MirrorStore;
//!
//! let store: Arc<dyn MirrorStore> = Arc::new(MemoryAdapter::new());
//! ```

mod indexed;
mod table;

use async_trait::async_trait;
use clerk_mirror_core::error::MirrorResult;
use clerk_mirror_core::schema::{indexes::*, mirror_schema, tables, TableDefinition};
use clerk_mirror_core::traits::MirrorStore;
use clerk_mirror_core::types::{
    Invitation, InvitationStatus, Membership, Organization, Permission, Role, Session,
    SessionStatus, User, WebhookEvent,
};
use std::sync::Arc;
use tokio::sync::RwLock;

use table::{compose, Indexed, Table};

/// In-memory storage for a single table.
type Store<T> = Arc<RwLock<Table<T>>>;

fn store<T: Indexed>(name: &str) -> Store<T> {
    let definition = mirror_schema()
        .into_iter()
        .find(|table| table.name == name)
        .unwrap_or_else(|| TableDefinition::new(name));
    Arc::new(RwLock::new(Table::new(definition)))
}

/// In-memory mirror store.
///
/// Cloning shares the underlying tables. Data is lost when the process exits.
#[derive(Debug, Clone)]
pub struct MemoryAdapter {
    users: Store<User>,
    organizations: Store<Organization>,
    memberships: Store<Membership>,
    invitations: Store<Invitation>,
    sessions: Store<Session>,
    permissions: Store<Permission>,
    roles: Store<Role>,
    webhook_events: Store<WebhookEvent>,
}

impl MemoryAdapter {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            users: store(tables::USERS),
            organizations: store(tables::ORGANIZATIONS),
            memberships: store(tables::MEMBERSHIPS),
            invitations: store(tables::INVITATIONS),
            sessions: store(tables::SESSIONS),
            permissions: store(tables::PERMISSIONS),
            roles: store(tables::ROLES),
            webhook_events: store(tables::WEBHOOK_EVENTS),
        }
    }

    /// Clears all stored data.
    pub async fn clear(&self) {
        self.users.write().await.clear();
        self.organizations.write().await.clear();
        self.memberships.write().await.clear();
        self.invitations.write().await.clear();
        self.sessions.write().await.clear();
        self.permissions.write().await.clear();
        self.roles.write().await.clear();
        self.webhook_events.write().await.clear();
    }

    // ==================== Inspection ====================

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn organization_count(&self) -> usize {
        self.organizations.read().await.len()
    }

    pub async fn membership_count(&self) -> usize {
        self.memberships.read().await.len()
    }

    pub async fn invitation_count(&self) -> usize {
        self.invitations.read().await.len()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn permission_count(&self) -> usize {
        self.permissions.read().await.len()
    }

    pub async fn role_count(&self) -> usize {
        self.roles.read().await.len()
    }

    pub async fn webhook_event_count(&self) -> usize {
        self.webhook_events.read().await.len()
    }

    /// Returns every user in insertion order.
    pub async fn all_users(&self) -> Vec<User> {
        self.users.read().await.all()
    }

    /// Returns every organization in insertion order.
    pub async fn all_organizations(&self) -> Vec<Organization> {
        self.organizations.read().await.all()
    }

    /// Returns every membership in insertion order.
    pub async fn all_memberships(&self) -> Vec<Membership> {
        self.memberships.read().await.all()
    }

    /// Returns every invitation in insertion order.
    pub async fn all_invitations(&self) -> Vec<Invitation> {
        self.invitations.read().await.all()
    }

    /// Returns every session in insertion order.
    pub async fn all_sessions(&self) -> Vec<Session> {
        self.sessions.read().await.all()
    }

    /// Returns every permission in insertion order.
    pub async fn all_permissions(&self) -> Vec<Permission> {
        self.permissions.read().await.all()
    }

    /// Returns every role in insertion order.
    pub async fn all_roles(&self) -> Vec<Role> {
        self.roles.read().await.all()
    }
}

impl Default for MemoryAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MirrorStore for MemoryAdapter {
    // ==================== User Operations ====================

    async fn insert_user(&self, user: &User) -> MirrorResult<User> {
        self.users.write().await.insert(user)
    }

    async fn get_user(&self, id: &str) -> MirrorResult<Option<User>> {
        Ok(self.users.read().await.get(id))
    }

    async fn find_user_by_external_id(&self, external_id: &str) -> MirrorResult<Option<User>> {
        Ok(self.users.read().await.find_one(BY_EXTERNAL_ID, external_id))
    }

    async fn update_user(&self, user: &User) -> MirrorResult<User> {
        self.users.write().await.update(user)
    }

    async fn delete_user(&self, id: &str) -> MirrorResult<()> {
        self.users.write().await.delete(id)
    }

    // ==================== Organization Operations ====================

    async fn insert_organization(&self, organization: &Organization) -> MirrorResult<Organization> {
        self.organizations.write().await.insert(organization)
    }

    async fn get_organization(&self, id: &str) -> MirrorResult<Option<Organization>> {
        Ok(self.organizations.read().await.get(id))
    }

    async fn find_organization_by_external_id(
        &self,
        external_id: &str,
    ) -> MirrorResult<Option<Organization>> {
        Ok(self
            .organizations
            .read()
            .await
            .find_one(BY_EXTERNAL_ID, external_id))
    }

    async fn update_organization(&self, organization: &Organization) -> MirrorResult<Organization> {
        self.organizations.write().await.update(organization)
    }

    async fn delete_organization(&self, id: &str) -> MirrorResult<()> {
        self.organizations.write().await.delete(id)
    }

    // ==================== Membership Operations ====================

    async fn insert_membership(&self, membership: &Membership) -> MirrorResult<Membership> {
        self.memberships.write().await.insert(membership)
    }

    async fn find_membership_by_external_id(
        &self,
        external_id: &str,
    ) -> MirrorResult<Option<Membership>> {
        Ok(self
            .memberships
            .read()
            .await
            .find_one(BY_EXTERNAL_ID, external_id))
    }

    async fn find_membership(
        &self,
        user_id: &str,
        organization_id: &str,
    ) -> MirrorResult<Option<Membership>> {
        Ok(self
            .memberships
            .read()
            .await
            .find_one(BY_USER_AND_ORGANIZATION, &compose(&[user_id, organization_id])))
    }

    async fn list_memberships_by_organization(
        &self,
        organization_id: &str,
    ) -> MirrorResult<Vec<Membership>> {
        Ok(self
            .memberships
            .read()
            .await
            .find_all(BY_ORGANIZATION, organization_id))
    }

    async fn list_memberships_by_user(&self, user_id: &str) -> MirrorResult<Vec<Membership>> {
        Ok(self.memberships.read().await.find_all(BY_USER, user_id))
    }

    async fn update_membership(&self, membership: &Membership) -> MirrorResult<Membership> {
        self.memberships.write().await.update(membership)
    }

    async fn delete_membership(&self, id: &str) -> MirrorResult<()> {
        self.memberships.write().await.delete(id)
    }

    // ==================== Invitation Operations ====================

    async fn insert_invitation(&self, invitation: &Invitation) -> MirrorResult<Invitation> {
        self.invitations.write().await.insert(invitation)
    }

    async fn find_invitation_by_external_id(
        &self,
        external_id: &str,
    ) -> MirrorResult<Option<Invitation>> {
        Ok(self
            .invitations
            .read()
            .await
            .find_one(BY_EXTERNAL_ID, external_id))
    }

    async fn list_invitations_by_organization(
        &self,
        organization_id: &str,
        status: Option<&InvitationStatus>,
    ) -> MirrorResult<Vec<Invitation>> {
        let invitations = self.invitations.read().await;
        Ok(match status {
            Some(status) => invitations.find_all(
                BY_ORGANIZATION_AND_STATUS,
                &compose(&[organization_id, status.as_str()]),
            ),
            None => invitations.find_all(BY_ORGANIZATION, organization_id),
        })
    }

    async fn list_invitations_by_email(&self, email: &str) -> MirrorResult<Vec<Invitation>> {
        Ok(self.invitations.read().await.find_all(BY_EMAIL, email))
    }

    async fn update_invitation(&self, invitation: &Invitation) -> MirrorResult<Invitation> {
        self.invitations.write().await.update(invitation)
    }

    async fn delete_invitation(&self, id: &str) -> MirrorResult<()> {
        self.invitations.write().await.delete(id)
    }

    // ==================== Session Operations ====================

    async fn insert_session(&self, session: &Session) -> MirrorResult<Session> {
        self.sessions.write().await.insert(session)
    }

    async fn find_session_by_external_id(
        &self,
        external_id: &str,
    ) -> MirrorResult<Option<Session>> {
        Ok(self.sessions.read().await.find_one(BY_EXTERNAL_ID, external_id))
    }

    async fn list_sessions_by_user(
        &self,
        user_id: &str,
        status: Option<&SessionStatus>,
    ) -> MirrorResult<Vec<Session>> {
        let sessions = self.sessions.read().await;
        Ok(match status {
            Some(status) => {
                sessions.find_all(BY_USER_AND_STATUS, &compose(&[user_id, status.as_str()]))
            }
            None => sessions.find_all(BY_USER, user_id),
        })
    }

    async fn list_sessions_by_ip(&self, ip_address: &str) -> MirrorResult<Vec<Session>> {
        Ok(self.sessions.read().await.find_all(BY_IP_ADDRESS, ip_address))
    }

    async fn update_session(&self, session: &Session) -> MirrorResult<Session> {
        self.sessions.write().await.update(session)
    }

    // ==================== Permission Operations ====================

    async fn insert_permission(&self, permission: &Permission) -> MirrorResult<Permission> {
        self.permissions.write().await.insert(permission)
    }

    async fn get_permission(&self, id: &str) -> MirrorResult<Option<Permission>> {
        Ok(self.permissions.read().await.get(id))
    }

    async fn find_permission_by_external_id(
        &self,
        external_id: &str,
    ) -> MirrorResult<Option<Permission>> {
        Ok(self
            .permissions
            .read()
            .await
            .find_one(BY_EXTERNAL_ID, external_id))
    }

    async fn find_permission_by_key(&self, key: &str) -> MirrorResult<Option<Permission>> {
        Ok(self.permissions.read().await.find_one(BY_KEY, key))
    }

    async fn update_permission(&self, permission: &Permission) -> MirrorResult<Permission> {
        self.permissions.write().await.update(permission)
    }

    async fn delete_permission(&self, id: &str) -> MirrorResult<()> {
        self.permissions.write().await.delete(id)
    }

    // ==================== Role Operations ====================

    async fn insert_role(&self, role: &Role) -> MirrorResult<Role> {
        self.roles.write().await.insert(role)
    }

    async fn find_role_by_external_id(&self, external_id: &str) -> MirrorResult<Option<Role>> {
        Ok(self.roles.read().await.find_one(BY_EXTERNAL_ID, external_id))
    }

    async fn find_role_by_key(&self, key: &str) -> MirrorResult<Option<Role>> {
        Ok(self.roles.read().await.find_one(BY_KEY, key))
    }

    async fn list_roles(&self) -> MirrorResult<Vec<Role>> {
        Ok(self.roles.read().await.all())
    }

    async fn update_role(&self, role: &Role) -> MirrorResult<Role> {
        self.roles.write().await.update(role)
    }

    async fn delete_role(&self, id: &str) -> MirrorResult<()> {
        self.roles.write().await.delete(id)
    }

    // ==================== Webhook Event Operations ====================

    async fn insert_webhook_event(&self, event: &WebhookEvent) -> MirrorResult<WebhookEvent> {
        self.webhook_events.write().await.insert(event)
    }

    async fn get_webhook_event(&self, id: &str) -> MirrorResult<Option<WebhookEvent>> {
        Ok(self.webhook_events.read().await.get(id))
    }

    async fn update_webhook_event(&self, event: &WebhookEvent) -> MirrorResult<WebhookEvent> {
        self.webhook_events.write().await.update(event)
    }

    async fn recent_webhook_events(&self, limit: usize) -> MirrorResult<Vec<WebhookEvent>> {
        Ok(self.webhook_events.read().await.descending(BY_TIMESTAMP, limit))
    }

    async fn webhook_events_for_object(
        &self,
        object_id: &str,
        limit: usize,
    ) -> MirrorResult<Vec<WebhookEvent>> {
        Ok(self
            .webhook_events
            .read()
            .await
            .newest(BY_OBJECT_ID, object_id, limit))
    }

    async fn webhook_events_by_type(
        &self,
        event_type: &str,
        limit: usize,
    ) -> MirrorResult<Vec<WebhookEvent>> {
        Ok(self
            .webhook_events
            .read()
            .await
            .newest(BY_EVENT_TYPE, event_type, limit))
    }
}
