//! Integration tests for Clerk Mirror Admin
//!
//! This test suite covers:
//! - Audit reads gated by system admin access
//! - System role updates
//! - Organization-scoped reads and writes
//! - Session, invitation and role queries

use std::sync::Arc;

use clerk_mirror_adapter_memory::MemoryAdapter;
use clerk_mirror_admin::{AdminApi, MirrorQueries, SystemRoleUpdate};
use clerk_mirror_core::{
    Identity, Invitation, InvitationStatus, Membership, MirrorError, MirrorStore, Organization,
    Permission, Role, Session, SessionStatus, User, WebhookEvent,
};
use serde_json::json;

const CREATED_AT: &str = "2024-01-01T00:00:00.000Z";

struct Fixture {
    store: Arc<MemoryAdapter>,
    admin: AdminApi,
    queries: MirrorQueries,
}

impl Fixture {
    fn new() -> Self {
        let store = Arc::new(MemoryAdapter::new());
        Self {
            admin: AdminApi::new(store.clone()),
            queries: MirrorQueries::new(store.clone()),
            store,
        }
    }

    async fn user(&self, external_id: &str, configure: impl FnOnce(&mut User)) -> User {
        let mut user = User::new(external_id, external_id);
        configure(&mut user);
        self.store.insert_user(&user).await.unwrap()
    }

    async fn organization(&self, external_id: &str) -> Organization {
        self.store
            .insert_organization(&Organization::new(external_id, "Acme"))
            .await
            .unwrap()
    }

    async fn member(&self, user: &User, organization: &Organization, role: &str) -> Membership {
        self.store
            .insert_membership(&Membership::new(&user.id, &organization.id, role))
            .await
            .unwrap()
    }
}

fn caller(external_id: &str) -> Identity {
    Identity::new(external_id)
}

mod audit_tests {
    use super::*;

    #[tokio::test]
    async fn test_audit_reads_require_system_admin() {
        let fx = Fixture::new();
        fx.user("user_plain", |_| {}).await;
        fx.user("user_ops", |u| u.is_super_user = Some(true)).await;
        for n in 0..3 {
            let event = WebhookEvent::processing("user.updated", format!("msg_{n}"), "user_1", json!({}));
            fx.store.insert_webhook_event(&event).await.unwrap();
        }

        let err = fx
            .admin
            .recent_webhook_events(Some(&caller("user_plain")), None)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);

        let err = fx.admin.recent_webhook_events(None, None).await.unwrap_err();
        assert!(matches!(err, MirrorError::Unauthenticated));

        let ops = caller("user_ops");
        let recent = fx.admin.recent_webhook_events(Some(&ops), Some(2)).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].event_id, "msg_2");

        let by_object = fx
            .admin
            .webhook_events_for_object(Some(&ops), "user_1", None)
            .await
            .unwrap();
        assert_eq!(by_object.len(), 3);

        let by_type = fx
            .admin
            .webhook_events_by_type(Some(&ops), "organization.created", None)
            .await
            .unwrap();
        assert!(by_type.is_empty());
    }
}

mod system_role_tests {
    use super::*;

    #[tokio::test]
    async fn test_super_admin_updates_flags() {
        let fx = Fixture::new();
        fx.user("user_root", |u| u.is_super_admin = Some(true)).await;
        let target = fx.user("user_target", |_| {}).await;

        let result = fx
            .admin
            .update_user_system_role(
                Some(&caller("user_root")),
                &target.id,
                SystemRoleUpdate {
                    is_super_user: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(result.success);

        let stored = fx.store.get_user(&target.id).await.unwrap().unwrap();
        assert_eq!(stored.is_super_user, Some(true));
        assert_eq!(stored.is_super_admin, None);
    }

    #[tokio::test]
    async fn test_empty_update_is_reported() {
        let fx = Fixture::new();
        fx.user("user_root", |u| u.is_super_admin = Some(true)).await;
        let target = fx.user("user_target", |_| {}).await;

        let result = fx
            .admin
            .update_user_system_role(Some(&caller("user_root")), &target.id, SystemRoleUpdate::default())
            .await
            .unwrap();
        assert!(!result.success);
        assert_eq!(result.reason.as_deref(), Some("no_updates_provided"));
    }

    #[tokio::test]
    async fn test_super_user_cannot_grant_roles() {
        let fx = Fixture::new();
        fx.user("user_ops", |u| u.is_super_user = Some(true)).await;
        let target = fx.user("user_target", |_| {}).await;

        let err = fx
            .admin
            .update_user_system_role(
                Some(&caller("user_ops")),
                &target.id,
                SystemRoleUpdate {
                    is_super_admin: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, MirrorError::Forbidden { .. }));
    }
}

mod organization_tests {
    use super::*;

    #[tokio::test]
    async fn test_member_reads() {
        let fx = Fixture::new();
        let alice = fx.user("user_alice", |_| {}).await;
        let bob = fx.user("user_bob", |_| {}).await;
        let acme = fx.organization("org_acme").await;
        let other = fx.organization("org_other").await;
        fx.member(&alice, &acme, "org:member").await;
        fx.member(&bob, &acme, "org:admin").await;

        let alice_id = caller("user_alice");
        let orgs = fx.queries.organizations_for_current_user(Some(&alice_id)).await.unwrap();
        assert_eq!(orgs.len(), 1);
        assert_eq!(orgs[0].external_id, "org_acme");

        let role = fx.queries.role_in_organization(Some(&alice_id), &acme.id).await.unwrap();
        assert!(role.is_member);
        assert_eq!(role.role.as_deref(), Some("org:member"));
        assert_eq!(
            serde_json::to_value(&role).unwrap(),
            json!({"isMember": true, "role": "org:member"})
        );

        let outside = fx.queries.role_in_organization(Some(&alice_id), &other.id).await.unwrap();
        assert!(!outside.is_member);

        let members = fx.queries.organization_memberships(Some(&alice_id), &acme.id).await.unwrap();
        assert_eq!(members.len(), 2);

        let err = fx.queries.organization(Some(&alice_id), &other.id).await.unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[tokio::test]
    async fn test_anonymous_gets_no_organizations() {
        let fx = Fixture::new();
        assert!(fx.queries.organizations_for_current_user(None).await.unwrap().is_empty());
        assert!(fx
            .queries
            .organizations_for_current_user(Some(&caller("user_unknown")))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_admin_writes() {
        let fx = Fixture::new();
        let alice = fx.user("user_alice", |_| {}).await;
        let bob = fx.user("user_bob", |_| {}).await;
        let acme = fx.organization("org_acme").await;
        let other = fx.organization("org_other").await;
        let alice_membership = fx.member(&alice, &acme, "org:member").await;
        fx.member(&bob, &acme, "org:admin").await;
        let foreign = fx.member(&bob, &other, "org:member").await;

        let err = fx
            .queries
            .update_organization_name(Some(&caller("user_alice")), &acme.id, Some("Nope".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, MirrorError::Forbidden { .. }));

        let bob_id = caller("user_bob");
        fx.queries
            .update_organization_name(Some(&bob_id), &acme.id, Some("Acme Corp".into()))
            .await
            .unwrap();
        assert_eq!(fx.store.get_organization(&acme.id).await.unwrap().unwrap().name, "Acme Corp");

        fx.queries
            .update_member_role(Some(&bob_id), &acme.id, &alice_membership.id, "org:admin")
            .await
            .unwrap();
        let updated = fx.store.find_membership(&alice.id, &acme.id).await.unwrap().unwrap();
        assert!(updated.is_admin());

        let err = fx
            .queries
            .update_member_role(Some(&bob_id), &acme.id, &foreign.id, "org:admin")
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_add_and_remove_member() {
        let fx = Fixture::new();
        let alice = fx.user("user_alice", |_| {}).await;
        let acme = fx.organization("org_acme").await;

        fx.queries.add_member(&alice.id, &acme.id, "org:member").await.unwrap();
        fx.queries.add_member(&alice.id, &acme.id, "org:admin").await.unwrap();
        let memberships = fx.store.list_memberships_by_user(&alice.id).await.unwrap();
        assert_eq!(memberships.len(), 1);
        assert_eq!(memberships[0].role, "org:admin");

        assert!(fx.queries.remove_member(&alice.id, &acme.id).await.unwrap().success);
        let again = fx.queries.remove_member(&alice.id, &acme.id).await.unwrap();
        assert_eq!(again.reason.as_deref(), Some("membership_not_found"));
    }
}

mod session_tests {
    use super::*;

    #[tokio::test]
    async fn test_sessions_for_current_user() {
        let fx = Fixture::new();
        let alice = fx.user("user_alice", |_| {}).await;
        fx.store
            .insert_session(&Session::new("sess_1", &alice.id, CREATED_AT))
            .await
            .unwrap();
        let mut ended = Session::new("sess_2", &alice.id, CREATED_AT);
        ended.status = SessionStatus::Ended;
        fx.store.insert_session(&ended).await.unwrap();

        let alice_id = caller("user_alice");
        let all = fx.queries.sessions_for_current_user(Some(&alice_id), None).await.unwrap();
        assert_eq!(all.len(), 2);

        let active = fx
            .queries
            .sessions_for_current_user(Some(&alice_id), Some(&SessionStatus::Active))
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].external_id, "sess_1");

        assert_eq!(fx.queries.active_session_count(Some(&alice_id), None).await.unwrap(), 1);
        assert!(fx.queries.sessions_for_current_user(None, None).await.unwrap().is_empty());
    }
}

mod invitation_tests {
    use super::*;

    #[tokio::test]
    async fn test_invitation_visibility() {
        let fx = Fixture::new();
        let alice = fx.user("user_alice", |_| {}).await;
        let bob = fx.user("user_bob", |_| {}).await;
        let acme = fx.organization("org_acme").await;
        fx.member(&alice, &acme, "org:member").await;
        fx.member(&bob, &acme, "org:admin").await;

        fx.store
            .insert_invitation(&Invitation::new("orginv_1", &acme.id, "a@example.com", "org:member", CREATED_AT))
            .await
            .unwrap();
        let mut accepted = Invitation::new("orginv_2", &acme.id, "b@example.com", "org:member", CREATED_AT);
        accepted.status = InvitationStatus::Accepted;
        fx.store.insert_invitation(&accepted).await.unwrap();

        let alice_id = caller("user_alice");
        let pending = fx.queries.pending_invitations(Some(&alice_id), &acme.id).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].external_id, "orginv_1");

        let err = fx
            .queries
            .organization_invitations(Some(&alice_id), &acme.id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, MirrorError::Forbidden { .. }));

        let bob_id = caller("user_bob");
        let all = fx.queries.organization_invitations(Some(&bob_id), &acme.id, None).await.unwrap();
        assert_eq!(all.len(), 2);
        let only_accepted = fx
            .queries
            .organization_invitations(Some(&bob_id), &acme.id, Some(&InvitationStatus::Accepted))
            .await
            .unwrap();
        assert_eq!(only_accepted.len(), 1);

        let by_email = fx.queries.invitations_by_email(Some(&bob_id), "b@example.com").await.unwrap();
        assert_eq!(by_email.len(), 1);
    }
}

mod role_tests {
    use super::*;

    #[tokio::test]
    async fn test_role_with_permissions_skips_dangling() {
        let fx = Fixture::new();
        fx.user("user_alice", |_| {}).await;
        let permission = fx
            .store
            .insert_permission(&Permission::new("perm_1", "org:sys_memberships:read", "Read members", "system", CREATED_AT))
            .await
            .unwrap();

        let mut role = Role::new("role_1", "org:viewer", "Viewer", CREATED_AT);
        role.permission_ids = vec![permission.id.clone(), "missing".to_string()];
        role.permission_external_ids = vec!["perm_1".to_string(), "perm_gone".to_string()];
        fx.store.insert_role(&role).await.unwrap();

        let alice_id = caller("user_alice");
        let loaded = fx
            .queries
            .role_with_permissions(Some(&alice_id), "org:viewer")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.permissions.len(), 1);
        assert_eq!(loaded.permissions[0].key, "org:sys_memberships:read");

        let value = serde_json::to_value(&loaded).unwrap();
        assert_eq!(value["key"], json!("org:viewer"));
        assert_eq!(value["permissions"][0]["externalId"], json!("perm_1"));

        assert_eq!(fx.queries.roles(Some(&alice_id)).await.unwrap().len(), 1);
        assert!(fx
            .queries
            .permission_by_key(Some(&alice_id), "org:sys_memberships:read")
            .await
            .unwrap()
            .is_some());
        assert!(fx.queries.role_by_key(Some(&alice_id), "org:missing").await.unwrap().is_none());
        assert!(fx.queries.roles(None).await.is_err());
    }
}
