//! Integration tests for Clerk Mirror Core
//!
//! This test suite covers:
//! - The merge contract across record types
//! - Placeholder metadata handling
//! - Schema definitions
//! - Error handling

use clerk_mirror_core::{
    mirror_schema,
    schema::{indexes, tables},
    types::metadata,
    Merge, MirrorError, Organization, OrganizationPatch, Role, RolePatch, User, UserPatch,
};
use serde_json::json;

mod merge_tests {
    use super::*;

    #[test]
    fn test_second_patch_wins_for_defined_fields() {
        let mut user = User::new("user_1", "First");
        user.merge(UserPatch {
            name: Some("Second".to_string()),
            email: Some("a@example.com".to_string()),
            ..Default::default()
        });
        user.merge(UserPatch {
            name: Some("Third".to_string()),
            ..Default::default()
        });

        assert_eq!(user.name, "Third");
        assert_eq!(user.email.as_deref(), Some("a@example.com"));
    }

    #[test]
    fn test_empty_patch_is_identity() {
        let mut org = Organization::new("org_1", "Acme");
        org.slug = Some("acme".to_string());
        org.public_metadata = Some(json!({"tier": "gold"}));
        let before = org.clone();

        org.merge(OrganizationPatch::default());
        assert_eq!(org, before);
    }

    #[test]
    fn test_role_permissions_replaced_not_appended() {
        let mut role = Role::new("role_1", "org:admin", "Admin", "2024-01-01T00:00:00.000Z");
        role.merge(RolePatch {
            permission_ids: Some(vec!["p1".to_string(), "p2".to_string()]),
            permission_external_ids: Some(vec!["perm_1".to_string(), "perm_2".to_string()]),
            ..Default::default()
        });
        role.merge(RolePatch {
            permission_ids: Some(vec!["p2".to_string()]),
            permission_external_ids: Some(vec!["perm_2".to_string()]),
            ..Default::default()
        });

        assert_eq!(role.permission_ids, vec!["p2".to_string()]);
        assert_eq!(role.permission_external_ids, vec!["perm_2".to_string()]);
    }
}

mod placeholder_tests {
    use super::*;

    #[test]
    fn test_placeholder_user_is_flagged() {
        let mut user = User::new("user_1", "user_1");
        user.public_metadata = Some(metadata::placeholder());
        assert!(user.is_placeholder());

        metadata::clear_placeholder(&mut user.public_metadata);
        assert!(!user.is_placeholder());
        assert!(user.public_metadata.is_none());
    }

    #[test]
    fn test_real_metadata_is_not_placeholder() {
        let mut org = Organization::new("org_1", "Acme");
        org.public_metadata = Some(json!({"isPlaceholder": false}));
        assert!(!org.is_placeholder());
    }
}

mod schema_tests {
    use super::*;

    #[test]
    fn test_schema_tables() {
        let names: Vec<String> = mirror_schema().into_iter().map(|t| t.name).collect();
        for table in [
            tables::USERS,
            tables::ORGANIZATIONS,
            tables::MEMBERSHIPS,
            tables::INVITATIONS,
            tables::SESSIONS,
            tables::PERMISSIONS,
            tables::ROLES,
            tables::WEBHOOK_EVENTS,
        ] {
            assert!(names.iter().any(|n| n == table), "missing table {table}");
        }
    }

    #[test]
    fn test_audit_indexes() {
        let schema = mirror_schema();
        let events = schema
            .iter()
            .find(|t| t.name == tables::WEBHOOK_EVENTS)
            .expect("webhookEvents table should exist");

        for index in [
            indexes::BY_TIMESTAMP,
            indexes::BY_OBJECT_ID,
            indexes::BY_EVENT_TYPE,
        ] {
            assert!(events.get_index(index).is_some(), "missing index {index}");
        }
    }
}

mod error_tests {
    use super::*;

    #[test]
    fn test_error_from_serde() {
        let err: MirrorError = serde_json::from_str::<User>("not json").unwrap_err().into();
        assert!(matches!(err, MirrorError::Serialization { .. }));
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_forbidden_message() {
        let err = MirrorError::forbidden("system admin access required");
        assert_eq!(err.to_string(), "Forbidden: system admin access required");
    }
}
