//! Persisted schema of the local mirror.
//!
//! Storage adapters build their tables and secondary indexes from these
//! definitions. Every lookup the sync handlers and read APIs perform is
//! backed by one of the indexes declared here.

use serde::{Deserialize, Serialize};

/// Table names.
pub mod tables {
    pub const USERS: &str = "users";
    pub const ORGANIZATIONS: &str = "organizations";
    pub const MEMBERSHIPS: &str = "organizationMemberships";
    pub const INVITATIONS: &str = "organizationInvitations";
    pub const SESSIONS: &str = "sessions";
    pub const PERMISSIONS: &str = "permissions";
    pub const ROLES: &str = "roles";
    pub const WEBHOOK_EVENTS: &str = "webhookEvents";
}

/// Index names.
pub mod indexes {
    pub const BY_EXTERNAL_ID: &str = "byExternalId";
    pub const BY_USER: &str = "byUser";
    pub const BY_ORGANIZATION: &str = "byOrganization";
    pub const BY_USER_AND_ORGANIZATION: &str = "byUserAndOrganization";
    pub const BY_EMAIL: &str = "byEmail";
    pub const BY_ORGANIZATION_AND_STATUS: &str = "byOrganizationAndStatus";
    pub const BY_USER_AND_STATUS: &str = "byUserAndStatus";
    pub const BY_IP_ADDRESS: &str = "byIpAddress";
    pub const BY_KEY: &str = "byKey";
    pub const BY_EVENT_ID: &str = "byEventId";
    pub const BY_OBJECT_ID: &str = "byObjectId";
    pub const BY_EVENT_TYPE: &str = "byEventType";
    pub const BY_TIMESTAMP: &str = "byTimestamp";
}

/// An equality index over one or more fields.
///
/// Entries sharing the same key are kept in insertion order, so an index
/// whose last field is a timestamp also serves ordered range reads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexDefinition {
    pub name: String,
    /// Fields in key order.
    pub fields: Vec<String>,
    #[serde(default)]
    pub unique: bool,
}

impl IndexDefinition {
    /// Creates a non-unique index.
    pub fn new(name: impl Into<String>, fields: &[&str]) -> Self {
        Self {
            name: name.into(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
            unique: false,
        }
    }

    /// Creates a unique index.
    pub fn unique(name: impl Into<String>, fields: &[&str]) -> Self {
        Self {
            unique: true,
            ..Self::new(name, fields)
        }
    }
}

/// A table and its secondary indexes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableDefinition {
    pub name: String,
    #[serde(default)]
    pub indexes: Vec<IndexDefinition>,
}

impl TableDefinition {
    /// Creates a table without indexes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            indexes: Vec::new(),
        }
    }

    /// Adds an index to the table.
    pub fn index(mut self, index: IndexDefinition) -> Self {
        self.indexes.push(index);
        self
    }

    /// Gets an index by name.
    pub fn get_index(&self, name: &str) -> Option<&IndexDefinition> {
        self.indexes.iter().find(|i| i.name == name)
    }
}

/// Returns the full mirror schema.
pub fn mirror_schema() -> Vec<TableDefinition> {
    use indexes::*;

    vec![
        TableDefinition::new(tables::USERS)
            .index(IndexDefinition::unique(BY_EXTERNAL_ID, &["externalId"]))
            .index(IndexDefinition::new(BY_EMAIL, &["email"])),
        TableDefinition::new(tables::ORGANIZATIONS)
            .index(IndexDefinition::unique(BY_EXTERNAL_ID, &["externalId"])),
        TableDefinition::new(tables::MEMBERSHIPS)
            .index(IndexDefinition::new(BY_EXTERNAL_ID, &["externalId"]))
            .index(IndexDefinition::new(BY_USER, &["userId"]))
            .index(IndexDefinition::new(BY_ORGANIZATION, &["organizationId"]))
            .index(IndexDefinition::unique(
                BY_USER_AND_ORGANIZATION,
                &["userId", "organizationId"],
            )),
        TableDefinition::new(tables::INVITATIONS)
            .index(IndexDefinition::unique(BY_EXTERNAL_ID, &["externalId"]))
            .index(IndexDefinition::new(BY_ORGANIZATION, &["organizationId"]))
            .index(IndexDefinition::new(BY_EMAIL, &["email"]))
            .index(IndexDefinition::new(
                BY_ORGANIZATION_AND_STATUS,
                &["organizationId", "status"],
            )),
        TableDefinition::new(tables::SESSIONS)
            .index(IndexDefinition::unique(BY_EXTERNAL_ID, &["externalId"]))
            .index(IndexDefinition::new(BY_USER, &["userId"]))
            .index(IndexDefinition::new(BY_USER_AND_STATUS, &["userId", "status"]))
            .index(IndexDefinition::new(BY_IP_ADDRESS, &["ipAddress"])),
        TableDefinition::new(tables::PERMISSIONS)
            .index(IndexDefinition::unique(BY_EXTERNAL_ID, &["externalId"]))
            .index(IndexDefinition::new(BY_KEY, &["key"])),
        TableDefinition::new(tables::ROLES)
            .index(IndexDefinition::unique(BY_EXTERNAL_ID, &["externalId"]))
            .index(IndexDefinition::new(BY_KEY, &["key"])),
        TableDefinition::new(tables::WEBHOOK_EVENTS)
            .index(IndexDefinition::new(BY_EVENT_ID, &["eventId"]))
            .index(IndexDefinition::new(BY_OBJECT_ID, &["objectId"]))
            .index(IndexDefinition::new(BY_EVENT_TYPE, &["eventType"]))
            .index(IndexDefinition::new(BY_TIMESTAMP, &["timestamp"])),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_provider_table_indexes_external_id() {
        let schema = mirror_schema();
        assert_eq!(schema.len(), 8);
        for table in schema.iter().filter(|t| t.name != tables::WEBHOOK_EVENTS) {
            assert!(
                table.get_index(indexes::BY_EXTERNAL_ID).is_some(),
                "{} lacks an externalId index",
                table.name
            );
        }
    }

    #[test]
    fn test_membership_pair_is_unique() {
        let schema = mirror_schema();
        let memberships = schema
            .iter()
            .find(|t| t.name == tables::MEMBERSHIPS)
            .unwrap();
        let pair = memberships
            .get_index(indexes::BY_USER_AND_ORGANIZATION)
            .unwrap();
        assert!(pair.unique);
        assert_eq!(pair.fields, vec!["userId", "organizationId"]);
        assert!(!memberships.get_index(indexes::BY_EXTERNAL_ID).unwrap().unique);
    }
}
