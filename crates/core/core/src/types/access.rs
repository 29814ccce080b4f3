//! Permission and role records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::merge::{merge_option, merge_value, Merge};

/// A permission defined in the identity provider, e.g. `org:billing:manage`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub id: String,
    pub external_id: String,
    /// Stable permission key.
    pub key: String,
    pub name: String,
    /// Permission type, e.g. "system" or "user".
    #[serde(rename = "type")]
    pub permission_type: String,
    pub created_at: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_metadata: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_metadata: Option<Value>,
}

impl Permission {
    /// Creates a permission with its required fields.
    pub fn new(
        external_id: impl Into<String>,
        key: impl Into<String>,
        name: impl Into<String>,
        permission_type: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            id: super::new_id(),
            external_id: external_id.into(),
            key: key.into(),
            name: name.into(),
            permission_type: permission_type.into(),
            created_at: created_at.into(),
            description: None,
            updated_at: None,
            public_metadata: None,
            private_metadata: None,
        }
    }
}

/// Partial update for a [`Permission`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PermissionPatch {
    pub key: Option<String>,
    pub name: Option<String>,
    pub permission_type: Option<String>,
    pub created_at: Option<String>,
    pub description: Option<String>,
    pub updated_at: Option<String>,
    pub public_metadata: Option<Value>,
    pub private_metadata: Option<Value>,
}

impl Merge for Permission {
    type Patch = PermissionPatch;

    fn merge(&mut self, patch: PermissionPatch) {
        merge_value(&mut self.key, patch.key);
        merge_value(&mut self.name, patch.name);
        merge_value(&mut self.permission_type, patch.permission_type);
        merge_value(&mut self.created_at, patch.created_at);
        merge_option(&mut self.description, patch.description);
        merge_option(&mut self.updated_at, patch.updated_at);
        merge_option(&mut self.public_metadata, patch.public_metadata);
        merge_option(&mut self.private_metadata, patch.private_metadata);
    }
}

/// A role defined in the identity provider, e.g. `org:admin`.
///
/// Permissions are referenced both by local id and by external id so the
/// link survives a permission being deleted and re-created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: String,
    pub external_id: String,
    pub key: String,
    pub name: String,
    pub created_at: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether organization creators receive this role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_creator_eligible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    /// Local permission ids, in payload order.
    #[serde(default)]
    pub permission_ids: Vec<String>,
    /// Provider permission ids, parallel to `permission_ids`.
    #[serde(default)]
    pub permission_external_ids: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_metadata: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_metadata: Option<Value>,
}

impl Role {
    /// Creates a role with its required fields and no permissions.
    pub fn new(
        external_id: impl Into<String>,
        key: impl Into<String>,
        name: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            id: super::new_id(),
            external_id: external_id.into(),
            key: key.into(),
            name: name.into(),
            created_at: created_at.into(),
            description: None,
            is_creator_eligible: None,
            updated_at: None,
            permission_ids: Vec::new(),
            permission_external_ids: Vec::new(),
            public_metadata: None,
            private_metadata: None,
        }
    }
}

/// Partial update for a [`Role`].
///
/// The permission lists are replaced as a whole when present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RolePatch {
    pub key: Option<String>,
    pub name: Option<String>,
    pub created_at: Option<String>,
    pub description: Option<String>,
    pub is_creator_eligible: Option<bool>,
    pub updated_at: Option<String>,
    pub permission_ids: Option<Vec<String>>,
    pub permission_external_ids: Option<Vec<String>>,
    pub public_metadata: Option<Value>,
    pub private_metadata: Option<Value>,
}

impl Merge for Role {
    type Patch = RolePatch;

    fn merge(&mut self, patch: RolePatch) {
        merge_value(&mut self.key, patch.key);
        merge_value(&mut self.name, patch.name);
        merge_value(&mut self.created_at, patch.created_at);
        merge_option(&mut self.description, patch.description);
        merge_option(&mut self.is_creator_eligible, patch.is_creator_eligible);
        merge_option(&mut self.updated_at, patch.updated_at);
        merge_value(&mut self.permission_ids, patch.permission_ids);
        merge_value(&mut self.permission_external_ids, patch.permission_external_ids);
        merge_option(&mut self.public_metadata, patch.public_metadata);
        merge_option(&mut self.private_metadata, patch.private_metadata);
    }
}
