use serde::Deserialize;
use serde_json::Value;

use super::timestamp;

/// `permission.created` / `permission.updated` payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PermissionPayload {
    pub id: String,
    pub key: String,
    pub name: String,
    #[serde(rename = "type")]
    pub permission_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "timestamp::optional")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "timestamp::optional")]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub public_metadata: Option<Value>,
    #[serde(default)]
    pub private_metadata: Option<Value>,
}

/// A permission embedded in a role payload.
///
/// Only the id is guaranteed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmbeddedPermission {
    pub id: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub permission_type: Option<String>,
    #[serde(default, deserialize_with = "timestamp::optional")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "timestamp::optional")]
    pub updated_at: Option<String>,
}

/// `role.created` / `role.updated` payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RolePayload {
    pub id: String,
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_creator_eligible: Option<bool>,
    #[serde(default)]
    pub permissions: Option<Vec<EmbeddedPermission>>,
    #[serde(default, deserialize_with = "timestamp::optional")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "timestamp::optional")]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub public_metadata: Option<Value>,
    #[serde(default)]
    pub private_metadata: Option<Value>,
}
