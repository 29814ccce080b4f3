use serde::Deserialize;
use serde_json::Value;

use super::timestamp;

/// `organization.created` / `organization.updated` payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrganizationPayload {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    /// Provider id of the creating user.
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default, deserialize_with = "timestamp::optional")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "timestamp::optional")]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub public_metadata: Option<Value>,
    #[serde(default)]
    pub private_metadata: Option<Value>,
}
