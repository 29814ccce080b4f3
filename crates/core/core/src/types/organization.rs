use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::merge::{merge_option, merge_value, Merge};
use crate::types::metadata;

/// An organization mirrored from the identity provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    /// Local identifier.
    pub id: String,
    /// Provider organization id (unique).
    pub external_id: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,

    /// External id of the user who created the organization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_metadata: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_metadata: Option<Value>,
}

impl Organization {
    /// Creates an organization with only its required fields set.
    pub fn new(external_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: super::new_id(),
            external_id: external_id.into(),
            name: name.into(),
            slug: None,
            image_url: None,
            logo_url: None,
            created_by: None,
            created_at: None,
            updated_at: None,
            public_metadata: None,
            private_metadata: None,
        }
    }

    /// Returns true if this record was synthesized ahead of its `organization.created` event.
    pub fn is_placeholder(&self) -> bool {
        metadata::is_placeholder(self.public_metadata.as_ref())
    }
}

/// Partial update for an [`Organization`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrganizationPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub image_url: Option<String>,
    pub logo_url: Option<String>,
    pub created_by: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub public_metadata: Option<Value>,
    pub private_metadata: Option<Value>,
}

impl Merge for Organization {
    type Patch = OrganizationPatch;

    fn merge(&mut self, patch: OrganizationPatch) {
        merge_value(&mut self.name, patch.name);
        merge_option(&mut self.slug, patch.slug);
        merge_option(&mut self.image_url, patch.image_url);
        merge_option(&mut self.logo_url, patch.logo_url);
        merge_option(&mut self.created_by, patch.created_by);
        merge_option(&mut self.created_at, patch.created_at);
        merge_option(&mut self.updated_at, patch.updated_at);
        merge_option(&mut self.public_metadata, patch.public_metadata);
        merge_option(&mut self.private_metadata, patch.private_metadata);
    }
}
