use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::merge::{merge_option, merge_value, Merge};

/// Roles that grant administrative rights inside an organization.
const ADMIN_ROLES: &[&str] = &["admin", "org:admin", "org:super_admin"];

/// Links a user to an organization with a role.
///
/// At most one membership exists per `(user_id, organization_id)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: String,
    /// Local id of the member.
    pub user_id: String,
    /// Local id of the organization.
    pub organization_id: String,
    /// Role key, e.g. `org:admin` or `org:member`.
    pub role: String,

    /// Provider membership id, when one has been seen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_user_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_metadata: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_metadata: Option<Value>,
}

impl Membership {
    /// Creates a membership joining the given local user and organization.
    pub fn new(
        user_id: impl Into<String>,
        organization_id: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            id: super::new_id(),
            user_id: user_id.into(),
            organization_id: organization_id.into(),
            role: role.into(),
            external_id: None,
            created_at: None,
            updated_at: None,
            public_user_data: None,
            public_metadata: None,
            private_metadata: None,
        }
    }

    /// Returns true if the role grants organization admin rights.
    pub fn is_admin(&self) -> bool {
        ADMIN_ROLES.contains(&self.role.as_str())
    }
}

/// Partial update for a [`Membership`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MembershipPatch {
    pub user_id: Option<String>,
    pub organization_id: Option<String>,
    pub role: Option<String>,
    pub external_id: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub public_user_data: Option<Value>,
    pub public_metadata: Option<Value>,
    pub private_metadata: Option<Value>,
}

impl Merge for Membership {
    type Patch = MembershipPatch;

    fn merge(&mut self, patch: MembershipPatch) {
        merge_value(&mut self.user_id, patch.user_id);
        merge_value(&mut self.organization_id, patch.organization_id);
        merge_value(&mut self.role, patch.role);
        merge_option(&mut self.external_id, patch.external_id);
        merge_option(&mut self.created_at, patch.created_at);
        merge_option(&mut self.updated_at, patch.updated_at);
        merge_option(&mut self.public_user_data, patch.public_user_data);
        merge_option(&mut self.public_metadata, patch.public_metadata);
        merge_option(&mut self.private_metadata, patch.private_metadata);
    }
}
