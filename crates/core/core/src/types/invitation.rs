use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::merge::{merge_option, merge_value, Merge};

/// Lifecycle status of an organization invitation.
///
/// Statuses the mirror does not model explicitly are preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Revoked,
    Other(String),
}

impl InvitationStatus {
    /// Returns the stored string form.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Revoked => "revoked",
            Self::Other(status) => status,
        }
    }
}

impl From<String> for InvitationStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pending" => Self::Pending,
            "accepted" => Self::Accepted,
            "revoked" => Self::Revoked,
            _ => Self::Other(value),
        }
    }
}

impl From<InvitationStatus> for String {
    fn from(status: InvitationStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An invitation for an email address to join an organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    pub id: String,
    /// Provider invitation id (unique).
    pub external_id: String,
    /// Local id of the organization.
    pub organization_id: String,
    /// Recipient email address.
    pub email: String,
    pub status: InvitationStatus,
    pub role: String,
    pub created_at: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Local id of the user who sent the invitation, when it could be resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by_user_id: Option<String>,
    /// Provider id of the organization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_external_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_metadata: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_metadata: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_user_data: Option<Value>,
}

impl Invitation {
    /// Creates a pending invitation.
    pub fn new(
        external_id: impl Into<String>,
        organization_id: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            id: super::new_id(),
            external_id: external_id.into(),
            organization_id: organization_id.into(),
            email: email.into(),
            status: InvitationStatus::Pending,
            role: role.into(),
            created_at: created_at.into(),
            updated_at: None,
            created_by_user_id: None,
            org_external_id: None,
            public_metadata: None,
            private_metadata: None,
            public_user_data: None,
        }
    }
}

/// Partial update for an [`Invitation`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvitationPatch {
    pub organization_id: Option<String>,
    pub email: Option<String>,
    pub status: Option<InvitationStatus>,
    pub role: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub created_by_user_id: Option<String>,
    pub org_external_id: Option<String>,
    pub public_metadata: Option<Value>,
    pub private_metadata: Option<Value>,
    pub public_user_data: Option<Value>,
}

impl Merge for Invitation {
    type Patch = InvitationPatch;

    fn merge(&mut self, patch: InvitationPatch) {
        merge_value(&mut self.organization_id, patch.organization_id);
        merge_value(&mut self.email, patch.email);
        merge_value(&mut self.status, patch.status);
        merge_value(&mut self.role, patch.role);
        merge_value(&mut self.created_at, patch.created_at);
        merge_option(&mut self.updated_at, patch.updated_at);
        merge_option(&mut self.created_by_user_id, patch.created_by_user_id);
        merge_option(&mut self.org_external_id, patch.org_external_id);
        merge_option(&mut self.public_metadata, patch.public_metadata);
        merge_option(&mut self.private_metadata, patch.private_metadata);
        merge_option(&mut self.public_user_data, patch.public_user_data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_string_form() {
        assert_eq!(InvitationStatus::from("accepted".to_string()), InvitationStatus::Accepted);
        assert_eq!(
            InvitationStatus::from("expired".to_string()),
            InvitationStatus::Other("expired".to_string())
        );
        assert_eq!(serde_json::to_value(InvitationStatus::Revoked).unwrap(), json!("revoked"));
    }

    #[test]
    fn test_new_invitation_is_pending() {
        let invitation = Invitation::new("orginv_1", "org", "a@b.c", "org:member", "2024-01-01T00:00:00.000Z");
        assert_eq!(invitation.status, InvitationStatus::Pending);
        assert!(invitation.created_by_user_id.is_none());
    }
}
