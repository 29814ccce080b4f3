use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::timestamp;

/// Organization embedded in membership and invitation payloads.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrganizationRef {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
}

/// Public profile of the member, embedded in membership payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberUserData {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Usually the member's email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
}

/// `organizationMembership.created` / `.updated` payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MembershipPayload {
    pub id: String,
    pub role: String,
    pub organization: OrganizationRef,
    pub public_user_data: MemberUserData,
    #[serde(default, deserialize_with = "timestamp::optional")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "timestamp::optional")]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub public_metadata: Option<Value>,
    #[serde(default)]
    pub private_metadata: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
struct LooseOrganization {
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
struct LooseUserData {
    #[serde(default)]
    user_id: Option<String>,
}

/// `organizationMembership.deleted` payload.
///
/// The id may be the membership id or a composite `org_X:user_Y`; the
/// embedded references are present only on some deliveries.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MembershipDeletedPayload {
    pub id: String,
    #[serde(default)]
    organization: Option<LooseOrganization>,
    #[serde(default)]
    public_user_data: Option<LooseUserData>,
}

impl MembershipDeletedPayload {
    /// Creates a payload carrying only an id.
    pub fn from_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            organization: None,
            public_user_data: None,
        }
    }

    /// Provider id of the embedded organization.
    pub fn organization_id(&self) -> Option<&str> {
        self.organization.as_ref()?.id.as_deref()
    }

    /// Provider id of the embedded member.
    pub fn user_id(&self) -> Option<&str> {
        self.public_user_data.as_ref()?.user_id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_membership_requires_nested_refs() {
        let missing_user = json!({
            "id": "orgmem_1",
            "role": "org:member",
            "organization": {"id": "org_1"}
        });
        assert!(serde_json::from_value::<MembershipPayload>(missing_user).is_err());
    }

    #[test]
    fn test_deleted_payload_is_lenient() {
        let payload: MembershipDeletedPayload = serde_json::from_value(json!({
            "id": "orgmem_1",
            "organization": {},
            "public_user_data": {"user_id": "user_1"}
        }))
        .unwrap();
        assert_eq!(payload.organization_id(), None);
        assert_eq!(payload.user_id(), Some("user_1"));
    }

    #[test]
    fn test_member_snapshot_skips_absent_fields() {
        let data = MemberUserData {
            user_id: "user_1".to_string(),
            first_name: Some("Ada".to_string()),
            last_name: None,
            identifier: None,
            image_url: None,
            profile_image_url: None,
        };
        assert_eq!(
            serde_json::to_value(&data).unwrap(),
            json!({"user_id": "user_1", "first_name": "Ada"})
        );
    }
}
