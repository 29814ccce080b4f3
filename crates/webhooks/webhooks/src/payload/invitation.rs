use serde::Deserialize;
use serde_json::Value;

use super::{timestamp, OrganizationRef};

/// `organizationInvitation.*` payload.
///
/// The organization arrives either as a flat `organization_id` or as a
/// nested `organization` object; decoding rejects payloads with neither.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InvitationPayload {
    pub id: String,
    pub email_address: String,
    pub role: String,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub organization: Option<OrganizationRef>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "timestamp::optional")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "timestamp::optional")]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub public_metadata: Option<Value>,
    #[serde(default)]
    pub private_metadata: Option<Value>,
    /// Profile of the inviting user, when the sender includes it.
    #[serde(default)]
    pub public_user_data: Option<Value>,
}

impl InvitationPayload {
    /// Provider id of the target organization.
    pub fn organization_external_id(&self) -> Option<&str> {
        self.organization_id
            .as_deref()
            .or_else(|| self.organization.as_ref().map(|o| o.id.as_str()))
    }

    /// Provider id of the inviting user, from the embedded user data.
    pub fn inviter_external_id(&self) -> Option<&str> {
        self.public_user_data
            .as_ref()?
            .get("user_id")?
            .as_str()
            .filter(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_organization_shapes() {
        let flat: InvitationPayload = serde_json::from_value(json!({
            "id": "orginv_1", "email_address": "a@b.c", "role": "org:member",
            "organization_id": "org_1"
        }))
        .unwrap();
        assert_eq!(flat.organization_external_id(), Some("org_1"));

        let nested: InvitationPayload = serde_json::from_value(json!({
            "id": "orginv_1", "email_address": "a@b.c", "role": "org:member",
            "organization": {"id": "org_2"},
            "public_user_data": {"user_id": "user_9"}
        }))
        .unwrap();
        assert_eq!(nested.organization_external_id(), Some("org_2"));
        assert_eq!(nested.inviter_external_id(), Some("user_9"));
    }
}
