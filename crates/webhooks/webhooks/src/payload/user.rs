use serde::Deserialize;
use serde_json::Value;

use super::{join_name, timestamp};

/// Verification state of an email address.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmailVerification {
    #[serde(default)]
    pub status: Option<String>,
}

/// One of a user's email addresses.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmailAddressPayload {
    pub id: String,
    pub email_address: String,
    #[serde(default)]
    pub verification: Option<EmailVerification>,
}

impl EmailAddressPayload {
    /// Returns true if the address has been verified.
    pub fn is_verified(&self) -> bool {
        self.verification
            .as_ref()
            .and_then(|v| v.status.as_deref())
            == Some("verified")
    }
}

/// `user.created` / `user.updated` payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserPayload {
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,

    #[serde(default)]
    pub email_addresses: Option<Vec<EmailAddressPayload>>,
    #[serde(default)]
    pub primary_email_address_id: Option<String>,

    #[serde(default)]
    pub password_enabled: Option<bool>,
    #[serde(default)]
    pub two_factor_enabled: Option<bool>,

    #[serde(default, deserialize_with = "timestamp::optional")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "timestamp::optional")]
    pub updated_at: Option<String>,
    #[serde(default, deserialize_with = "timestamp::optional")]
    pub last_sign_in_at: Option<String>,

    #[serde(default)]
    pub public_metadata: Option<Value>,
    #[serde(default)]
    pub private_metadata: Option<Value>,
}

impl UserPayload {
    /// The primary email address, falling back to the first one listed.
    pub fn primary_email(&self) -> Option<&EmailAddressPayload> {
        let addresses = self.email_addresses.as_deref()?;
        self.primary_email_address_id
            .as_deref()
            .and_then(|primary| addresses.iter().find(|a| a.id == primary))
            .or_else(|| addresses.first())
    }

    /// Display name: full name, then username, then email, then the id.
    pub fn display_name(&self) -> String {
        join_name(self.first_name.as_deref(), self.last_name.as_deref())
            .or_else(|| self.username.clone().filter(|u| !u.is_empty()))
            .or_else(|| self.primary_email().map(|e| e.email_address.clone()))
            .unwrap_or_else(|| self.id.clone())
    }

    /// A boolean flag from the public metadata.
    pub fn metadata_flag(&self, key: &str) -> Option<bool> {
        self.public_metadata.as_ref()?.get(key)?.as_bool()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_primary_email_and_name() {
        let payload: UserPayload = serde_json::from_value(json!({
            "id": "user_1",
            "first_name": null,
            "last_name": null,
            "primary_email_address_id": "idn_2",
            "email_addresses": [
                {"id": "idn_1", "email_address": "old@example.com"},
                {"id": "idn_2", "email_address": "ada@example.com", "verification": {"status": "verified"}}
            ]
        }))
        .unwrap();

        let email = payload.primary_email().unwrap();
        assert_eq!(email.email_address, "ada@example.com");
        assert!(email.is_verified());
        assert_eq!(payload.display_name(), "ada@example.com");
    }

    #[test]
    fn test_name_falls_back_to_id() {
        let payload: UserPayload = serde_json::from_value(json!({"id": "user_1"})).unwrap();
        assert_eq!(payload.display_name(), "user_1");
    }

    #[test]
    fn test_non_string_name_is_rejected() {
        let result = serde_json::from_value::<UserPayload>(json!({"id": "user_1", "first_name": 7}));
        assert!(result.is_err());
    }
}
