use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::merge::{merge_option, merge_value, Merge};
use crate::types::metadata;

/// A user mirrored from the identity provider.
///
/// # Example
///
/// ```rust
/// use clerk_mirror_core::User;
///
/// let user = User::new("user_2abc", "Ada Lovelace");
/// assert_eq!(user.external_id, "user_2abc");
/// assert!(!user.is_placeholder());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Local identifier.
    pub id: String,
    /// Provider user id (unique).
    pub external_id: String,
    /// Display name.
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sign_in_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_password: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub two_factor_enabled: Option<bool>,

    /// System-wide super admin flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_super_admin: Option<bool>,
    /// System-wide super user flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_super_user: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_metadata: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_metadata: Option<Value>,
}

impl User {
    /// Creates a user with only its required fields set.
    pub fn new(external_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: super::new_id(),
            external_id: external_id.into(),
            name: name.into(),
            first_name: None,
            last_name: None,
            email: None,
            username: None,
            image_url: None,
            profile_image_url: None,
            created_at: None,
            updated_at: None,
            last_sign_in_at: None,
            email_verified: None,
            has_password: None,
            two_factor_enabled: None,
            is_super_admin: None,
            is_super_user: None,
            public_metadata: None,
            private_metadata: None,
        }
    }

    /// Returns true if this record was synthesized ahead of its `user.created` event.
    pub fn is_placeholder(&self) -> bool {
        metadata::is_placeholder(self.public_metadata.as_ref())
    }

    /// Returns true if the user is a super admin.
    pub fn is_super_admin(&self) -> bool {
        self.is_super_admin == Some(true)
    }

    /// Returns true if the user holds any system-wide admin privilege.
    pub fn has_system_admin_access(&self) -> bool {
        self.is_super_admin() || self.is_super_user == Some(true)
    }
}

/// Partial update for a [`User`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub image_url: Option<String>,
    pub profile_image_url: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub last_sign_in_at: Option<String>,
    pub email_verified: Option<bool>,
    pub has_password: Option<bool>,
    pub two_factor_enabled: Option<bool>,
    pub is_super_admin: Option<bool>,
    pub is_super_user: Option<bool>,
    pub public_metadata: Option<Value>,
    pub private_metadata: Option<Value>,
}

impl Merge for User {
    type Patch = UserPatch;

    fn merge(&mut self, patch: UserPatch) {
        merge_value(&mut self.name, patch.name);
        merge_option(&mut self.first_name, patch.first_name);
        merge_option(&mut self.last_name, patch.last_name);
        merge_option(&mut self.email, patch.email);
        merge_option(&mut self.username, patch.username);
        merge_option(&mut self.image_url, patch.image_url);
        merge_option(&mut self.profile_image_url, patch.profile_image_url);
        merge_option(&mut self.created_at, patch.created_at);
        merge_option(&mut self.updated_at, patch.updated_at);
        merge_option(&mut self.last_sign_in_at, patch.last_sign_in_at);
        merge_option(&mut self.email_verified, patch.email_verified);
        merge_option(&mut self.has_password, patch.has_password);
        merge_option(&mut self.two_factor_enabled, patch.two_factor_enabled);
        merge_option(&mut self.is_super_admin, patch.is_super_admin);
        merge_option(&mut self.is_super_user, patch.is_super_user);
        merge_option(&mut self.public_metadata, patch.public_metadata);
        merge_option(&mut self.private_metadata, patch.private_metadata);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_creation() {
        let user = User::new("user_1", "Ada");
        assert_eq!(user.name, "Ada");
        assert!(user.email.is_none());
        assert!(!user.has_system_admin_access());
    }

    #[test]
    fn test_merge_keeps_absent_fields() {
        let mut user = User::new("user_1", "Ada");
        user.email = Some("ada@example.com".to_string());

        user.merge(UserPatch {
            name: Some("Ada Lovelace".to_string()),
            username: Some("ada".to_string()),
            ..Default::default()
        });

        assert_eq!(user.name, "Ada Lovelace");
        assert_eq!(user.email.as_deref(), Some("ada@example.com"));
        assert_eq!(user.username.as_deref(), Some("ada"));
    }

    #[test]
    fn test_serializes_camel_case() {
        let mut user = User::new("user_1", "Ada");
        user.is_super_admin = Some(true);
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["externalId"], json!("user_1"));
        assert_eq!(value["isSuperAdmin"], json!(true));
        assert!(value.get("email").is_none());
    }
}
