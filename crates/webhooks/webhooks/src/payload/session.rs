use serde::Deserialize;

use super::timestamp;

/// User embedded in a session payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserRef {
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Structured device details.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DevicePayload {
    #[serde(default, rename = "type")]
    pub device_type: Option<String>,
    #[serde(default)]
    pub browser_name: Option<String>,
}

/// Latest activity block attached to newer session payloads.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SessionActivity {
    #[serde(default)]
    pub device_type: Option<String>,
    #[serde(default)]
    pub browser_name: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub is_mobile: Option<bool>,
}

/// `session.*` payload.
///
/// The owner may be a nested `user` object, a flat `user_id`, or absent
/// (removal events).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionPayload {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub user: Option<UserRef>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default, deserialize_with = "timestamp::optional")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "timestamp::optional")]
    pub last_active_at: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub device: Option<DevicePayload>,
    #[serde(default)]
    pub latest_activity: Option<SessionActivity>,
}

impl SessionPayload {
    /// Provider id of the session owner, in whichever shape it arrived.
    pub fn user_external_id(&self) -> Option<&str> {
        self.user
            .as_ref()
            .map(|u| u.id.as_str())
            .or(self.user_id.as_deref())
            .filter(|id| !id.is_empty())
    }

    /// Structured device type, if any.
    pub fn device_type(&self) -> Option<&str> {
        self.device
            .as_ref()
            .and_then(|d| d.device_type.as_deref())
            .or_else(|| self.latest_activity.as_ref()?.device_type.as_deref())
    }

    /// Structured browser name, if any.
    pub fn browser_name(&self) -> Option<&str> {
        self.device
            .as_ref()
            .and_then(|d| d.browser_name.as_deref())
            .or_else(|| self.latest_activity.as_ref()?.browser_name.as_deref())
    }

    /// Client IP, preferring the top-level field.
    pub fn ip(&self) -> Option<&str> {
        self.ip_address
            .as_deref()
            .or_else(|| self.latest_activity.as_ref()?.ip_address.as_deref())
    }
}
