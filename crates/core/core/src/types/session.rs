use serde::{Deserialize, Serialize};
use std::fmt;

use crate::merge::{merge_option, merge_value, Merge};

/// Status of a mirrored session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SessionStatus {
    Active,
    Ended,
    Revoked,
    Removed,
    Pending,
    Other(String),
}

impl SessionStatus {
    /// Returns the stored string form.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "active",
            Self::Ended => "ended",
            Self::Revoked => "revoked",
            Self::Removed => "removed",
            Self::Pending => "pending",
            Self::Other(status) => status,
        }
    }

    /// Returns true for statuses that terminate a session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ended | Self::Revoked | Self::Removed)
    }
}

impl From<String> for SessionStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "active" => Self::Active,
            "ended" => Self::Ended,
            "revoked" => Self::Revoked,
            "removed" => Self::Removed,
            "pending" => Self::Pending,
            _ => Self::Other(value),
        }
    }
}

impl From<SessionStatus> for String {
    fn from(status: SessionStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user session observed through session webhooks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    /// Provider session id (unique).
    pub external_id: String,
    /// Local id of the session owner.
    pub user_id: String,
    pub status: SessionStatus,
    pub created_at: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_active_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// "mobile", "desktop", ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
}

impl Session {
    /// Creates an active session.
    pub fn new(
        external_id: impl Into<String>,
        user_id: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            id: super::new_id(),
            external_id: external_id.into(),
            user_id: user_id.into(),
            status: SessionStatus::Active,
            created_at: created_at.into(),
            last_active_at: None,
            ended_at: None,
            client_id: None,
            device_type: None,
            browser_name: None,
            ip_address: None,
        }
    }

    /// Returns true if the session is active.
    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }
}

/// Partial update for a [`Session`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionPatch {
    pub user_id: Option<String>,
    pub status: Option<SessionStatus>,
    pub created_at: Option<String>,
    pub last_active_at: Option<String>,
    pub ended_at: Option<String>,
    pub client_id: Option<String>,
    pub device_type: Option<String>,
    pub browser_name: Option<String>,
    pub ip_address: Option<String>,
}

impl Merge for Session {
    type Patch = SessionPatch;

    fn merge(&mut self, patch: SessionPatch) {
        merge_value(&mut self.user_id, patch.user_id);
        merge_value(&mut self.status, patch.status);
        merge_value(&mut self.created_at, patch.created_at);
        merge_option(&mut self.last_active_at, patch.last_active_at);
        merge_option(&mut self.ended_at, patch.ended_at);
        merge_option(&mut self.client_id, patch.client_id);
        merge_option(&mut self.device_type, patch.device_type);
        merge_option(&mut self.browser_name, patch.browser_name);
        merge_option(&mut self.ip_address, patch.ip_address);
    }
}
