//! Authenticated caller identity.

use serde::{Deserialize, Serialize};

/// The identity of an authenticated caller, as asserted by the identity provider.
///
/// `subject` is the provider's user id and joins to `User::external_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// External user id of the caller.
    pub subject: String,
    /// Provider-specific token identifier, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_identifier: Option<String>,
}

impl Identity {
    /// Creates an identity for the given subject.
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            token_identifier: None,
        }
    }

    /// Sets the token identifier.
    pub fn with_token_identifier(mut self, token: impl Into<String>) -> Self {
        self.token_identifier = Some(token.into());
        self
    }
}
