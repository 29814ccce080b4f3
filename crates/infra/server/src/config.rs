//! Server configuration.

use clerk_mirror_axum::{IdentityLayerConfig, DEFAULT_SUBJECT_HEADER, DEFAULT_TOKEN_HEADER};
use clerk_mirror_webhooks::{SyncOptions, WebhookConfig, DEFAULT_TOLERANCE_SECS};
use serde::{Deserialize, Serialize};

/// Environment variable that supplies or overrides the signing secret.
pub const SECRET_ENV_VAR: &str = "CLERK_WEBHOOK_SECRET";

/// Server-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port to listen on.
    pub port: u16,
    /// Host to bind to.
    pub host: String,
    /// Log level.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "0.0.0.0".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// The `host:port` bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Webhook ingestion settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookSettings {
    /// Svix signing secret (`whsec_...`).
    pub signing_secret: Option<String>,
    /// Accepted clock skew in seconds.
    pub tolerance_secs: i64,
    /// Create placeholder users and organizations for early references.
    pub synthesize_placeholders: bool,
}

impl Default for WebhookSettings {
    fn default() -> Self {
        Self {
            signing_secret: None,
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
            synthesize_placeholders: true,
        }
    }
}

impl std::fmt::Debug for WebhookSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookSettings")
            .field("signing_secret", &self.signing_secret.as_ref().map(|_| "[redacted]"))
            .field("tolerance_secs", &self.tolerance_secs)
            .field("synthesize_placeholders", &self.synthesize_placeholders)
            .finish()
    }
}

impl WebhookSettings {
    pub fn webhook_config(&self) -> WebhookConfig {
        let config = WebhookConfig::new().with_tolerance(self.tolerance_secs);
        match &self.signing_secret {
            Some(secret) => config.with_secret(secret.clone()),
            None => config,
        }
    }

    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions::new().with_placeholders(self.synthesize_placeholders)
    }
}

/// Headers carrying the caller identity on admin routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentitySettings {
    pub subject_header: String,
    pub token_header: String,
}

impl Default for IdentitySettings {
    fn default() -> Self {
        Self {
            subject_header: DEFAULT_SUBJECT_HEADER.to_string(),
            token_header: DEFAULT_TOKEN_HEADER.to_string(),
        }
    }
}

impl IdentitySettings {
    pub fn layer_config(&self) -> IdentityLayerConfig {
        IdentityLayerConfig::new()
            .subject_header(self.subject_header.clone())
            .token_header(self.token_header.clone())
    }
}

/// Complete server configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    pub server: ServerConfig,
    pub webhook: WebhookSettings,
    pub identity: IdentitySettings,
}

impl MirrorConfig {
    /// Applies environment overrides using the given lookup.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(secret) = lookup(SECRET_ENV_VAR).filter(|s| !s.is_empty()) {
            self.webhook.signing_secret = Some(secret);
        }
        self
    }
}

/// Parses configuration from TOML text.
pub fn parse_config(content: &str) -> Result<MirrorConfig, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Loads configuration from a TOML file.
pub fn load_config(path: &str) -> Result<MirrorConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
    parse_config(&content)
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MirrorConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.webhook.tolerance_secs, 300);
        assert!(config.webhook.synthesize_placeholders);
        assert!(config.webhook.signing_secret.is_none());
    }

    #[test]
    fn test_parse_partial_file() {
        let config = parse_config(
            r#"
            [server]
            port = 9090

            [webhook]
            signing_secret = "whsec_abc"
            synthesize_placeholders = false

            [identity]
            subject_header = "x-user"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.webhook.signing_secret.as_deref(), Some("whsec_abc"));
        assert_eq!(config.webhook.tolerance_secs, 300);
        assert!(!config.webhook.sync_options().synthesize_placeholders);
        assert_eq!(config.identity.subject_header, "x-user");
        assert_eq!(config.identity.token_header, DEFAULT_TOKEN_HEADER);
    }

    #[test]
    fn test_env_overrides_secret() {
        let config = MirrorConfig::default().with_env(|name| {
            (name == SECRET_ENV_VAR).then(|| "whsec_from_env".to_string())
        });
        assert_eq!(config.webhook.signing_secret.as_deref(), Some("whsec_from_env"));

        let unchanged = MirrorConfig::default().with_env(|_| Some(String::new()));
        assert!(unchanged.webhook.signing_secret.is_none());
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(parse_config("[server"), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let settings = WebhookSettings {
            signing_secret: Some("whsec_secret".to_string()),
            ..Default::default()
        };
        assert!(!format!("{settings:?}").contains("whsec_secret"));
    }
}
