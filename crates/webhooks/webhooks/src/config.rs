//! Webhook ingestion configuration.

/// Default tolerance for the `svix-timestamp` header, in seconds.
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Signature verification configuration.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Signing secret (`whsec_...`). `None` rejects every request.
    pub signing_secret: Option<String>,
    /// Allowed clock skew for the signature timestamp.
    pub tolerance_secs: i64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            signing_secret: None,
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
        }
    }
}

impl WebhookConfig {
    /// Creates a new configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the signing secret.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.signing_secret = Some(secret.into());
        self
    }

    /// Sets the timestamp tolerance.
    pub fn with_tolerance(mut self, secs: i64) -> Self {
        self.tolerance_secs = secs;
        self
    }
}

/// Behaviour of the sync handlers.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Create placeholder users and organizations for references that have
    /// not been delivered yet. When disabled, membership and session events
    /// with unknown references are skipped.
    pub synthesize_placeholders: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            synthesize_placeholders: true,
        }
    }
}

impl SyncOptions {
    /// Creates the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether placeholders are synthesized.
    pub fn with_placeholders(mut self, enabled: bool) -> Self {
        self.synthesize_placeholders = enabled;
        self
    }
}
