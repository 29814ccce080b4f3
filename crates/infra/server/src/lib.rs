//! # Clerk Mirror Server
//!
//! Standalone service that receives Clerk webhooks, keeps the local mirror
//! up to date and serves the operator audit routes.

mod config;

pub use config::{
    load_config, parse_config, ConfigError, IdentitySettings, MirrorConfig, ServerConfig,
    WebhookSettings, SECRET_ENV_VAR,
};

use std::sync::Arc;

use axum::Router;
use clerk_mirror_adapter_memory::MemoryAdapter;
use clerk_mirror_admin::AdminApi;
use clerk_mirror_axum::mirror_router;
use clerk_mirror_core::MirrorStore;
use clerk_mirror_webhooks::{WebhookError, WebhookProcessor};

/// Server startup error.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Webhook(#[from] WebhookError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The mirror server.
pub struct MirrorServer {
    /// Server configuration.
    pub config: MirrorConfig,
    store: Arc<dyn MirrorStore>,
}

impl MirrorServer {
    /// Creates a server over the given store.
    pub fn new(config: MirrorConfig, store: Arc<dyn MirrorStore>) -> Self {
        Self { config, store }
    }

    /// Creates a server backed by an in-memory store.
    pub fn in_memory(config: MirrorConfig) -> Self {
        Self::new(config, Arc::new(MemoryAdapter::new()))
    }

    /// Builds the application router.
    pub fn router(&self) -> Result<Router, ServerError> {
        let webhook = &self.config.webhook;
        let processor = WebhookProcessor::from_config(
            &webhook.webhook_config(),
            webhook.sync_options(),
            self.store.clone(),
        )?;
        let admin = AdminApi::new(self.store.clone());
        Ok(mirror_router(
            Arc::new(processor),
            Arc::new(admin),
            self.config.identity.layer_config(),
        ))
    }

    /// Binds and serves until the process exits.
    pub async fn run(&self) -> Result<(), ServerError> {
        let app = self.router()?;
        if self.config.webhook.signing_secret.is_none() {
            tracing::warn!("No webhook signing secret configured; every delivery will be rejected");
        }

        let address = self.config.server.bind_address();
        let listener = tokio::net::TcpListener::bind(&address).await?;
        tracing::info!(%address, "Clerk mirror listening");
        axum::serve(listener, app).await?;
        Ok(())
    }
}

impl Default for MirrorServer {
    fn default() -> Self {
        Self::in_memory(MirrorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_without_secret() {
        assert!(MirrorServer::default().router().is_ok());
    }

    #[test]
    fn test_router_rejects_bad_secret() {
        let mut config = MirrorConfig::default();
        config.webhook.signing_secret = Some("whsec_!!!".to_string());
        let err = MirrorServer::in_memory(config).router().unwrap_err();
        assert!(matches!(err, ServerError::Webhook(WebhookError::InvalidSecret(_))));
    }
}
