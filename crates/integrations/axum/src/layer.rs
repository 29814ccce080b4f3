//! Caller identity middleware layer for Axum.
//!
//! The mirror does not validate session tokens itself. An upstream gateway
//! that has already authenticated the caller forwards the provider subject
//! in a header; this layer lifts it into an [`Identity`] request extension.

use axum::body::Body;
use axum::http::{Request, Response};
use clerk_mirror_core::Identity;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Default header carrying the caller's provider user id.
pub const DEFAULT_SUBJECT_HEADER: &str = "x-clerk-user-id";
/// Default header carrying the provider token identifier.
pub const DEFAULT_TOKEN_HEADER: &str = "x-clerk-token-identifier";

/// Configuration for the identity layer.
#[derive(Debug, Clone)]
pub struct IdentityLayerConfig {
    pub subject_header: String,
    pub token_header: String,
}

impl Default for IdentityLayerConfig {
    fn default() -> Self {
        Self {
            subject_header: DEFAULT_SUBJECT_HEADER.to_string(),
            token_header: DEFAULT_TOKEN_HEADER.to_string(),
        }
    }
}

impl IdentityLayerConfig {
    /// Creates a new config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the subject header.
    pub fn subject_header(mut self, name: impl Into<String>) -> Self {
        self.subject_header = name.into();
        self
    }

    /// Sets the token identifier header.
    pub fn token_header(mut self, name: impl Into<String>) -> Self {
        self.token_header = name.into();
        self
    }
}

/// Layer that attaches the caller identity to requests.
#[derive(Debug, Clone, Default)]
pub struct IdentityLayer {
    config: IdentityLayerConfig,
}

impl IdentityLayer {
    /// Creates a layer reading the default headers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a layer with custom configuration.
    pub fn with_config(config: IdentityLayerConfig) -> Self {
        Self { config }
    }
}

impl<S> Layer<S> for IdentityLayer {
    type Service = IdentityMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        IdentityMiddleware {
            inner,
            config: self.config.clone(),
        }
    }
}

/// Middleware service that extracts the caller identity.
#[derive(Debug, Clone)]
pub struct IdentityMiddleware<S> {
    inner: S,
    config: IdentityLayerConfig,
}

impl<S> Service<Request<Body>> for IdentityMiddleware<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        if let Some(identity) = extract_identity(&req, &self.config) {
            tracing::debug!(subject = %identity.subject, "Caller identity attached");
            req.extensions_mut().insert(identity);
        }

        let mut inner = self.inner.clone();
        Box::pin(async move { inner.call(req).await })
    }
}

fn header<'a>(req: &'a Request<Body>, name: &str) -> Option<&'a str> {
    req.headers()
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Reads the identity headers from a request.
fn extract_identity(req: &Request<Body>, config: &IdentityLayerConfig) -> Option<Identity> {
    let subject = header(req, &config.subject_header)?;
    let mut identity = Identity::new(subject);
    if let Some(token) = header(req, &config.token_header) {
        identity = identity.with_token_identifier(token);
    }
    Some(identity)
}
