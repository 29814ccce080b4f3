//! # Clerk Mirror Axum Integration
//!
//! This crate exposes the mirror over HTTP with Axum:
//! - `POST /clerk-webhook`
//! - Webhook audit routes for operators
//! - Caller identity middleware and extractors
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use clerk_mirror_axum::{mirror_router, IdentityLayerConfig};
//!
//! let app = mirror_router(Arc::new(processor), Arc::new(admin), IdentityLayerConfig::default());
//! axum::serve(listener, app).await?;
//! ```

mod extractor;
mod layer;
mod routes;

pub use extractor::{CallerIdentity, IdentityRejection, OptionalCallerIdentity};
pub use layer::{
    IdentityLayer, IdentityLayerConfig, IdentityMiddleware, DEFAULT_SUBJECT_HEADER,
    DEFAULT_TOKEN_HEADER,
};
pub use routes::{admin_routes, webhook_routes, WEBHOOK_PATH};

use std::sync::Arc;

use http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Router;
use clerk_mirror_admin::AdminApi;
use clerk_mirror_core::MirrorError;
use clerk_mirror_webhooks::{WebhookProcessor, WebhookResponse};

/// Builds the full application router.
///
/// The identity layer wraps only the admin routes; the webhook endpoint
/// authenticates deliveries by signature.
pub fn mirror_router(
    processor: Arc<WebhookProcessor>,
    admin: Arc<AdminApi>,
    identity: IdentityLayerConfig,
) -> Router {
    Router::new()
        .merge(webhook_routes(processor))
        .merge(admin_routes(admin).layer(IdentityLayer::with_config(identity)))
}

/// Converts a processor response to an Axum response.
pub fn to_axum_response(response: WebhookResponse) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, axum::Json(response.body)).into_response()
}

/// Wrapper for MirrorError that implements IntoResponse.
#[derive(Debug)]
pub struct MirrorErrorResponse(pub MirrorError);

impl IntoResponse for MirrorErrorResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        }
        let body = serde_json::json!({
            "error": self.0.to_string(),
            "code": self.0.status_code()
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<MirrorError> for MirrorErrorResponse {
    fn from(err: MirrorError) -> Self {
        MirrorErrorResponse(err)
    }
}
