//! Route mounting for the mirror.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use clerk_mirror_admin::AdminApi;
use clerk_mirror_core::WebhookEvent;
use clerk_mirror_webhooks::{WebhookHeaders, WebhookProcessor};
use serde::Deserialize;

use crate::extractor::OptionalCallerIdentity;
use crate::{to_axum_response, MirrorErrorResponse};

/// Path of the inbound webhook endpoint.
pub const WEBHOOK_PATH: &str = "/clerk-webhook";

/// Creates a router with the inbound webhook endpoint.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new().merge(webhook_routes(Arc::new(processor)));
/// ```
pub fn webhook_routes<S>(processor: Arc<WebhookProcessor>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route(WEBHOOK_PATH, post(clerk_webhook))
        .with_state(WebhookState { processor })
}

/// Creates a router with the webhook audit routes.
///
/// Callers are resolved by [`IdentityLayer`](crate::IdentityLayer), which must
/// wrap these routes.
pub fn admin_routes<S>(admin: Arc<AdminApi>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/admin/webhook-events", get(recent_events))
        .route("/admin/webhook-events/object/{object_id}", get(events_for_object))
        .route("/admin/webhook-events/type/{event_type}", get(events_by_type))
        .with_state(AdminState { admin })
}

#[derive(Clone)]
struct WebhookState {
    processor: Arc<WebhookProcessor>,
}

#[derive(Clone)]
struct AdminState {
    admin: Arc<AdminApi>,
}

#[derive(Debug, Default, Deserialize)]
struct LimitQuery {
    limit: Option<usize>,
}

async fn clerk_webhook(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let webhook_headers =
        WebhookHeaders::from_fn(|name| headers.get(name).and_then(|v| v.to_str().ok()));
    let response = state.processor.handle(&webhook_headers, &body).await;
    to_axum_response(response)
}

async fn recent_events(
    State(state): State<AdminState>,
    OptionalCallerIdentity(identity): OptionalCallerIdentity,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<WebhookEvent>>, MirrorErrorResponse> {
    let events = state
        .admin
        .recent_webhook_events(identity.as_ref(), query.limit)
        .await?;
    Ok(Json(events))
}

async fn events_for_object(
    State(state): State<AdminState>,
    OptionalCallerIdentity(identity): OptionalCallerIdentity,
    Path(object_id): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<WebhookEvent>>, MirrorErrorResponse> {
    let events = state
        .admin
        .webhook_events_for_object(identity.as_ref(), &object_id, query.limit)
        .await?;
    Ok(Json(events))
}

async fn events_by_type(
    State(state): State<AdminState>,
    OptionalCallerIdentity(identity): OptionalCallerIdentity,
    Path(event_type): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<WebhookEvent>>, MirrorErrorResponse> {
    let events = state
        .admin
        .webhook_events_by_type(identity.as_ref(), &event_type, query.limit)
        .await?;
    Ok(Json(events))
}
