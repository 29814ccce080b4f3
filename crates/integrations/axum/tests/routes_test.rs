//! Integration tests for the Axum routes.
//!
//! These tests drive the full router with `oneshot` against an in-memory store.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use clerk_mirror_adapter_memory::MemoryAdapter;
use clerk_mirror_admin::AdminApi;
use clerk_mirror_axum::{mirror_router, IdentityLayerConfig, DEFAULT_SUBJECT_HEADER};
use clerk_mirror_core::{MirrorStore, User};
use clerk_mirror_webhooks::{
    SyncOptions, WebhookConfig, WebhookProcessor, WebhookSigner, SVIX_ID, SVIX_SIGNATURE,
    SVIX_TIMESTAMP,
};
use serde_json::{json, Value};
use tower::ServiceExt;

const SECRET: &str = "whsec_MfKQ9r8GKYqrTwjUPD8ILPZIo2LaLaSw";

fn test_app() -> (Router, Arc<MemoryAdapter>) {
    let store = Arc::new(MemoryAdapter::new());
    let config = WebhookConfig::new().with_secret(SECRET);
    let processor = WebhookProcessor::from_config(&config, SyncOptions::default(), store.clone()).unwrap();
    let admin = AdminApi::new(store.clone());
    let app = mirror_router(Arc::new(processor), Arc::new(admin), IdentityLayerConfig::default());
    (app, store)
}

fn signed_request(msg_id: &str, body: &Value) -> Request<Body> {
    let payload = serde_json::to_vec(body).unwrap();
    let timestamp = chrono::Utc::now().timestamp();
    let signer = WebhookSigner::new(SECRET).unwrap();
    Request::builder()
        .method("POST")
        .uri("/clerk-webhook")
        .header("content-type", "application/json")
        .header(SVIX_ID, msg_id)
        .header(SVIX_TIMESTAMP, timestamp.to_string())
        .header(SVIX_SIGNATURE, signer.sign_header(msg_id, timestamp, &payload))
        .body(Body::from(payload))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_webhook_creates_user() {
    let (app, store) = test_app();
    let event = json!({
        "type": "user.created",
        "object": "event",
        "data": {"id": "user_1", "first_name": "Ada", "last_name": "Lovelace"}
    });

    let response = app.oneshot(signed_request("msg_1", &event)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({"status": "success"}));
    let user = store.find_user_by_external_id("user_1").await.unwrap().unwrap();
    assert_eq!(user.name, "Ada Lovelace");
}

#[tokio::test]
async fn test_webhook_unknown_type_is_accepted() {
    let (app, _) = test_app();
    let event = json!({"type": "email.created", "data": {"id": "ema_1"}});

    let response = app.oneshot(signed_request("msg_2", &event)).await.unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(
        json_body(response).await,
        json!({"status": "ignored", "eventType": "email.created"})
    );
}

#[tokio::test]
async fn test_webhook_missing_headers() {
    let (app, store) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/clerk-webhook")
                .body(Body::from(r#"{"type":"user.created","data":{"id":"user_1"}}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(store.webhook_event_count().await, 0);
}

#[tokio::test]
async fn test_admin_routes_require_identity() {
    let (app, _) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admin/webhook-events")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_routes_forbid_regular_users() {
    let (app, store) = test_app();
    store.insert_user(&User::new("user_plain", "Plain")).await.unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admin/webhook-events")
                .header(DEFAULT_SUBJECT_HEADER, "user_plain")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(response).await["code"], json!(403));
}

#[tokio::test]
async fn test_admin_reads_audit_log() {
    let (app, store) = test_app();
    let mut operator = User::new("user_ops", "Ops");
    operator.is_super_admin = Some(true);
    store.insert_user(&operator).await.unwrap();

    let event = json!({"type": "organization.created", "data": {"id": "org_1", "name": "Acme"}});
    let response = app.clone().oneshot(signed_request("msg_3", &event)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/admin/webhook-events/object/org_1?limit=5")
                .header(DEFAULT_SUBJECT_HEADER, "user_ops")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let events = json_body(response).await;
    assert_eq!(events.as_array().unwrap().len(), 1);
    assert_eq!(events[0]["status"], json!("processed"));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admin/webhook-events/type/user.created")
                .header(DEFAULT_SUBJECT_HEADER, "user_ops")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(json_body(response).await, json!([]));
}
