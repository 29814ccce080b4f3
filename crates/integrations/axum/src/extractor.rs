//! Caller identity extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use clerk_mirror_core::Identity;

/// Extractor for an authenticated caller.
///
/// Rejects the request with 401 Unauthorized when [`IdentityLayer`](crate::IdentityLayer)
/// found no identity.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(CallerIdentity(identity): CallerIdentity) -> String {
///     format!("Hello, {}!", identity.subject)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CallerIdentity(pub Identity);

/// Error returned when no identity is present.
#[derive(Debug)]
pub struct IdentityRejection;

impl IntoResponse for IdentityRejection {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": "Not authenticated",
            "code": 401
        });
        (StatusCode::UNAUTHORIZED, axum::Json(body)).into_response()
    }
}

impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = IdentityRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(CallerIdentity)
            .ok_or(IdentityRejection)
    }
}

/// Extractor for an optional caller; never rejects.
#[derive(Debug, Clone)]
pub struct OptionalCallerIdentity(pub Option<Identity>);

impl<S> FromRequestParts<S> for OptionalCallerIdentity
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalCallerIdentity(parts.extensions.get::<Identity>().cloned()))
    }
}
