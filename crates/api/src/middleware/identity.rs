//! Caller identity middleware.
//!
//! Authentication (credential check, rate limiting, token issuance)
//! happens in the upstream gateway; by the time a request reaches this
//! engine its identity is resolved into headers. This middleware turns
//! those headers into a typed [`Caller`] for handlers to consume.

use axum::{
    Json,
    extract::{FromRequestParts, Request},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::str::FromStr;
use uuid::Uuid;

use karat_shared::{Caller, Role};

/// Header carrying the resolved caller's user ID.
pub const CALLER_ID_HEADER: &str = "x-caller-id";
/// Header carrying the resolved caller's display name.
pub const CALLER_NAME_HEADER: &str = "x-caller-name";
/// Header carrying the resolved caller's role.
pub const CALLER_ROLE_HEADER: &str = "x-caller-role";

/// Resolves the caller identity headers into a [`Caller`] extension.
///
/// Requests without a complete, valid identity get 401.
pub async fn identity_middleware(mut request: Request, next: Next) -> Response {
    let headers = request.headers();

    let id = headers
        .get(CALLER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value).ok());
    let name = headers
        .get(CALLER_NAME_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string);
    let role = headers
        .get(CALLER_ROLE_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Role::from_str(value).ok());

    let (Some(id), Some(name), Some(role)) = (id, name, role) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "missing_identity",
                "message": "Resolved caller identity headers are required"
            })),
        )
            .into_response();
    };

    request.extensions_mut().insert(Caller::new(id, name, role));
    next.run(request).await
}

/// Extractor for the resolved caller identity.
///
/// Use this in handlers to get the caller:
///
/// ```ignore
/// async fn handler(caller: CallerIdentity) -> impl IntoResponse {
///     let name = &caller.0.name;
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CallerIdentity(pub Caller);

impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Caller>()
            .cloned()
            .map(CallerIdentity)
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "error": "unauthorized",
                        "message": "Caller identity required"
                    })),
                )
            })
    }
}
