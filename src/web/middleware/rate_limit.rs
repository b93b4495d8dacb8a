//! Rate-limit gate for the contact endpoint.

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::rate_limit::RateLimitService;
use crate::web::error::ApiError;

use super::identity::{resolve_identity, JwtState};

/// Shared state for the rate-limit gate.
#[derive(Clone)]
pub struct RateLimitGate {
    /// Quota service.
    pub service: Arc<RateLimitService>,
    /// Bearer-token verification for identity resolution.
    pub jwt: Arc<JwtState>,
}

/// Reject over-quota requests before the body is read or validated.
pub async fn contact_rate_limit(
    gate: RateLimitGate,
    req: Request<Body>,
    next: Next,
) -> Response {
    let identity = resolve_identity(&req, &gate.jwt);

    if !gate.service.allow(&identity) {
        tracing::warn!(identity = %identity, "contact rate limit exceeded");
        return ApiError::RateLimited.into_response();
    }

    next.run(req).await
}
