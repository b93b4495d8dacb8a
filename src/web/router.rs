//! Router configuration for the contact API.

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::WebConfig;
use crate::rate_limit::RateLimitService;

use super::handlers::{submit_contact, AppState};
use super::middleware::{
    contact_rate_limit, create_cors_layer, security_headers, JwtState, RateLimitGate,
};
use super::upstream::{create_upstream_router, Upstream};

/// Create the main API router.
pub fn create_router(
    app_state: Arc<AppState>,
    rate_limit: Arc<RateLimitService>,
    jwt_state: Arc<JwtState>,
    config: &WebConfig,
) -> Router {
    let gate = RateLimitGate {
        service: rate_limit,
        jwt: jwt_state,
    };

    // The gate is a route layer so over-quota requests are rejected
    // before the body is parsed or validated.
    let contact_routes = Router::new()
        .route("/contact/", post(submit_contact))
        .route_layer(middleware::from_fn(move |req, next| {
            let gate = gate.clone();
            contact_rate_limit(gate, req, next)
        }));

    Router::new()
        .merge(contact_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(&config.cors_origins))
                .layer(middleware::from_fn(security_headers)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

/// Create a static assets router, if the directory exists.
pub fn create_static_router(path: &str) -> Option<Router> {
    if !std::path::Path::new(path).is_dir() {
        tracing::warn!(path, "static directory missing, not serving static files");
        return None;
    }
    Some(Router::new().nest_service("/static", ServeDir::new(path)))
}

/// Create the router forwarding to the admin application, if configured.
pub fn create_admin_router(config: &WebConfig) -> Option<Router> {
    if config.upstream_url.is_empty() {
        return None;
    }

    match Upstream::new(&config.upstream_url) {
        Ok(upstream) => Some(
            Router::new().nest(&config.upstream_mount, create_upstream_router(upstream)),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "admin application mount disabled");
            None
        }
    }
}
