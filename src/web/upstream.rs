//! Forwarding to the admin application.
//!
//! The admin/auth application is externally owned. Everything under its
//! mount prefix is forwarded unmodified and the response relayed back;
//! its routes, auth, and storage are opaque to this service.

use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{HeaderName, Request};
use axum::response::{IntoResponse, Response};
use axum::Router;
use url::Url;

use crate::{BuzonError, Result};

use super::error::ApiError;

/// Request bodies above this size are rejected rather than buffered.
const MAX_FORWARD_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Upstream request timeout.
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// Headers that must not be forwarded in either direction.
fn is_hop_by_hop(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "connection"
            | "keep-alive"
            | "proxy-authenticate"
            | "proxy-authorization"
            | "te"
            | "trailer"
            | "transfer-encoding"
            | "upgrade"
            | "host"
            | "content-length"
    )
}

/// HTTP client for the mounted admin application.
#[derive(Clone)]
pub struct Upstream {
    base: Url,
    client: reqwest::Client,
}

impl Upstream {
    /// Create a client for the given base URL.
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| BuzonError::Config(format!("invalid upstream URL {base_url:?}: {e}")))?;
        let client = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| BuzonError::Config(format!("upstream client: {e}")))?;

        Ok(Self { base, client })
    }

    /// Forward one request and relay the upstream response.
    async fn forward(&self, req: Request<Body>) -> std::result::Result<Response, ApiError> {
        let (parts, body) = req.into_parts();
        let bytes = to_bytes(body, MAX_FORWARD_BODY_BYTES)
            .await
            .map_err(|_| ApiError::Malformed("request body too large".to_string()))?;

        let mut url = self.base.clone();
        let prefix = self.base.path().trim_end_matches('/');
        url.set_path(&format!("{}{}", prefix, parts.uri.path()));
        url.set_query(parts.uri.query());

        let mut builder = self.client.request(parts.method, url);
        for (name, value) in parts.headers.iter() {
            if !is_hop_by_hop(name) {
                builder = builder.header(name, value);
            }
        }

        let upstream_response = builder
            .body(bytes)
            .send()
            .await
            .map_err(|e| ApiError::Upstream(e.to_string()))?;

        let status = upstream_response.status();
        let headers = upstream_response.headers().clone();
        let body_bytes = upstream_response
            .bytes()
            .await
            .map_err(|e| ApiError::Upstream(e.to_string()))?;

        let mut response = Response::builder().status(status);
        for (name, value) in headers.iter() {
            if !is_hop_by_hop(name) {
                response = response.header(name, value);
            }
        }
        response
            .body(Body::from(body_bytes))
            .map_err(|e| ApiError::Upstream(e.to_string()))
    }
}

/// Router that forwards everything to the upstream application.
pub fn create_upstream_router(upstream: Upstream) -> Router {
    Router::new().fallback(move |req: Request<Body>| {
        let upstream = upstream.clone();
        async move {
            match upstream.forward(req).await {
                Ok(response) => response,
                Err(e) => e.into_response(),
            }
        }
    })
}
