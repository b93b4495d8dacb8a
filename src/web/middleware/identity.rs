//! Request identity resolution.
//!
//! The rate limiter keys on who is calling: requests carrying a valid
//! bearer token issued by the admin application are tracked by user id,
//! everyone else by remote address. Resolution happens once per request
//! in the rate-limit gate.

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::header::AUTHORIZATION;
use axum::http::Request;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::rate_limit::Identity;

/// Claims carried by tokens the admin application issues.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user id).
    pub sub: i64,
    /// Issued-at timestamp.
    pub iat: u64,
    /// Expiration timestamp.
    pub exp: u64,
}

/// Decoding state for bearer-token verification.
#[derive(Clone)]
pub struct JwtState {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtState {
    /// Create a new JWT state from a secret key.
    pub fn new(secret: &str) -> Self {
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());
        let mut validation = Validation::default();
        validation.validate_exp = true;

        Self {
            decoding_key,
            validation,
        }
    }

    /// Decode a bearer token into claims, if valid.
    pub fn decode(&self, token: &str) -> Option<JwtClaims> {
        decode::<JwtClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .ok()
    }
}

/// Extract the client address from a request.
///
/// Prefers the first hop of `X-Forwarded-For` (reverse proxy), then
/// `X-Real-IP`, then the socket peer address.
pub fn client_addr(req: &Request<Body>) -> String {
    if let Some(forwarded) = req
        .headers()
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(ip) = forwarded.split(',').next() {
            let ip = ip.trim();
            if !ip.is_empty() {
                return ip.to_string();
            }
        }
    }

    if let Some(real_ip) = req
        .headers()
        .get("X-Real-IP")
        .and_then(|v| v.to_str().ok())
    {
        return real_ip.to_string();
    }

    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    "unknown".to_string()
}

/// Resolve the request identity for the rate-limit gate.
pub fn resolve_identity(req: &Request<Body>, jwt: &JwtState) -> Identity {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "));

    if let Some(token) = token {
        if let Some(claims) = jwt.decode(token) {
            return Identity::User(claims.sub);
        }
    }

    Identity::Anonymous(client_addr(req))
}
