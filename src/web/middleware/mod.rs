//! Middleware for the contact API.

pub mod cors;
pub mod identity;
pub mod rate_limit;
pub mod security;

pub use cors::create_cors_layer;
pub use identity::{client_addr, resolve_identity, JwtClaims, JwtState};
pub use rate_limit::{contact_rate_limit, RateLimitGate};
pub use security::security_headers;
