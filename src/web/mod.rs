//! Web API module for buzon.
//!
//! Hosts the contact endpoint alongside the forwarded admin application,
//! static assets, and a health check behind one HTTP listener, with rate
//! limiting and CORS applied at the edge.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;
pub mod upstream;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
