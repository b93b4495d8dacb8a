//! buzon - contact-form notification backend
//!
//! Accepts contact-form submissions over HTTP, validates them, and
//! dispatches an administrator notice plus a sender confirmation over
//! SMTP, with per-identity rate limiting and CORS at the edge.

pub mod config;
pub mod contact;
pub mod error;
pub mod logging;
pub mod mail;
pub mod rate_limit;
pub mod template;
pub mod web;

pub use config::Config;
pub use contact::{ContactService, ContactSubmission};
pub use error::{BuzonError, Result};
pub use mail::{Mailer, OutgoingEmail, SendError, SmtpMailer};
pub use rate_limit::{Identity, RateLimitService};
pub use template::TemplateEngine;
pub use web::WebServer;
