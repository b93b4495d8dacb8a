//! Outbound email.
//!
//! [`Mailer`] is the seam between notification dispatch and the wire:
//! production code sends through [`SmtpMailer`], tests substitute
//! recording or failing implementations. One message is either plain
//! text or HTML, never both.

mod smtp;

pub use smtp::{SmtpMailer, SmtpSecurity};

use async_trait::async_trait;
use thiserror::Error;

/// Error raised while sending a single email.
#[derive(Error, Debug)]
pub enum SendError {
    /// The message had no recipients.
    #[error("no recipients")]
    NoRecipients,

    /// An address could not be parsed.
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    /// The message could not be assembled.
    #[error("failed to build message: {0}")]
    Build(String),

    /// The transport reported a failure.
    #[error("{0}")]
    Smtp(String),
}

/// One outbound email payload.
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    /// Subject line.
    pub subject: String,
    /// Body, plain text or HTML depending on `html`.
    pub body: String,
    /// Recipient addresses. Must be non-empty.
    pub recipients: Vec<String>,
    /// Whether the body is HTML.
    pub html: bool,
}

impl OutgoingEmail {
    /// Create a plain-text email.
    pub fn text(
        subject: impl Into<String>,
        body: impl Into<String>,
        recipients: Vec<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            recipients,
            html: false,
        }
    }

    /// Create an HTML email.
    pub fn html(
        subject: impl Into<String>,
        body: impl Into<String>,
        recipients: Vec<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            recipients,
            html: true,
        }
    }
}

/// Email transport seam.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send a single email.
    ///
    /// One attempt only; retries are the caller's concern. Transport
    /// failures are propagated, never swallowed.
    async fn send(&self, email: &OutgoingEmail) -> Result<(), SendError>;
}
