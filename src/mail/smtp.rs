//! SMTP transport backed by lettre.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::MailConfig;

use super::{Mailer, OutgoingEmail, SendError};

/// Connection security for the SMTP session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpSecurity {
    /// Plain connection upgraded with STARTTLS.
    Starttls,
    /// Implicit TLS from the first byte.
    Tls,
    /// No transport security. Local relays only.
    None,
}

impl SmtpSecurity {
    /// Parse a configuration string into a security mode.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "starttls" => Some(Self::Starttls),
            "tls" => Some(Self::Tls),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

/// Mailer that delivers through a single SMTP relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build a mailer from the `[mail]` configuration section.
    pub fn from_config(config: &MailConfig) -> Result<Self, SendError> {
        let security = SmtpSecurity::parse(&config.security).ok_or_else(|| {
            SendError::Build(format!("unknown security mode: {}", config.security))
        })?;
        let from: Mailbox = config
            .from_address
            .parse()
            .map_err(|_| SendError::InvalidAddress(config.from_address.clone()))?;

        let mut builder = match security {
            SmtpSecurity::Starttls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                    .map_err(|e| SendError::Smtp(e.to_string()))?
            }
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| SendError::Smtp(e.to_string()))?,
            SmtpSecurity::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            }
        };

        builder = builder
            .port(config.port)
            .timeout(Some(Duration::from_secs(config.timeout_secs)));

        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), SendError> {
        if email.recipients.is_empty() {
            return Err(SendError::NoRecipients);
        }

        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(email.subject.as_str());
        for recipient in &email.recipients {
            let to: Mailbox = recipient
                .parse()
                .map_err(|_| SendError::InvalidAddress(recipient.clone()))?;
            builder = builder.to(to);
        }

        let content_type = if email.html {
            ContentType::TEXT_HTML
        } else {
            ContentType::TEXT_PLAIN
        };
        let message = builder
            .header(content_type)
            .body(email.body.clone())
            .map_err(|e| SendError::Build(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| SendError::Smtp(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> MailConfig {
        MailConfig {
            host: "localhost".to_string(),
            port: 2525,
            username: String::new(),
            password: String::new(),
            security: "none".to_string(),
            from_address: "noreply@example.com".to_string(),
            admin_address: "admin@example.com".to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_security_parse() {
        assert_eq!(SmtpSecurity::parse("starttls"), Some(SmtpSecurity::Starttls));
        assert_eq!(SmtpSecurity::parse("TLS"), Some(SmtpSecurity::Tls));
        assert_eq!(SmtpSecurity::parse("none"), Some(SmtpSecurity::None));
        assert_eq!(SmtpSecurity::parse("ssl3"), None);
        assert_eq!(SmtpSecurity::parse(""), None);
    }

    #[test]
    fn test_from_config_ok() {
        assert!(SmtpMailer::from_config(&test_config()).is_ok());
    }

    #[test]
    fn test_from_config_bad_security() {
        let mut config = test_config();
        config.security = "ssl3".to_string();

        let result = SmtpMailer::from_config(&config);
        assert!(matches!(result, Err(SendError::Build(_))));
    }

    #[test]
    fn test_from_config_bad_from_address() {
        let mut config = test_config();
        config.from_address = "not an address".to_string();

        let result = SmtpMailer::from_config(&config);
        assert!(matches!(result, Err(SendError::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn test_send_requires_recipients() {
        let mailer = SmtpMailer::from_config(&test_config()).unwrap();
        let email = OutgoingEmail::text("S", "B", vec![]);

        let result = mailer.send(&email).await;
        assert!(matches!(result, Err(SendError::NoRecipients)));
    }

    #[tokio::test]
    async fn test_send_rejects_bad_recipient() {
        let mailer = SmtpMailer::from_config(&test_config()).unwrap();
        let email = OutgoingEmail::text("S", "B", vec!["not an address".to_string()]);

        let result = mailer.send(&email).await;
        assert!(matches!(result, Err(SendError::InvalidAddress(_))));
    }
}
