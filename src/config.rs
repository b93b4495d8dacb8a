//! Configuration module for buzon.

use serde::Deserialize;
use std::path::Path;

use crate::{BuzonError, Result};

/// Mail transport configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    /// SMTP relay hostname.
    #[serde(default = "default_mail_host")]
    pub host: String,
    /// SMTP relay port.
    #[serde(default = "default_mail_port")]
    pub port: u16,
    /// Username for SMTP authentication (empty = no authentication).
    #[serde(default)]
    pub username: String,
    /// Password for SMTP authentication.
    #[serde(default)]
    pub password: String,
    /// Connection security: "starttls", "tls" or "none".
    #[serde(default = "default_mail_security")]
    pub security: String,
    /// Sender address placed in the From header.
    #[serde(default)]
    pub from_address: String,
    /// Recipient of the administrator notice.
    #[serde(default)]
    pub admin_address: String,
    /// Transport timeout in seconds.
    #[serde(default = "default_mail_timeout")]
    pub timeout_secs: u64,
}

fn default_mail_host() -> String {
    "localhost".to_string()
}

fn default_mail_port() -> u16 {
    587
}

fn default_mail_security() -> String {
    "starttls".to_string()
}

fn default_mail_timeout() -> u64 {
    30
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            host: default_mail_host(),
            port: default_mail_port(),
            username: String::new(),
            password: String::new(),
            security: default_mail_security(),
            from_address: String::new(),
            admin_address: String::new(),
            timeout_secs: default_mail_timeout(),
        }
    }
}

/// Contact endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ContactConfig {
    /// Accepted submissions per identity per rolling minute.
    #[serde(default = "default_contact_rate_limit")]
    pub rate_limit_per_minute: u32,
}

fn default_contact_rate_limit() -> u32 {
    1
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            rate_limit_per_minute: default_contact_rate_limit(),
        }
    }
}

/// Templates configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplatesConfig {
    /// Path to the templates directory.
    #[serde(default = "default_templates_path")]
    pub path: String,
}

fn default_templates_path() -> String {
    "templates".to_string()
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            path: default_templates_path(),
        }
    }
}

/// Web server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Host address to bind.
    #[serde(default = "default_web_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// CORS allowed origins (empty = permissive development mode).
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Secret for verifying bearer tokens issued by the admin application.
    /// Requests without a valid token are rate limited by remote address.
    #[serde(default)]
    pub jwt_secret: String,
    /// Whether to serve static files.
    #[serde(default)]
    pub serve_static: bool,
    /// Path to the static files directory.
    #[serde(default = "default_static_path")]
    pub static_path: String,
    /// Base URL of the admin application (empty = not mounted).
    #[serde(default)]
    pub upstream_url: String,
    /// Path prefix the admin application is mounted under.
    #[serde(default = "default_upstream_mount")]
    pub upstream_mount: String,
}

fn default_web_host() -> String {
    "0.0.0.0".to_string()
}

fn default_web_port() -> u16 {
    8000
}

fn default_static_path() -> String {
    "staticfiles".to_string()
}

fn default_upstream_mount() -> String {
    "/web".to_string()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_web_host(),
            port: default_web_port(),
            cors_origins: vec![],
            jwt_secret: String::new(),
            serve_static: false,
            static_path: default_static_path(),
            upstream_url: String::new(),
            upstream_mount: default_upstream_mount(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/buzon.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Mail transport configuration.
    #[serde(default)]
    pub mail: MailConfig,
    /// Contact endpoint configuration.
    #[serde(default)]
    pub contact: ContactConfig,
    /// Templates configuration.
    #[serde(default)]
    pub templates: TemplatesConfig,
    /// Web server configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(BuzonError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| BuzonError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `BUZON_SMTP_PASSWORD`: Override the SMTP password
    /// - `BUZON_JWT_SECRET`: Override the bearer-token secret
    pub fn apply_env_overrides(&mut self) {
        if let Ok(password) = std::env::var("BUZON_SMTP_PASSWORD") {
            if !password.is_empty() {
                self.mail.password = password;
            }
        }
        if let Ok(secret) = std::env::var("BUZON_JWT_SECRET") {
            if !secret.is_empty() {
                self.web.jwt_secret = secret;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if the mail section is incomplete or the web
    /// section references unparseable URLs.
    pub fn validate(&self) -> Result<()> {
        if self.mail.from_address.is_empty() {
            return Err(BuzonError::Config(
                "mail.from_address is not set".to_string(),
            ));
        }
        if self.mail.admin_address.is_empty() {
            return Err(BuzonError::Config(
                "mail.admin_address is not set".to_string(),
            ));
        }
        if crate::mail::SmtpSecurity::parse(&self.mail.security).is_none() {
            return Err(BuzonError::Config(format!(
                "mail.security must be one of starttls, tls, none (got {:?})",
                self.mail.security
            )));
        }
        if !self.web.upstream_url.is_empty() {
            let upstream = url::Url::parse(&self.web.upstream_url).map_err(|e| {
                BuzonError::Config(format!("web.upstream_url is not a valid URL: {e}"))
            })?;
            if !matches!(upstream.scheme(), "http" | "https") {
                return Err(BuzonError::Config(format!(
                    "web.upstream_url must be http or https (got {:?})",
                    upstream.scheme()
                )));
            }
            if !self.web.upstream_mount.starts_with('/') {
                return Err(BuzonError::Config(
                    "web.upstream_mount must start with '/'".to_string(),
                ));
            }
        }
        for origin in &self.web.cors_origins {
            let parsed = url::Url::parse(origin).map_err(|e| {
                BuzonError::Config(format!("invalid CORS origin {origin:?}: {e}"))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(BuzonError::Config(format!(
                    "invalid CORS origin {origin:?}: must be http or https"
                )));
            }
        }
        Ok(())
    }
}
