//! Shared helpers for web API tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_test::TestServer;

use buzon::config::WebConfig;
use buzon::contact::{ContactService, CONFIRMATION_TEMPLATE, DEFAULT_CONFIRMATION_TEMPLATE};
use buzon::mail::{Mailer, OutgoingEmail, SendError};
use buzon::rate_limit::RateLimitService;
use buzon::template::TemplateEngine;
use buzon::web::handlers::AppState;
use buzon::web::middleware::JwtState;
use buzon::web::router::create_router;

/// Secret used to mint bearer tokens in tests.
pub const TEST_JWT_SECRET: &str = "test-secret-key-for-testing-only";

/// Administrator recipient used in tests.
pub const TEST_ADMIN_ADDRESS: &str = "admin@example.com";

/// Mailer that records every send.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<OutgoingEmail>>,
}

impl RecordingMailer {
    /// Number of emails sent so far.
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), SendError> {
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

/// Mailer that fails every send with a fixed transport message.
pub struct FailingMailer(pub String);

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _email: &OutgoingEmail) -> Result<(), SendError> {
        Err(SendError::Smtp(self.0.clone()))
    }
}

/// Build a test server around the given mailer with a per-minute quota.
pub fn create_test_server(mailer: Arc<dyn Mailer>, rate_limit_per_minute: u32) -> TestServer {
    create_test_server_with_config(mailer, rate_limit_per_minute, WebConfig::default())
}

/// Build a test server with full control over the web configuration.
pub fn create_test_server_with_config(
    mailer: Arc<dyn Mailer>,
    rate_limit_per_minute: u32,
    web_config: WebConfig,
) -> TestServer {
    let mut engine = TemplateEngine::new();
    engine
        .load(CONFIRMATION_TEMPLATE, DEFAULT_CONFIRMATION_TEMPLATE)
        .expect("built-in template must parse");

    let contact = ContactService::new(mailer, Arc::new(engine), TEST_ADMIN_ADDRESS.to_string());

    let app_state = Arc::new(AppState {
        contact: Arc::new(contact),
    });
    let rate_limit = Arc::new(RateLimitService::new(rate_limit_per_minute));
    let jwt_state = Arc::new(JwtState::new(TEST_JWT_SECRET));

    let router = create_router(app_state, rate_limit, jwt_state, &web_config);
    TestServer::new(router).expect("Failed to create test server")
}
