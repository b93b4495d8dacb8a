//! Web server for the contact backend.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::contact::{self, ContactService};
use crate::mail::Mailer;
use crate::rate_limit::RateLimitService;
use crate::{BuzonError, Result};

use super::handlers::AppState;
use super::middleware::JwtState;
use super::router::{
    create_admin_router, create_health_router, create_router, create_static_router,
};

/// Web server hosting the contact API and its composed surfaces.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Rate limit service.
    rate_limit: Arc<RateLimitService>,
    /// Bearer-token verification state.
    jwt_state: Arc<JwtState>,
    /// Full configuration.
    config: Config,
}

impl WebServer {
    /// Wire the server from configuration and a mail transport.
    pub fn new(config: Config, mailer: Arc<dyn Mailer>) -> Result<Self> {
        let addr = format!("{}:{}", config.web.host, config.web.port)
            .parse()
            .map_err(|_| {
                BuzonError::Config(format!(
                    "invalid bind address {}:{}",
                    config.web.host, config.web.port
                ))
            })?;

        let templates = Arc::new(contact::load_templates(&config.templates.path));
        let contact_service =
            ContactService::new(mailer, templates, config.mail.admin_address.clone());

        let rate_limit = Arc::new(RateLimitService::new(config.contact.rate_limit_per_minute));
        let jwt_state = Arc::new(JwtState::new(&config.web.jwt_secret));

        Ok(Self {
            addr,
            app_state: Arc::new(AppState {
                contact: Arc::new(contact_service),
            }),
            rate_limit,
            jwt_state,
            config,
        })
    }

    /// Get the configured server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Assemble the full router.
    fn build_router(&self) -> Router {
        let mut router = create_router(
            self.app_state.clone(),
            self.rate_limit.clone(),
            self.jwt_state.clone(),
            &self.config.web,
        )
        .merge(create_health_router());

        if self.config.web.serve_static {
            if let Some(static_router) = create_static_router(&self.config.web.static_path) {
                router = router.merge(static_router);
            }
        }

        if let Some(admin_router) = create_admin_router(&self.config.web) {
            router = router.merge(admin_router);
        }

        router
    }

    /// Run the web server.
    pub async fn run(self) -> Result<()> {
        let router = self.build_router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        // Start the bucket cleanup task after successful bind
        self.rate_limit.clone().start_cleanup_task();

        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await?;

        Ok(())
    }

    /// Run the server in the background and return the bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let router = self.build_router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        self.rate_limit.clone().start_cleanup_task();

        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::{OutgoingEmail, SendError};
    use async_trait::async_trait;

    struct NullMailer;

    #[async_trait]
    impl Mailer for NullMailer {
        async fn send(&self, _email: &OutgoingEmail) -> std::result::Result<(), SendError> {
            Ok(())
        }
    }

    fn create_test_config() -> Config {
        let mut config = Config::default();
        config.web.host = "127.0.0.1".to_string();
        config.web.port = 0; // Use random port
        config.mail.from_address = "noreply@example.com".to_string();
        config.mail.admin_address = "admin@example.com".to_string();
        config
    }

    #[tokio::test]
    async fn test_web_server_new() {
        let server = WebServer::new(create_test_config(), Arc::new(NullMailer)).unwrap();
        assert_eq!(server.addr().ip().to_string(), "127.0.0.1");
    }

    #[tokio::test]
    async fn test_web_server_health() {
        let server = WebServer::new(create_test_config(), Arc::new(NullMailer)).unwrap();
        let addr = server.run_with_addr().await.unwrap();

        let client = reqwest::Client::new();
        let resp = client
            .get(format!("http://{}/health", addr))
            .send()
            .await
            .unwrap();

        assert!(resp.status().is_success());
        assert_eq!(resp.text().await.unwrap(), "OK");
    }

    #[tokio::test]
    async fn test_web_server_rejects_bad_bind_address() {
        let mut config = create_test_config();
        config.web.host = "not an address".to_string();

        assert!(WebServer::new(config, Arc::new(NullMailer)).is_err());
    }
}
