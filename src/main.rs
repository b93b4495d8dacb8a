use std::sync::Arc;

use tracing::info;

use buzon::{Config, SmtpMailer, WebServer};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };

    // Initialize logging
    if let Err(e) = buzon::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        buzon::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    info!("buzon - contact-form notification backend");
    info!(
        "API configured on {}:{}",
        config.web.host, config.web.port
    );

    let mailer = match SmtpMailer::from_config(&config.mail) {
        Ok(mailer) => Arc::new(mailer),
        Err(e) => {
            tracing::error!("Failed to configure mail transport: {e}");
            std::process::exit(1);
        }
    };

    let server = match WebServer::new(config, mailer) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to build server: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}
