//! # Slack Gateway Service
//!
//! Binary entry point hosting the example Slack app.
//!
//! This executable:
//! - Loads configuration from files and environment
//! - Initializes logging
//! - Registers the example handlers
//! - Starts the HTTP server from slack-gateway-api

mod handlers;

use anyhow::Context;
use slack_bot_sdk::webhook::HandlerRegistry;
use slack_gateway_api::{
    build_slack_app, start_server, ConfigError, LoggingConfig, ServiceConfig, ServiceError,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let loaded = ServiceConfig::load();
    init_logging(
        loaded
            .as_ref()
            .map(|config| &config.logging)
            .unwrap_or(&LoggingConfig::default()),
    );

    if let Err(e) = run(loaded).await {
        error!(error = %format!("{:#}", e), "Slack gateway service failed");
        std::process::exit(exit_code(&e));
    }
}

async fn run(loaded: Result<ServiceConfig, ConfigError>) -> anyhow::Result<()> {
    info!("Starting Slack Gateway Service");

    let config = loaded.context("Failed to load configuration")?;
    config
        .validate()
        .context("Service configuration is invalid")?;

    let mut registry = HandlerRegistry::new();
    handlers::register(&mut registry);

    let slack = build_slack_app(&config.slack, registry).context("Failed to build Slack app")?;

    info!(
        host = %config.server.host,
        port = config.server.port,
        prefix = %config.slack.path_prefix,
        "Starting HTTP server"
    );

    start_server(config, slack).await?;
    Ok(())
}

/// `RUST_LOG` wins over the configured level.
fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=debug", config.level)));

    let registry = tracing_subscriber::registry().with(filter);
    if config.json_format {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn exit_code(error: &anyhow::Error) -> i32 {
    if let Some(service_error) = error.downcast_ref::<ServiceError>() {
        return service_error.exit_code();
    }
    if error.downcast_ref::<ConfigError>().is_some() {
        return 3;
    }
    1
}
