//! # Slack Gateway HTTP Service
//!
//! HTTP server exposing a Slack app's webhook surfaces.
//!
//! This service provides:
//! - `POST {prefix}/commands` for slash commands
//! - `POST {prefix}/interactions` for block actions and view submissions
//! - `POST {prefix}/events` for Events API deliveries
//! - `GET /health` and `GET /metrics`
//!
//! Request handling itself lives in [`slack_bot_sdk::SlackApp`]; this crate
//! adapts axum requests to it and adds logging, metrics and configuration.

pub mod config;
pub mod errors;
pub mod metrics;
pub mod responses;

pub use config::{LoggingConfig, ServerConfig, ServiceConfig, SlackConfig};
pub use errors::{ConfigError, ServiceError};
pub use metrics::ServiceMetrics;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, StatusCode},
    middleware,
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use responses::{into_http_response, HealthResponse};
use slack_bot_sdk::client::HttpClientFactory;
use slack_bot_sdk::payloads::Route;
use slack_bot_sdk::webhook::{HandlerRegistry, SlackApp, WebhookRequest};
use std::collections::HashMap;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument, warn};

const CORRELATION_ID_HEADER: &str = "x-correlation-id";

// ============================================================================
// Application State
// ============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Configuration for the service
    pub config: Arc<ServiceConfig>,

    /// Verifies and dispatches Slack webhooks
    pub slack: Arc<SlackApp>,

    /// Metrics collector for observability
    pub metrics: Arc<ServiceMetrics>,
}

impl AppState {
    pub fn new(config: ServiceConfig, slack: SlackApp, metrics: Arc<ServiceMetrics>) -> Self {
        Self {
            config: Arc::new(config),
            slack: Arc::new(slack),
            metrics,
        }
    }
}

/// Build the Slack app described by `config` around `registry`.
///
/// Every workspace is served with the configured bot token.
pub fn build_slack_app(
    config: &SlackConfig,
    registry: HandlerRegistry,
) -> Result<SlackApp, ServiceError> {
    let app_config = config.app_config()?;
    let credentials = Arc::new(config.credential_resolver()?);
    let clients = HttpClientFactory::new(config.client_config()).map_err(|e| {
        ConfigError::Invalid {
            message: format!("Failed to build Slack API client: {}", e),
        }
    })?;

    Ok(SlackApp::new(
        app_config,
        credentials,
        Arc::new(clients),
        registry,
    ))
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    let prefix = state.config.slack.path_prefix.clone();

    let slack_routes = Router::new()
        .route(&format!("{}/commands", prefix), post(handle_commands))
        .route(&format!("{}/interactions", prefix), post(handle_interactions))
        .route(&format!("{}/events", prefix), post(handle_events))
        .layer(DefaultBodyLimit::max(state.config.server.max_body_size));

    let observability_routes = Router::new()
        .route("/health", get(handle_health_check))
        .route("/metrics", get(metrics_endpoint));

    Router::new()
        .merge(slack_routes)
        .merge(observability_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_logging_middleware))
                .into_inner(),
        )
        .with_state(state)
}

/// Start HTTP server
pub async fn start_server(config: ServiceConfig, slack: SlackApp) -> Result<(), ServiceError> {
    let metrics = ServiceMetrics::new().map_err(|e| {
        ServiceError::Configuration(ConfigError::Invalid {
            message: format!("Failed to initialize metrics: {}", e),
        })
    })?;

    let address = format!("{}:{}", config.server.host, config.server.port);
    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_seconds);

    let app = create_router(AppState::new(config, slack, metrics));

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| ServiceError::BindFailed {
            address: address.clone(),
            message: e.to_string(),
        })?;

    info!(address = %address, "Starting HTTP server");

    // In-flight requests get `shutdown_timeout` to finish once a signal arrives.
    let (signalled_tx, mut signalled_rx) = tokio::sync::watch::channel(false);
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        info!(
            timeout_seconds = shutdown_timeout.as_secs(),
            "Initiating graceful shutdown"
        );
        let _ = signalled_tx.send(true);
    });

    let drain_deadline = async move {
        if signalled_rx.wait_for(|signalled| *signalled).await.is_ok() {
            tokio::time::sleep(shutdown_timeout).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = server.into_future() => {
            result.map_err(|e| ServiceError::ServerFailed {
                message: e.to_string(),
            })?;
        }
        _ = drain_deadline => {
            warn!("Graceful shutdown timed out; abandoning in-flight requests");
        }
    }

    info!("HTTP server shutdown complete");
    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C signal handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT (Ctrl+C)"),
        _ = terminate => info!("Received SIGTERM"),
    }
}

// ============================================================================
// Webhook Handlers
// ============================================================================

async fn handle_commands(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    handle_slack_webhook(&state, Route::Commands, &headers, body).await
}

async fn handle_interactions(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    handle_slack_webhook(&state, Route::Interactions, &headers, body).await
}

async fn handle_events(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    handle_slack_webhook(&state, Route::Events, &headers, body).await
}

/// Hand one webhook to the Slack app and record how it went.
///
/// Returns as soon as the handler settles the request; the handler task may
/// outlive the response.
#[instrument(skip_all, fields(route = %route, body_size = body.len()))]
async fn handle_slack_webhook(
    state: &AppState,
    route: Route,
    headers: &HeaderMap,
    body: Bytes,
) -> Response {
    let start = Instant::now();

    let request = WebhookRequest::new(header_map(headers), body);
    let response = state.slack.receive(route, request).await;

    state
        .metrics
        .record_webhook_request(route, response.status_code(), start.elapsed());

    into_http_response(response)
}

/// Headers with non-UTF-8 values are dropped.
fn header_map(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect()
}

// ============================================================================
// Health and Metrics
// ============================================================================

async fn handle_health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Prometheus metrics endpoint
async fn metrics_endpoint(State(state): State<AppState>) -> Result<String, StatusCode> {
    state.metrics.render().map_err(|e| {
        error!(error = %e, "Failed to encode metrics");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

// ============================================================================
// Middleware
// ============================================================================

/// Request logging middleware
///
/// Reuses the caller's `x-correlation-id` or assigns a new one, echoes it on
/// the response and logs completion at a level matching the status class.
#[instrument(skip(request, next), fields(
    method = %request.method(),
    uri = %request.uri(),
    correlation_id
))]
async fn request_logging_middleware(
    mut request: axum::extract::Request,
    next: axum::middleware::Next,
) -> Response {
    let start = Instant::now();

    let correlation_id = request
        .headers()
        .get(CORRELATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    tracing::Span::current().record("correlation_id", correlation_id.as_str());
    request.extensions_mut().insert(correlation_id.clone());

    let mut response = next.run(request).await;
    let duration_ms = start.elapsed().as_millis();

    if let Ok(header_value) = correlation_id.parse() {
        response
            .headers_mut()
            .insert(CORRELATION_ID_HEADER, header_value);
    }

    let status = response.status();
    if status.is_server_error() {
        error!(status = %status, duration_ms = %duration_ms, "Request completed with server error");
    } else if status.is_client_error() {
        warn!(status = %status, duration_ms = %duration_ms, "Request completed with client error");
    } else {
        info!(status = %status, duration_ms = %duration_ms, "Request completed successfully");
    }

    response
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
