//! Webhook intake: verification, classification, lookup and dispatch.
//!
//! [`SlackApp`] is framework-agnostic. An HTTP layer converts each request into
//! a [`WebhookRequest`], calls [`SlackApp::receive`] with the route it arrived
//! on, and writes back the returned [`WebhookResponse`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use slack_bot_sdk::auth::{BotToken, SigningSecret, StaticCredentialResolver};
//! use slack_bot_sdk::client::{ClientConfig, HttpClientFactory};
//! use slack_bot_sdk::payloads::Route;
//! use slack_bot_sdk::webhook::{AppConfig, HandlerRegistry, SlackApp, WebhookRequest};
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::new(SigningSecret::new("signing-secret")?);
//! let credentials = Arc::new(StaticCredentialResolver::new(BotToken::new("xoxb-1")?));
//! let clients = Arc::new(HttpClientFactory::new(ClientConfig::default())?);
//!
//! let app = SlackApp::new(config, credentials, clients, HandlerRegistry::new());
//!
//! let request = WebhookRequest::new(HashMap::new(), bytes::Bytes::new());
//! let response = app.receive(Route::Commands, request).await;
//! assert_eq!(response.status_code(), 401);
//! # Ok(())
//! # }
//! ```

use bytes::Bytes;
use chrono::Duration;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use super::dispatch::{Dispatch, ErrorNotice, HANDLER_FAILURE_MESSAGE};
use super::registry::HandlerRegistry;
use super::validation::SignatureVerifier;
use crate::auth::{CredentialResolver, SigningSecret, TeamId};
use crate::client::{ClientFactory, SlackApi};
use crate::error::ClassifyError;
use crate::payloads::{
    classify, BlockActionPayload, Classified, CommandPayload, EventPayload, RequestKind, Route,
    ViewSubmissionPayload,
};

/// Default ephemeral text posted to a user whose request failed.
pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred";

const UNAUTHENTICATED: &str = "Unauthenticated";
const INVALID_COMMAND: &str = "Invalid command";
const INVALID_CALLBACK_ID: &str = "Invalid callback ID";

// ============================================================================
// Webhook Request/Response Types
// ============================================================================

/// Raw HTTP webhook request data.
///
/// Header names are lower-cased on construction.
///
/// # Examples
///
/// ```rust
/// use slack_bot_sdk::webhook::WebhookRequest;
/// use std::collections::HashMap;
///
/// let headers = HashMap::from([
///     ("X-Slack-Request-Timestamp".to_string(), "1531420618".to_string()),
/// ]);
/// let request = WebhookRequest::new(headers, b"payload=%7B%7D".to_vec().into());
///
/// assert_eq!(request.header("x-slack-request-timestamp"), Some("1531420618"));
/// assert_eq!(request.payload(), b"payload=%7B%7D");
/// ```
#[derive(Debug, Clone)]
pub struct WebhookRequest {
    headers: HashMap<String, String>,
    body: Bytes,
}

impl WebhookRequest {
    pub fn new(headers: HashMap<String, String>, body: Bytes) -> Self {
        let headers = headers
            .into_iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value))
            .collect();
        Self { headers, body }
    }

    /// Get a header by lower-case name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Get the raw payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.body
    }

    /// Get all headers.
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }
}

/// HTTP response for a webhook request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookResponse {
    /// 200 with no body.
    Empty,
    /// 200 with a JSON body.
    Json(Bytes),
    /// 200 with a plain-text body (URL verification challenge).
    PlainText(String),
    /// 401 `Unauthenticated`.
    Unauthorized,
    /// 400 with a fixed message.
    BadRequest { message: String },
    /// 500 with a fixed message.
    InternalError { message: String },
}

impl WebhookResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this response.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Empty | Self::Json(_) | Self::PlainText(_) => 200,
            Self::Unauthorized => 401,
            Self::BadRequest { .. } => 400,
            Self::InternalError { .. } => 500,
        }
    }

    /// `content-type` header value, if the response has a body.
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            Self::Empty => None,
            Self::Json(_) => Some("application/json"),
            Self::PlainText(_) => Some("text/plain"),
            Self::Unauthorized | Self::BadRequest { .. } | Self::InternalError { .. } => {
                Some("text/plain; charset=utf-8")
            }
        }
    }

    /// Response body bytes.
    pub fn body(&self) -> Bytes {
        match self {
            Self::Empty => Bytes::new(),
            Self::Json(body) => body.clone(),
            Self::PlainText(text) => Bytes::from(text.clone()),
            Self::Unauthorized => Bytes::from_static(UNAUTHENTICATED.as_bytes()),
            Self::BadRequest { message } | Self::InternalError { message } => {
                Bytes::from(message.clone())
            }
        }
    }

    /// Check if response indicates success.
    pub fn is_success(&self) -> bool {
        self.status_code() == 200
    }
}

impl From<&ClassifyError> for WebhookResponse {
    fn from(error: &ClassifyError) -> Self {
        let message = error.public_message();
        match error.status_code() {
            500 => Self::internal_error(message),
            _ => Self::bad_request(message),
        }
    }
}

// ============================================================================
// Application
// ============================================================================

/// Settings for a [`SlackApp`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub signing_secret: SigningSecret,
    /// Ephemeral text posted to the user when a handler fails.
    pub error_message: String,
    /// Replay window for request timestamps; disabled when `None`.
    pub max_request_age: Option<Duration>,
}

impl AppConfig {
    pub fn new(signing_secret: SigningSecret) -> Self {
        Self {
            signing_secret,
            error_message: DEFAULT_ERROR_MESSAGE.to_string(),
            max_request_age: None,
        }
    }

    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = message.into();
        self
    }

    pub fn with_max_request_age(mut self, max_age: Duration) -> Self {
        self.max_request_age = Some(max_age);
        self
    }
}

/// Verifies, classifies and dispatches Slack webhooks.
///
/// Immutable after construction; share it across requests as `Arc<SlackApp>`.
pub struct SlackApp {
    verifier: SignatureVerifier,
    registry: HandlerRegistry,
    credentials: Arc<dyn CredentialResolver>,
    clients: Arc<dyn ClientFactory>,
    error_message: Arc<str>,
}

impl SlackApp {
    pub fn new(
        config: AppConfig,
        credentials: Arc<dyn CredentialResolver>,
        clients: Arc<dyn ClientFactory>,
        registry: HandlerRegistry,
    ) -> Self {
        let mut verifier = SignatureVerifier::new(config.signing_secret);
        if let Some(max_age) = config.max_request_age {
            verifier = verifier.with_max_age(max_age);
        }

        info!(handlers = registry.len(), "Slack app initialised");

        Self {
            verifier,
            registry,
            credentials,
            clients,
            error_message: Arc::from(config.error_message),
        }
    }

    /// The handlers this app dispatches to.
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Process one webhook received on `route`.
    ///
    /// Resolves once the request is settled; a handler may still be running
    /// when this returns.
    #[instrument(skip_all, fields(route = %route))]
    pub async fn receive(&self, route: Route, request: WebhookRequest) -> WebhookResponse {
        if let Err(e) = self.verifier.verify_request(&request) {
            warn!(error = %e, "Rejected webhook with invalid signature");
            return WebhookResponse::Unauthorized;
        }

        let classified = match classify(route, request.payload()) {
            Ok(classified) => classified,
            Err(e) => {
                warn!(error = %e, "Could not classify webhook payload");
                return WebhookResponse::from(&e);
            }
        };

        match classified {
            Classified::Command(payload) => self.handle_command(payload).await,
            Classified::BlockActions(payload) => self.handle_block_actions(payload).await,
            Classified::ViewSubmission(payload) => self.handle_view_submission(payload).await,
            Classified::EventCallback(payload) => self.handle_event(payload).await,
            Classified::UrlVerification { challenge } => {
                info!("Answered URL verification challenge");
                WebhookResponse::PlainText(challenge)
            }
            Classified::AppRateLimited {
                minute_rate_limited,
            } => {
                warn!(minute_rate_limited, "Events API has been rate limited");
                WebhookResponse::Empty
            }
        }
    }

    async fn handle_command(&self, payload: CommandPayload) -> WebhookResponse {
        let Some(handler) = self.registry.command_handler(&payload.command) else {
            warn!(command = %payload.command, "No handler registered for command");
            return WebhookResponse::bad_request(INVALID_COMMAND);
        };

        let client = match self.client_for(&payload.team_id).await {
            Ok(client) => client,
            Err(response) => return response,
        };

        let notice = ErrorNotice::new(&payload.channel_id, &payload.user_id);
        self.dispatch(RequestKind::Command, payload.command.clone(), client, Some(notice))
            .run(handler, payload)
            .await
    }

    async fn handle_block_actions(&self, payload: BlockActionPayload) -> WebhookResponse {
        let action_id = payload.action_id().unwrap_or_default().to_string();
        let Some(handler) = self.registry.block_action_handler(&action_id) else {
            // Unknown action IDs are accepted silently.
            info!(action_id = %action_id, "No handler registered for block action");
            return WebhookResponse::Empty;
        };

        let client = match self.client_for(&payload.team.id).await {
            Ok(client) => client,
            Err(response) => return response,
        };

        let channel = payload
            .channel
            .as_ref()
            .map(|c| c.id.clone())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| payload.user.id.clone());
        let notice = ErrorNotice::new(channel, &payload.user.id);

        self.dispatch(RequestKind::BlockAction, action_id, client, Some(notice))
            .run(handler, payload)
            .await
    }

    async fn handle_view_submission(&self, payload: ViewSubmissionPayload) -> WebhookResponse {
        let callback_id = payload.view.callback_id.clone();
        let Some(handler) = self.registry.view_submission_handler(&callback_id) else {
            warn!(callback_id = %callback_id, "No handler registered for view submission");
            return WebhookResponse::internal_error(INVALID_CALLBACK_ID);
        };

        let client = match self.client_for(&payload.team.id).await {
            Ok(client) => client,
            Err(response) => return response,
        };

        // Modals have no channel; the notice goes to the user's DM.
        let notice = ErrorNotice::new(&payload.user.id, &payload.user.id);
        self.dispatch(RequestKind::ViewSubmission, callback_id, client, Some(notice))
            .run(handler, payload)
            .await
    }

    async fn handle_event(&self, payload: EventPayload) -> WebhookResponse {
        let event_type = payload.event_type().to_string();
        let Some(handler) = self.registry.event_handler(&event_type) else {
            warn!(event_type = %event_type, "No handler registered for event");
            return WebhookResponse::Empty;
        };

        let client = match self.client_for(&payload.team_id).await {
            Ok(client) => client,
            Err(response) => return response,
        };

        self.dispatch(RequestKind::Event, event_type, client, None)
            .run(handler, payload)
            .await
    }

    async fn client_for(&self, team_id: &str) -> Result<Arc<dyn SlackApi>, WebhookResponse> {
        let team_id = TeamId::new(team_id);
        match self.credentials.resolve(&team_id).await {
            Ok(token) => Ok(self.clients.client_for(token)),
            Err(e) => {
                error!(team_id = %team_id, error = %e, "Could not get bot token");
                Err(WebhookResponse::internal_error(HANDLER_FAILURE_MESSAGE))
            }
        }
    }

    fn dispatch(
        &self,
        kind: RequestKind,
        routing_key: String,
        client: Arc<dyn SlackApi>,
        notice: Option<ErrorNotice>,
    ) -> Dispatch {
        Dispatch {
            kind,
            routing_key,
            client,
            notice,
            error_message: self.error_message.clone(),
        }
    }
}

impl std::fmt::Debug for SlackApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackApp")
            .field("verifier", &self.verifier)
            .field("registry", &self.registry)
            .field("error_message", &self.error_message)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "receiver_tests.rs"]
mod tests;
