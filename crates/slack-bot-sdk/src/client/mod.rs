//! Outbound Slack Web API client handed to handlers.
//!
//! The webhook core treats outbound calls as an opaque capability: it only
//! needs [`ClientFactory`] to bind a client to the resolved [`BotToken`], and
//! [`SlackApi::post_ephemeral`] for the best-effort error notice sent when a
//! handler fails. Everything else is for handlers.
//!
//! [`HttpSlackClient`] is the `reqwest` implementation. Every Web API method is
//! a JSON `POST` to `{api_base_url}/{method}` authenticated with the bot token;
//! Slack reports method failures as HTTP 200 with `"ok": false`.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use crate::auth::BotToken;
use crate::error::ApiError;

/// Default rate-limit back-off when `Retry-After` is missing or malformed.
const DEFAULT_RETRY_AFTER_SECONDS: u64 = 60;

/// Configuration for Slack API client behavior.
///
/// # Examples
///
/// ```
/// use slack_bot_sdk::client::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_timeout(Duration::from_secs(10))
///     .with_api_base_url("http://localhost:9999/api");
/// assert_eq!(config.api_base_url, "http://localhost:9999/api");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Slack Web API base URL
    pub api_base_url: String,
    /// Request timeout duration
    pub timeout: Duration,
    /// User agent string for API requests
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://slack.com/api".to_string(),
            timeout: Duration::from_secs(30),
            user_agent: concat!("slack-bot-sdk/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Set the Web API base URL.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Reference to a posted message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessageRef {
    pub channel: String,
    pub ts: String,
}

/// Slack Web API operations available to handlers.
///
/// Implementors only need [`SlackApi::call`]; the convenience methods are
/// built on it.
#[async_trait]
pub trait SlackApi: Send + Sync {
    /// Invoke a Web API method with a JSON body and return the JSON response.
    async fn call(&self, method: &str, body: Value) -> Result<Value, ApiError>;

    /// Post a message only `user` can see in `channel`.
    async fn post_ephemeral(&self, channel: &str, user: &str, text: &str) -> Result<(), ApiError> {
        self.call(
            "chat.postEphemeral",
            json!({ "channel": channel, "user": user, "text": text }),
        )
        .await?;
        Ok(())
    }

    /// Post a message to a conversation.
    async fn post_message(&self, channel: &str, text: &str) -> Result<MessageRef, ApiError> {
        let response = self
            .call("chat.postMessage", json!({ "channel": channel, "text": text }))
            .await?;
        Ok(serde_json::from_value(response)?)
    }

    /// Open a modal view for an interaction's trigger ID.
    async fn open_view(&self, trigger_id: &str, view: Value) -> Result<Value, ApiError> {
        self.call("views.open", json!({ "trigger_id": trigger_id, "view": view }))
            .await
    }
}

/// Builds an API client bound to one workspace's bot token.
pub trait ClientFactory: Send + Sync {
    fn client_for(&self, token: BotToken) -> Arc<dyn SlackApi>;
}

// ============================================================================
// reqwest implementation
// ============================================================================

/// Slack Web API client authenticated with a single bot token.
#[derive(Clone)]
pub struct HttpSlackClient {
    http_client: reqwest::Client,
    config: Arc<ClientConfig>,
    token: BotToken,
}

impl HttpSlackClient {
    /// Create a client with its own connection pool.
    pub fn new(token: BotToken, config: ClientConfig) -> Result<Self, ApiError> {
        let http_client = build_http_client(&config)?;
        Ok(Self {
            http_client,
            config: Arc::new(config),
            token,
        })
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.config.api_base_url.trim_end_matches('/'), method)
    }
}

impl std::fmt::Debug for HttpSlackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSlackClient")
            .field("config", &self.config)
            .field("token", &"<REDACTED>")
            .finish()
    }
}

#[async_trait]
impl SlackApi for HttpSlackClient {
    async fn call(&self, method: &str, body: Value) -> Result<Value, ApiError> {
        let response = self
            .http_client
            .post(self.method_url(method))
            .bearer_auth(self.token.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_seconds = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECONDS);
            return Err(ApiError::RateLimited {
                retry_after_seconds,
            });
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            return Err(ApiError::HttpError {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        let value: Value = serde_json::from_slice(&bytes)?;

        if value.get("ok").and_then(Value::as_bool) != Some(true) {
            let error = value
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown_error")
                .to_string();
            return Err(ApiError::Platform {
                method: method.to_string(),
                error,
            });
        }

        Ok(value)
    }
}

/// Factory sharing one connection pool across every workspace client.
#[derive(Clone)]
pub struct HttpClientFactory {
    http_client: reqwest::Client,
    config: Arc<ClientConfig>,
}

impl HttpClientFactory {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let http_client = build_http_client(&config)?;
        Ok(Self {
            http_client,
            config: Arc::new(config),
        })
    }
}

impl ClientFactory for HttpClientFactory {
    fn client_for(&self, token: BotToken) -> Arc<dyn SlackApi> {
        Arc::new(HttpSlackClient {
            http_client: self.http_client.clone(),
            config: self.config.clone(),
            token,
        })
    }
}

fn build_http_client(config: &ClientConfig) -> Result<reqwest::Client, ApiError> {
    reqwest::Client::builder()
        .timeout(config.timeout)
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(ApiError::HttpClientError)
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
