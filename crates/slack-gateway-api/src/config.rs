//! Configuration types for the HTTP service
//!
//! Sources are applied in order, later sources overriding earlier ones:
//!
//! 1. `config/service.yaml` relative to the working directory (optional)
//! 2. The file named by `SLACK_GATEWAY_CONFIG_FILE` (required when set)
//! 3. Environment variables prefixed `SLACK_GATEWAY__` with `__` as the
//!    nesting separator, e.g. `SLACK_GATEWAY__SERVER__PORT=9090`
//!
//! Every field carries a default, so only the Slack secrets have to be
//! supplied.

use serde::{Deserialize, Serialize};
use slack_bot_sdk::auth::{BotToken, SigningSecret, StaticCredentialResolver};
use slack_bot_sdk::client::ClientConfig;
use slack_bot_sdk::webhook::{AppConfig, DEFAULT_ERROR_MESSAGE};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::errors::ConfigError;

/// Environment variable naming an operator-supplied configuration file.
pub const CONFIG_FILE_ENV: &str = "SLACK_GATEWAY_CONFIG_FILE";

/// Prefix for configuration environment variables.
pub const ENV_PREFIX: &str = "SLACK_GATEWAY";

const DEFAULT_CONFIG_FILE: &str = "config/service";

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Slack app settings
    pub slack: SlackConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl ServiceConfig {
    /// Load configuration from the default sources.
    ///
    /// Honours `SLACK_GATEWAY_CONFIG_FILE` when it is set and non-empty.
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::var(CONFIG_FILE_ENV)
            .ok()
            .filter(|path| !path.is_empty());
        Self::load_from(explicit.as_deref().map(Path::new))
    }

    /// Load configuration, using `explicit_path` in place of the
    /// `SLACK_GATEWAY_CONFIG_FILE` lookup.
    pub fn load_from(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder().add_source(
            config::File::with_name(DEFAULT_CONFIG_FILE)
                .required(false)
                .format(config::FileFormat::Yaml),
        );

        if let Some(path) = explicit_path {
            info!(path = %path.display(), "Loading configuration from explicit path");
            builder = builder.add_source(
                config::File::from(path)
                    .required(true)
                    .format(config::FileFormat::Yaml),
            );
        }

        let config = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Check values that deserialise fine but cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid {
                message: "server.port must be non-zero".to_string(),
            });
        }

        if self.server.max_body_size == 0 {
            return Err(ConfigError::Invalid {
                message: "server.max_body_size must be non-zero".to_string(),
            });
        }

        self.slack.validate()
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,

    /// Maximum request size in bytes
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout_seconds: 30,
            max_body_size: 1024 * 1024, // 1MB
        }
    }
}

/// Slack app configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackConfig {
    /// Prefix in front of `/commands`, `/interactions` and `/events`.
    ///
    /// Empty, or starting with `/` and not ending with one.
    pub path_prefix: String,

    /// Signing secret from the app's Basic Information page
    pub signing_secret: String,

    /// Bot token used for every workspace
    pub bot_token: String,

    /// Slack Web API base URL
    pub api_base_url: String,

    /// Outbound API request timeout in seconds
    pub request_timeout_seconds: u64,

    /// Ephemeral text posted to users whose request failed
    pub error_message: String,

    /// Reject requests whose timestamp is older than this (disabled when unset)
    pub max_request_age_seconds: Option<u64>,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            path_prefix: String::new(),
            signing_secret: String::new(),
            bot_token: String::new(),
            api_base_url: "https://slack.com/api".to_string(),
            request_timeout_seconds: 30,
            error_message: DEFAULT_ERROR_MESSAGE.to_string(),
            max_request_age_seconds: None,
        }
    }
}

impl SlackConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.signing_secret.is_empty() {
            return Err(ConfigError::Missing {
                key: "slack.signing_secret".to_string(),
            });
        }

        let prefix = &self.path_prefix;
        if !prefix.is_empty() && (!prefix.starts_with('/') || prefix.ends_with('/')) {
            return Err(ConfigError::Invalid {
                message: format!(
                    "slack.path_prefix '{}' must start with '/' and must not end with '/'",
                    prefix
                ),
            });
        }

        if matches!(self.max_request_age_seconds, Some(0)) {
            return Err(ConfigError::Invalid {
                message: "slack.max_request_age_seconds must be non-zero when set".to_string(),
            });
        }

        Ok(())
    }

    /// Settings for the webhook receiver.
    pub fn app_config(&self) -> Result<AppConfig, ConfigError> {
        let secret =
            SigningSecret::new(self.signing_secret.as_str()).map_err(|_| ConfigError::Missing {
                key: "slack.signing_secret".to_string(),
            })?;

        let mut app_config = AppConfig::new(secret).with_error_message(self.error_message.clone());

        if let Some(seconds) = self.max_request_age_seconds {
            let max_age = i64::try_from(seconds)
                .ok()
                .and_then(chrono::Duration::try_seconds)
                .ok_or_else(|| ConfigError::Invalid {
                    message: format!("slack.max_request_age_seconds {} is too large", seconds),
                })?;
            app_config = app_config.with_max_request_age(max_age);
        }

        Ok(app_config)
    }

    /// Settings for outbound Web API clients.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::default()
            .with_api_base_url(self.api_base_url.clone())
            .with_timeout(Duration::from_secs(self.request_timeout_seconds))
    }

    /// Resolver answering every workspace with the configured bot token.
    pub fn credential_resolver(&self) -> Result<StaticCredentialResolver, ConfigError> {
        let token = BotToken::new(self.bot_token.as_str()).map_err(|_| ConfigError::Missing {
            key: "slack.bot_token".to_string(),
        })?;
        Ok(StaticCredentialResolver::new(token))
    }
}

impl std::fmt::Debug for SlackConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackConfig")
            .field("path_prefix", &self.path_prefix)
            .field("signing_secret", &"<REDACTED>")
            .field("bot_token", &"<REDACTED>")
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("error_message", &self.error_message)
            .field("max_request_age_seconds", &self.max_request_age_seconds)
            .finish()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Logging level
    pub level: String,

    /// Enable JSON structured logging
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
