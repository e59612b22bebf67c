//! # Slack Bot SDK
//!
//! Software Development Kit for receiving Slack webhooks and answering them
//! from application handlers.
//!
//! This SDK provides:
//! - Request signature verification (`v0` HMAC-SHA256 scheme)
//! - Typed payloads for slash commands, interactions and Events API callbacks
//! - A handler registry keyed by command, action ID, callback ID and event type
//! - Acknowledged dispatch: the HTTP response is written when the handler
//!   acknowledges, while the handler keeps running
//! - A small Web API client for the calls handlers make after acknowledging
//!
//! The SDK has no HTTP server of its own. A host converts each request into a
//! [`WebhookRequest`] and writes back the [`WebhookResponse`] returned by
//! [`SlackApp::receive`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use slack_bot_sdk::auth::{BotToken, SigningSecret, StaticCredentialResolver};
//! use slack_bot_sdk::client::{ClientConfig, HttpClientFactory};
//! use slack_bot_sdk::payloads::CommandResponseAction;
//! use slack_bot_sdk::webhook::{AppConfig, CommandRequest, HandlerRegistry, HandlerResult};
//! use slack_bot_sdk::SlackApp;
//! use std::sync::Arc;
//!
//! async fn howdy(req: CommandRequest) -> HandlerResult {
//!     req.ack_with_action(CommandResponseAction::ephemeral("Howdy!"));
//!     Ok(())
//! }
//!
//! # fn build() -> Result<SlackApp, Box<dyn std::error::Error>> {
//! let mut registry = HandlerRegistry::new();
//! registry.command("/howdy", howdy);
//!
//! let app = SlackApp::new(
//!     AppConfig::new(SigningSecret::new("signing-secret")?),
//!     Arc::new(StaticCredentialResolver::new(BotToken::new("xoxb-1")?)),
//!     Arc::new(HttpClientFactory::new(ClientConfig::default())?),
//!     registry,
//! );
//! # Ok(app)
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod payloads;
pub mod webhook;

pub use error::{
    ApiError, ClassifyError, CredentialError, RegistrationError, SecretError, VerificationError,
};

pub use auth::{BotToken, CredentialResolver, SigningSecret, StaticCredentialResolver, TeamId};
pub use client::{ClientConfig, ClientFactory, HttpClientFactory, HttpSlackClient, SlackApi};
pub use payloads::{Classified, RequestKind, Route};
pub use webhook::{
    AppConfig, HandlerRegistry, HandlerResult, SlackApp, WebhookRequest, WebhookResponse,
};
