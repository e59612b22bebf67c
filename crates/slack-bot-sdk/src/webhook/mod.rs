//! Slack webhook processing: verification, routing and acknowledged dispatch.
//!
//! # Core Components
//!
//! - [`SignatureVerifier`] - HMAC-SHA256 verification of `x-slack-signature`
//! - [`HandlerRegistry`] - routing key to handler tables, filled at start-up
//! - [`Handler`] - trait implemented by application handlers (and closures)
//! - [`SlackApp`] - verify, classify, look up, resolve credential, dispatch
//! - [`WebhookRequest`]/[`WebhookResponse`] - framework-agnostic HTTP types
//!
//! # Acknowledgment
//!
//! Slack expects an answer within three seconds, but handlers often have more
//! work to do. Each handler runs on its own task and answers the webhook by
//! settling its request exactly once:
//!
//! | Settlement | HTTP response |
//! |------------|---------------|
//! | `ack()` | 200, empty body |
//! | `ack_with_action(action)` | 200, `application/json` body |
//! | handler returns `Err` first | 500 `An error occurred` |
//! | handler returns `Ok` without acknowledging | 500 `An error occurred` |
//!
//! Later settlements are ignored. After acknowledging, the handler keeps
//! running detached from the HTTP response.
//!
//! # Examples
//!
//! ```rust
//! use slack_bot_sdk::payloads::{CommandResponseAction, MessageEvent};
//! use slack_bot_sdk::webhook::{CommandRequest, EventRequest, HandlerRegistry, HandlerResult};
//!
//! async fn howdy(req: CommandRequest) -> HandlerResult {
//!     req.ack_with_action(CommandResponseAction::in_channel("Howdy!"));
//!     Ok(())
//! }
//!
//! async fn echo(req: EventRequest) -> HandlerResult {
//!     req.ack();
//!     let message: MessageEvent = req.payload.parse_event()?;
//!     if !message.is_bot() {
//!         req.client
//!             .post_message(&message.channel, &format!("You wrote: {}", message.text))
//!             .await?;
//!     }
//!     Ok(())
//! }
//!
//! let mut registry = HandlerRegistry::new();
//! registry.command("/howdy", howdy).event("message", echo);
//! ```

pub mod ack;
mod dispatch;
pub mod handler;
pub mod receiver;
pub mod registry;
pub mod request;
pub mod validation;

pub use ack::{AckSignal, Acknowledger, Completion};
pub use handler::{Handler, HandlerError, HandlerResult};
pub use receiver::{AppConfig, SlackApp, WebhookRequest, WebhookResponse, DEFAULT_ERROR_MESSAGE};
pub use registry::HandlerRegistry;
pub use request::{
    BlockActionRequest, CommandRequest, EventRequest, Request, ViewSubmissionRequest,
};
pub use validation::{SignatureVerifier, SIGNATURE_HEADER, TIMESTAMP_HEADER};
