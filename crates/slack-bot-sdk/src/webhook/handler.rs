//! Application-provided request handlers.
//!
//! A handler receives one request context, must settle it with `ack()`,
//! `ack_with_action(..)` or by returning an error, and may keep working after
//! acknowledging. The HTTP response is written as soon as the request is
//! settled, not when the handler returns.
//!
//! # Examples
//!
//! Closures returning a future are handlers:
//!
//! ```rust
//! use slack_bot_sdk::payloads::CommandResponseAction;
//! use slack_bot_sdk::webhook::{CommandRequest, HandlerError, HandlerRegistry};
//!
//! let mut registry = HandlerRegistry::new();
//! registry.command("/howdy", |req: CommandRequest| async move {
//!     req.ack_with_action(CommandResponseAction::in_channel("Howdy!"));
//!     Ok::<(), HandlerError>(())
//! });
//! ```
//!
//! Stateful handlers implement the trait directly:
//!
//! ```rust
//! use async_trait::async_trait;
//! use slack_bot_sdk::webhook::{EventRequest, Handler, HandlerResult};
//!
//! struct MentionCounter;
//!
//! #[async_trait]
//! impl Handler<EventRequest> for MentionCounter {
//!     async fn call(&self, req: EventRequest) -> HandlerResult {
//!         req.ack();
//!         Ok(())
//!     }
//! }
//! ```

use async_trait::async_trait;
use std::error::Error;
use std::future::Future;

/// Error returned by a failing handler.
pub type HandlerError = Box<dyn Error + Send + Sync>;

/// Result returned by every handler.
pub type HandlerResult = Result<(), HandlerError>;

/// Processes one request of type `R`.
///
/// Each call runs on its own Tokio task. Returning `Err` before acknowledging
/// answers HTTP 500 and, for commands and interactions, posts the configured
/// error message to the user. Returning `Ok` without acknowledging also
/// answers HTTP 500 unless a clone of the acknowledger is still alive.
#[async_trait]
pub trait Handler<R: Send + 'static>: Send + Sync + 'static {
    async fn call(&self, request: R) -> HandlerResult;
}

#[async_trait]
impl<R, F, Fut> Handler<R> for F
where
    R: Send + 'static,
    F: Fn(R) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    async fn call(&self, request: R) -> HandlerResult {
        (self)(request).await
    }
}

#[cfg(test)]
#[path = "handler_tests.rs"]
mod tests;
