//! Typed Slack webhook payloads and the payload classifier.
//!
//! Slack delivers three HTTP surfaces, each with its own body encoding:
//!
//! | Route | Encoding | Kinds |
//! |-------|----------|-------|
//! | [`Route::Commands`] | `application/x-www-form-urlencoded` | slash command |
//! | [`Route::Interactions`] | form field `payload` holding JSON | block actions, view submission |
//! | [`Route::Events`] | raw JSON envelope | event callback, URL verification, rate limit notice |
//!
//! [`classify`] turns a verified raw body into a [`Classified`] value carrying
//! the typed payload and its routing key. JSON payloads are decoded in two
//! phases: the `type` discriminator first, then the shape it selects.
//!
//! # Examples
//!
//! ```
//! use slack_bot_sdk::payloads::{classify, Classified, Route};
//!
//! let body = b"command=%2Fstart&team_id=T1&channel_id=C1&user_id=U1&trigger_id=123.456";
//! let classified = classify(Route::Commands, body).unwrap();
//!
//! assert_eq!(classified.routing_key(), Some("/start"));
//! assert!(matches!(classified, Classified::Command(_)));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ClassifyError;

pub mod command;
pub mod event;
pub mod interaction;

pub use command::{CommandPayload, CommandResponseAction, CommandResponseType};
pub use event::{Authorization, EventPayload, MessageEvent};
pub use interaction::{
    BlockAction, BlockActionPayload, Channel, InteractionTeam, InteractionUser, View,
    ViewResponseAction, ViewResponseType, ViewState, ViewSubmissionPayload,
};

// ============================================================================
// Routes and Kinds
// ============================================================================

/// HTTP surface a webhook arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Commands,
    Interactions,
    Events,
}

impl Route {
    /// Path segment under the configured prefix.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Commands => "commands",
            Self::Interactions => "interactions",
            Self::Events => "events",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of request a handler can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Command,
    BlockAction,
    ViewSubmission,
    Event,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Command => "command",
            Self::BlockAction => "block action",
            Self::ViewSubmission => "view submission",
            Self::Event => "event",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Classification
// ============================================================================

/// A classified webhook body.
#[derive(Debug, Clone)]
pub enum Classified {
    Command(CommandPayload),
    BlockActions(BlockActionPayload),
    ViewSubmission(ViewSubmissionPayload),
    EventCallback(EventPayload),
    /// One-time endpoint handshake; never routed to a handler.
    UrlVerification {
        challenge: String,
    },
    /// Slack is dropping events for this app; never routed to a handler.
    AppRateLimited {
        minute_rate_limited: u64,
    },
}

impl Classified {
    /// Request kind for routed payloads.
    pub fn kind(&self) -> Option<RequestKind> {
        match self {
            Self::Command(_) => Some(RequestKind::Command),
            Self::BlockActions(_) => Some(RequestKind::BlockAction),
            Self::ViewSubmission(_) => Some(RequestKind::ViewSubmission),
            Self::EventCallback(_) => Some(RequestKind::Event),
            Self::UrlVerification { .. } | Self::AppRateLimited { .. } => None,
        }
    }

    /// Key used to look up the registered handler.
    ///
    /// `None` for the event envelopes that are answered without a handler.
    pub fn routing_key(&self) -> Option<&str> {
        match self {
            Self::Command(payload) => Some(&payload.command),
            Self::BlockActions(payload) => payload.action_id(),
            Self::ViewSubmission(payload) => Some(&payload.view.callback_id),
            Self::EventCallback(payload) => Some(payload.event_type()),
            Self::UrlVerification { .. } | Self::AppRateLimited { .. } => None,
        }
    }
}

/// Classify a verified webhook body received on `route`.
///
/// # Errors
///
/// Returns a [`ClassifyError`] describing why the body cannot be routed; its
/// [`status_code`](ClassifyError::status_code) and
/// [`public_message`](ClassifyError::public_message) form the HTTP response.
pub fn classify(route: Route, body: &[u8]) -> Result<Classified, ClassifyError> {
    match route {
        Route::Commands => CommandPayload::from_form(body).map(Classified::Command),
        Route::Interactions => interaction::classify_interaction(body),
        Route::Events => event::classify_event(body),
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
