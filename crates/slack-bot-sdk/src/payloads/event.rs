//! Events API envelopes and inner events.
//!
//! The outer envelope's `type` selects between `url_verification`,
//! `app_rate_limited` and `event_callback`. Only callbacks are routed; their
//! nested `event` object stays unparsed so each handler can decode it against
//! its own schema with [`EventPayload::parse_event`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use super::Classified;
use crate::error::ClassifyError;

const EVENT_CALLBACK: &str = "event_callback";
const URL_VERIFICATION: &str = "url_verification";
const APP_RATE_LIMITED: &str = "app_rate_limited";

#[derive(Debug, Deserialize)]
struct OuterType {
    #[serde(default, rename = "type")]
    outer_type: String,
}

#[derive(Debug, Deserialize)]
struct UrlVerificationEnvelope {
    #[serde(default)]
    challenge: String,
}

#[derive(Debug, Deserialize)]
struct AppRateLimitedEnvelope {
    #[serde(default)]
    minute_rate_limited: u64,
}

#[derive(Debug, Deserialize)]
struct EventCallbackEnvelope {
    #[serde(default)]
    team_id: String,
    #[serde(default)]
    api_app_id: String,
    #[serde(default)]
    event_id: String,
    #[serde(default)]
    event_time: u64,
    #[serde(default)]
    event_context: String,
    #[serde(default)]
    authorizations: Vec<Authorization>,
    event: Option<Box<RawValue>>,
}

#[derive(Debug, Deserialize)]
struct InnerType {
    #[serde(default, rename = "type")]
    event_type: String,
}

pub(crate) fn classify_event(body: &[u8]) -> Result<Classified, ClassifyError> {
    let invalid_envelope = |e: serde_json::Error| ClassifyError::InvalidEventEnvelope {
        message: e.to_string(),
    };

    let outer: OuterType = serde_json::from_slice(body).map_err(invalid_envelope)?;

    match outer.outer_type.as_str() {
        URL_VERIFICATION => {
            let envelope: UrlVerificationEnvelope =
                serde_json::from_slice(body).map_err(invalid_envelope)?;
            Ok(Classified::UrlVerification {
                challenge: envelope.challenge,
            })
        }
        APP_RATE_LIMITED => {
            let envelope: AppRateLimitedEnvelope =
                serde_json::from_slice(body).map_err(invalid_envelope)?;
            Ok(Classified::AppRateLimited {
                minute_rate_limited: envelope.minute_rate_limited,
            })
        }
        EVENT_CALLBACK => {
            let envelope: EventCallbackEnvelope =
                serde_json::from_slice(body).map_err(invalid_envelope)?;
            EventPayload::from_envelope(envelope).map(Classified::EventCallback)
        }
        other => Err(ClassifyError::UnknownEventType {
            event_type: other.to_string(),
        }),
    }
}

/// An installation the event is visible to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Authorization {
    pub enterprise_id: Option<String>,
    pub team_id: String,
    pub user_id: String,
    pub is_bot: bool,
}

/// An `event_callback` delivery.
///
/// The inner event is kept as raw JSON; [`EventPayload::event_type`] is the
/// routing key decoded from it.
#[derive(Debug, Clone)]
pub struct EventPayload {
    pub team_id: String,
    pub api_app_id: String,
    pub event_id: String,
    /// Unix seconds.
    pub event_time: u64,
    pub event_context: String,
    pub authorizations: Vec<Authorization>,
    event_type: String,
    event: Box<RawValue>,
}

impl EventPayload {
    fn from_envelope(envelope: EventCallbackEnvelope) -> Result<Self, ClassifyError> {
        let event = envelope
            .event
            .ok_or_else(|| ClassifyError::InvalidInnerEvent {
                message: "event_callback has no event".to_string(),
            })?;

        let inner: InnerType =
            serde_json::from_str(event.get()).map_err(|e| ClassifyError::InvalidInnerEvent {
                message: e.to_string(),
            })?;

        Ok(Self {
            team_id: envelope.team_id,
            api_app_id: envelope.api_app_id,
            event_id: envelope.event_id,
            event_time: envelope.event_time,
            event_context: envelope.event_context,
            authorizations: envelope.authorizations,
            event_type: inner.event_type,
            event,
        })
    }

    /// Inner event `type`, e.g. `message` or `app_mention`.
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// The inner event exactly as received.
    pub fn raw_event(&self) -> &str {
        self.event.get()
    }

    /// Decode the inner event into a handler-specific schema.
    pub fn parse_event<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(self.event.get())
    }
}

/// Inner `message` event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub subtype: Option<String>,
    pub channel: String,
    pub channel_type: String,
    pub user: String,
    pub text: String,
    pub ts: String,
    pub event_ts: String,
    pub thread_ts: Option<String>,
    pub bot_id: Option<String>,
}

impl MessageEvent {
    /// Whether a bot (including this app) posted the message.
    pub fn is_bot(&self) -> bool {
        self.bot_id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
