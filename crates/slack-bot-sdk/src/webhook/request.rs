//! Per-request contexts handed to handlers.

use std::sync::Arc;

use super::ack::Acknowledger;
use crate::client::SlackApi;
use crate::payloads::{
    BlockActionPayload, CommandPayload, CommandResponseAction, EventPayload,
    ViewResponseAction, ViewSubmissionPayload,
};

/// A dispatched request: the typed payload, the API client bound to the
/// workspace's credential, and the acknowledgment handle.
///
/// Cloning shares the acknowledgment slot, so a clone moved into a detached
/// task can still acknowledge.
#[derive(Clone)]
pub struct Request<P> {
    pub payload: P,
    pub client: Arc<dyn SlackApi>,
    ack: Acknowledger,
}

pub type CommandRequest = Request<CommandPayload>;
pub type BlockActionRequest = Request<BlockActionPayload>;
pub type ViewSubmissionRequest = Request<ViewSubmissionPayload>;
pub type EventRequest = Request<EventPayload>;

impl<P> Request<P> {
    pub(crate) fn new(payload: P, client: Arc<dyn SlackApi>, ack: Acknowledger) -> Self {
        Self {
            payload,
            client,
            ack,
        }
    }

    /// Acknowledge with HTTP 200 and an empty body.
    ///
    /// Only the first acknowledgment has any effect.
    pub fn ack(&self) {
        self.ack.ack();
    }

    /// Whether this request has already been answered.
    pub fn is_acknowledged(&self) -> bool {
        self.ack.is_settled()
    }
}

impl CommandRequest {
    /// Acknowledge with an immediate message as the JSON response body.
    pub fn ack_with_action(&self, action: CommandResponseAction) {
        self.ack.ack_json(&action);
    }
}

impl ViewSubmissionRequest {
    /// Acknowledge with a `response_action` as the JSON response body.
    pub fn ack_with_action(&self, action: ViewResponseAction) {
        self.ack.ack_json(&action);
    }
}

impl<P: std::fmt::Debug> std::fmt::Debug for Request<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("payload", &self.payload)
            .field("acknowledged", &self.is_acknowledged())
            .finish_non_exhaustive()
    }
}
