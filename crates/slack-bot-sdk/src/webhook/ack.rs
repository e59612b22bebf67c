//! Single-assignment acknowledgment slot shared by a request and its dispatcher.
//!
//! Every dispatched request gets one [`Acknowledger`] and the dispatcher keeps
//! the matching receiver. The first settlement (acknowledge or fail) is
//! delivered; every later one is a silent no-op. When every clone is dropped
//! without settling, the receiver observes the closed channel instead.

use bytes::Bytes;
use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::oneshot;
use tracing::error;

/// What the handler acknowledged with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AckSignal {
    /// Plain HTTP 200 with no body.
    Empty,
    /// HTTP 200 with this JSON body.
    Payload(Bytes),
}

/// How a request was settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Acknowledged(AckSignal),
    /// Handler error or response serialization failure; the reason is logged only.
    Failed(String),
}

/// Cloneable handle that settles a request exactly once.
///
/// # Examples
///
/// ```
/// use slack_bot_sdk::webhook::{AckSignal, Acknowledger, Completion};
///
/// let (ack, mut completion) = Acknowledger::channel();
/// assert!(ack.ack());
/// assert!(!ack.fail("too late"));
///
/// assert_eq!(
///     completion.try_recv().unwrap(),
///     Completion::Acknowledged(AckSignal::Empty)
/// );
/// ```
#[derive(Clone)]
pub struct Acknowledger {
    slot: Arc<Mutex<Option<oneshot::Sender<Completion>>>>,
}

impl Acknowledger {
    /// Create an acknowledger and the receiver its settlement is delivered to.
    pub fn channel() -> (Self, oneshot::Receiver<Completion>) {
        let (tx, rx) = oneshot::channel();
        let ack = Self {
            slot: Arc::new(Mutex::new(Some(tx))),
        };
        (ack, rx)
    }

    /// Acknowledge with an empty body. Returns `false` if already settled.
    pub fn ack(&self) -> bool {
        self.settle(Completion::Acknowledged(AckSignal::Empty))
    }

    /// Acknowledge with a pre-encoded JSON body.
    pub fn ack_with_payload(&self, payload: Bytes) -> bool {
        self.settle(Completion::Acknowledged(AckSignal::Payload(payload)))
    }

    /// Serialize `action` and acknowledge with it.
    ///
    /// A serialization failure is logged and settles the request as failed.
    pub fn ack_json<T: Serialize>(&self, action: &T) -> bool {
        if self.is_settled() {
            return false;
        }
        match serde_json::to_vec(action) {
            Ok(body) => self.ack_with_payload(Bytes::from(body)),
            Err(e) => {
                error!(error = %e, "Could not encode response action");
                self.fail(format!("response action serialization failed: {}", e))
            }
        }
    }

    /// Settle as failed. Returns `false` if already settled.
    pub fn fail(&self, reason: impl Into<String>) -> bool {
        self.settle(Completion::Failed(reason.into()))
    }

    /// Whether the request has been settled by any path.
    pub fn is_settled(&self) -> bool {
        self.lock().is_none()
    }

    fn settle(&self, completion: Completion) -> bool {
        let Some(sender) = self.lock().take() else {
            return false;
        };
        // The receiver may already be gone if the caller disconnected.
        let _ = sender.send(completion);
        true
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<oneshot::Sender<Completion>>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Acknowledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Acknowledger")
            .field("settled", &self.is_settled())
            .finish()
    }
}

#[cfg(test)]
#[path = "ack_tests.rs"]
mod tests;
