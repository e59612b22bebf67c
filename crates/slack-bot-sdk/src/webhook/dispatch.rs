//! Runs a handler on its own task and turns its settlement into the response.
//!
//! The serving side waits on the request's completion channel only. Whichever
//! settlement arrives first decides the response; a handler still running
//! after acknowledging keeps running detached.

use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, error};

use super::ack::{AckSignal, Acknowledger, Completion};
use super::handler::Handler;
use super::receiver::WebhookResponse;
use super::request::Request;
use crate::client::SlackApi;
use crate::payloads::RequestKind;

/// Body text for every handler-side failure.
pub(crate) const HANDLER_FAILURE_MESSAGE: &str = "An error occurred";

/// Where to post the ephemeral notice when a handler fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ErrorNotice {
    pub channel: String,
    pub user: String,
}

impl ErrorNotice {
    pub fn new(channel: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            user: user.into(),
        }
    }
}

/// Everything needed to run one handler besides the handler and payload.
pub(crate) struct Dispatch {
    pub kind: RequestKind,
    pub routing_key: String,
    pub client: Arc<dyn SlackApi>,
    pub notice: Option<ErrorNotice>,
    pub error_message: Arc<str>,
}

impl Dispatch {
    /// Spawn the handler and wait for the request to be settled.
    pub async fn run<P>(self, handler: Arc<dyn Handler<Request<P>>>, payload: P) -> WebhookResponse
    where
        P: Send + 'static,
    {
        let (ack, completion) = Acknowledger::channel();
        let request = Request::new(payload, self.client.clone(), ack.clone());

        let Dispatch {
            kind,
            routing_key,
            client,
            notice,
            error_message,
        } = self;
        let key = routing_key.clone();

        tokio::spawn(async move {
            let Err(e) = handler.call(request).await else {
                return;
            };

            error!(kind = %kind, routing_key = %key, error = %e, "Handler failed");

            if let Some(notice) = notice {
                if let Err(post_error) = client
                    .post_ephemeral(&notice.channel, &notice.user, &error_message)
                    .await
                {
                    error!(
                        user = %notice.user,
                        error = %post_error,
                        "Unable to send error message to user"
                    );
                }
            }

            ack.fail(e.to_string());
        });

        await_completion(kind, &routing_key, completion).await
    }
}

async fn await_completion(
    kind: RequestKind,
    routing_key: &str,
    completion: oneshot::Receiver<Completion>,
) -> WebhookResponse {
    match completion.await {
        Ok(Completion::Acknowledged(AckSignal::Empty)) => {
            debug!(kind = %kind, routing_key = %routing_key, "Request acknowledged");
            WebhookResponse::Empty
        }
        Ok(Completion::Acknowledged(AckSignal::Payload(body))) => {
            debug!(kind = %kind, routing_key = %routing_key, "Request acknowledged with action");
            WebhookResponse::Json(body)
        }
        Ok(Completion::Failed(_)) => WebhookResponse::internal_error(HANDLER_FAILURE_MESSAGE),
        Err(_) => {
            error!(
                kind = %kind,
                routing_key = %routing_key,
                "Handler finished without acknowledging the request"
            );
            WebhookResponse::internal_error(HANDLER_FAILURE_MESSAGE)
        }
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
