//! Routing tables from routing key to handler, one per request kind.
//!
//! The registry is filled before serving starts and then moved into
//! [`SlackApp`](super::SlackApp), which only reads it. No locking is involved.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use super::handler::Handler;
use super::request::{BlockActionRequest, CommandRequest, EventRequest, ViewSubmissionRequest};
use crate::error::RegistrationError;
use crate::payloads::RequestKind;

type HandlerMap<R> = HashMap<String, Arc<dyn Handler<R>>>;

/// Handlers keyed by command name, action ID, view callback ID and event type.
///
/// The plain registration methods panic when a key is registered twice for the
/// same kind: a collision is a programming error discovered at start-up. Use
/// the `try_` variants to get a [`RegistrationError`] instead.
///
/// # Examples
///
/// ```
/// use slack_bot_sdk::payloads::RequestKind;
/// use slack_bot_sdk::webhook::{BlockActionRequest, HandlerRegistry, HandlerResult};
///
/// async fn start_button(req: BlockActionRequest) -> HandlerResult {
///     req.ack();
///     Ok(())
/// }
///
/// let mut registry = HandlerRegistry::new();
/// registry.block_action("start-button", start_button);
///
/// assert!(registry.contains(RequestKind::BlockAction, "start-button"));
/// assert!(registry.try_block_action("start-button", start_button).is_err());
/// ```
#[derive(Default)]
pub struct HandlerRegistry {
    commands: HandlerMap<CommandRequest>,
    block_actions: HandlerMap<BlockActionRequest>,
    view_submissions: HandlerMap<ViewSubmissionRequest>,
    events: HandlerMap<EventRequest>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a slash command handler, e.g. for `/start`.
    ///
    /// # Panics
    ///
    /// If the command already has a handler or the name is empty.
    pub fn command<H>(&mut self, command: impl Into<String>, handler: H) -> &mut Self
    where
        H: Handler<CommandRequest>,
    {
        expect_registered(self.try_command(command, handler).map(|_| ()));
        self
    }

    /// Register a block action handler keyed by `action_id`.
    ///
    /// # Panics
    ///
    /// If the action ID already has a handler or is empty.
    pub fn block_action<H>(&mut self, action_id: impl Into<String>, handler: H) -> &mut Self
    where
        H: Handler<BlockActionRequest>,
    {
        expect_registered(self.try_block_action(action_id, handler).map(|_| ()));
        self
    }

    /// Register a view submission handler keyed by the view's `callback_id`.
    ///
    /// # Panics
    ///
    /// If the callback ID already has a handler or is empty.
    pub fn view_submission<H>(&mut self, callback_id: impl Into<String>, handler: H) -> &mut Self
    where
        H: Handler<ViewSubmissionRequest>,
    {
        expect_registered(self.try_view_submission(callback_id, handler).map(|_| ()));
        self
    }

    /// Register an event handler keyed by the inner event `type`.
    ///
    /// # Panics
    ///
    /// If the event type already has a handler or is empty.
    pub fn event<H>(&mut self, event_type: impl Into<String>, handler: H) -> &mut Self
    where
        H: Handler<EventRequest>,
    {
        expect_registered(self.try_event(event_type, handler).map(|_| ()));
        self
    }

    pub fn try_command<H>(
        &mut self,
        command: impl Into<String>,
        handler: H,
    ) -> Result<&mut Self, RegistrationError>
    where
        H: Handler<CommandRequest>,
    {
        insert(&mut self.commands, RequestKind::Command, command.into(), handler)?;
        Ok(self)
    }

    pub fn try_block_action<H>(
        &mut self,
        action_id: impl Into<String>,
        handler: H,
    ) -> Result<&mut Self, RegistrationError>
    where
        H: Handler<BlockActionRequest>,
    {
        insert(
            &mut self.block_actions,
            RequestKind::BlockAction,
            action_id.into(),
            handler,
        )?;
        Ok(self)
    }

    pub fn try_view_submission<H>(
        &mut self,
        callback_id: impl Into<String>,
        handler: H,
    ) -> Result<&mut Self, RegistrationError>
    where
        H: Handler<ViewSubmissionRequest>,
    {
        insert(
            &mut self.view_submissions,
            RequestKind::ViewSubmission,
            callback_id.into(),
            handler,
        )?;
        Ok(self)
    }

    pub fn try_event<H>(
        &mut self,
        event_type: impl Into<String>,
        handler: H,
    ) -> Result<&mut Self, RegistrationError>
    where
        H: Handler<EventRequest>,
    {
        insert(&mut self.events, RequestKind::Event, event_type.into(), handler)?;
        Ok(self)
    }

    pub fn command_handler(&self, command: &str) -> Option<Arc<dyn Handler<CommandRequest>>> {
        self.commands.get(command).cloned()
    }

    pub fn block_action_handler(
        &self,
        action_id: &str,
    ) -> Option<Arc<dyn Handler<BlockActionRequest>>> {
        self.block_actions.get(action_id).cloned()
    }

    pub fn view_submission_handler(
        &self,
        callback_id: &str,
    ) -> Option<Arc<dyn Handler<ViewSubmissionRequest>>> {
        self.view_submissions.get(callback_id).cloned()
    }

    pub fn event_handler(&self, event_type: &str) -> Option<Arc<dyn Handler<EventRequest>>> {
        self.events.get(event_type).cloned()
    }

    /// Check whether a handler exists for `key` under `kind`.
    pub fn contains(&self, kind: RequestKind, key: &str) -> bool {
        match kind {
            RequestKind::Command => self.commands.contains_key(key),
            RequestKind::BlockAction => self.block_actions.contains_key(key),
            RequestKind::ViewSubmission => self.view_submissions.contains_key(key),
            RequestKind::Event => self.events.contains_key(key),
        }
    }

    /// Total number of registered handlers across all kinds.
    pub fn len(&self) -> usize {
        self.commands.len()
            + self.block_actions.len()
            + self.view_submissions.len()
            + self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("commands", &self.commands.keys().collect::<Vec<_>>())
            .field("block_actions", &self.block_actions.keys().collect::<Vec<_>>())
            .field(
                "view_submissions",
                &self.view_submissions.keys().collect::<Vec<_>>(),
            )
            .field("events", &self.events.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn insert<R, H>(
    map: &mut HandlerMap<R>,
    kind: RequestKind,
    key: String,
    handler: H,
) -> Result<(), RegistrationError>
where
    R: Send + 'static,
    H: Handler<R>,
{
    if key.is_empty() {
        return Err(RegistrationError::EmptyKey { kind });
    }
    if map.contains_key(&key) {
        return Err(RegistrationError::Duplicate { kind, key });
    }

    info!(kind = %kind, routing_key = %key, "Registered handler");
    map.insert(key, Arc::new(handler));
    Ok(())
}

fn expect_registered(result: Result<(), RegistrationError>) {
    if let Err(e) = result {
        panic!("{}", e);
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
