//! Handlers for the example app.
//!
//! `/start` replies with a button; the button opens a modal asking for a
//! name; submitting the modal greets the user in a DM. Messages posted where
//! the bot is present are echoed back.

use serde_json::{json, Value};
use slack_bot_sdk::payloads::{CommandResponseAction, MessageEvent, ViewResponseAction};
use slack_bot_sdk::webhook::{
    BlockActionRequest, CommandRequest, EventRequest, HandlerRegistry, HandlerResult,
    ViewSubmissionRequest,
};
use tracing::debug;

pub const START_COMMAND: &str = "/start";
pub const START_BUTTON: &str = "start-button";
pub const FORM_MODAL: &str = "form-modal";
pub const NAME_BLOCK: &str = "input-block";
pub const NAME_ACTION: &str = "full-name";
pub const MESSAGE_EVENT: &str = "message";

const START_PROMPT: &str = "Get started by clicking the button!";
const NAME_ERROR: &str = "Name doesn't start with an 'A'";

/// Register every example handler.
pub fn register(registry: &mut HandlerRegistry) {
    registry
        .command(START_COMMAND, start_command)
        .block_action(START_BUTTON, start_button)
        .view_submission(FORM_MODAL, form_submitted)
        .event(MESSAGE_EVENT, echo_message);
}

async fn start_command(req: CommandRequest) -> HandlerResult {
    req.ack_with_action(
        CommandResponseAction::ephemeral(START_PROMPT).with_blocks(vec![start_prompt_block()]),
    );
    Ok(())
}

async fn start_button(req: BlockActionRequest) -> HandlerResult {
    req.ack();
    req.client
        .open_view(&req.payload.trigger_id, form_modal())
        .await?;
    Ok(())
}

async fn form_submitted(req: ViewSubmissionRequest) -> HandlerResult {
    let name = req
        .payload
        .view
        .state
        .text_value(NAME_BLOCK, NAME_ACTION)
        .ok_or("form submitted without a full name")?
        .to_string();

    if !starts_with_a(&name) {
        req.ack_with_action(ViewResponseAction::errors([(NAME_BLOCK, NAME_ERROR)]));
        return Ok(());
    }

    req.ack_with_action(ViewResponseAction::clear());
    req.client
        .post_message(&req.payload.user.id, &format!("Hello {}", name))
        .await?;
    Ok(())
}

async fn echo_message(req: EventRequest) -> HandlerResult {
    let message: MessageEvent = req.payload.parse_event()?;
    req.ack();

    // The bot's own posts come back as message events.
    if message.is_bot() {
        debug!(channel = %message.channel, "Ignoring bot message");
        return Ok(());
    }

    req.client
        .post_message(&message.channel, &format!("You wrote: {}", message.text))
        .await?;
    Ok(())
}

fn starts_with_a(name: &str) -> bool {
    name.chars()
        .next()
        .is_some_and(|first| first.eq_ignore_ascii_case(&'a'))
}

fn start_prompt_block() -> Value {
    json!({
        "type": "section",
        "text": { "type": "plain_text", "text": START_PROMPT },
        "accessory": {
            "type": "button",
            "action_id": START_BUTTON,
            "text": { "type": "plain_text", "text": "Click Me!" }
        }
    })
}

fn form_modal() -> Value {
    json!({
        "type": "modal",
        "callback_id": FORM_MODAL,
        "title": { "type": "plain_text", "text": "Form" },
        "submit": { "type": "plain_text", "text": "Submit" },
        "close": { "type": "plain_text", "text": "Cancel" },
        "blocks": [
            {
                "type": "section",
                "text": {
                    "type": "mrkdwn",
                    "text": "*Welcome to the form!*\nPlease fill out your name below."
                }
            },
            {
                "type": "input",
                "block_id": NAME_BLOCK,
                "label": { "type": "plain_text", "text": "Full Name" },
                "element": {
                    "type": "plain_text_input",
                    "action_id": NAME_ACTION,
                    "placeholder": { "type": "plain_text", "text": "Enter your name" }
                }
            }
        ]
    })
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
