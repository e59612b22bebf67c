//! Slash command payloads and immediate command responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

use crate::error::ClassifyError;

/// Form fields Slack sends with a slash command.
///
/// `command`, `team_id`, `channel_id`, `user_id` and `trigger_id` are always
/// present; the rest default to empty strings when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandPayload {
    /// Deprecated verification token.
    pub token: String,
    pub command: String,
    /// Text after the command name.
    pub text: String,
    pub team_id: String,
    pub team_domain: String,
    pub enterprise_id: String,
    pub enterprise_name: String,
    pub channel_id: String,
    pub channel_name: String,
    pub user_id: String,
    /// Deprecated display name of the caller.
    pub user_name: String,
    /// Short-lived webhook for delayed responses.
    pub response_url: String,
    /// Short-lived ID for opening modals.
    pub trigger_id: String,
    pub api_app_id: String,
}

impl CommandPayload {
    /// Decode a URL-encoded command body and check required fields.
    pub fn from_form(body: &[u8]) -> Result<Self, ClassifyError> {
        std::str::from_utf8(body).map_err(|e| ClassifyError::InvalidForm {
            message: e.to_string(),
        })?;

        let mut payload = Self::default();
        let mut seen = HashSet::new();
        for (key, value) in url::form_urlencoded::parse(body) {
            let slot = match key.as_ref() {
                "token" => &mut payload.token,
                "command" => &mut payload.command,
                "text" => &mut payload.text,
                "team_id" => &mut payload.team_id,
                "team_domain" => &mut payload.team_domain,
                "enterprise_id" => &mut payload.enterprise_id,
                "enterprise_name" => &mut payload.enterprise_name,
                "channel_id" => &mut payload.channel_id,
                "channel_name" => &mut payload.channel_name,
                "user_id" => &mut payload.user_id,
                "user_name" => &mut payload.user_name,
                "response_url" => &mut payload.response_url,
                "trigger_id" => &mut payload.trigger_id,
                "api_app_id" => &mut payload.api_app_id,
                _ => continue,
            };
            // First occurrence wins for repeated keys, even when empty.
            if seen.insert(key.into_owned()) {
                *slot = value.into_owned();
            }
        }

        payload.validate()?;
        Ok(payload)
    }

    fn validate(&self) -> Result<(), ClassifyError> {
        let required = [
            ("command", &self.command),
            ("team_id", &self.team_id),
            ("channel_id", &self.channel_id),
            ("user_id", &self.user_id),
            ("trigger_id", &self.trigger_id),
        ];
        for (field, value) in required {
            if value.is_empty() {
                return Err(ClassifyError::MissingField { field });
            }
        }
        Ok(())
    }
}

/// Visibility of an immediate command response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandResponseType {
    InChannel,
    Ephemeral,
}

/// Message returned as the HTTP body acknowledging a slash command.
///
/// # Examples
///
/// ```
/// use slack_bot_sdk::payloads::CommandResponseAction;
///
/// let action = CommandResponseAction::in_channel("Howdy!");
/// assert_eq!(
///     serde_json::to_string(&action).unwrap(),
///     r#"{"response_type":"in_channel","text":"Howdy!"}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResponseAction {
    pub response_type: CommandResponseType,
    pub text: String,
    /// Block Kit blocks, passed through as JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<Value>>,
}

impl CommandResponseAction {
    /// Response visible to everyone in the channel.
    pub fn in_channel(text: impl Into<String>) -> Self {
        Self {
            response_type: CommandResponseType::InChannel,
            text: text.into(),
            blocks: None,
        }
    }

    /// Response visible only to the caller.
    pub fn ephemeral(text: impl Into<String>) -> Self {
        Self {
            response_type: CommandResponseType::Ephemeral,
            text: text.into(),
            blocks: None,
        }
    }

    /// Attach Block Kit blocks.
    pub fn with_blocks(mut self, blocks: Vec<Value>) -> Self {
        self.blocks = Some(blocks);
        self
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
