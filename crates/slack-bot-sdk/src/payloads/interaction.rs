//! Interactive component payloads: block actions and view submissions.
//!
//! Both arrive on the interactions route as a single form field named
//! `payload` whose value is a JSON document discriminated by `type`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

use super::Classified;
use crate::error::ClassifyError;

const BLOCK_ACTIONS: &str = "block_actions";
const VIEW_SUBMISSION: &str = "view_submission";

#[derive(Debug, Deserialize)]
struct InteractionType {
    #[serde(default, rename = "type")]
    interaction_type: String,
}

pub(crate) fn classify_interaction(body: &[u8]) -> Result<Classified, ClassifyError> {
    let blob = url::form_urlencoded::parse(body)
        .find(|(key, _)| key == "payload")
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| ClassifyError::InvalidInteractionEnvelope {
            message: "missing payload form field".to_string(),
        })?;

    let discriminator: InteractionType = serde_json::from_str(&blob).map_err(|e| {
        ClassifyError::InvalidInteractionEnvelope {
            message: e.to_string(),
        }
    })?;

    match discriminator.interaction_type.as_str() {
        BLOCK_ACTIONS => {
            let payload: BlockActionPayload =
                serde_json::from_str(&blob).map_err(|e| ClassifyError::InvalidBlockActions {
                    message: e.to_string(),
                })?;
            if payload.actions.is_empty() {
                return Err(ClassifyError::EmptyActions);
            }
            Ok(Classified::BlockActions(payload))
        }
        VIEW_SUBMISSION => {
            let payload: ViewSubmissionPayload = serde_json::from_str(&blob).map_err(|e| {
                ClassifyError::InvalidViewSubmission {
                    message: e.to_string(),
                }
            })?;
            Ok(Classified::ViewSubmission(payload))
        }
        other => Err(ClassifyError::UnknownInteractionType {
            interaction_type: other.to_string(),
        }),
    }
}

// ============================================================================
// Shared Types
// ============================================================================

/// Workspace the interaction happened in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionTeam {
    pub id: String,
    pub domain: String,
}

/// User who triggered the interaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionUser {
    pub id: String,
    pub username: String,
    pub team_id: String,
}

/// Conversation an interaction came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Channel {
    pub id: String,
    pub name: String,
}

// ============================================================================
// Block Actions
// ============================================================================

/// A single interactive element activation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockAction {
    pub action_id: String,
    pub block_id: String,
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_option: Option<Value>,
    pub action_ts: String,
}

/// Payload for `block_actions` interactions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockActionPayload {
    pub team: InteractionTeam,
    pub user: InteractionUser,
    pub trigger_id: String,
    pub api_app_id: String,
    pub container: Value,
    pub actions: Vec<BlockAction>,
    pub hash: String,
    pub enterprise: Option<Value>,
    /// Absent for actions inside modals.
    pub channel: Option<Channel>,
    pub message: Option<Value>,
    pub view: Option<View>,
    pub state: Option<Value>,
    pub response_url: Option<String>,
}

impl BlockActionPayload {
    /// Identifier of the first action, used for routing.
    pub fn action_id(&self) -> Option<&str> {
        self.actions.first().map(|action| action.action_id.as_str())
    }
}

// ============================================================================
// Views
// ============================================================================

/// Submitted input values keyed by block ID then action ID.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    pub values: HashMap<String, HashMap<String, Value>>,
}

impl ViewState {
    /// Plain-text `value` of an input element, if present.
    pub fn text_value(&self, block_id: &str, action_id: &str) -> Option<&str> {
        self.values
            .get(block_id)?
            .get(action_id)?
            .get("value")?
            .as_str()
    }
}

/// Modal or home tab view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct View {
    pub id: String,
    #[serde(rename = "type")]
    pub view_type: String,
    pub callback_id: String,
    pub private_metadata: String,
    pub hash: String,
    pub state: ViewState,
    pub blocks: Vec<Value>,
}

/// Payload for `view_submission` interactions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSubmissionPayload {
    pub team: InteractionTeam,
    pub user: InteractionUser,
    pub trigger_id: String,
    pub api_app_id: String,
    pub view: View,
}

/// `response_action` values accepted in a view submission response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewResponseType {
    Clear,
    Errors,
    Update,
    Push,
}

/// Immediate response to a view submission.
///
/// # Examples
///
/// ```
/// use slack_bot_sdk::payloads::ViewResponseAction;
///
/// let clear = ViewResponseAction::clear();
/// assert_eq!(serde_json::to_string(&clear).unwrap(), r#"{"response_action":"clear"}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewResponseAction {
    pub response_action: ViewResponseType,
    /// Block ID to validation message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<Value>,
}

impl ViewResponseAction {
    /// Close every view in the modal stack.
    pub fn clear() -> Self {
        Self {
            response_action: ViewResponseType::Clear,
            errors: None,
            view: None,
        }
    }

    /// Keep the modal open and show validation errors.
    pub fn errors<I, K, V>(errors: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            response_action: ViewResponseType::Errors,
            errors: Some(
                errors
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
            view: None,
        }
    }

    /// Replace the submitted view.
    pub fn update(view: Value) -> Self {
        Self {
            response_action: ViewResponseType::Update,
            errors: None,
            view: Some(view),
        }
    }

    /// Push a new view onto the modal stack.
    pub fn push(view: Value) -> Self {
        Self {
            response_action: ViewResponseType::Push,
            errors: None,
            view: Some(view),
        }
    }
}

#[cfg(test)]
#[path = "interaction_tests.rs"]
mod tests;
