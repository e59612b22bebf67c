//! Error types for Slack Bot SDK operations.
//!
//! This module defines the error types used throughout the SDK. Errors raised
//! while handling an inbound webhook carry the HTTP status and the fixed public
//! body text they map to, so the receiver never leaks internal detail to the
//! caller.

use thiserror::Error;

use crate::payloads::RequestKind;

/// Errors while constructing secrets from configuration.
#[derive(Debug, Error)]
pub enum SecretError {
    /// The secret value was empty.
    #[error("Secret must not be empty: {key}")]
    Empty { key: String },

    /// The secret exists but has an invalid format.
    #[error("Invalid secret format: {key}")]
    InvalidFormat { key: String },
}

/// Errors while resolving the bot credential for a workspace.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// No credential is known for the workspace.
    #[error("No bot credential found for team {team_id}")]
    NotFound { team_id: String },

    /// The credential store could not be reached (retryable).
    #[error("Credential store unavailable: {0}")]
    Unavailable(String),
}

impl CredentialError {
    /// Check if this error represents a transient condition.
    ///
    /// Only `Unavailable` is considered transient.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Errors during Slack Web API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP error response from the Slack API.
    #[error("HTTP error: {status} - {message}")]
    HttpError { status: u16, message: String },

    /// Rate limit exceeded. Operations should wait before retrying.
    #[error("Rate limited. Retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    /// The API answered `"ok": false`.
    #[error("Slack API method {method} failed: {error}")]
    Platform { method: String, error: String },

    /// Request to the Slack API timed out.
    #[error("Request timeout")]
    Timeout,

    /// Failed to encode or parse JSON.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// HTTP client error (network, TLS, etc.).
    #[error("HTTP client error: {0}")]
    HttpClientError(#[source] reqwest::Error),
}

impl ApiError {
    /// Check if this error represents a transient condition that may succeed if retried.
    ///
    /// Transient conditions include:
    /// - Server errors (5xx)
    /// - Rate limiting (429)
    /// - Request timeouts
    /// - Network/transport errors
    pub fn is_transient(&self) -> bool {
        match self {
            Self::HttpError { status, .. } => *status >= 500 || *status == 429,
            Self::RateLimited { .. } => true,
            Self::Platform { .. } => false,
            Self::Timeout => true,
            Self::JsonError(_) => false,
            Self::HttpClientError(_) => true,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::HttpClientError(e)
        }
    }
}

/// Webhook signature verification failures.
///
/// Every variant maps to HTTP 401 `Unauthenticated`; the variants exist for
/// logging only.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Missing x-slack-request-timestamp header")]
    MissingTimestamp,

    #[error("Missing x-slack-signature header")]
    MissingSignature,

    #[error("Signature does not match request body")]
    SignatureMismatch,

    /// Only reported when a replay window is configured.
    #[error("Request timestamp is not a Unix time: {value}")]
    InvalidTimestamp { value: String },

    /// Only reported when a replay window is configured.
    #[error("Request timestamp is {age_seconds}s old, outside the replay window")]
    StaleTimestamp { age_seconds: i64 },

    #[error("HMAC computation failed: {message}")]
    HmacError { message: String },
}

/// Errors raised while classifying an inbound webhook body.
///
/// Every variant is terminal for the request. Use [`ClassifyError::status_code`]
/// and [`ClassifyError::public_message`] to build the HTTP response; the
/// `Display` text is for logs only.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// Slash command body is not valid form data.
    #[error("Invalid command form body: {message}")]
    InvalidForm { message: String },

    /// Slash command is missing a required field.
    #[error("Command payload missing required field: {field}")]
    MissingField { field: &'static str },

    /// The interaction `payload` field is missing or its discriminator is not JSON.
    #[error("Invalid interaction envelope: {message}")]
    InvalidInteractionEnvelope { message: String },

    /// The interaction type is not one this receiver dispatches.
    #[error("Unknown interaction type: {interaction_type}")]
    UnknownInteractionType { interaction_type: String },

    /// Block actions payload did not decode.
    #[error("Invalid block actions payload: {message}")]
    InvalidBlockActions { message: String },

    /// Block actions payload had no actions to route on.
    #[error("Block actions payload contains no actions")]
    EmptyActions,

    /// View submission payload did not decode.
    #[error("Invalid view submission payload: {message}")]
    InvalidViewSubmission { message: String },

    /// Events body did not decode.
    #[error("Invalid event envelope: {message}")]
    InvalidEventEnvelope { message: String },

    /// Events envelope carried an unknown outer type.
    #[error("Unknown outer event type: {event_type}")]
    UnknownEventType { event_type: String },

    /// The inner event type could not be decoded.
    #[error("Invalid inner event: {message}")]
    InvalidInnerEvent { message: String },
}

impl ClassifyError {
    /// HTTP status code this failure maps to.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::UnknownInteractionType { .. } => 500,
            _ => 400,
        }
    }

    /// Fixed body text returned to the caller.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::InvalidForm { .. } | Self::MissingField { .. } => "Bad Request",
            Self::InvalidInteractionEnvelope { .. } => "Bad Payload",
            Self::UnknownInteractionType { .. } => "Unknown interaction type",
            Self::InvalidBlockActions { .. }
            | Self::EmptyActions
            | Self::InvalidViewSubmission { .. }
            | Self::InvalidEventEnvelope { .. } => "Invalid payload",
            Self::UnknownEventType { .. } => "Unknown outer event type",
            Self::InvalidInnerEvent { .. } => "Bad Request",
        }
    }
}

/// Handler registration failures.
///
/// Registration happens once at start-up; the panicking `HandlerRegistry`
/// methods turn this into a contract violation.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// A handler is already registered for the routing key.
    #[error("{kind} handler for '{key}' has already been registered")]
    Duplicate { kind: RequestKind, key: String },

    /// Routing keys must not be empty.
    #[error("{kind} routing key must not be empty")]
    EmptyKey { kind: RequestKind },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
