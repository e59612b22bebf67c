//! Tests for SDK error types.

use super::*;

// ============================================================================
// ApiError Tests
// ============================================================================

#[test]
fn test_api_error_server_errors_are_transient() {
    let error = ApiError::HttpError {
        status: 503,
        message: "Service Unavailable".to_string(),
    };
    assert!(error.is_transient());
}

#[test]
fn test_api_error_client_errors_are_not_transient() {
    let error = ApiError::HttpError {
        status: 404,
        message: "Not Found".to_string(),
    };
    assert!(!error.is_transient());
}

#[test]
fn test_api_error_rate_limit_is_transient() {
    assert!(ApiError::RateLimited {
        retry_after_seconds: 30
    }
    .is_transient());
    assert!(ApiError::HttpError {
        status: 429,
        message: "Too Many Requests".to_string()
    }
    .is_transient());
}

#[test]
fn test_api_error_platform_failure_is_not_transient() {
    let error = ApiError::Platform {
        method: "chat.postEphemeral".to_string(),
        error: "channel_not_found".to_string(),
    };
    assert!(!error.is_transient());
    assert_eq!(
        error.to_string(),
        "Slack API method chat.postEphemeral failed: channel_not_found"
    );
}

// ============================================================================
// CredentialError Tests
// ============================================================================

#[test]
fn test_credential_error_transience() {
    assert!(CredentialError::Unavailable("timeout".to_string()).is_transient());
    assert!(!CredentialError::NotFound {
        team_id: "T1".to_string()
    }
    .is_transient());
}

// ============================================================================
// ClassifyError Tests
// ============================================================================

#[test]
fn test_classify_error_command_failures_map_to_bad_request() {
    let missing = ClassifyError::MissingField { field: "team_id" };
    assert_eq!(missing.status_code(), 400);
    assert_eq!(missing.public_message(), "Bad Request");

    let invalid = ClassifyError::InvalidForm {
        message: "bad".to_string(),
    };
    assert_eq!(invalid.status_code(), 400);
    assert_eq!(invalid.public_message(), "Bad Request");
}

#[test]
fn test_classify_error_unknown_interaction_type_is_server_error() {
    let error = ClassifyError::UnknownInteractionType {
        interaction_type: "shortcut".to_string(),
    };
    assert_eq!(error.status_code(), 500);
    assert_eq!(error.public_message(), "Unknown interaction type");
}

#[test]
fn test_classify_error_event_failures() {
    let unknown = ClassifyError::UnknownEventType {
        event_type: "mystery".to_string(),
    };
    assert_eq!(unknown.status_code(), 400);
    assert_eq!(unknown.public_message(), "Unknown outer event type");

    let inner = ClassifyError::InvalidInnerEvent {
        message: "missing type".to_string(),
    };
    assert_eq!(inner.public_message(), "Bad Request");

    let envelope = ClassifyError::InvalidEventEnvelope {
        message: "eof".to_string(),
    };
    assert_eq!(envelope.public_message(), "Invalid payload");
}

#[test]
fn test_classify_error_empty_actions_message() {
    assert_eq!(ClassifyError::EmptyActions.public_message(), "Invalid payload");
    assert_eq!(ClassifyError::EmptyActions.status_code(), 400);
}

// ============================================================================
// RegistrationError Tests
// ============================================================================

#[test]
fn test_registration_error_display_names_kind_and_key() {
    let error = RegistrationError::Duplicate {
        kind: RequestKind::Command,
        key: "/help".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "command handler for '/help' has already been registered"
    );
}
