//! Tests for handler registration and lookup.

use super::*;
use crate::webhook::handler::HandlerResult;

async fn command_handler(req: CommandRequest) -> HandlerResult {
    req.ack();
    Ok(())
}

async fn action_handler(req: BlockActionRequest) -> HandlerResult {
    req.ack();
    Ok(())
}

async fn view_handler(req: ViewSubmissionRequest) -> HandlerResult {
    req.ack();
    Ok(())
}

async fn event_handler(req: EventRequest) -> HandlerResult {
    req.ack();
    Ok(())
}

// ============================================================================
// Registration
// ============================================================================

#[test]
fn test_new_registry_is_empty() {
    let registry = HandlerRegistry::new();

    assert!(registry.is_empty());
    assert_eq!(registry.len(), 0);
    assert!(registry.command_handler("/start").is_none());
}

#[test]
fn test_register_each_kind() {
    // Act
    let mut registry = HandlerRegistry::new();
    registry
        .command("/start", command_handler)
        .block_action("start-button", action_handler)
        .view_submission("form-modal", view_handler)
        .event("message", event_handler);

    // Assert
    assert_eq!(registry.len(), 4);
    assert!(registry.command_handler("/start").is_some());
    assert!(registry.block_action_handler("start-button").is_some());
    assert!(registry.view_submission_handler("form-modal").is_some());
    assert!(registry.event_handler("message").is_some());
}

#[test]
fn test_keys_are_scoped_per_kind() {
    let mut registry = HandlerRegistry::new();
    registry
        .block_action("shared", action_handler)
        .view_submission("shared", view_handler);

    assert!(registry.contains(RequestKind::BlockAction, "shared"));
    assert!(registry.contains(RequestKind::ViewSubmission, "shared"));
    assert!(!registry.contains(RequestKind::Command, "shared"));
    assert!(!registry.contains(RequestKind::Event, "shared"));
}

#[test]
fn test_lookup_is_exact_match() {
    let mut registry = HandlerRegistry::new();
    registry.command("/start", command_handler);

    assert!(registry.command_handler("/START").is_none());
    assert!(registry.command_handler("start").is_none());
}

// ============================================================================
// Collisions
// ============================================================================

#[test]
fn test_try_register_reports_duplicate() {
    let mut registry = HandlerRegistry::new();
    registry.try_event("message", event_handler).unwrap();

    let result = registry.try_event("message", event_handler);

    match result {
        Err(RegistrationError::Duplicate { kind, key }) => {
            assert_eq!(kind, RequestKind::Event);
            assert_eq!(key, "message");
        }
        Err(other) => panic!("expected Duplicate, got {:?}", other),
        Ok(_) => panic!("expected Duplicate, got Ok"),
    }
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_try_register_rejects_empty_key() {
    let mut registry = HandlerRegistry::new();

    let result = registry.try_command("", command_handler);

    assert!(matches!(
        result,
        Err(RegistrationError::EmptyKey {
            kind: RequestKind::Command
        })
    ));
}

#[test]
#[should_panic(expected = "command handler for '/start' has already been registered")]
fn test_duplicate_command_panics() {
    let mut registry = HandlerRegistry::new();
    registry.command("/start", command_handler);
    registry.command("/start", command_handler);
}

#[test]
#[should_panic(expected = "view submission handler for 'form-modal' has already been registered")]
fn test_duplicate_view_submission_panics() {
    let mut registry = HandlerRegistry::new();
    registry.view_submission("form-modal", view_handler);
    registry.view_submission("form-modal", view_handler);
}

#[test]
fn test_debug_lists_keys() {
    let mut registry = HandlerRegistry::new();
    registry.command("/start", command_handler);

    let debug = format!("{:?}", registry);

    assert!(debug.contains("/start"));
}
