//! Integration tests for the slash command route

mod common;

use axum::http::StatusCode;
use common::*;
use slack_bot_sdk::payloads::CommandResponseAction;
use slack_bot_sdk::webhook::{CommandRequest, HandlerError, HandlerRegistry, HandlerResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

async fn howdy(req: CommandRequest) -> HandlerResult {
    req.ack_with_action(CommandResponseAction::in_channel("Howdy!"));
    Ok(())
}

async fn broken(_req: CommandRequest) -> HandlerResult {
    Err("database unavailable".into())
}

#[tokio::test]
async fn test_ack_with_action_round_trip() {
    // Arrange
    let mut registry = HandlerRegistry::new();
    registry.command("/howdy", howdy);
    let gateway = TestGateway::new(registry);

    // Act
    let response = gateway
        .send(signed_post("/commands", &command_body("/howdy")))
        .await;

    // Assert
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type.as_deref(), Some("application/json"));
    assert_eq!(response.body, r#"{"response_type":"in_channel","text":"Howdy!"}"#);
}

#[tokio::test]
async fn test_plain_ack_has_empty_body() {
    let mut registry = HandlerRegistry::new();
    registry.command("/quiet", |req: CommandRequest| async move {
        req.ack();
        Ok::<(), HandlerError>(())
    });
    let gateway = TestGateway::new(registry);

    let response = gateway
        .send(signed_post("/commands", &command_body("/quiet")))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type, None);
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn test_handler_error_returns_500_and_one_ephemeral_notice() {
    let mut registry = HandlerRegistry::new();
    registry.command("/broken", broken);
    let gateway = TestGateway::new(registry);

    let response = gateway
        .send(signed_post("/commands", &command_body("/broken")))
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body, "An error occurred");

    let calls = gateway.client.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, "chat.postEphemeral");
    assert_eq!(calls[0].body["channel"], "C1");
    assert_eq!(calls[0].body["user"], "U1");
    assert_eq!(calls[0].body["text"], "An error occurred");
}

#[tokio::test]
async fn test_configured_error_message_is_posted() {
    let mut config = test_config();
    config.slack.error_message = "Something went wrong, try again".to_string();
    let mut registry = HandlerRegistry::new();
    registry.command("/broken", broken);
    let gateway = TestGateway::with_config(config, registry);

    gateway
        .send(signed_post("/commands", &command_body("/broken")))
        .await;

    let calls = gateway.client.calls();
    assert_eq!(calls[0].body["text"], "Something went wrong, try again");
}

#[tokio::test]
async fn test_unknown_command_is_rejected() {
    let gateway = TestGateway::new(HandlerRegistry::new());

    let response = gateway
        .send(signed_post("/commands", &command_body("/nope")))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, "Invalid command");
}

#[tokio::test]
async fn test_missing_required_field_never_reaches_handler() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let mut registry = HandlerRegistry::new();
    registry.command("/start", move |req: CommandRequest| {
        counter.fetch_add(1, Ordering::SeqCst);
        async move {
            req.ack();
            Ok::<(), HandlerError>(())
        }
    });
    let gateway = TestGateway::new(registry);

    for body in [
        "command=%2Fstart&team_id=T1&channel_id=C1&user_id=U1",
        "command=%2Fstart&team_id=T1&channel_id=C1&trigger_id=1.2",
        "",
    ] {
        let response = gateway.send(signed_post("/commands", body)).await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{:?}", body);
        assert_eq!(response.body, "Bad Request");
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_credential_failure_is_internal_error() {
    let mut registry = HandlerRegistry::new();
    registry.command("/howdy", howdy);
    let gateway = TestGateway::with_credentials(registry, Arc::new(FailingCredentials));

    let response = gateway
        .send(signed_post("/commands", &command_body("/howdy")))
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body, "An error occurred");
    assert!(gateway.client.calls().is_empty());
}

#[tokio::test]
async fn test_response_is_sent_before_handler_finishes() {
    let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();
    let release_rx = Arc::new(tokio::sync::Mutex::new(Some(release_rx)));
    let mut registry = HandlerRegistry::new();
    registry.command("/slow", move |req: CommandRequest| {
        let release_rx = release_rx.clone();
        async move {
            req.ack_with_action(CommandResponseAction::ephemeral("Working on it"));
            if let Some(rx) = release_rx.lock().await.take() {
                let _ = rx.await;
            }
            req.client.post_message("C1", "Done").await?;
            Ok::<(), HandlerError>(())
        }
    });
    let gateway = TestGateway::new(registry);

    let response = gateway
        .send(signed_post("/commands", &command_body("/slow")))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(gateway.client.calls().is_empty());

    release_tx.send(()).unwrap();
    let calls = gateway.client.wait_for_calls(1).await;
    assert_eq!(calls[0].method, "chat.postMessage");
    assert_eq!(calls[0].body["text"], "Done");
}
