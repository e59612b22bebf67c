//! Tests for the acknowledgment slot.

use super::*;
use serde::ser::Error as _;

struct Unserializable;

impl Serialize for Unserializable {
    fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(S::Error::custom("cannot encode"))
    }
}

#[tokio::test]
async fn test_first_ack_wins() {
    // Arrange
    let (ack, completion) = Acknowledger::channel();

    // Act
    let first = ack.ack_with_payload(Bytes::from_static(b"{\"a\":1}"));
    let second = ack.ack();
    let third = ack.fail("late failure");

    // Assert
    assert!(first);
    assert!(!second);
    assert!(!third);
    assert_eq!(
        completion.await.unwrap(),
        Completion::Acknowledged(AckSignal::Payload(Bytes::from_static(b"{\"a\":1}")))
    );
}

#[tokio::test]
async fn test_failure_before_ack_wins() {
    let (ack, completion) = Acknowledger::channel();

    assert!(ack.fail("boom"));
    assert!(!ack.ack());

    assert_eq!(
        completion.await.unwrap(),
        Completion::Failed("boom".to_string())
    );
}

#[tokio::test]
async fn test_clones_share_one_slot() {
    let (ack, completion) = Acknowledger::channel();
    let clone = ack.clone();

    assert!(clone.ack());
    assert!(ack.is_settled());
    assert!(!ack.ack());

    assert_eq!(
        completion.await.unwrap(),
        Completion::Acknowledged(AckSignal::Empty)
    );
}

#[tokio::test]
async fn test_dropping_all_clones_closes_channel() {
    let (ack, completion) = Acknowledger::channel();
    let clone = ack.clone();

    drop(ack);
    drop(clone);

    assert!(completion.await.is_err());
}

#[tokio::test]
async fn test_ack_json_serializes_action() {
    let (ack, completion) = Acknowledger::channel();

    assert!(ack.ack_json(&serde_json::json!({ "response_action": "clear" })));

    assert_eq!(
        completion.await.unwrap(),
        Completion::Acknowledged(AckSignal::Payload(Bytes::from_static(
            b"{\"response_action\":\"clear\"}"
        )))
    );
}

#[tokio::test]
async fn test_ack_json_serialization_failure_settles_as_failed() {
    let (ack, completion) = Acknowledger::channel();

    assert!(ack.ack_json(&Unserializable));
    assert!(!ack.ack());

    match completion.await.unwrap() {
        Completion::Failed(reason) => assert!(reason.contains("cannot encode")),
        other => panic!("expected failure, got {:?}", other),
    }
}

#[test]
fn test_settling_after_receiver_dropped_is_harmless() {
    let (ack, completion) = Acknowledger::channel();
    drop(completion);

    assert!(ack.ack());
    assert!(ack.is_settled());
}

#[tokio::test]
async fn test_concurrent_settlement_delivers_exactly_once() {
    let (ack, completion) = Acknowledger::channel();

    let mut tasks = Vec::new();
    for i in 0..16 {
        let ack = ack.clone();
        tasks.push(tokio::spawn(async move {
            if i % 2 == 0 {
                ack.ack()
            } else {
                ack.fail(format!("failure {}", i))
            }
        }));
    }

    let mut winners = 0;
    for task in tasks {
        if task.await.unwrap() {
            winners += 1;
        }
    }

    assert_eq!(winners, 1);
    assert!(completion.await.is_ok());
}
