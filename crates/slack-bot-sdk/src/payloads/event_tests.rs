//! Tests for Events API decoding.

use super::*;

#[test]
fn test_url_verification() {
    let body = br#"{"token":"Jhj5dZrVaK7ZwHHjRyZWjbDl","challenge":"abc123","type":"url_verification"}"#;

    let classified = classify_event(body).unwrap();

    assert!(matches!(
        classified,
        Classified::UrlVerification { ref challenge } if challenge == "abc123"
    ));
}

#[test]
fn test_url_verification_without_challenge_echoes_empty() {
    let classified = classify_event(br#"{"type":"url_verification"}"#).unwrap();

    assert!(matches!(
        classified,
        Classified::UrlVerification { ref challenge } if challenge.is_empty()
    ));
}

#[test]
fn test_app_rate_limited() {
    let body = br#"{"token":"x","type":"app_rate_limited","team_id":"T123456","minute_rate_limited":1518467820,"api_app_id":"A123456"}"#;

    let classified = classify_event(body).unwrap();

    assert!(matches!(
        classified,
        Classified::AppRateLimited {
            minute_rate_limited: 1518467820
        }
    ));
}

#[test]
fn test_event_callback_preserves_raw_inner_event() {
    // Arrange
    let body = br#"{
        "type": "event_callback",
        "team_id": "T061EG9R6",
        "api_app_id": "A0PNCHHK2",
        "event_id": "Ev0PV52K25",
        "event_time": 1357290914,
        "event_context": "EC12345",
        "authorizations": [{"team_id": "T061EG9R6", "user_id": "U0JD3BPNC", "is_bot": true}],
        "event": {"type": "message", "channel": "D0PNCRP9N", "user": "U061F7AUR", "text": "hi", "ts": "1355517523.000005", "channel_type": "im"}
    }"#;

    // Act
    let classified = classify_event(body).unwrap();

    // Assert
    let payload = match classified {
        Classified::EventCallback(payload) => payload,
        other => panic!("expected event callback, got {:?}", other),
    };
    assert_eq!(payload.event_type(), "message");
    assert_eq!(payload.team_id, "T061EG9R6");
    assert_eq!(payload.event_id, "Ev0PV52K25");
    assert_eq!(payload.event_time, 1357290914);
    assert_eq!(payload.authorizations.len(), 1);
    assert!(payload.authorizations[0].is_bot);
    assert!(payload.raw_event().starts_with(r#"{"type": "message""#));

    let message: MessageEvent = payload.parse_event().unwrap();
    assert_eq!(message.text, "hi");
    assert_eq!(message.channel, "D0PNCRP9N");
    assert!(!message.is_bot());
}

#[test]
fn test_unknown_outer_type() {
    let result = classify_event(br#"{"type":"mystery"}"#);

    match result {
        Err(ClassifyError::UnknownEventType { event_type }) => assert_eq!(event_type, "mystery"),
        other => panic!("expected UnknownEventType, got {:?}", other),
    }
}

#[test]
fn test_missing_outer_type_is_unknown_outer_type() {
    let result = classify_event(br#"{"team_id":"T1"}"#);

    match result {
        Err(error @ ClassifyError::UnknownEventType { .. }) => {
            assert_eq!(error.status_code(), 400);
            assert_eq!(error.public_message(), "Unknown outer event type");
        }
        other => panic!("expected UnknownEventType, got {:?}", other),
    }
}

#[test]
fn test_invalid_json_envelope() {
    let result = classify_event(b"{not json");

    match result {
        Err(error) => assert_eq!(error.public_message(), "Invalid payload"),
        Ok(other) => panic!("expected error, got {:?}", other),
    }
}

#[test]
fn test_inner_event_without_type_has_empty_routing_key() {
    let body = br#"{"type":"event_callback","team_id":"T1","event":{"channel":"C1"}}"#;

    let classified = classify_event(body).unwrap();

    match classified {
        Classified::EventCallback(payload) => {
            assert_eq!(payload.event_type(), "");
            assert_eq!(payload.raw_event(), r#"{"channel":"C1"}"#);
        }
        other => panic!("expected event callback, got {:?}", other),
    }
}

#[test]
fn test_inner_event_that_is_not_an_object_is_bad_request() {
    let result = classify_event(br#"{"type":"event_callback","event":"message"}"#);

    match result {
        Err(error @ ClassifyError::InvalidInnerEvent { .. }) => {
            assert_eq!(error.status_code(), 400);
            assert_eq!(error.public_message(), "Bad Request");
        }
        other => panic!("expected InvalidInnerEvent, got {:?}", other),
    }
}

#[test]
fn test_event_callback_without_event_is_bad_request() {
    let result = classify_event(br#"{"type":"event_callback","team_id":"T1"}"#);

    assert!(matches!(result, Err(ClassifyError::InvalidInnerEvent { .. })));
}

#[test]
fn test_message_event_bot_detection() {
    let bot: MessageEvent =
        serde_json::from_str(r#"{"type":"message","text":"beep","bot_id":"B123"}"#).unwrap();
    let empty_bot_id: MessageEvent =
        serde_json::from_str(r#"{"type":"message","text":"hi","bot_id":""}"#).unwrap();

    assert!(bot.is_bot());
    assert!(!empty_bot_id.is_bot());
}
