use accesslog_core::entry::Entry;
use accesslog_core::event::{ActionEvent, ActionNotification, EventKind, Protocol, WebSocketAction};
use accesslog_core::error::AccessLogError;
use chrono::Utc;

fn notification(line: &str) -> ActionNotification {
    serde_json::from_str(line).unwrap()
}

// =============================================================================
// Notification → Entry
// =============================================================================

#[test]
fn test_http_complete_notification_to_entry() {
    let n = notification(
        r#"{"protocol":"http","action":"complete","details":{"client":"1.2.3.4","method":"GET","path":"/x","status":200,"size":512,"time_taken":0.25}}"#,
    );
    let event = ActionEvent::from_details(&n.protocol, &n.action, &n.details)
        .unwrap()
        .unwrap();
    assert_eq!(event.kind(), EventKind::HttpComplete);

    let entry = Entry::from_event(&event, Utc::now()).unwrap();
    assert_eq!(entry.host(), "1.2.3.4");
    assert_eq!(entry.request_method(), "GET");
    assert_eq!(entry.request_path(), "/x");
    assert_eq!(entry.protocol(), Protocol::Http);
    assert_eq!(entry.status(), Some(200));
    assert_eq!(entry.response_size(), Some(512));
    assert_eq!(entry.latency().map(|d| d.as_millis()), Some(250));
    assert!(entry.request_id().is_none());
}

#[test]
fn test_websocket_connecting_notification_to_entry() {
    let n = notification(
        r#"{"protocol":"websocket","action":"connecting","details":{"client":"5.6.7.8","path":"/ws"}}"#,
    );
    let event = ActionEvent::from_details(&n.protocol, &n.action, &n.details)
        .unwrap()
        .unwrap();
    assert_eq!(event.kind(), EventKind::WebSocket(WebSocketAction::Connecting));

    let entry = Entry::from_event(&event, Utc::now()).unwrap();
    assert_eq!(entry.request_method(), "WSCONNECTING");
    assert_eq!(entry.protocol(), Protocol::WebSocket);
    assert!(entry.status().is_none());
}

#[test]
fn test_unrecognized_protocol_produces_no_event() {
    let n = notification(
        r#"{"protocol":"sse","action":"complete","details":{"client":"1.2.3.4","method":"GET","path":"/x","status":200,"size":1}}"#,
    );
    assert!(ActionEvent::from_details(&n.protocol, &n.action, &n.details)
        .unwrap()
        .is_none());
}

#[test]
fn test_websocket_without_client_is_missing_field() {
    let n = notification(r#"{"protocol":"websocket","action":"connected","details":{"path":"/ws"}}"#);
    let err = ActionEvent::from_details(&n.protocol, &n.action, &n.details).unwrap_err();
    match err {
        AccessLogError::MissingField { field, protocol, action } => {
            assert_eq!(field, "client");
            assert_eq!(protocol, "websocket");
            assert_eq!(action, "connected");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
