use crate::error::{AccessLogError, Result};
use crate::event::{ActionEvent, Protocol};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// One normalized, immutable access log entry.
///
/// Built from a classified [`ActionEvent`] and consumed once by the record
/// writer. `status`, `response_size` and `latency` are only ever set for
/// completed HTTP requests.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    host: String,
    timestamp: DateTime<Utc>,
    request_method: String,
    request_path: String,
    protocol: Protocol,
    status: Option<u16>,
    response_size: Option<u64>,
    latency: Option<Duration>,
    request_id: Option<String>,
    ident: Option<String>,
    user: Option<String>,
}

impl Entry {
    /// Normalize an event captured at `timestamp`.
    ///
    /// Fails with [`AccessLogError::MissingField`] if a typed event was built
    /// with an empty client, path or method.
    pub fn from_event(event: &ActionEvent, timestamp: DateTime<Utc>) -> Result<Self> {
        let kind = event.kind();
        let require = |field: &'static str, value: &str| -> Result<String> {
            if value.is_empty() {
                Err(AccessLogError::missing(field, kind.protocol().as_str(), kind.action()))
            } else {
                Ok(value.to_string())
            }
        };

        let host = require("client", event.client())?;
        let request_path = require("path", event.path())?;
        let request_method = require("method", event.request_method())?;

        let mut entry = Entry {
            host,
            timestamp,
            request_method,
            request_path,
            protocol: kind.protocol(),
            status: None,
            response_size: None,
            latency: None,
            request_id: None,
            ident: None,
            user: None,
        };

        if let ActionEvent::HttpComplete(http) = event {
            entry.status = Some(http.status);
            entry.response_size = Some(http.size);
            entry.latency = http.time_taken;
            entry.request_id = http.request_id.clone().filter(|id| !id.is_empty());
        }

        Ok(entry)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn request_method(&self) -> &str {
        &self.request_method
    }

    pub fn request_path(&self) -> &str {
        &self.request_path
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn response_size(&self) -> Option<u64> {
        self.response_size
    }

    pub fn latency(&self) -> Option<Duration> {
        self.latency
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    pub fn ident(&self) -> Option<&str> {
        self.ident.as_deref()
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{HttpComplete, WebSocketAction, WebSocketEvent};
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    fn http() -> HttpComplete {
        HttpComplete {
            client: "1.2.3.4".into(),
            method: "POST".into(),
            path: "/submit".into(),
            status: 201,
            size: 64,
            time_taken: Some(Duration::from_millis(12)),
            request_id: Some("abc".into()),
        }
    }

    #[test]
    fn http_entry_populates_response_fields() {
        let entry = Entry::from_event(&ActionEvent::HttpComplete(http()), at()).unwrap();
        assert_eq!(entry.host(), "1.2.3.4");
        assert_eq!(entry.timestamp(), at());
        assert_eq!(entry.request_method(), "POST");
        assert_eq!(entry.request_path(), "/submit");
        assert_eq!(entry.protocol(), Protocol::Http);
        assert_eq!(entry.status(), Some(201));
        assert_eq!(entry.response_size(), Some(64));
        assert_eq!(entry.latency(), Some(Duration::from_millis(12)));
        assert_eq!(entry.request_id(), Some("abc"));
        assert!(entry.ident().is_none());
        assert!(entry.user().is_none());
    }

    #[test]
    fn websocket_entry_has_no_response_fields() {
        let event = ActionEvent::WebSocket(WebSocketEvent {
            action: WebSocketAction::Disconnected,
            client: "5.6.7.8".into(),
            path: "/ws".into(),
        });
        let entry = Entry::from_event(&event, at()).unwrap();
        assert_eq!(entry.request_method(), "WSDISCONNECT");
        assert_eq!(entry.protocol(), Protocol::WebSocket);
        assert!(entry.status().is_none());
        assert!(entry.response_size().is_none());
        assert!(entry.latency().is_none());
        assert!(entry.request_id().is_none());
    }

    #[test]
    fn typed_event_with_empty_client_is_rejected() {
        let mut event = http();
        event.client.clear();
        let err = Entry::from_event(&ActionEvent::HttpComplete(event), at()).unwrap_err();
        assert!(matches!(err, AccessLogError::MissingField { field: "client", .. }));
    }

    #[test]
    fn typed_event_with_empty_method_is_rejected() {
        let mut event = http();
        event.method.clear();
        let err = Entry::from_event(&ActionEvent::HttpComplete(event), at()).unwrap_err();
        assert!(matches!(err, AccessLogError::MissingField { field: "method", .. }));
    }

    #[test]
    fn empty_typed_request_id_becomes_absent() {
        let mut event = http();
        event.request_id = Some(String::new());
        let entry = Entry::from_event(&ActionEvent::HttpComplete(event), at()).unwrap();
        assert!(entry.request_id().is_none());
    }
}
