//! Typed server lifecycle events.
//!
//! The server reports each event as a `(protocol, action, details)` triple
//! where `details` is a loosely-typed JSON object. [`ActionEvent::from_details`]
//! matches the pair against the fixed table of recognized events and lifts
//! the bag into one struct per table row:
//!
//! | protocol    | action         | request method   |
//! |-------------|----------------|------------------|
//! | `http`      | `complete`     | `details.method` |
//! | `websocket` | `connecting`   | `WSCONNECTING`   |
//! | `websocket` | `rejected`     | `WSREJECT`       |
//! | `websocket` | `connected`    | `WSCONNECT`      |
//! | `websocket` | `disconnected` | `WSDISCONNECT`   |
//!
//! Any other pair is not an error; it simply produces no event.

use crate::error::{AccessLogError, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;

/// The loosely-typed per-event payload supplied by the server.
pub type Details = Map<String, Value>;

/// Highest value accepted for an HTTP status code.
const MAX_STATUS: u64 = 999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Http,
    WebSocket,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::WebSocket => "websocket",
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// WebSocket connection lifecycle stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WebSocketAction {
    /// Handshake received, not yet accepted
    Connecting,
    /// Handshake refused by the application
    Rejected,
    /// Handshake accepted, socket open
    Connected,
    /// Socket closed by either side
    Disconnected,
}

impl WebSocketAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebSocketAction::Connecting => "connecting",
            WebSocketAction::Rejected => "rejected",
            WebSocketAction::Connected => "connected",
            WebSocketAction::Disconnected => "disconnected",
        }
    }

    /// Synthetic token written in place of an HTTP verb.
    pub fn marker(&self) -> &'static str {
        match self {
            WebSocketAction::Connecting => "WSCONNECTING",
            WebSocketAction::Rejected => "WSREJECT",
            WebSocketAction::Connected => "WSCONNECT",
            WebSocketAction::Disconnected => "WSDISCONNECT",
        }
    }

    pub fn parse(action: &str) -> Option<Self> {
        WebSocketAction::all()
            .iter()
            .copied()
            .find(|a| a.as_str() == action)
    }

    pub fn all() -> &'static [WebSocketAction] {
        &[
            WebSocketAction::Connecting,
            WebSocketAction::Rejected,
            WebSocketAction::Connected,
            WebSocketAction::Disconnected,
        ]
    }
}

/// One row of the matching table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    HttpComplete,
    WebSocket(WebSocketAction),
}

impl EventKind {
    /// Look up a `(protocol, action)` pair. `None` means the pair is not logged.
    pub fn recognize(protocol: &str, action: &str) -> Option<Self> {
        match (protocol, action) {
            ("http", "complete") => Some(EventKind::HttpComplete),
            ("websocket", action) => WebSocketAction::parse(action).map(EventKind::WebSocket),
            _ => None,
        }
    }

    pub fn protocol(&self) -> Protocol {
        match self {
            EventKind::HttpComplete => Protocol::Http,
            EventKind::WebSocket(_) => Protocol::WebSocket,
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            EventKind::HttpComplete => "complete",
            EventKind::WebSocket(action) => action.as_str(),
        }
    }
}

/// A finished HTTP request/response cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpComplete {
    pub client: String,
    pub method: String,
    pub path: String,
    pub status: u16,
    pub size: u64,
    pub time_taken: Option<Duration>,
    pub request_id: Option<String>,
}

/// A WebSocket lifecycle transition.
#[derive(Debug, Clone, PartialEq)]
pub struct WebSocketEvent {
    pub action: WebSocketAction,
    pub client: String,
    pub path: String,
}

/// A recognized event with all of its required details present.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionEvent {
    HttpComplete(HttpComplete),
    WebSocket(WebSocketEvent),
}

impl ActionEvent {
    /// Classify a raw notification.
    ///
    /// Returns `Ok(None)` for pairs outside the matching table without
    /// looking at `details`. For recognized pairs every required key must be
    /// present and non-empty, otherwise [`AccessLogError::MissingField`].
    pub fn from_details(protocol: &str, action: &str, details: &Details) -> Result<Option<Self>> {
        let Some(kind) = EventKind::recognize(protocol, action) else {
            return Ok(None);
        };
        let fields = DetailFields { details, kind };

        let event = match kind {
            EventKind::HttpComplete => {
                let client = fields.required_str("client")?;
                let method = fields.required_str("method")?;
                let path = fields.required_str("path")?;
                let status = fields.required_uint("status")?;
                if status > MAX_STATUS {
                    return Err(fields.invalid("status", format!("{status} is not an HTTP status")));
                }
                ActionEvent::HttpComplete(HttpComplete {
                    client,
                    method,
                    path,
                    status: status as u16,
                    size: fields.required_uint("size")?,
                    time_taken: fields.optional_seconds("time_taken")?,
                    request_id: fields.optional_str("request_id")?,
                })
            }
            EventKind::WebSocket(action) => ActionEvent::WebSocket(WebSocketEvent {
                action,
                client: fields.required_str("client")?,
                path: fields.required_str("path")?,
            }),
        };
        Ok(Some(event))
    }

    pub fn kind(&self) -> EventKind {
        match self {
            ActionEvent::HttpComplete(_) => EventKind::HttpComplete,
            ActionEvent::WebSocket(ws) => EventKind::WebSocket(ws.action),
        }
    }

    pub fn client(&self) -> &str {
        match self {
            ActionEvent::HttpComplete(http) => &http.client,
            ActionEvent::WebSocket(ws) => &ws.client,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            ActionEvent::HttpComplete(http) => &http.path,
            ActionEvent::WebSocket(ws) => &ws.path,
        }
    }

    /// Verb or WebSocket marker token for this event.
    pub fn request_method(&self) -> &str {
        match self {
            ActionEvent::HttpComplete(http) => &http.method,
            ActionEvent::WebSocket(ws) => ws.action.marker(),
        }
    }
}

/// One invocation of the action callback, as read from newline-delimited JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionNotification {
    pub protocol: String,
    pub action: String,
    #[serde(default)]
    pub details: Details,
}

/// Typed accessors over the details bag for one event kind.
struct DetailFields<'a> {
    details: &'a Details,
    kind: EventKind,
}

impl DetailFields<'_> {
    fn missing(&self, field: &'static str) -> AccessLogError {
        AccessLogError::missing(field, self.kind.protocol().as_str(), self.kind.action())
    }

    fn invalid(&self, field: &'static str, reason: impl Into<String>) -> AccessLogError {
        AccessLogError::invalid(field, self.kind.protocol().as_str(), self.kind.action(), reason)
    }

    /// Present and non-null value for `field`.
    fn get(&self, field: &'static str) -> Option<&Value> {
        self.details.get(field).filter(|v| !v.is_null())
    }

    fn string_value(&self, field: &'static str, value: &Value) -> Result<String> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(self.invalid(field, format!("expected a string, found {}", type_name(other)))),
        }
    }

    fn required_str(&self, field: &'static str) -> Result<String> {
        let value = self.get(field).ok_or_else(|| self.missing(field))?;
        let s = self.string_value(field, value)?;
        if s.is_empty() {
            return Err(self.missing(field));
        }
        Ok(s)
    }

    fn optional_str(&self, field: &'static str) -> Result<Option<String>> {
        match self.get(field) {
            None => Ok(None),
            Some(value) => {
                let s = self.string_value(field, value)?;
                Ok(if s.is_empty() { None } else { Some(s) })
            }
        }
    }

    fn required_uint(&self, field: &'static str) -> Result<u64> {
        let value = self.get(field).ok_or_else(|| self.missing(field))?;
        match value {
            Value::Number(n) => n
                .as_u64()
                .ok_or_else(|| self.invalid(field, format!("{n} is not a non-negative integer"))),
            Value::String(s) => s
                .trim()
                .parse::<u64>()
                .map_err(|_| self.invalid(field, format!("'{s}' is not a non-negative integer"))),
            other => Err(self.invalid(field, format!("expected an integer, found {}", type_name(other)))),
        }
    }

    fn optional_seconds(&self, field: &'static str) -> Result<Option<Duration>> {
        let Some(value) = self.get(field) else {
            return Ok(None);
        };
        let secs = value
            .as_f64()
            .ok_or_else(|| self.invalid(field, format!("expected seconds, found {}", type_name(value))))?;
        Duration::try_from_secs_f64(secs)
            .map(Some)
            .map_err(|_| self.invalid(field, format!("{secs} is not a valid duration")))
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
