//! Serialized shape of one access log record.
//!
//! Every record has the same structure regardless of event kind:
//!
//! ```text
//! {"timestamp":"2024-03-09 14:05:07","request_id":"-",
//!  "httpRequest":{"requestMethod":"GET","requestUrl":"/x","protocol":"http",
//!                 "responseSize":512,"latency":250.0,"status":200,
//!                 "remoteIp":"1.2.3.4","ident":"-","user":"-"},
//!  "thread_id":"-","process_id":"-","severity":"INFO"}
//! ```
//!
//! Absent values render as the string `"-"` rather than being omitted or
//! null, so consumers can rely on a fixed schema. `latency` is in
//! milliseconds and keeps its fractional part. The request block is named
//! `httpRequest` for every protocol.

use accesslog_core::config::LogTimeZone;
use accesslog_core::entry::Entry;
use chrono::{DateTime, Local, Utc};
use serde::{Serialize, Serializer};
use std::time::Duration;

/// Rendered in place of any absent value.
pub const PLACEHOLDER: &str = "-";

/// Constant severity, kept for log-ingestion pipelines that require one.
pub const SEVERITY: &str = "INFO";

/// Second resolution; sub-second precision is dropped.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A value that serializes as itself, or as [`PLACEHOLDER`] when absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrDash<T>(pub Option<T>);

impl<T: Serialize> Serialize for OrDash<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.0 {
            Some(value) => value.serialize(serializer),
            None => serializer.serialize_str(PLACEHOLDER),
        }
    }
}

/// Process and thread identity stamped onto every record.
///
/// Injected when the writer is built, never looked up per record, so
/// `thread_id` names the writer's owner rather than the calling thread.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordContext {
    pub thread_id: Option<String>,
    pub process_id: Option<u32>,
}

impl RecordContext {
    /// No identity: both fields render as `-`.
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn current_process() -> Self {
        Self {
            thread_id: None,
            process_id: Some(std::process::id()),
        }
    }
}

/// Borrowed view of an [`Entry`] in its serialized layout.
#[derive(Debug, Serialize)]
pub struct AccessRecord<'a> {
    timestamp: String,
    request_id: OrDash<&'a str>,
    #[serde(rename = "httpRequest")]
    http_request: RequestBlock<'a>,
    thread_id: OrDash<&'a str>,
    process_id: OrDash<u32>,
    severity: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestBlock<'a> {
    request_method: &'a str,
    request_url: &'a str,
    protocol: &'static str,
    response_size: OrDash<u64>,
    latency: OrDash<f64>,
    status: OrDash<u16>,
    remote_ip: &'a str,
    ident: OrDash<&'a str>,
    user: OrDash<&'a str>,
}

impl<'a> AccessRecord<'a> {
    pub fn new(entry: &'a Entry, context: &'a RecordContext, time_zone: LogTimeZone) -> Self {
        Self {
            timestamp: format_timestamp(entry.timestamp(), time_zone),
            request_id: OrDash(entry.request_id()),
            http_request: RequestBlock {
                request_method: entry.request_method(),
                request_url: entry.request_path(),
                protocol: entry.protocol().as_str(),
                response_size: OrDash(entry.response_size()),
                latency: OrDash(entry.latency().map(latency_millis)),
                status: OrDash(entry.status()),
                remote_ip: entry.host(),
                ident: OrDash(entry.ident()),
                user: OrDash(entry.user()),
            },
            thread_id: OrDash(context.thread_id.as_deref()),
            process_id: OrDash(context.process_id),
            severity: SEVERITY,
        }
    }
}

/// Render `timestamp` as `YYYY-MM-DD HH:MM:SS` in the configured zone.
pub fn format_timestamp(timestamp: DateTime<Utc>, time_zone: LogTimeZone) -> String {
    match time_zone {
        LogTimeZone::Utc => timestamp.format(TIMESTAMP_FORMAT).to_string(),
        LogTimeZone::Local => timestamp
            .with_timezone(&Local)
            .format(TIMESTAMP_FORMAT)
            .to_string(),
    }
}

/// Milliseconds, fractional part kept (`time_taken * 1000`).
pub fn latency_millis(latency: Duration) -> f64 {
    latency.as_nanos() as f64 / 1_000_000.0
}
