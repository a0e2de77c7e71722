use crate::writer::RecordWriter;
use accesslog_core::entry::Entry;
use accesslog_core::error::Result;
use accesslog_core::event::{ActionEvent, Details};
use chrono::Utc;
use std::io::Write;
use tracing::trace;

/// What a single notification turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutcome {
    /// One record was appended to the stream.
    Written,
    /// The `(protocol, action)` pair is not logged.
    Ignored,
}

/// Callback invoked by the server for every lifecycle event.
pub trait ActionLogger: Send + Sync {
    fn on_action(&self, protocol: &str, action: &str, details: &Details) -> Result<()>;
}

/// Turns server action notifications into access log records.
///
/// Stateless apart from the writer; safe to share between request-handling
/// threads.
pub struct AccessLogGenerator<W> {
    writer: RecordWriter<W>,
}

impl<W: Write> AccessLogGenerator<W> {
    pub fn new(writer: RecordWriter<W>) -> Self {
        Self { writer }
    }

    /// Classify one notification and write its record, if any.
    ///
    /// Unrecognized pairs are ignored without error. A recognized event with
    /// missing or malformed details fails before anything is written.
    pub fn handle(&self, protocol: &str, action: &str, details: &Details) -> Result<LogOutcome> {
        let Some(event) = ActionEvent::from_details(protocol, action, details)? else {
            trace!(protocol, action, "Ignoring unlogged action");
            return Ok(LogOutcome::Ignored);
        };
        self.log_event(&event)?;
        Ok(LogOutcome::Written)
    }

    /// Write the record for an already-typed event.
    pub fn log_event(&self, event: &ActionEvent) -> Result<()> {
        let entry = Entry::from_event(event, Utc::now())?;
        self.writer.write_entry(&entry)?;
        trace!(
            protocol = %entry.protocol(),
            method = entry.request_method(),
            path = entry.request_path(),
            "Access log record written"
        );
        Ok(())
    }

    pub fn writer(&self) -> &RecordWriter<W> {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write + Send> ActionLogger for AccessLogGenerator<W> {
    fn on_action(&self, protocol: &str, action: &str, details: &Details) -> Result<()> {
        self.handle(protocol, action, details).map(|_| ())
    }
}
