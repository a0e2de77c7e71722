//! Record writer: serializes entries and appends them to a shared stream.
//!
//! Thread-safe: the stream sits behind a `Mutex`, and each record is
//! formatted before the lock is taken and then handed to the stream in a
//! single `write_all`. Concurrent callers interleave at record granularity,
//! never mid-record.

use crate::record::{AccessRecord, RecordContext};
use accesslog_core::config::{AccessLogConfig, LogTimeZone};
use accesslog_core::entry::Entry;
use accesslog_core::error::Result;
use std::io::{self, Write};
use std::sync::Mutex;

/// Record terminator.
const NEWLINE: u8 = b'\n';

pub struct RecordWriter<W> {
    stream: Mutex<W>,
    context: RecordContext,
    time_zone: LogTimeZone,
}

impl<W: Write> RecordWriter<W> {
    /// Writer with no process/thread identity and local-time timestamps.
    pub fn new(stream: W) -> Self {
        Self {
            stream: Mutex::new(stream),
            context: RecordContext::detached(),
            time_zone: LogTimeZone::Local,
        }
    }

    /// Writer configured from the `access_log` config section.
    pub fn from_config(stream: W, config: &AccessLogConfig) -> Self {
        let context = if config.include_process_id {
            RecordContext::current_process()
        } else {
            RecordContext::detached()
        };
        Self::new(stream)
            .with_context(context)
            .with_time_zone(config.time_zone)
    }

    pub fn with_context(mut self, context: RecordContext) -> Self {
        self.context = context;
        self
    }

    pub fn with_time_zone(mut self, time_zone: LogTimeZone) -> Self {
        self.time_zone = time_zone;
        self
    }

    pub fn context(&self) -> &RecordContext {
        &self.context
    }

    pub fn time_zone(&self) -> LogTimeZone {
        self.time_zone
    }

    /// Serialize one entry to a newline-terminated line. Touches no stream.
    pub fn format_entry(&self, entry: &Entry) -> Result<Vec<u8>> {
        let record = AccessRecord::new(entry, &self.context, self.time_zone);
        let mut line = serde_json::to_vec(&record)?;
        line.push(NEWLINE);
        Ok(line)
    }

    /// Append one record to the stream.
    pub fn write_entry(&self, entry: &Entry) -> Result<()> {
        let line = self.format_entry(entry)?;

        let mut stream = self
            .stream
            .lock()
            .map_err(|_| io::Error::other("access log writer lock poisoned"))?;
        stream.write_all(&line)?;
        stream.flush()?;
        Ok(())
    }

    /// Consume the writer and return the underlying stream.
    pub fn into_inner(self) -> W {
        self.stream
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
