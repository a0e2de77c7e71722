//! Feeds newline-delimited action notifications through the generator.
//!
//! Each non-blank line is one JSON object:
//! `{"protocol":"http","action":"complete","details":{...}}`.
//! Malformed lines (bad JSON or bytes that are not UTF-8) and events with bad
//! details are skipped with a warning; a failing input or output stream stops
//! the replay.

use accesslog_core::error::AccessLogError;
use accesslog_core::event::ActionNotification;
use accesslog_observability::generator::{AccessLogGenerator, LogOutcome};
use std::io::{BufRead, Write};
use tracing::warn;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplayStats {
    pub written: u64,
    pub ignored: u64,
    pub rejected: u64,
}

pub fn replay<R: BufRead, W: Write>(
    mut input: R,
    generator: &AccessLogGenerator<W>,
) -> Result<ReplayStats, AccessLogError> {
    let mut stats = ReplayStats::default();

    let mut buf = Vec::new();
    let mut line_no = 0usize;

    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;

        let Ok(line) = std::str::from_utf8(&buf) else {
            warn!(line = line_no, "Skipping notification that is not valid UTF-8");
            stats.rejected += 1;
            continue;
        };
        if line.trim().is_empty() {
            continue;
        }

        let notification: ActionNotification = match serde_json::from_str(line) {
            Ok(n) => n,
            Err(e) => {
                warn!(line = line_no, error = %e, "Skipping malformed notification");
                stats.rejected += 1;
                continue;
            }
        };

        match generator.handle(&notification.protocol, &notification.action, &notification.details) {
            Ok(LogOutcome::Written) => stats.written += 1,
            Ok(LogOutcome::Ignored) => stats.ignored += 1,
            Err(e) if e.is_contract_violation() => {
                warn!(line = line_no, error = %e, "Skipping event with invalid details");
                stats.rejected += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(stats)
}
