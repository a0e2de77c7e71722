//! Output destinations for the access log.
//!
//! `-` selects stdout; anything else is a file opened in append mode. Files
//! are left unbuffered so each record reaches the OS in one write. There is
//! no rotation: external tools (logrotate with `copytruncate`, etc.) own the
//! file lifecycle.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl Destination {
    pub fn parse(spec: &str) -> Self {
        match spec.trim() {
            "-" | "" => Destination::Stdout,
            path => Destination::File(PathBuf::from(path)),
        }
    }

    /// Open the destination for writing.
    pub fn open(&self) -> io::Result<Box<dyn Write + Send>> {
        match self {
            Destination::Stdout => Ok(Box::new(io::stdout())),
            Destination::File(path) => {
                // Ensure parent directory exists
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        fs::create_dir_all(parent)?;
                    }
                }

                let file = OpenOptions::new().create(true).append(true).open(path)?;
                info!(path = %path.display(), "Access log file opened");
                Ok(Box::new(file))
            }
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Stdout => write!(f, "stdout"),
            Destination::File(path) => write!(f, "{}", path.display()),
        }
    }
}
