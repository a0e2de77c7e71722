pub mod config;
pub mod entry;
pub mod error;
pub mod event;

pub use config::Config;
pub use entry::Entry;
pub use error::AccessLogError;
pub use event::{ActionEvent, ActionNotification, Details, EventKind, Protocol, WebSocketAction};
