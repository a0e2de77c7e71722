pub mod destination;
pub mod generator;
pub mod record;
pub mod writer;

pub use destination::Destination;
pub use generator::{AccessLogGenerator, ActionLogger, LogOutcome};
pub use record::{AccessRecord, RecordContext};
pub use writer::RecordWriter;
