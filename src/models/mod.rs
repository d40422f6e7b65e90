pub mod log_entries;
pub mod references;

pub use log_entries::{LogEntry, LogEntryType};
pub use references::{Agent, Channel, IncidentReference, ServiceReference, UserReference};
