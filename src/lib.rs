//! dutylog - Read-only incident audit-trail tools
//!
//! This library exposes the core components of the service - query
//! encoding, pagination walking and record decoding - enabling integration
//! tests and embedding in other applications.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod paginate;
pub mod query;
pub mod state;
pub mod transport;

// Re-export key types for convenience
pub use config::{Config, Limits};
pub use error::{AppError, Result};
pub use handlers::{
    get_log_entry_handler, health_handler, list_incident_log_entries_handler,
    list_log_entries_handler, ready_handler,
};
pub use models::{Agent, Channel, IncidentReference, LogEntry, LogEntryType};
pub use paginate::fetch_all;
pub use query::{LogEntryQuery, Params};
pub use state::AppState;
pub use transport::{Page, RawRecord, RestTransport, Transport};
