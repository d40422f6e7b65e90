pub mod health;
pub mod log_entries;

pub use health::{health_handler, ready_handler};
pub use log_entries::{
    get_log_entry_handler, list_incident_log_entries_handler, list_log_entries_handler,
    ListResponse,
};
