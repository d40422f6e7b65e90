//! Typed view over upstream log-entry records.
//!
//! A log entry is one action taken on an incident. The audit trail they
//! form outlives the incident's mutable state: assignments and
//! acknowledgements disappear from a resolved incident, log entries do not.

use crate::error::{AppError, Result};
use crate::models::references::{Agent, Channel, IncidentReference, ServiceReference};
use crate::transport::RawRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Closed vocabulary of log-entry actions. A discriminant outside this set
/// fails decoding; the vocabulary is not extensible at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogEntryType {
    TriggerLogEntry,
    AcknowledgeLogEntry,
    ResolveLogEntry,
    AssignLogEntry,
    EscalateLogEntry,
    NotifyLogEntry,
    ReachTriggerLimitLogEntry,
    RepeatEscalationPathLogEntry,
    ExhaustEscalationPathLogEntry,
    UnacknowledgeLogEntry,
    AnnotateLogEntry,
    SnoozeLogEntry,
    UnsnoozeLogEntry,
}

/// One decoded log entry. Constructed once per raw record, immutable, a
/// transient view over the remote record with no persistence of its own.
///
/// Unknown top-level fields land in `extra` rather than being rejected;
/// the upstream schema evolves independently of this service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub entry_type: LogEntryType,
    pub summary: String,
    /// API URL for this log entry.
    #[serde(rename = "self")]
    pub self_url: String,
    /// Web URL for this log entry.
    #[serde(default)]
    pub html_url: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Who performed the action: a user or, for integration-originated
    /// events, a service. Absent for some system-generated entries.
    #[serde(default)]
    pub agent: Option<Agent>,
    /// How the action was performed (web UI, Integration API, email, ...).
    #[serde(default)]
    pub channel: Option<Channel>,
    #[serde(default)]
    pub service: Option<ServiceReference>,
    /// Every log entry belongs to exactly one incident.
    pub incident: IncidentReference,
    /// Teams attached to the incident at the time of the entry. Shape is
    /// upstream-defined; kept loose.
    #[serde(default)]
    pub teams: Option<Vec<Value>>,
    /// Contextual links attached to the entry.
    #[serde(default)]
    pub contexts: Option<Vec<Value>>,
    /// Event-specific details; structure varies by entry type.
    #[serde(default)]
    pub event_details: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LogEntry {
    /// Decode one raw record. Pure, no I/O, deterministic; a missing or
    /// invalid required field fails with a message naming it.
    pub fn decode(raw: &RawRecord) -> Result<Self> {
        serde_json::from_value(Value::Object(raw.clone())).map_err(|err| {
            let id = raw.get("id").and_then(Value::as_str).unwrap_or("<no id>");
            AppError::DecodeError(format!("log entry {}: {}", id, err))
        })
    }

    /// Decode a fetched sequence in server order. Fails on the first bad
    /// record rather than skipping it.
    pub fn decode_all(raw: &[RawRecord]) -> Result<Vec<Self>> {
        raw.iter().map(Self::decode).collect()
    }
}
