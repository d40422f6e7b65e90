//! Tool endpoints over incident log entries.
//!
//! Each handler is one bounded retrieval: validate input, walk the
//! collection through the injected transport, decode, return. No caching,
//! no retries, no partial results.

use crate::error::{AppError, Result};
use crate::models::LogEntry;
use crate::paginate::fetch_all;
use crate::query::LogEntryQuery;
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Response envelope shared by the list tools.
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub response: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct IncidentLogEntriesRequest {
    pub incident_id: String,
    #[serde(flatten)]
    pub query: LogEntryQuery,
}

#[derive(Debug, Deserialize)]
pub struct GetLogEntryRequest {
    pub log_entry_id: String,
}

/// Parse the request body ourselves so an unknown include key or a
/// malformed field surfaces as our 400, not an axum rejection.
fn parse_body<T: DeserializeOwned>(body: Value) -> Result<T> {
    serde_json::from_value(body).map_err(|err| AppError::ValidationError(err.to_string()))
}

/// A resource id becomes a path segment; keep it to one segment.
fn validate_id(name: &str, id: &str) -> Result<()> {
    if id.is_empty() || id.contains('/') {
        return Err(AppError::ValidationError(format!(
            "{} must be a non-empty id without '/'",
            name
        )));
    }
    Ok(())
}

/// POST /tools/list_log_entries - Audit trail across all incidents.
///
/// # Flow
/// 1. Validate the query against the configured limits
/// 2. Encode transport parameters
/// 3. Walk the collection up to the resolved record cap
/// 4. Decode every record, failing loudly on the first bad one
pub async fn list_log_entries_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<ListResponse<LogEntry>>> {
    let query: LogEntryQuery = parse_body(body)?;
    list_entries(&state, "log_entries".to_string(), query, "list_log_entries").await
}

/// POST /tools/list_incident_log_entries - Audit trail for one incident.
///
/// This is the reliable way to find who handled an incident after it was
/// resolved; the upstream clears assignment lists on resolution, but log
/// entries persist.
pub async fn list_incident_log_entries_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<ListResponse<LogEntry>>> {
    let request: IncidentLogEntriesRequest = parse_body(body)?;
    validate_id("incident_id", &request.incident_id)?;

    let entity = format!("incidents/{}/log_entries", request.incident_id);
    list_entries(&state, entity, request.query, "list_incident_log_entries").await
}

/// POST /tools/get_log_entry - One log entry by id.
pub async fn get_log_entry_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<LogEntry>> {
    let request: GetLogEntryRequest = parse_body(body)?;
    validate_id("log_entry_id", &request.log_entry_id)?;

    let raw = state
        .transport
        .get_one(&format!("log_entries/{}", request.log_entry_id))
        .await?;
    let entry = LogEntry::decode(&raw)?;

    metrics::counter!("tool_calls_total", "tool" => "get_log_entry").increment(1);

    Ok(Json(entry))
}

async fn list_entries(
    state: &AppState,
    entity: String,
    query: LogEntryQuery,
    tool: &'static str,
) -> Result<Json<ListResponse<LogEntry>>> {
    query.validate(&state.limits)?;
    let params = query.to_params();

    let raw = fetch_all(
        state.transport.as_ref(),
        &entity,
        &params,
        query.effective_limit(),
        &state.limits,
    )
    .await?;
    let entries = LogEntry::decode_all(&raw)?;

    tracing::debug!(entity = %entity, count = entries.len(), "Listed log entries");
    metrics::counter!("tool_calls_total", "tool" => tool).increment(1);
    metrics::histogram!("log_entries_returned").record(entries.len() as f64);

    Ok(Json(ListResponse { response: entries }))
}
