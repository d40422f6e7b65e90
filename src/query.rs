//! Caller-facing filter options and their translation to transport
//! parameters.
//!
//! Validation happens here, before any network activity: a bad record cap
//! or an out-of-vocabulary include key is a caller error, never a walk that
//! fails halfway through.

use crate::config::Limits;
use crate::error::{AppError, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default record cap when the caller does not supply one.
pub const DEFAULT_LIMIT: usize = 100;

/// Time zone for the query window. The upstream API accepts more, but this
/// service pins everything to UTC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeZone {
    #[default]
    #[serde(rename = "UTC")]
    Utc,
}

impl TimeZone {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeZone::Utc => "UTC",
        }
    }
}

/// Additional detail expansions the upstream collection endpoint supports.
/// Closed vocabulary; anything else fails body deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncludeKey {
    Incidents,
    Services,
    Channels,
    Teams,
}

impl IncludeKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncludeKey::Incidents => "incidents",
            IncludeKey::Services => "services",
            IncludeKey::Channels => "channels",
            IncludeKey::Teams => "teams",
        }
    }
}

/// One value in the flat transport-parameter map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Str(String),
    Int(u64),
    List(Vec<String>),
}

/// Flat transport parameters, produced once per request and immutable
/// afterwards. BTreeMap keeps encoding deterministic.
pub type Params = BTreeMap<String, ParamValue>;

/// Filter options for listing log entries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogEntryQuery {
    /// Only log entries at or after this time.
    #[serde(default)]
    pub since: Option<DateTime<Utc>>,
    /// Only log entries at or before this time.
    #[serde(default)]
    pub until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub time_zone: TimeZone,
    /// If true, the upstream returns only trigger/acknowledge/resolve
    /// entries.
    #[serde(default)]
    pub is_overview: bool,
    #[serde(default)]
    pub include: Option<Vec<IncludeKey>>,
    /// Record cap for the whole retrieval, in [1, Limits::max_results].
    #[serde(default)]
    pub limit: Option<usize>,
}

impl LogEntryQuery {
    /// Check the caller-controlled fields against the configured bounds.
    pub fn validate(&self, limits: &Limits) -> Result<()> {
        if let Some(limit) = self.limit {
            if limit < 1 || limit > limits.max_results {
                return Err(AppError::ValidationError(format!(
                    "limit must be between 1 and {}, got {}",
                    limits.max_results, limit
                )));
            }
        }
        if let (Some(since), Some(until)) = (self.since, self.until) {
            if since > until {
                return Err(AppError::ValidationError(
                    "since must not be after until".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// The record cap resolved to a concrete positive integer.
    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    /// Translate into transport parameters. Deterministic, no side effects.
    /// Absent optional filters emit no key at all.
    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        params.insert(
            "time_zone".to_string(),
            ParamValue::Str(self.time_zone.as_str().to_string()),
        );
        params.insert(
            "is_overview".to_string(),
            ParamValue::Str(self.is_overview.to_string()),
        );

        if let Some(since) = self.since {
            params.insert(
                "since".to_string(),
                ParamValue::Str(since.to_rfc3339_opts(SecondsFormat::Secs, true)),
            );
        }
        if let Some(until) = self.until {
            params.insert(
                "until".to_string(),
                ParamValue::Str(until.to_rfc3339_opts(SecondsFormat::Secs, true)),
            );
        }
        if let Some(include) = &self.include {
            if !include.is_empty() {
                params.insert(
                    "include[]".to_string(),
                    ParamValue::List(include.iter().map(|k| k.as_str().to_string()).collect()),
                );
            }
        }
        params.insert(
            "limit".to_string(),
            ParamValue::Int(self.effective_limit() as u64),
        );

        params
    }
}
