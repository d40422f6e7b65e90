//! Minimal identity+summary+URL pointers to other entities. References are
//! always owned by the entity that carries them; this service never looks
//! them up independently.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserReference {
    pub id: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, rename = "self")]
    pub self_url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceReference {
    pub id: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, rename = "self")]
    pub self_url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentReference {
    pub id: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, rename = "self")]
    pub self_url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// The actor behind a log entry, discriminated by the embedded `type` tag.
///
/// The discriminant lookup is explicit so adding a third agent kind is a
/// compile-time-visible change; a tag outside this set fails decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Agent {
    #[serde(rename = "user_reference")]
    User(UserReference),
    #[serde(rename = "service_reference")]
    Service(ServiceReference),
}

/// The channel through which an action was performed.
///
/// Open-shaped: only `type` and `summary` are modeled, everything else the
/// upstream sends is kept in `extra` so round-tripping never drops data.
/// Common types are `api` (Integration API), `web`, `email`, `sms` and
/// `push_notification`. `api` means the monitoring integration sent the
/// event, nothing more; it does not mean "auto-resolved".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    #[serde(rename = "type")]
    pub channel_type: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
