//! Boundary to the upstream incident API.
//!
//! The rest of the crate only sees the [`Transport`] trait; authentication,
//! TLS, timeouts and the exact paging parameter names all live behind it.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::query::{ParamValue, Params};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// One raw record as returned by the upstream, not yet validated.
pub type RawRecord = serde_json::Map<String, Value>;

/// One bounded batch of records from a collection endpoint.
#[derive(Debug, Default)]
pub struct Page {
    pub records: Vec<RawRecord>,
    /// Whether the server indicates further pages exist.
    pub more: bool,
}

/// Synchronous-per-call access to the upstream API. Implementations must be
/// stateless across calls so one instance can serve concurrent walks.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch one page of `entity` with the given filter parameters,
    /// requesting at most `limit` records starting at `offset`.
    async fn fetch_page(
        &self,
        entity: &str,
        params: &Params,
        limit: usize,
        offset: usize,
    ) -> Result<Page>;

    /// Fetch a single resource by path, e.g. `log_entries/{id}`.
    async fn get_one(&self, resource: &str) -> Result<RawRecord>;
}

/// `Transport` over the PagerDuty-style REST API: bearer auth, JSON bodies,
/// limit/offset paging, records wrapped in a collection envelope.
pub struct RestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl RestTransport {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        let mut auth = reqwest::header::HeaderValue::from_str(&format!(
            "Token token={}",
            config.api_token
        ))
        .map_err(|_| {
            AppError::TransportError("API token contains invalid header characters".to_string())
        })?;
        auth.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Flatten filter parameters into query pairs. The caller-facing `limit`
    /// key is skipped here; the walker supplies the per-page window instead.
    fn query_pairs(params: &Params) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (key, value) in params {
            if key == "limit" {
                continue;
            }
            match value {
                ParamValue::Str(s) => pairs.push((key.clone(), s.clone())),
                ParamValue::Int(n) => pairs.push((key.clone(), n.to_string())),
                ParamValue::List(items) => {
                    for item in items {
                        pairs.push((key.clone(), item.clone()));
                    }
                }
            }
        }
        pairs
    }

    async fn get_json(&self, path: &str, query: &[(String, String)]) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self.client.get(&url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::TransportError(format!(
                "{} returned {}: {}",
                path, status, body
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl Transport for RestTransport {
    async fn fetch_page(
        &self,
        entity: &str,
        params: &Params,
        limit: usize,
        offset: usize,
    ) -> Result<Page> {
        let mut query = Self::query_pairs(params);
        query.push(("limit".to_string(), limit.to_string()));
        query.push(("offset".to_string(), offset.to_string()));

        let body = self.get_json(entity, &query).await?;

        // Collection responses wrap records under the collection name, e.g.
        // {"log_entries": [...], "more": true, ...}.
        let collection = entity.rsplit('/').next().unwrap_or(entity);
        let records = body
            .get(collection)
            .and_then(Value::as_array)
            .ok_or_else(|| {
                AppError::TransportError(format!(
                    "{} response missing '{}' array",
                    entity, collection
                ))
            })?
            .iter()
            .map(|record| {
                record.as_object().cloned().ok_or_else(|| {
                    AppError::TransportError(format!("{} returned a non-object record", entity))
                })
            })
            .collect::<Result<Vec<RawRecord>>>()?;

        let more = body.get("more").and_then(Value::as_bool).unwrap_or(false);

        Ok(Page { records, more })
    }

    async fn get_one(&self, resource: &str) -> Result<RawRecord> {
        let body = self.get_json(resource, &[]).await?;

        // Single resources arrive wrapped under their type name, e.g.
        // {"log_entry": {...}}; unwrap when that is the whole envelope.
        let object = body.as_object().ok_or_else(|| {
            AppError::TransportError(format!("{} returned a non-object body", resource))
        })?;
        if object.len() == 1 {
            if let Some(inner) = object.values().next().and_then(Value::as_object) {
                return Ok(inner.clone());
            }
        }
        Ok(object.clone())
    }
}
