//! Integration tests for the dutylog tool endpoints.
//!
//! These tests drive the router with a scripted transport, verifying the
//! API behavior and error handling without any network.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::{get, post},
    Router,
};
use dutylog::{
    get_log_entry_handler, health_handler, list_incident_log_entries_handler,
    list_log_entries_handler, ready_handler, AppError, AppState, Config, Limits, Page, Params,
    RawRecord, Transport,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Transport that pops one canned page per request and records the entity
/// paths it was asked for.
struct ScriptedTransport {
    pages: Mutex<Vec<Page>>,
    single: Option<RawRecord>,
    entities: Mutex<Vec<String>>,
    fail: bool,
}

impl ScriptedTransport {
    fn pages(pages: Vec<Page>) -> Self {
        let mut pages = pages;
        pages.reverse();
        Self {
            pages: Mutex::new(pages),
            single: None,
            entities: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    fn single(record: RawRecord) -> Self {
        Self {
            pages: Mutex::new(Vec::new()),
            single: Some(record),
            entities: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            pages: Mutex::new(Vec::new()),
            single: None,
            entities: Mutex::new(Vec::new()),
            fail: true,
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn fetch_page(
        &self,
        entity: &str,
        _params: &Params,
        _limit: usize,
        _offset: usize,
    ) -> dutylog::Result<Page> {
        if self.fail {
            return Err(AppError::TransportError("upstream unreachable".to_string()));
        }
        self.entities.lock().unwrap().push(entity.to_string());
        Ok(self.pages.lock().unwrap().pop().unwrap_or_default())
    }

    async fn get_one(&self, resource: &str) -> dutylog::Result<RawRecord> {
        if self.fail {
            return Err(AppError::TransportError("upstream unreachable".to_string()));
        }
        self.entities.lock().unwrap().push(resource.to_string());
        self.single
            .clone()
            .ok_or_else(|| AppError::TransportError("not found".to_string()))
    }
}

fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        shutdown_timeout_secs: 0,
        api_base_url: "https://api.example.test".to_string(),
        api_token: "test-token".to_string(),
        request_timeout_secs: 5,
        limits: Limits {
            max_results: 1000,
            page_size: 100,
        },
    }
}

fn create_test_app(transport: Arc<ScriptedTransport>) -> Router {
    let state = Arc::new(AppState::new(test_config(), transport));
    Router::new()
        .route("/tools/list_log_entries", post(list_log_entries_handler))
        .route(
            "/tools/list_incident_log_entries",
            post(list_incident_log_entries_handler),
        )
        .route("/tools/get_log_entry", post(get_log_entry_handler))
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .with_state(state)
}

/// Helper to make a JSON request to the router.
async fn json_request(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let req = match method {
        "GET" => Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
        "POST" => Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.unwrap_or(json!({})).to_string()))
            .unwrap(),
        _ => panic!("Unsupported method"),
    };

    let response = app.oneshot(req).await.unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(json!({}));

    (status, body)
}

fn sample_log_entry() -> RawRecord {
    json!({
        "id": "LOGENTRY123",
        "type": "resolve_log_entry",
        "summary": "Resolved by User",
        "self": "https://api.example.test/log_entries/LOGENTRY123",
        "created_at": "2023-01-01T00:00:00Z",
        "agent": {
            "id": "PUSER123",
            "type": "user_reference",
            "summary": "Test User"
        },
        "incident": {
            "id": "PINCIDENT123",
            "type": "incident_reference",
            "summary": "Test Incident"
        }
    })
    .as_object()
    .unwrap()
    .clone()
}

// ============================================================================
// Health Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_health_endpoint_returns_200() {
    let app = create_test_app(Arc::new(ScriptedTransport::pages(vec![])));
    let (status, body) = json_request(app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_ready_endpoint_returns_200() {
    let app = create_test_app(Arc::new(ScriptedTransport::pages(vec![])));
    let (status, body) = json_request(app, "GET", "/ready", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

// ============================================================================
// list_log_entries
// ============================================================================

#[tokio::test]
async fn test_list_log_entries_returns_decoded_entries() {
    let transport = Arc::new(ScriptedTransport::pages(vec![Page {
        records: vec![sample_log_entry()],
        more: false,
    }]));
    let app = create_test_app(Arc::clone(&transport));

    let (status, body) =
        json_request(app, "POST", "/tools/list_log_entries", Some(json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    let entries = body["response"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["id"], "LOGENTRY123");
    assert_eq!(entries[0]["type"], "resolve_log_entry");
    assert_eq!(entries[0]["agent"]["type"], "user_reference");
    assert_eq!(
        *transport.entities.lock().unwrap(),
        vec!["log_entries".to_string()]
    );
}

#[tokio::test]
async fn test_list_log_entries_empty_result() {
    let transport = Arc::new(ScriptedTransport::pages(vec![Page::default()]));
    let app = create_test_app(transport);

    let (status, body) =
        json_request(app, "POST", "/tools/list_log_entries", Some(json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_list_log_entries_respects_cap_across_pages() {
    // Two full pages claiming more; cap of 150 must stop the walk there.
    let first: Vec<RawRecord> = (0..100)
        .map(|i| {
            let mut r = sample_log_entry();
            r.insert("id".to_string(), json!(format!("A{i}")));
            r
        })
        .collect();
    let second: Vec<RawRecord> = (0..100)
        .map(|i| {
            let mut r = sample_log_entry();
            r.insert("id".to_string(), json!(format!("B{i}")));
            r
        })
        .collect();
    let transport = Arc::new(ScriptedTransport::pages(vec![
        Page {
            records: first,
            more: true,
        },
        Page {
            records: second,
            more: true,
        },
    ]));
    let app = create_test_app(Arc::clone(&transport));

    let (status, body) = json_request(
        app,
        "POST",
        "/tools/list_log_entries",
        Some(json!({ "limit": 150 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"].as_array().unwrap().len(), 150);
    assert_eq!(transport.entities.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_log_entries_limit_zero_returns_400() {
    let app = create_test_app(Arc::new(ScriptedTransport::pages(vec![])));

    let (status, body) = json_request(
        app,
        "POST",
        "/tools/list_log_entries",
        Some(json!({ "limit": 0 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("limit"));
}

#[tokio::test]
async fn test_list_log_entries_limit_above_max_returns_400() {
    let app = create_test_app(Arc::new(ScriptedTransport::pages(vec![])));

    let (status, _) = json_request(
        app,
        "POST",
        "/tools/list_log_entries",
        Some(json!({ "limit": 1001 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_log_entries_unknown_include_key_returns_400() {
    let app = create_test_app(Arc::new(ScriptedTransport::pages(vec![])));

    let (status, body) = json_request(
        app,
        "POST",
        "/tools/list_log_entries",
        Some(json!({ "include": ["everything"] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("everything"));
}

#[tokio::test]
async fn test_list_log_entries_transport_failure_returns_502() {
    let app = create_test_app(Arc::new(ScriptedTransport::failing()));

    let (status, _) =
        json_request(app, "POST", "/tools/list_log_entries", Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_list_log_entries_bad_record_returns_502() {
    let mut record = sample_log_entry();
    record.remove("incident");
    let transport = Arc::new(ScriptedTransport::pages(vec![Page {
        records: vec![record],
        more: false,
    }]));
    let app = create_test_app(transport);

    let (status, body) =
        json_request(app, "POST", "/tools/list_log_entries", Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("incident"));
}

// ============================================================================
// list_incident_log_entries
// ============================================================================

#[tokio::test]
async fn test_list_incident_log_entries_hits_incident_scoped_path() {
    let transport = Arc::new(ScriptedTransport::pages(vec![Page {
        records: vec![sample_log_entry()],
        more: false,
    }]));
    let app = create_test_app(Arc::clone(&transport));

    let (status, body) = json_request(
        app,
        "POST",
        "/tools/list_incident_log_entries",
        Some(json!({ "incident_id": "PINCIDENT123", "is_overview": true })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"].as_array().unwrap().len(), 1);
    assert_eq!(
        *transport.entities.lock().unwrap(),
        vec!["incidents/PINCIDENT123/log_entries".to_string()]
    );
}

#[tokio::test]
async fn test_list_incident_log_entries_missing_id_returns_400() {
    let app = create_test_app(Arc::new(ScriptedTransport::pages(vec![])));

    let (status, _) = json_request(
        app,
        "POST",
        "/tools/list_incident_log_entries",
        Some(json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_incident_log_entries_slash_in_id_returns_400() {
    let app = create_test_app(Arc::new(ScriptedTransport::pages(vec![])));

    let (status, _) = json_request(
        app,
        "POST",
        "/tools/list_incident_log_entries",
        Some(json!({ "incident_id": "../users" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// get_log_entry
// ============================================================================

#[tokio::test]
async fn test_get_log_entry_success() {
    let transport = Arc::new(ScriptedTransport::single(sample_log_entry()));
    let app = create_test_app(Arc::clone(&transport));

    let (status, body) = json_request(
        app,
        "POST",
        "/tools/get_log_entry",
        Some(json!({ "log_entry_id": "LOGENTRY123" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "LOGENTRY123");
    assert_eq!(body["agent"]["id"], "PUSER123");
    assert_eq!(body["incident"]["id"], "PINCIDENT123");
    assert_eq!(
        *transport.entities.lock().unwrap(),
        vec!["log_entries/LOGENTRY123".to_string()]
    );
}

#[tokio::test]
async fn test_get_log_entry_upstream_error_returns_502() {
    let app = create_test_app(Arc::new(ScriptedTransport::failing()));

    let (status, body) = json_request(
        app,
        "POST",
        "/tools/get_log_entry",
        Some(json!({ "log_entry_id": "LOGENTRY999" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("Upstream"));
}

#[tokio::test]
async fn test_get_log_entry_missing_id_returns_400() {
    let app = create_test_app(Arc::new(ScriptedTransport::pages(vec![])));

    let (status, _) = json_request(app, "POST", "/tools/get_log_entry", Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
