//! Stub Taskify backend for integration specs.
//!
//! Answers every request with the response scripted for its path (200 `{}`
//! otherwise) and records what it received.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::{Json, Router};
use serde_json::{json, Value};

use taskify::TaskifyClient;

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone, Default)]
struct StubState {
    requests: Arc<Mutex<Vec<Recorded>>>,
    responses: Arc<Mutex<HashMap<String, (StatusCode, Value)>>>,
}

pub struct StubBackend {
    pub url: String,
    state: StubState,
}

async fn handle(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
    state.requests.lock().unwrap().push(Recorded {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    let (status, body) = state
        .responses
        .lock()
        .unwrap()
        .get(uri.path())
        .cloned()
        .unwrap_or((StatusCode::OK, json!({})));
    (status, Json(body))
}

impl StubBackend {
    pub async fn start() -> Self {
        let state = StubState::default();
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub backend");
        let addr = listener.local_addr().expect("No local address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Stub backend failed");
        });

        Self {
            url: format!("http://{}", addr),
            state,
        }
    }

    /// Script the response for a path.
    pub fn respond(&self, path: &str, status: u16, body: Value) {
        let status = StatusCode::from_u16(status).expect("Invalid status");
        self.state
            .responses
            .lock()
            .unwrap()
            .insert(path.to_string(), (status, body));
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Paths hit so far, in order.
    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }

    pub fn last_request(&self, path: &str) -> Option<Recorded> {
        self.requests().into_iter().rev().find(|r| r.path == path)
    }

    pub fn client(&self) -> TaskifyClient {
        TaskifyClient::new(&self.url).with_token("manager-token")
    }
}

pub fn developers_body() -> Value {
    json!({
        "developers": [
            {
                "_id": "dev-1",
                "name": "Ana",
                "role": "Backend",
                "skills": ["rust", "sql"],
                "bandwidth": 0.5,
                "work_batch": "9-5"
            },
            {
                "_id": "dev-2",
                "name": "Ben",
                "role": "Frontend",
                "skills": ["react"],
                "bandwidth": 1.0,
                "work_batch": "8-6"
            }
        ]
    })
}

pub fn analysis_body() -> Value {
    json!({
        "analysis": {
            "domain": "Retail",
            "features": [{"name": "Catalog", "description": "Browse products"}],
            "personas": [{"role": "Shopper", "needs": "Find items fast"}],
            "modules": ["catalog", "checkout"],
            "risks": [{"risk": "Scope creep", "mitigation": "Weekly review"}]
        }
    })
}

pub fn epics_body() -> Value {
    json!({
        "epics_stories": {
            "epics": [{"name": "Catalog", "description": "Product listing"}],
            "user_stories": [{"title": "Browse", "gherkin": "Given a shopper\nWhen browsing\nThen products show"}]
        }
    })
}

pub fn allocations_body() -> Value {
    json!({
        "project_id": "p1",
        "allocations": [
            {"story_title": "Browse", "assigned_to": "Ana", "reason": "Backend skills"}
        ]
    })
}
