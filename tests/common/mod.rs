//! Shared utilities for integration testing.
//!
//! `MockGithub` serves the handful of REST endpoints the gateway calls and
//! records each call by name, so tests can assert on the exact sequence.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use edit_gateway::config::AppConfig;
use edit_gateway::http::HttpServer;
use edit_gateway::lifecycle::Shutdown;

pub const SITE: &str = "https://docs.example.org";
pub const BASE_SHA: &str = "0123456789abcdef0123456789abcdef01234567";

type Reply = (StatusCode, Json<Value>);

#[derive(Default)]
pub struct MockGithub {
    calls: Mutex<Vec<&'static str>>,
    files: Mutex<HashMap<String, (String, String)>>,
    fail_on: Mutex<Option<&'static str>>,
    writes: Mutex<Vec<Value>>,
    pulls: Mutex<Vec<Value>>,
    deleted: Mutex<Vec<String>>,
    next_pr: AtomicU64,
}

impl MockGithub {
    /// Names of the endpoints hit so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn add_file(&self, path: &str, sha: &str, content: &str) {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), (sha.to_string(), content.to_string()));
    }

    /// Make the named endpoint answer 502 from now on.
    pub fn fail_on(&self, call: &'static str) {
        *self.fail_on.lock().unwrap() = Some(call);
    }

    pub fn writes(&self) -> Vec<Value> {
        self.writes.lock().unwrap().clone()
    }

    pub fn pulls(&self) -> Vec<Value> {
        self.pulls.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    fn enter(&self, call: &'static str) -> Result<(), Reply> {
        self.calls.lock().unwrap().push(call);
        if *self.fail_on.lock().unwrap() == Some(call) {
            return Err((
                StatusCode::BAD_GATEWAY,
                Json(json!({ "message": "Server Error" })),
            ));
        }
        Ok(())
    }
}

type Mock = State<Arc<MockGithub>>;

async fn branch_head(
    State(mock): Mock,
    Path((_owner, _repo, branch)): Path<(String, String, String)>,
) -> Reply {
    if let Err(reply) = mock.enter("branch_head") {
        return reply;
    }
    let body = json!({
        "ref": format!("refs/heads/{}", branch),
        "object": { "sha": BASE_SHA, "type": "commit" },
    });
    (StatusCode::OK, Json(body))
}

async fn create_ref(State(mock): Mock, Json(body): Json<Value>) -> Reply {
    if let Err(reply) = mock.enter("create_branch") {
        return reply;
    }
    (StatusCode::CREATED, Json(body))
}

async fn get_contents(
    State(mock): Mock,
    Path((_owner, _repo, path)): Path<(String, String, String)>,
    Query(_query): Query<HashMap<String, String>>,
) -> Reply {
    if let Err(reply) = mock.enter("get_file") {
        return reply;
    }
    match mock.files.lock().unwrap().get(&path) {
        Some((sha, content)) => {
            let body = json!({
                "path": path,
                "sha": sha,
                "encoding": "base64",
                "content": BASE64.encode(content),
            });
            (StatusCode::OK, Json(body))
        }
        None => (StatusCode::NOT_FOUND, Json(json!({ "message": "Not Found" }))),
    }
}

async fn put_contents(
    State(mock): Mock,
    Path((_owner, _repo, path)): Path<(String, String, String)>,
    Json(mut body): Json<Value>,
) -> Reply {
    if let Err(reply) = mock.enter("put_file") {
        return reply;
    }
    body["path"] = Value::String(path);
    mock.writes.lock().unwrap().push(body);
    (StatusCode::CREATED, Json(json!({ "commit": { "sha": "c0ffee" } })))
}

async fn create_pull(State(mock): Mock, Json(body): Json<Value>) -> Reply {
    if let Err(reply) = mock.enter("create_pull") {
        return reply;
    }
    let number = 42 + mock.next_pr.fetch_add(1, Ordering::SeqCst);
    mock.pulls.lock().unwrap().push(body);
    let reply = json!({
        "number": number,
        "html_url": format!("https://github.com/acme/wiki/pull/{}", number),
        "state": "open",
    });
    (StatusCode::CREATED, Json(reply))
}

async fn delete_ref(
    State(mock): Mock,
    Path((_owner, _repo, branch)): Path<(String, String, String)>,
) -> StatusCode {
    if mock.enter("delete_branch").is_err() {
        return StatusCode::BAD_GATEWAY;
    }
    mock.deleted.lock().unwrap().push(branch);
    StatusCode::NO_CONTENT
}

/// Start a mock GitHub API on an ephemeral port.
pub async fn start_mock_github() -> (SocketAddr, Arc<MockGithub>) {
    let mock = Arc::new(MockGithub::default());
    let app = Router::new()
        .route("/repos/{owner}/{repo}/git/ref/heads/{*branch}", get(branch_head))
        .route("/repos/{owner}/{repo}/git/refs", post(create_ref))
        .route("/repos/{owner}/{repo}/git/refs/heads/{*branch}", delete(delete_ref))
        .route(
            "/repos/{owner}/{repo}/contents/{*path}",
            get(get_contents).put(put_contents),
        )
        .route("/repos/{owner}/{repo}/pulls", post(create_pull))
        .with_state(mock.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (addr, mock)
}

/// Gateway config pointed at the mock.
pub fn gateway_config(github: SocketAddr) -> AppConfig {
    let mut config = AppConfig::default();
    config.github.token = "test-token".to_string();
    config.github.repository = "acme/wiki".to_string();
    config.github.api_url = format!("http://{}", github);
    config.cors.allowed_origins = vec![SITE.to_string()];
    config
}

/// Serve the gateway on an ephemeral port.
pub async fn start_gateway(config: AppConfig) -> (SocketAddr, Shutdown) {
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });
    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
