//! Shared utilities for integration testing: mock backend, mock origin, edge launcher.

#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use presign_edge::config::{EdgeConfig, WorkerSecret};
use presign_edge::signing::sign;
use presign_edge::{EdgeServer, Shutdown};

pub const SECRET: &str = "integration-secret";
pub const OBJECT_LEN: usize = 1000;

/// Object name the mock origin sits on before sending response headers.
pub const SLOW_OBJECT: &str = "slow.mp4";
pub const SLOW_OBJECT_DELAY: Duration = Duration::from_secs(10);

/// Deterministic object served by the mock origin.
pub fn object() -> Vec<u8> {
    (0..OBJECT_LEN).map(|i| (i % 251) as u8).collect()
}

/// How the mock backend answers presign calls.
#[derive(Debug, Clone)]
pub enum BackendBehavior {
    /// Verify the signature and hand out a URL on the mock origin.
    Presign,
    /// `{"success": false}`.
    Reject,
    /// Bare HTTP status with a plain body.
    Status(u16),
    /// 200 with a body that is not the JSON envelope.
    Garbage,
    /// Sleep before answering.
    Delay(Duration),
}

#[derive(Clone)]
struct BackendState {
    behavior: BackendBehavior,
    origin: SocketAddr,
    calls: Arc<AtomicU32>,
    keys: Arc<Mutex<Vec<String>>>,
}

/// Handle to a running mock backend.
pub struct MockBackend {
    pub addr: SocketAddr,
    pub calls: Arc<AtomicU32>,
    pub keys: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    pub fn endpoint(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

async fn presign_handler(
    State(state): State<BackendState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    state.calls.fetch_add(1, Ordering::SeqCst);

    let key = query.get("key").cloned().unwrap_or_default();
    state.keys.lock().unwrap().push(key.clone());

    match state.behavior {
        BackendBehavior::Reject => {
            return Json(serde_json::json!({ "success": false })).into_response();
        }
        BackendBehavior::Status(code) => {
            let status = StatusCode::from_u16(code).unwrap();
            return (status, "backend unavailable").into_response();
        }
        BackendBehavior::Garbage => {
            return (StatusCode::OK, "<html>oops</html>").into_response();
        }
        BackendBehavior::Delay(delay) => {
            tokio::time::sleep(delay).await;
        }
        BackendBehavior::Presign => {}
    }

    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };
    let timestamp = header("x-worker-timestamp");
    let signature = header("x-worker-signature");

    if header("x-worker-id") != "worker-v1" || signature != sign(&key, &timestamp, SECRET) {
        return (StatusCode::UNAUTHORIZED, "bad signature").into_response();
    }

    Json(serde_json::json!({
        "success": true,
        "data": {
            "url": format!("http://{}/objects/{}?X-Amz-Signature=mock", state.origin, key),
            "expires": 1_700_003_600u64,
        }
    }))
    .into_response()
}

pub async fn start_backend(behavior: BackendBehavior, origin: SocketAddr) -> MockBackend {
    let calls = Arc::new(AtomicU32::new(0));
    let keys = Arc::new(Mutex::new(Vec::new()));
    let state = BackendState {
        behavior,
        origin,
        calls: calls.clone(),
        keys: keys.clone(),
    };
    let app = Router::new()
        .route("/api/v1/file/presign-url", get(presign_handler))
        .with_state(state);

    MockBackend {
        addr: spawn_router(app).await,
        calls,
        keys,
    }
}

#[derive(Clone, Default)]
struct OriginState {
    requests: Arc<Mutex<Vec<HeaderMap>>>,
}

/// Handle to a running mock origin.
pub struct MockOrigin {
    pub addr: SocketAddr,
    pub requests: Arc<Mutex<Vec<HeaderMap>>>,
}

impl MockOrigin {
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> HeaderMap {
        self.requests.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

fn parse_range(value: &str) -> Option<(usize, usize)> {
    let bounds = value.strip_prefix("bytes=")?;
    let (start, end) = bounds.split_once('-')?;
    let start: usize = start.parse().ok()?;
    let end: usize = if end.is_empty() {
        OBJECT_LEN - 1
    } else {
        end.parse().ok()?
    };
    Some((start, end.min(OBJECT_LEN - 1)))
}

async fn object_handler(
    State(state): State<OriginState>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Response {
    state.requests.lock().unwrap().push(headers.clone());

    if name == "missing.mp4" {
        return (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "application/xml")],
            "NoSuchKey",
        )
            .into_response();
    }
    if name == SLOW_OBJECT {
        tokio::time::sleep(SLOW_OBJECT_DELAY).await;
    }

    let body = object();
    let mut out = HeaderMap::new();
    out.insert(header::CONTENT_TYPE, HeaderValue::from_static("video/mp4"));
    out.insert(header::ETAG, HeaderValue::from_static("\"mock-etag\""));
    out.insert(header::CACHE_CONTROL, HeaderValue::from_static("private, max-age=60"));
    out.insert("x-internal-debug", HeaderValue::from_static("1"));
    out.insert("x-amz-request-id", HeaderValue::from_static("MOCKREQ"));
    out.insert(header::SERVER, HeaderValue::from_static("MockS3"));
    out.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("https://internal.example"),
    );

    let range = headers
        .get(header::RANGE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    match range {
        None => (StatusCode::OK, out, body).into_response(),
        Some(range) => match parse_range(&range) {
            Some((start, end)) if start < OBJECT_LEN && start <= end => {
                let content_range = format!("bytes {}-{}/{}", start, end, OBJECT_LEN);
                out.insert(
                    header::CONTENT_RANGE,
                    HeaderValue::from_str(&content_range).unwrap(),
                );
                (StatusCode::PARTIAL_CONTENT, out, body[start..=end].to_vec()).into_response()
            }
            _ => {
                let content_range = format!("bytes */{}", OBJECT_LEN);
                (
                    StatusCode::RANGE_NOT_SATISFIABLE,
                    [(header::CONTENT_RANGE, content_range)],
                )
                    .into_response()
            }
        },
    }
}

pub async fn start_origin() -> MockOrigin {
    let state = OriginState::default();
    let requests = state.requests.clone();
    let app = Router::new()
        .route("/objects/{*name}", get(object_handler))
        .with_state(state);

    MockOrigin {
        addr: spawn_router(app).await,
        requests,
    }
}

/// Serve `app` on an ephemeral loopback port.
pub async fn spawn_router(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// An address nothing is listening on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Config pointing at `backend_endpoint` with test-friendly timeouts.
pub fn edge_config(backend_endpoint: String) -> EdgeConfig {
    let mut config = EdgeConfig::default();
    config.backend.endpoint = backend_endpoint;
    config.backend.worker_secret = WorkerSecret::new(SECRET);
    config.backend.timeout_secs = 2;
    config.origin.response_timeout_secs = 2;
    config.cache.ttl_secs = 7200;
    config.observability.metrics_enabled = false;
    config
}

/// Running edge node under test.
pub struct Edge {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl Edge {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for Edge {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn start_edge(config: EdgeConfig) -> Edge {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = EdgeServer::new(config).unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    Edge { addr, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
