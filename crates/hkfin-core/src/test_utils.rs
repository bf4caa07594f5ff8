//! Test utilities for hkfin-core
//!
//! [`StaticSource`] answers requests from canned bodies without touching the
//! network. [`MockUpstreamServer`] is a local axum server standing in for
//! the HKMA/IRD/AOF hosts so [`HttpSource`](crate::source::HttpSource) can be
//! exercised end to end.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{extract::State, http::StatusCode, http::Uri, Router};
use serde_json::Value;
use tokio::sync::oneshot;

use crate::error::{Error, Result};
use crate::source::{DataSource, SourceRequest};

// =============================================================================
// StaticSource
// =============================================================================

/// In-memory [`DataSource`] keyed by request path
#[derive(Debug, Default)]
pub struct StaticSource {
    bodies: HashMap<String, String>,
    fail: bool,
    requests: Mutex<Vec<SourceRequest>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `path`
    pub fn with_body(mut self, path: &str, body: impl Into<String>) -> Self {
        self.bodies.insert(path.to_string(), body.into());
        self
    }

    /// Serve a JSON value for `path`
    pub fn with_json(self, path: &str, value: Value) -> Self {
        self.with_body(path, value.to_string())
    }

    /// A source whose every request fails as if the host were unreachable
    pub fn unreachable() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Requests seen so far, in order
    pub fn requests(&self) -> Vec<SourceRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The most recent request
    pub fn last_request(&self) -> Option<SourceRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl DataSource for StaticSource {
    async fn fetch_text(&self, request: &SourceRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());

        if self.fail {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                format!("connection refused: {}", request.path),
            )));
        }

        self.bodies
            .get(&request.path)
            .cloned()
            .ok_or_else(|| Error::NotFound(request.path.clone()))
    }
}

// =============================================================================
// MockUpstreamServer
// =============================================================================

#[derive(Clone, Default)]
struct MockState {
    routes: Arc<HashMap<String, (StatusCode, String)>>,
    seen: Arc<Mutex<Vec<String>>>,
}

/// Builder for [`MockUpstreamServer`]
#[derive(Default)]
pub struct MockUpstreamBuilder {
    routes: HashMap<String, (StatusCode, String)>,
}

impl MockUpstreamBuilder {
    /// Respond 200 with `body` at `path`
    pub fn route(mut self, path: &str, body: impl Into<String>) -> Self {
        self.routes.insert(path.to_string(), (StatusCode::OK, body.into()));
        self
    }

    /// Respond with an arbitrary status at `path`
    pub fn route_status(mut self, path: &str, status: StatusCode, body: impl Into<String>) -> Self {
        self.routes.insert(path.to_string(), (status, body.into()));
        self
    }

    pub async fn start(self) -> MockUpstreamServer {
        MockUpstreamServer::start_with(self.routes).await
    }
}

/// Local stand-in for the upstream open-data hosts
pub struct MockUpstreamServer {
    addr: SocketAddr,
    seen: Arc<Mutex<Vec<String>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockUpstreamServer {
    pub fn builder() -> MockUpstreamBuilder {
        MockUpstreamBuilder::default()
    }

    async fn start_with(routes: HashMap<String, (StatusCode, String)>) -> Self {
        let state = MockState {
            routes: Arc::new(routes),
            seen: Arc::default(),
        };
        let seen = state.seen.clone();

        let app = Router::new().fallback(serve_canned).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            seen,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Request targets (path plus query string) received so far
    pub fn requests(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }

    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockUpstreamServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn serve_canned(State(state): State<MockState>, uri: Uri) -> (StatusCode, String) {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    state.seen.lock().unwrap().push(target);

    match state.routes.get(uri.path()) {
        Some((status, body)) => (*status, body.clone()),
        None => (StatusCode::NOT_FOUND, String::new()),
    }
}
