//! Recorded upstream for tests: an axum server on an ephemeral port that
//! replays canned responses per `(method, path)` and records every request.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use reqwest::Url;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use super::Engine;

pub(crate) const TEST_TOKEN: &str = "test-token";

/// Initialize crypto provider once for all tests
pub(crate) fn init_crypto() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// Every engine call in tests gets the same ceiling.
pub(crate) async fn within<F: Future>(fut: F) -> F::Output {
    tokio::time::timeout(Duration::from_secs(5), fut)
        .await
        .expect("call exceeded the 5s test ceiling")
}

#[derive(Debug, Clone)]
struct Canned {
    status: u16,
    content_type: Option<&'static str>,
    body: String,
    delay: Option<Duration>,
}

#[derive(Debug, Clone)]
pub(crate) struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body should be JSON")
    }

    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let url = format!("http://upstream{}?{}", self.path, self.query.as_deref().unwrap_or(""));
        Url::parse(&url)
            .expect("recorded url")
            .query_pairs()
            .into_owned()
            .collect()
    }
}

#[derive(Debug, Default, Clone)]
pub(crate) struct MockUpstream {
    routes: HashMap<(String, String), Canned>,
}

#[derive(Debug)]
struct MockState {
    routes: HashMap<(String, String), Canned>,
    requests: Mutex<Vec<Recorded>>,
}

impl MockUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method path` with a JSON body.
    pub fn on(mut self, method: &str, path: &str, status: u16, body: Value) -> Self {
        self.routes.insert(
            (method.to_string(), path.to_string()),
            Canned {
                status,
                content_type: Some("application/json"),
                body: body.to_string(),
                delay: None,
            },
        );
        self
    }

    /// Answer with an arbitrary body; `None` falls back to `text/plain`.
    pub fn on_raw(
        mut self,
        method: &str,
        path: &str,
        status: u16,
        content_type: Option<&'static str>,
        body: &str,
    ) -> Self {
        self.routes.insert(
            (method.to_string(), path.to_string()),
            Canned {
                status,
                content_type,
                body: body.to_string(),
                delay: None,
            },
        );
        self
    }

    /// Hold the response for `delay` before sending headers.
    pub fn with_delay(mut self, method: &str, path: &str, delay: Duration) -> Self {
        if let Some(canned) = self.routes.get_mut(&(method.to_string(), path.to_string())) {
            canned.delay = Some(delay);
        }
        self
    }

    pub async fn start(self) -> MockServer {
        init_crypto();
        let state = Arc::new(MockState {
            routes: self.routes,
            requests: Mutex::new(Vec::new()),
        });
        let app = Router::new()
            .fallback(replay)
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        MockServer {
            url: Url::parse(&format!("http://{addr}")).unwrap(),
            state,
            handle,
        }
    }
}

async fn replay(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    state.requests.lock().unwrap().push(Recorded {
        method: method.to_string(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        headers,
        body: body.to_vec(),
    });

    let Some(canned) = state.routes.get(&(method.to_string(), path)).cloned() else {
        return (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "application/json")],
            r#"{"message":"no route"}"#,
        )
            .into_response();
    };

    if let Some(delay) = canned.delay {
        tokio::time::sleep(delay).await;
    }
    let status = StatusCode::from_u16(canned.status).unwrap();
    match canned.content_type {
        Some(ct) => (status, [(header::CONTENT_TYPE, ct)], canned.body).into_response(),
        None => (status, canned.body).into_response(),
    }
}

pub(crate) struct MockServer {
    pub url: Url,
    state: Arc<MockState>,
    handle: JoinHandle<()>,
}

impl MockServer {
    pub fn engine(&self) -> Engine {
        Engine::new(self.url.clone(), TEST_TOKEN)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    /// The only request received; fails if there were none or several.
    pub fn single_request(&self) -> Recorded {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one upstream request");
        requests.into_iter().next().unwrap()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
