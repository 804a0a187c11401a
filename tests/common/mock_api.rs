//! Mock threads server for exercising the HTTP client.
//!
//! Responses are registered per `(method, path)`; each registration answers
//! once, in order. Unmatched requests get a 404 so a wrong route shows up as
//! `ApiError::NotFound` in the test.

use axum::body::{to_bytes, Body};
use axum::extract::State;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{watch, Mutex};

use threads_client::api::HttpService;
use threads_client::config::ApiConfig;

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is not JSON")
    }
}

#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
}

impl MockResponse {
    pub fn ok(value: serde_json::Value) -> Self {
        Self {
            status: 200,
            body: value.to_string(),
        }
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    /// Error body in the server's `{"error": "..."}` shape.
    pub fn error(status: u16, message: &str) -> Self {
        Self::ok(serde_json::json!({ "error": message })).with_status(status)
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }
}

type Routes = HashMap<(String, String), VecDeque<MockResponse>>;

#[derive(Clone, Default)]
struct Shared {
    routes: Arc<Mutex<Routes>>,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

pub struct MockApi {
    addr: SocketAddr,
    shared: Shared,
    shutdown: watch::Sender<bool>,
}

impl MockApi {
    pub async fn start() -> Self {
        let shared = Shared::default();
        let (shutdown, mut stop) = watch::channel(false);

        let app = Router::new()
            .fallback(respond)
            .with_state(shared.clone());
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = stop.changed().await;
                })
                .await;
        });

        Self {
            addr,
            shared,
            shutdown,
        }
    }

    /// Answer the next `method path` request with `response`.
    pub async fn on(&self, method: &str, path: &str, response: MockResponse) {
        self.shared
            .routes
            .lock()
            .await
            .entry((method.to_string(), path.to_string()))
            .or_default()
            .push_back(response);
    }

    pub async fn requests(&self) -> Vec<CapturedRequest> {
        self.shared.requests.lock().await.clone()
    }

    pub async fn last_request(&self) -> CapturedRequest {
        self.requests()
            .await
            .pop()
            .expect("no request reached the mock server")
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// HTTP client pointed at this server.
    pub fn client(&self) -> HttpService {
        HttpService::new(&ApiConfig {
            base_url: self.base_url(),
            timeout_seconds: 5,
            connect_timeout_seconds: 1,
        })
        .expect("Failed to build client")
    }
}

impl Drop for MockApi {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

async fn respond(State(shared): State<Shared>, req: Request<Body>) -> Response<Body> {
    let (parts, body) = req.into_parts();
    let method = parts.method.to_string();
    let path = parts.uri.path().to_string();
    let headers = parts
        .headers
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_string()))
        .collect();
    let body = to_bytes(body, 4 * 1024 * 1024)
        .await
        .map(|b| b.to_vec())
        .unwrap_or_default();

    shared.requests.lock().await.push(CapturedRequest {
        method: method.clone(),
        path: path.clone(),
        headers,
        body,
    });

    let response = shared
        .routes
        .lock()
        .await
        .get_mut(&(method, path))
        .and_then(VecDeque::pop_front)
        .unwrap_or_else(|| MockResponse::error(404, "no such route"));

    Response::builder()
        .status(StatusCode::from_u16(response.status).unwrap())
        .header("content-type", "application/json")
        .body(Body::from(response.body))
        .unwrap()
}
