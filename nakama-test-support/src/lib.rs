//! Test support for nakama-rs.
//!
//! [`MockServer`] is a scripted HTTP/1 server that stands in for a Nakama
//! gateway: register canned responses per method and path, point a client
//! at [`MockServer::url`], then inspect what the client sent.

use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, Method, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// Install a test-friendly tracing subscriber filtered by `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs it.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ============================================================================
// Responses
// ============================================================================

/// A canned response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    status: StatusCode,
    body: Bytes,
    json: bool,
    delay: Option<Duration>,
}

impl MockResponse {
    /// 200 with a JSON body.
    pub fn json(value: serde_json::Value) -> Self {
        Self {
            status: StatusCode::OK,
            body: Bytes::from(value.to_string()),
            json: true,
            delay: None,
        }
    }

    /// 204 with no body.
    pub fn no_content() -> Self {
        Self::status(204)
    }

    /// Empty body with the given status.
    pub fn status(status: u16) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body: Bytes::new(),
            json: false,
            delay: None,
        }
    }

    /// Gateway-style error envelope: `{"error","message","code"}`.
    pub fn error(status: u16, message: &str, code: i32) -> Self {
        Self::json(serde_json::json!({
            "error": message,
            "message": message,
            "code": code,
        }))
        .with_status(status)
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        self
    }

    /// Replace the body with raw text.
    pub fn with_body(mut self, body: &str) -> Self {
        self.body = Bytes::from(body.to_string());
        self.json = false;
        self
    }

    /// Hold the response back for `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn into_hyper(self) -> hyper::Response<Full<Bytes>> {
        let mut resp = hyper::Response::new(Full::new(self.body));
        *resp.status_mut() = self.status;
        if self.json {
            resp.headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        resp
    }
}

// ============================================================================
// Recorded requests
// ============================================================================

/// A request as received by the server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    /// Path exactly as sent, still percent-encoded.
    pub path: String,
    /// Raw query string without the `?`, if one was sent.
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// All values sent for a header, in order.
    pub fn header_all(&self, name: &str) -> Vec<&str> {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }

    /// Body parsed as JSON, or `Null` when empty or not JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap_or(serde_json::Value::Null)
    }

    /// Query split into raw `key=value` pairs, in order.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let Some(query) = self.query.as_deref() else {
            return Vec::new();
        };
        query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((k, v)) => (k.to_string(), v.to_string()),
                None => (pair.to_string(), String::new()),
            })
            .collect()
    }
}

// ============================================================================
// Server
// ============================================================================

struct Route {
    method: Method,
    path: String,
    response: MockResponse,
}

#[derive(Default)]
struct State {
    routes: Mutex<Vec<Route>>,
    received: Mutex<Vec<RecordedRequest>>,
}

impl State {
    /// Latest registration wins; unknown routes get a gateway-style 404.
    fn lookup(&self, method: &Method, path: &str) -> MockResponse {
        self.routes
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|r| &r.method == method && r.path == path)
            .map(|r| r.response.clone())
            .unwrap_or_else(|| MockResponse::error(404, "Not Found", 5))
    }
}

/// Scripted HTTP server bound to an ephemeral localhost port.
pub struct MockServer {
    addr: SocketAddr,
    state: Arc<State>,
}

impl MockServer {
    /// Bind and start serving in the background.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(State::default());

        let server_state = Arc::clone(&state);
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let io = TokioIo::new(stream);
                let state = Arc::clone(&server_state);

                tokio::spawn(async move {
                    let service = service_fn(move |req: hyper::Request<Incoming>| {
                        let state = Arc::clone(&state);
                        async move { Ok::<_, Infallible>(handle(&state, req).await) }
                    });
                    // Clients that time out drop the connection mid-response.
                    let _ = http1::Builder::new().serve_connection(io, service).await;
                });
            }
        });

        Self { addr, state }
    }

    /// Register a response for `method` and `path`.
    pub fn mock(&self, method: Method, path: &str, response: MockResponse) -> &Self {
        self.state.routes.lock().unwrap().push(Route {
            method,
            path: path.to_string(),
            response,
        });
        self
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Base URL such as `http://127.0.0.1:41234`.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.received.lock().unwrap().clone()
    }

    /// The most recent request.
    ///
    /// # Panics
    ///
    /// Panics if nothing has been received yet.
    pub fn last_request(&self) -> RecordedRequest {
        self.requests()
            .pop()
            .expect("mock server has not received any request")
    }
}

async fn handle(state: &State, req: hyper::Request<Incoming>) -> hyper::Response<Full<Bytes>> {
    let (parts, body) = req.into_parts();
    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(_) => Bytes::new(),
    };

    let response = state.lookup(&parts.method, parts.uri.path());
    state.received.lock().unwrap().push(RecordedRequest {
        method: parts.method,
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        headers: parts.headers,
        body,
    });

    if let Some(delay) = response.delay {
        tokio::time::sleep(delay).await;
    }
    response.into_hyper()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_pairs_keep_order_and_repeats() {
        let req = RecordedRequest {
            method: Method::GET,
            path: "/v2/user".into(),
            query: Some("ids=a&ids=b&usernames=c".into()),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        };
        assert_eq!(
            req.query_pairs(),
            vec![
                ("ids".to_string(), "a".to_string()),
                ("ids".to_string(), "b".to_string()),
                ("usernames".to_string(), "c".to_string()),
            ]
        );
    }

    #[test]
    fn test_lookup_prefers_latest_route() {
        let state = State::default();
        state.routes.lock().unwrap().push(Route {
            method: Method::GET,
            path: "/x".into(),
            response: MockResponse::status(500),
        });
        state.routes.lock().unwrap().push(Route {
            method: Method::GET,
            path: "/x".into(),
            response: MockResponse::no_content(),
        });
        assert_eq!(state.lookup(&Method::GET, "/x").status, StatusCode::NO_CONTENT);
        assert_eq!(state.lookup(&Method::POST, "/x").status, StatusCode::NOT_FOUND);
    }
}
