//! Shared helpers for integration tests.

#![allow(dead_code)]

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use nakama_rs::{NakamaClient, Session};
use nakama_test_support::{init_test_logging, MockServer};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub const USER_ID: &str = "8f4d52c7-bf28-4fcf-8af2-1d4fcf685592";

pub fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

/// Unsigned JWT carrying the given claims.
pub fn jwt(claims: serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.sig")
}

pub fn session_token() -> String {
    jwt(serde_json::json!({"uid": USER_ID, "usn": "alice", "exp": now() + 3600}))
}

pub fn refresh_token() -> String {
    jwt(serde_json::json!({"uid": USER_ID, "exp": now() + 86400}))
}

pub fn session() -> Session {
    Session::restore(session_token(), Some(refresh_token())).unwrap()
}

/// Start a mock server and a client pointed at it.
pub async fn setup() -> (MockServer, NakamaClient) {
    setup_with_timeout(Duration::from_secs(5)).await
}

pub async fn setup_with_timeout(timeout: Duration) -> (MockServer, NakamaClient) {
    init_test_logging();
    let server = MockServer::start().await;
    let client = NakamaClient::builder()
        .host(&server.host())
        .port(server.port())
        .server_key("defaultkey")
        .timeout(timeout)
        .build()
        .unwrap();
    (server, client)
}
