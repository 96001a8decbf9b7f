//! Integration tests for request dispatch against a scripted server.

mod common;

use common::*;
use nakama_rs::{Authorization, Error, NakamaClient, Outcome, QueryParams};
use nakama_test_support::{init_test_logging, MockResponse, MockServer};
use reqwest::Method;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio_test::{assert_err, assert_ok};

#[derive(Debug, Default, Deserialize, PartialEq)]
struct TokenBody {
    token: String,
}

#[tokio::test]
async fn test_no_content_is_success_without_body() {
    let (server, client) = setup().await;
    server.mock(Method::DELETE, "/v2/thing", MockResponse::no_content());

    let request = client.request(Method::DELETE, "/v2/thing", &QueryParams::new());
    let outcome = client
        .dispatcher()
        .dispatch::<TokenBody>(request)
        .await
        .unwrap();

    assert!(outcome.is_no_content());
    assert_eq!(outcome.unwrap_or_default(), TokenBody::default());
}

#[tokio::test]
async fn test_success_body_is_decoded() {
    let (server, client) = setup().await;
    server.mock(
        Method::GET,
        "/v2/thing",
        MockResponse::json(serde_json::json!({"token": "abc"})),
    );

    let request = client.request(Method::GET, "/v2/thing", &QueryParams::new());
    let outcome = client
        .dispatcher()
        .dispatch::<TokenBody>(request)
        .await
        .unwrap();

    let expected = TokenBody {
        token: "abc".into(),
    };
    assert_eq!(outcome, Outcome::Body(expected));
}

#[tokio::test]
async fn test_empty_success_body_counts_as_no_content() {
    let (server, client) = setup().await;
    server.mock(Method::POST, "/v2/thing", MockResponse::status(200));

    let request = client.request(Method::POST, "/v2/thing", &QueryParams::new());
    let outcome = client
        .dispatcher()
        .dispatch::<TokenBody>(request)
        .await
        .unwrap();
    assert!(outcome.is_no_content());
}

#[tokio::test]
async fn test_malformed_success_body_is_json_error() {
    let (server, client) = setup().await;
    server.mock(
        Method::GET,
        "/v2/thing",
        MockResponse::status(200).with_body("{not json"),
    );

    let request = client.request(Method::GET, "/v2/thing", &QueryParams::new());
    let result = client.dispatcher().dispatch::<TokenBody>(request).await;
    assert!(matches!(result, Err(Error::Json(_))));
}

#[tokio::test]
async fn test_error_status_carries_envelope() {
    let (server, client) = setup().await;
    server.mock(
        Method::GET,
        "/v2/account",
        MockResponse::error(401, "Auth token invalid", 16),
    );

    let err = client.get_account(&session()).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(err.to_string().contains("401"));
    match err {
        Error::Status {
            status,
            message,
            code,
            body,
        } => {
            assert_eq!(status.as_u16(), 401);
            assert_eq!(message, "Auth token invalid");
            assert_eq!(code, Some(16));
            assert!(body.contains("Auth token invalid"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_error_status_with_plain_body() {
    let (server, client) = setup().await;
    server.mock(
        Method::GET,
        "/v2/account",
        MockResponse::status(502).with_body("upstream unavailable"),
    );

    let err = client.get_account(&session()).await.unwrap_err();
    match err {
        Error::Status {
            status,
            message,
            code,
            ..
        } => {
            assert_eq!(status.as_u16(), 502);
            assert_eq!(message, "upstream unavailable");
            assert_eq!(code, None);
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (_server, client) = setup().await;
    let err = client.get_account(&session()).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let (server, client) = setup_with_timeout(Duration::from_millis(100)).await;
    server.mock(
        Method::GET,
        "/v2/account",
        MockResponse::json(serde_json::json!({})).with_delay(Duration::from_secs(2)),
    );

    let started = Instant::now();
    let err = client.get_account(&session()).await.unwrap_err();

    assert!(err.is_timeout());
    assert!(matches!(err, Error::Timeout(d) if d == Duration::from_millis(100)));
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_per_request_timeout_overrides_default() {
    let (server, client) = setup().await;
    server.mock(
        Method::GET,
        "/v2/slow",
        MockResponse::no_content().with_delay(Duration::from_secs(2)),
    );

    let request = client
        .request(Method::GET, "/v2/slow", &QueryParams::new())
        .timeout(Duration::from_millis(50));
    let result = client.dispatcher().dispatch_empty(request).await;
    assert!(matches!(result, Err(Error::Timeout(_))));
}

#[tokio::test]
async fn test_server_key_sent_as_basic_auth() {
    let (server, client) = setup().await;
    server.mock(
        Method::POST,
        "/v2/account/authenticate/device",
        MockResponse::json(serde_json::json!({
            "token": session_token(),
            "refresh_token": refresh_token(),
        })),
    );

    assert_ok!(client.authenticate_device("device-1", true, None).await);

    let req = server.last_request();
    assert_eq!(req.header("authorization"), Some("Basic ZGVmYXVsdGtleTo="));
}

#[tokio::test]
async fn test_session_sent_as_bearer() {
    let (server, client) = setup().await;
    server.mock(
        Method::GET,
        "/v2/account",
        MockResponse::json(serde_json::json!({})),
    );

    let session = session();
    assert_ok!(client.get_account(&session).await);

    let req = server.last_request();
    let expected = format!("Bearer {}", session.token);
    assert_eq!(req.header("authorization"), Some(expected.as_str()));
}

#[tokio::test]
async fn test_no_auth_sends_no_authorization_header() {
    let (server, client) = setup().await;
    server.mock(
        Method::GET,
        "/healthcheck",
        MockResponse::json(serde_json::json!({})),
    );

    assert_ok!(client.healthcheck().await);
    assert_eq!(server.last_request().header("authorization"), None);
}

#[tokio::test]
async fn test_default_headers_are_sent_and_request_headers_win() {
    init_test_logging();
    let server = MockServer::start().await;
    let client = NakamaClient::builder()
        .host(&server.host())
        .port(server.port())
        .header("x-client", "nakama-rs")
        .header("x-trace", "default")
        .build()
        .unwrap();
    server.mock(Method::GET, "/v2/echo", MockResponse::no_content());

    let request = client
        .request(Method::GET, "/v2/echo", &QueryParams::new())
        .header("x-trace", "override")
        .unwrap()
        .authorization(Authorization::bearer("tkn"));
    assert_ok!(client.dispatcher().dispatch_empty(request).await);

    let req = server.last_request();
    assert_eq!(req.header("x-client"), Some("nakama-rs"));
    assert_eq!(req.header_all("x-trace"), vec!["override"]);
    assert_eq!(req.header("authorization"), Some("Bearer tkn"));
}

#[tokio::test]
async fn test_request_authorization_header_replaces_credentials() {
    let (server, client) = setup().await;
    server.mock(Method::GET, "/v2/echo", MockResponse::no_content());

    let request = client
        .request(Method::GET, "/v2/echo", &QueryParams::new())
        .bearer("tok")
        .header("authorization", "Custom z")
        .unwrap();
    assert_ok!(client.dispatcher().dispatch_empty(request).await);

    assert_eq!(server.last_request().header_all("authorization"), vec!["Custom z"]);
}

#[tokio::test]
async fn test_default_authorization_header_replaces_server_key() {
    init_test_logging();
    let server = MockServer::start().await;
    let client = NakamaClient::builder()
        .host(&server.host())
        .port(server.port())
        .header("Authorization", "Gateway g1")
        .build()
        .unwrap();
    server.mock(
        Method::POST,
        "/v2/account/authenticate/custom",
        MockResponse::json(serde_json::json!({"token": "abc"})),
    );

    assert_ok!(
        client
            .authenticate_custom(&nakama_rs::AccountCustom::new("c1"), true, None)
            .await
    );

    assert_eq!(server.last_request().header_all("authorization"), vec!["Gateway g1"]);
}

#[tokio::test]
async fn test_unreachable_server_is_http_error() {
    let client = NakamaClient::builder()
        .host("127.0.0.1")
        .port(1)
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap();

    let err = assert_err!(client.healthcheck().await);
    assert!(matches!(err, Error::Http(_) | Error::Timeout(_)));
}

#[tokio::test]
async fn test_invalid_url_is_rejected_before_sending() {
    let (_server, client) = setup().await;
    let request = nakama_rs::ApiRequest::new(Method::GET, "not a url");
    let result = client.dispatcher().dispatch_empty(request).await;
    assert!(matches!(result, Err(Error::InvalidUrl(_))));
}
