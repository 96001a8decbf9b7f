//! Error types for the Nakama client.

use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Result type for Nakama operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Nakama client errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport-level failure (connect, DNS, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The request URL could not be built or parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A header name or value was rejected.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// The call did not complete within its timeout.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Server answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Status {
        status: StatusCode,
        message: String,
        code: Option<i32>,
        body: String,
    },

    /// A client-side authentication precondition failed.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// A session token could not be decoded.
    #[error("Invalid session token: {0}")]
    InvalidSession(String),

    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Error envelope returned by the Nakama gateway.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<i32>,
}

impl Error {
    /// Build a status error from a raw response body.
    ///
    /// When the body is a gateway error envelope its message and gRPC code are
    /// extracted; otherwise the raw text (or the canonical reason) is used.
    pub fn from_status(status: StatusCode, body: String) -> Self {
        let envelope = serde_json::from_str::<ErrorEnvelope>(&body).ok();
        let code = envelope.as_ref().and_then(|e| e.code);
        let message = envelope
            .and_then(|e| e.message.or(e.error))
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    status.canonical_reason().unwrap_or("unknown status").to_string()
                } else {
                    body.clone()
                }
            });

        Self::Status {
            status,
            message,
            code,
            body,
        }
    }

    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout(_) => true,
            Self::Http(e) => e.is_timeout(),
            _ => false,
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_from_envelope() {
        let err = Error::from_status(
            StatusCode::NOT_FOUND,
            r#"{"error":"Group not found.","message":"Group not found.","code":5}"#.to_string(),
        );
        match &err {
            Error::Status { message, code, .. } => {
                assert_eq!(message, "Group not found.");
                assert_eq!(*code, Some(5));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.is_not_found());
        assert!(err.to_string().contains("404 Not Found"));
    }

    #[test]
    fn test_status_error_plain_body() {
        let err = Error::from_status(StatusCode::BAD_GATEWAY, "upstream down".to_string());
        assert_eq!(err.to_string(), "HTTP 502 Bad Gateway: upstream down");
    }

    #[test]
    fn test_status_error_empty_body() {
        let err = Error::from_status(StatusCode::UNAUTHORIZED, String::new());
        assert!(err.is_unauthorized());
        assert!(err.to_string().contains("Unauthorized"));
    }

    #[test]
    fn test_timeout_display() {
        let err = Error::Timeout(Duration::from_millis(250));
        assert!(err.is_timeout());
        assert!(err.to_string().contains("250ms"));
    }
}
