//! Request dispatcher.
//!
//! Executes exactly one HTTP call per [`ApiRequest`] and classifies the
//! answer: 204 (or an empty 2xx body) is [`Outcome::NoContent`], any other
//! 2xx body is decoded as JSON, everything else becomes [`Error::Status`].
//!
//! The send and the body read run inside a single timeout scope. When the
//! timer fires the whole exchange future is dropped, which cancels the
//! in-flight request and returns its connection to the pool. There are no
//! retries.

use crate::error::{Error, Result};
use crate::session::Session;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Credentials attached to a request.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Authorization {
    #[default]
    None,
    /// `Authorization: Bearer <token>`; an empty token attaches nothing.
    Bearer(String),
    /// `Authorization: Basic base64(username:password)`.
    Basic { username: String, password: String },
}

impl Authorization {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer(token.into())
    }

    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Header value for these credentials, if any.
    pub fn header_value(&self) -> Result<Option<HeaderValue>> {
        let raw = match self {
            Self::None => return Ok(None),
            Self::Bearer(token) if token.is_empty() => return Ok(None),
            Self::Bearer(token) => format!("Bearer {token}"),
            Self::Basic { username, password } => {
                format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
            }
        };
        let mut value = HeaderValue::from_str(&raw)
            .map_err(|e| Error::InvalidHeader(format!("authorization: {e}")))?;
        value.set_sensitive(true);
        Ok(Some(value))
    }
}

impl From<&Session> for Authorization {
    fn from(session: &Session) -> Self {
        Self::Bearer(session.token.clone())
    }
}

// Credentials never reach Debug output.
impl std::fmt::Debug for Authorization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bearer(_) => f.write_str("Bearer(..)"),
            Self::Basic { username, .. } => write!(f, "Basic({username}:..)"),
        }
    }
}

/// A fully described HTTP request.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Fully built target URL.
    pub url: String,
    pub body: Option<Vec<u8>>,
    /// Extra headers; they override defaults and authorization.
    pub headers: HeaderMap,
    pub authorization: Authorization,
    /// Per-call override of the dispatcher timeout.
    pub timeout: Option<Duration>,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
            headers: HeaderMap::new(),
            authorization: Authorization::None,
            timeout: None,
        }
    }

    /// Serialize `body` as the JSON request body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_vec(body)?);
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(self)
    }

    /// Use raw bytes as the request body.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn authorization(mut self, authorization: Authorization) -> Self {
        self.authorization = authorization;
        self
    }

    pub fn bearer(self, token: impl Into<String>) -> Self {
        self.authorization(Authorization::bearer(token))
    }

    pub fn basic(self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.authorization(Authorization::basic(username, password))
    }

    /// Set a header, replacing any previous value with the same name.
    pub fn header(mut self, name: &str, value: &str) -> Result<Self> {
        let (name, value) = parse_header(name, value)?;
        self.headers.insert(name, value);
        Ok(self)
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

pub(crate) fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| Error::InvalidHeader(format!("{name}: {e}")))?;
    let header_value =
        HeaderValue::from_str(value).map_err(|e| Error::InvalidHeader(format!("{name}: {e}")))?;
    Ok((header_name, header_value))
}

/// Result of a successful call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// 204, or a 2xx with an empty body.
    NoContent,
    /// 2xx with a decoded body.
    Body(T),
}

impl<T> Outcome<T> {
    pub fn is_no_content(&self) -> bool {
        matches!(self, Self::NoContent)
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::NoContent => None,
            Self::Body(value) => Some(value),
        }
    }

    pub fn unwrap_or_default(self) -> T
    where
        T: Default,
    {
        self.into_option().unwrap_or_default()
    }
}

/// Executes requests on a shared, pooled HTTP client.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    // Client holds a connection pool internally; clones share it.
    http: Client,
    timeout: Duration,
    default_headers: HeaderMap,
}

impl Dispatcher {
    pub fn new(http: Client, timeout: Duration, default_headers: HeaderMap) -> Self {
        Self {
            http,
            timeout,
            default_headers,
        }
    }

    /// Default timeout applied to every call.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Execute `request` and decode a 2xx body into `T`.
    pub async fn dispatch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<Outcome<T>> {
        match self.execute(request).await? {
            None => Ok(Outcome::NoContent),
            Some(body) => Ok(Outcome::Body(serde_json::from_slice(&body)?)),
        }
    }

    /// Execute `request`, discarding any 2xx body.
    pub async fn dispatch_empty(&self, request: ApiRequest) -> Result<()> {
        self.execute(request).await.map(|_| ())
    }

    async fn execute(&self, request: ApiRequest) -> Result<Option<Bytes>> {
        let url = Url::parse(&request.url)
            .map_err(|e| Error::InvalidUrl(format!("{}: {e}", request.url)))?;
        let timeout = request.timeout.unwrap_or(self.timeout);
        let method = request.method;

        let mut headers = HeaderMap::new();
        if let Some(value) = request.authorization.header_value()? {
            headers.insert(AUTHORIZATION, value);
        }
        headers.extend(self.default_headers.clone());
        headers.extend(request.headers);

        trace_debug!("{} {}", method, url.path());
        let path = url.path().to_string();

        let mut builder = self.http.request(method.clone(), url).headers(headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let exchange = async {
            let response = builder.send().await?;
            let status = response.status();
            let body = response.bytes().await?;
            Ok::<_, Error>((status, body))
        };

        let (status, body) = match tokio::time::timeout(timeout, exchange).await {
            Ok(result) => result?,
            Err(_) => {
                trace_warn!("{} {} timed out after {:?}", method, path, timeout);
                return Err(Error::Timeout(timeout));
            }
        };

        trace_debug!("{} {} -> {}", method, path, status);

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if status.is_success() {
            return Ok(if body.is_empty() { None } else { Some(body) });
        }

        trace_warn!("{} {} failed with {}", method, path, status);
        Err(Error::from_status(
            status,
            String::from_utf8_lossy(&body).into_owned(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_authorization_header() {
        let value = Authorization::basic("defaultkey", "")
            .header_value()
            .unwrap()
            .unwrap();
        // base64("defaultkey:")
        assert_eq!(value.to_str().unwrap(), "Basic ZGVmYXVsdGtleTo=");
        assert!(value.is_sensitive());
    }

    #[test]
    fn test_bearer_authorization_header() {
        let value = Authorization::bearer("abc").header_value().unwrap().unwrap();
        assert_eq!(value.to_str().unwrap(), "Bearer abc");
    }

    #[test]
    fn test_empty_bearer_attaches_nothing() {
        assert!(Authorization::bearer("").header_value().unwrap().is_none());
        assert!(Authorization::None.header_value().unwrap().is_none());
    }

    #[test]
    fn test_debug_hides_credentials() {
        let debug = format!("{:?}", Authorization::basic("key", "secret"));
        assert!(!debug.contains("secret"));
        let debug = format!("{:?}", Authorization::bearer("token-value"));
        assert!(!debug.contains("token-value"));
    }

    #[test]
    fn test_request_json_sets_content_type() {
        let req = ApiRequest::new(Method::POST, "http://h/v2/group?")
            .json(&serde_json::json!({"name": "g"}))
            .unwrap();
        assert_eq!(req.headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(req.body.as_deref(), Some(br#"{"name":"g"}"#.as_slice()));
    }

    #[test]
    fn test_request_header_overwrites() {
        let req = ApiRequest::new(Method::GET, "http://h/")
            .header("x-trace", "1")
            .unwrap()
            .header("x-trace", "2")
            .unwrap();
        assert_eq!(req.headers.get_all("x-trace").iter().count(), 1);
        assert_eq!(req.headers.get("x-trace").unwrap(), "2");
    }

    #[test]
    fn test_request_rejects_bad_header() {
        let result = ApiRequest::new(Method::GET, "http://h/").header("bad header", "v");
        assert!(matches!(result, Err(Error::InvalidHeader(_))));
    }

    #[test]
    fn test_outcome_helpers() {
        let none: Outcome<Vec<u8>> = Outcome::NoContent;
        assert!(none.is_no_content());
        assert!(none.unwrap_or_default().is_empty());
        assert_eq!(Outcome::Body(3).into_option(), Some(3));
    }
}
