//! Nakama HTTP client and its configuration.

use crate::dispatch::{parse_header, ApiRequest, Authorization, Dispatcher};
use crate::error::{Error, Result};
use crate::url::{build_full_url, QueryParams};
use reqwest::header::HeaderMap;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Default server key of a fresh Nakama install.
pub const DEFAULT_SERVER_KEY: &str = "defaultkey";

/// Default HTTP port of the Nakama API gateway.
pub const DEFAULT_PORT: u16 = 7350;

/// Placeholder for calls that send no body.
pub(crate) const NO_BODY: Option<&()> = None;

/// Client for the Nakama REST API.
///
/// Cloning is cheap: clones share the same connection pool.
///
/// # Example
///
/// ```rust,no_run
/// use nakama_rs::NakamaClient;
///
/// # async fn example() -> nakama_rs::Result<()> {
/// let client = NakamaClient::new("127.0.0.1", 7350, "defaultkey")?;
/// let session = client.authenticate_device("my-device-id", true, None).await?;
/// println!("Logged in as: {}", session.user_id);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct NakamaClient {
    dispatcher: Dispatcher,
    base_url: String,
    server_key: String,
}

impl NakamaClient {
    /// Create a new client with default options.
    pub fn new(host: &str, port: u16, server_key: &str) -> Result<Self> {
        Self::builder()
            .host(host)
            .port(port)
            .server_key(server_key)
            .build()
    }

    /// Create a client builder for advanced configuration.
    pub fn builder() -> NakamaClientBuilder {
        NakamaClientBuilder::default()
    }

    /// Scheme, host, port and base path shared by every endpoint.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn server_key(&self) -> &str {
        &self.server_key
    }

    pub fn timeout(&self) -> Duration {
        self.dispatcher.timeout()
    }

    /// The underlying dispatcher, for hand-built requests.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Basic credentials made of the server key and an empty password.
    pub(crate) fn server_auth(&self) -> Authorization {
        Authorization::basic(&self.server_key, "")
    }

    /// Start a request to `path` on this server.
    pub fn request(&self, method: Method, path: &str, query: &QueryParams) -> ApiRequest {
        ApiRequest::new(method, build_full_url(&self.base_url, path, query))
    }

    fn prepare<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &QueryParams,
        body: Option<&B>,
        auth: Authorization,
    ) -> Result<ApiRequest> {
        let request = self.request(method, path, query).authorization(auth);
        match body {
            Some(body) => request.json(body),
            None => Ok(request),
        }
    }

    /// Call an endpoint and decode its response.
    ///
    /// A 204 yields `T::default()`.
    pub async fn invoke<T, B>(
        &self,
        method: Method,
        path: &str,
        query: &QueryParams,
        body: Option<&B>,
        auth: Authorization,
    ) -> Result<T>
    where
        T: DeserializeOwned + Default,
        B: Serialize + ?Sized,
    {
        let request = self.prepare(method, path, query, body, auth)?;
        Ok(self.dispatcher.dispatch(request).await?.unwrap_or_default())
    }

    /// Call an endpoint whose response carries no data.
    pub async fn invoke_empty<B>(
        &self,
        method: Method,
        path: &str,
        query: &QueryParams,
        body: Option<&B>,
        auth: Authorization,
    ) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let request = self.prepare(method, path, query, body, auth)?;
        self.dispatcher.dispatch_empty(request).await
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for NakamaClient configuration.
#[derive(Debug, Clone)]
pub struct NakamaClientBuilder {
    host: String,
    port: u16,
    use_ssl: bool,
    server_key: String,
    timeout: Duration,
    base_path: String,
    headers: Vec<(String, String)>,
    http: Option<Client>,
}

impl Default for NakamaClientBuilder {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            use_ssl: false,
            server_key: DEFAULT_SERVER_KEY.to_string(),
            timeout: Duration::from_secs(10),
            base_path: String::new(),
            headers: Vec::new(),
            http: None,
        }
    }
}

impl NakamaClientBuilder {
    /// Start from defaults overridden by `NAKAMA_*` environment variables.
    ///
    /// Reads `NAKAMA_HOST`, `NAKAMA_PORT`, `NAKAMA_SSL`, `NAKAMA_SERVER_KEY`
    /// and `NAKAMA_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env(|key| std::env::var(key).ok())
    }

    pub(crate) fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(host) = lookup("NAKAMA_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("NAKAMA_PORT") {
            self.port = port
                .parse()
                .map_err(|_| Error::config(format!("bad NAKAMA_PORT: {port}")))?;
        }
        if let Some(ssl) = lookup("NAKAMA_SSL") {
            self.use_ssl = match ssl.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => return Err(Error::config(format!("NAKAMA_SSL is not a boolean: {ssl}"))),
            };
        }
        if let Some(key) = lookup("NAKAMA_SERVER_KEY") {
            self.server_key = key;
        }
        if let Some(ms) = lookup("NAKAMA_TIMEOUT_MS") {
            let ms: u64 = ms
                .parse()
                .map_err(|_| Error::config(format!("bad NAKAMA_TIMEOUT_MS: {ms}")))?;
            self.timeout = Duration::from_millis(ms);
        }
        Ok(self)
    }

    /// Set the server host.
    pub fn host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    /// Set the server port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Enable or disable SSL/TLS.
    pub fn use_ssl(mut self, use_ssl: bool) -> Self {
        self.use_ssl = use_ssl;
        self
    }

    /// Set the server key used for authentication calls.
    pub fn server_key(mut self, server_key: &str) -> Self {
        self.server_key = server_key.to_string();
        self
    }

    /// Set the per-call timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Prefix every endpoint path, for servers behind a reverse proxy.
    pub fn base_path(mut self, base_path: &str) -> Self {
        self.base_path = base_path.trim_end_matches('/').to_string();
        self
    }

    /// Add a header sent with every request.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Use an existing HTTP client instead of building one.
    pub fn http_client(mut self, http: Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<NakamaClient> {
        if self.host.is_empty() {
            return Err(Error::config("host must not be empty"));
        }
        if self.timeout.is_zero() {
            return Err(Error::config("timeout must be greater than zero"));
        }

        let protocol = if self.use_ssl { "https" } else { "http" };
        let base_url = format!("{}://{}:{}{}", protocol, self.host, self.port, self.base_path);

        let mut default_headers = HeaderMap::new();
        for (name, value) in &self.headers {
            let (name, value) = parse_header(name, value)?;
            default_headers.insert(name, value);
        }

        let http = match self.http {
            Some(http) => http,
            None => Client::builder()
                .connect_timeout(self.timeout)
                .pool_idle_timeout(Duration::from_secs(90))
                .tcp_keepalive(Duration::from_secs(60))
                .build()?,
        };

        trace_debug!("nakama client configured for {}", base_url);

        Ok(NakamaClient {
            dispatcher: Dispatcher::new(http, self.timeout, default_headers),
            base_url,
            server_key: self.server_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_base_url() {
        let client = NakamaClient::builder().build().unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:7350");
        assert_eq!(client.server_key(), DEFAULT_SERVER_KEY);
        assert_eq!(client.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_ssl_and_base_path() {
        let client = NakamaClient::builder()
            .host("game.example.com")
            .port(443)
            .use_ssl(true)
            .base_path("/nakama/")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "https://game.example.com:443/nakama");
    }

    #[test]
    fn test_request_builds_full_url() {
        let client = NakamaClient::new("localhost", 7350, "k").unwrap();
        let mut q = QueryParams::new();
        q.push("limit", 5);
        let req = client.request(Method::GET, "/v2/friend", &q);
        assert_eq!(req.url, "http://localhost:7350/v2/friend?limit=5");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("NAKAMA_HOST", "nakama.internal"),
            ("NAKAMA_PORT", "8350"),
            ("NAKAMA_SSL", "true"),
            ("NAKAMA_SERVER_KEY", "prod-key"),
            ("NAKAMA_TIMEOUT_MS", "2500"),
        ]
        .into_iter()
        .collect();

        let client = NakamaClientBuilder::default()
            .with_env(|k| env.get(k).map(|v| v.to_string()))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "https://nakama.internal:8350");
        assert_eq!(client.server_key(), "prod-key");
        assert_eq!(client.timeout(), Duration::from_millis(2500));
    }

    #[test]
    fn test_env_rejects_bad_values() {
        let bad_port = NakamaClientBuilder::default()
            .with_env(|k| (k == "NAKAMA_PORT").then(|| "seventy".to_string()));
        assert!(matches!(bad_port, Err(Error::Config(_))));

        let bad_ssl = NakamaClientBuilder::default()
            .with_env(|k| (k == "NAKAMA_SSL").then(|| "maybe".to_string()));
        assert!(matches!(bad_ssl, Err(Error::Config(_))));
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        assert!(matches!(
            NakamaClient::builder().host("").build(),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            NakamaClient::builder().timeout(Duration::ZERO).build(),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            NakamaClient::builder().header("bad header", "x").build(),
            Err(Error::InvalidHeader(_))
        ));
    }
}
