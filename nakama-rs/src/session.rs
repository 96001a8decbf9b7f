//! Session management for the Nakama client.
//!
//! Nakama session tokens are JWTs. The client never verifies the signature;
//! it only reads the claims to learn the user and the expiry time.

use crate::error::{Error, Result};
use crate::types::{ApiSession, Vars};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use serde::Deserialize;

/// An authenticated user session.
#[derive(Debug, Clone)]
pub struct Session {
    /// JWT access token.
    pub token: String,
    /// Refresh token for renewing the session.
    pub refresh_token: Option<String>,
    /// Whether the account was created by the call that produced this session.
    pub created: bool,
    pub user_id: String,
    pub username: Option<String>,
    /// Session variables embedded in the token.
    pub vars: Vars,
    /// Token expiration time (Unix timestamp in seconds).
    pub expires_at: i64,
    /// Refresh token expiration time (Unix timestamp in seconds).
    pub refresh_expires_at: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct Claims {
    uid: String,
    #[serde(default)]
    usn: Option<String>,
    #[serde(default)]
    vrs: Vars,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct RefreshClaims {
    exp: i64,
}

fn decode_claims<T: serde::de::DeserializeOwned>(token: &str) -> Result<T> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| Error::InvalidSession("token is not a JWT".into()))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| Error::InvalidSession(format!("claims encoding: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| Error::InvalidSession(format!("claims: {e}")))
}

fn now() -> i64 {
    Utc::now().timestamp()
}

impl Session {
    /// Build a session from an authenticate or refresh response.
    ///
    /// Claims are read on a best-effort basis. When the token is not a
    /// readable JWT the session still carries it, with `user_id` empty and
    /// `expires_at` zero.
    pub fn from_api(api: ApiSession) -> Self {
        let refresh_token = Some(api.refresh_token).filter(|t| !t.is_empty());
        let claims = decode_claims::<Claims>(&api.token).unwrap_or_else(|_e| {
            trace_warn!("session token claims unreadable: {}", _e);
            Claims::default()
        });
        let refresh_expires_at = refresh_token
            .as_deref()
            .and_then(|rt| decode_claims::<RefreshClaims>(rt).ok())
            .map(|c| c.exp);

        let mut session = Self::from_claims(api.token, refresh_token, claims, refresh_expires_at);
        session.created = api.created;
        session
    }

    /// Rebuild a session from previously stored tokens.
    ///
    /// Fails with [`Error::InvalidSession`] when either token is not a JWT.
    pub fn restore(token: impl Into<String>, refresh_token: Option<String>) -> Result<Self> {
        let token = token.into();
        let claims: Claims = decode_claims(&token)?;
        let refresh_expires_at = match &refresh_token {
            Some(rt) => Some(decode_claims::<RefreshClaims>(rt)?.exp),
            None => None,
        };
        Ok(Self::from_claims(
            token,
            refresh_token,
            claims,
            refresh_expires_at,
        ))
    }

    fn from_claims(
        token: String,
        refresh_token: Option<String>,
        claims: Claims,
        refresh_expires_at: Option<i64>,
    ) -> Self {
        Self {
            token,
            refresh_token,
            created: false,
            user_id: claims.uid,
            username: claims.usn,
            vars: claims.vrs,
            expires_at: claims.exp,
            refresh_expires_at,
        }
    }

    /// Check if the session token has expired.
    pub fn is_expired(&self) -> bool {
        now() >= self.expires_at
    }

    /// Check if the session will expire within the given number of seconds.
    pub fn expires_within(&self, seconds: i64) -> bool {
        now().saturating_add(seconds) >= self.expires_at
    }

    /// Check if the refresh token has expired. A missing refresh token counts as expired.
    pub fn is_refresh_expired(&self) -> bool {
        self.refresh_expires_at.map_or(true, |exp| now() >= exp)
    }

    /// Get the authorization header value.
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Check if session can be refreshed.
    pub fn can_refresh(&self) -> bool {
        self.refresh_token.is_some() && !self.is_refresh_expired()
    }

    /// Get display name (username or user_id).
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.user_id)
    }
}

impl std::fmt::Display for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Session {{ user: {}, expires_in: {}s }}",
            self.display_name(),
            self.expires_at - now()
        )
    }
}
