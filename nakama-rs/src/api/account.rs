//! Account, authentication and session endpoints.

use crate::client::{NakamaClient, NO_BODY};
use crate::dispatch::Authorization;
use crate::error::{Error, Result};
use crate::session::Session;
use crate::types::*;
use crate::url::QueryParams;
use reqwest::Method;
use serde::Serialize;

fn auth_query(create: bool, username: Option<&str>) -> QueryParams {
    let mut query = QueryParams::new();
    query.push("create", create).push_opt("username", username);
    query
}

impl NakamaClient {
    // ========================================================================
    // Health
    // ========================================================================

    /// Check that the server is reachable.
    pub async fn healthcheck(&self) -> Result<()> {
        self.invoke_empty(
            Method::GET,
            "/healthcheck",
            &QueryParams::new(),
            NO_BODY,
            Authorization::None,
        )
        .await
    }

    // ========================================================================
    // Account
    // ========================================================================

    /// Fetch the current user's account.
    pub async fn get_account(&self, session: &Session) -> Result<ApiAccount> {
        self.invoke(
            Method::GET,
            "/v2/account",
            &QueryParams::new(),
            NO_BODY,
            session.into(),
        )
        .await
    }

    /// Update fields of the current user's account.
    pub async fn update_account(
        &self,
        session: &Session,
        request: &UpdateAccountRequest,
    ) -> Result<()> {
        self.invoke_empty(
            Method::PUT,
            "/v2/account",
            &QueryParams::new(),
            Some(request),
            session.into(),
        )
        .await
    }

    /// Delete the current user's account.
    pub async fn delete_account(&self, session: &Session) -> Result<()> {
        self.invoke_empty(
            Method::DELETE,
            "/v2/account",
            &QueryParams::new(),
            NO_BODY,
            session.into(),
        )
        .await
    }

    // ========================================================================
    // Session
    // ========================================================================

    /// Exchange the session's refresh token for a new session.
    ///
    /// Fails with [`Error::Auth`] when the session carries no refresh token.
    pub async fn session_refresh(&self, session: &Session, vars: Option<Vars>) -> Result<Session> {
        let refresh_token = session
            .refresh_token
            .as_deref()
            .ok_or_else(|| Error::Auth("session has no refresh token".into()))?;

        #[derive(Serialize)]
        struct Request<'a> {
            token: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            vars: Option<Vars>,
        }

        let mut api: ApiSession = self
            .invoke(
                Method::POST,
                "/v2/account/session/refresh",
                &QueryParams::new(),
                Some(&Request {
                    token: refresh_token,
                    vars,
                }),
                self.server_auth(),
            )
            .await?;

        // The server may keep the existing refresh token.
        if api.refresh_token.is_empty() {
            api.refresh_token = refresh_token.to_string();
        }
        Ok(Session::from_api(api))
    }

    /// Invalidate the session and its refresh token on the server.
    pub async fn session_logout(&self, session: &Session) -> Result<()> {
        #[derive(Serialize)]
        struct Request<'a> {
            token: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            refresh_token: Option<&'a str>,
        }

        let body = Request {
            token: &session.token,
            refresh_token: session.refresh_token.as_deref(),
        };
        self.invoke_empty(
            Method::POST,
            "/v2/session/logout",
            &QueryParams::new(),
            Some(&body),
            session.into(),
        )
        .await
    }

    // ========================================================================
    // Authentication
    // ========================================================================

    async fn authenticate<B: Serialize + ?Sized>(
        &self,
        provider: &str,
        query: &QueryParams,
        account: &B,
    ) -> Result<Session> {
        let path = format!("/v2/account/authenticate/{provider}");
        let api: ApiSession = self
            .invoke(
                Method::POST,
                &path,
                query,
                Some(account),
                self.server_auth(),
            )
            .await?;
        Ok(Session::from_api(api))
    }

    /// Authenticate with a device ID (anonymous auth).
    ///
    /// Creates a new account if `create` is true and none exists for this device.
    pub async fn authenticate_device(
        &self,
        id: &str,
        create: bool,
        username: Option<&str>,
    ) -> Result<Session> {
        self.authenticate_device_with(&AccountDevice::new(id), create, username)
            .await
    }

    /// Authenticate with device credentials carrying session variables.
    pub async fn authenticate_device_with(
        &self,
        account: &AccountDevice,
        create: bool,
        username: Option<&str>,
    ) -> Result<Session> {
        self.authenticate("device", &auth_query(create, username), account)
            .await
    }

    /// Authenticate with an identifier from an external auth system.
    pub async fn authenticate_custom(
        &self,
        account: &AccountCustom,
        create: bool,
        username: Option<&str>,
    ) -> Result<Session> {
        self.authenticate("custom", &auth_query(create, username), account)
            .await
    }

    /// Authenticate with email and password.
    pub async fn authenticate_email(
        &self,
        account: &AccountEmail,
        create: bool,
        username: Option<&str>,
    ) -> Result<Session> {
        self.authenticate("email", &auth_query(create, username), account)
            .await
    }

    pub async fn authenticate_apple(
        &self,
        account: &AccountApple,
        create: bool,
        username: Option<&str>,
    ) -> Result<Session> {
        self.authenticate("apple", &auth_query(create, username), account)
            .await
    }

    /// Authenticate with a Facebook token; `sync` imports Facebook friends.
    pub async fn authenticate_facebook(
        &self,
        account: &AccountFacebook,
        create: bool,
        username: Option<&str>,
        sync: Option<bool>,
    ) -> Result<Session> {
        let mut query = auth_query(create, username);
        query.push_opt("sync", sync);
        self.authenticate("facebook", &query, account).await
    }

    pub async fn authenticate_facebook_instant_game(
        &self,
        account: &AccountFacebookInstantGame,
        create: bool,
        username: Option<&str>,
    ) -> Result<Session> {
        self.authenticate(
            "facebookinstantgame",
            &auth_query(create, username),
            account,
        )
        .await
    }

    pub async fn authenticate_game_center(
        &self,
        account: &AccountGameCenter,
        create: bool,
        username: Option<&str>,
    ) -> Result<Session> {
        self.authenticate("gamecenter", &auth_query(create, username), account)
            .await
    }

    pub async fn authenticate_google(
        &self,
        account: &AccountGoogle,
        create: bool,
        username: Option<&str>,
    ) -> Result<Session> {
        self.authenticate("google", &auth_query(create, username), account)
            .await
    }

    /// Authenticate with a Steam ticket; `sync` imports Steam friends.
    pub async fn authenticate_steam(
        &self,
        account: &AccountSteam,
        create: bool,
        username: Option<&str>,
        sync: Option<bool>,
    ) -> Result<Session> {
        let mut query = auth_query(create, username);
        query.push_opt("sync", sync);
        self.authenticate("steam", &query, account).await
    }

    // ========================================================================
    // Link / unlink
    // ========================================================================

    async fn account_link<B: Serialize + ?Sized>(
        &self,
        session: &Session,
        action: &str,
        provider: &str,
        query: &QueryParams,
        body: &B,
    ) -> Result<()> {
        let path = format!("/v2/account/{action}/{provider}");
        self.invoke_empty(Method::POST, &path, query, Some(body), session.into())
            .await
    }

    pub async fn link_apple(&self, session: &Session, account: &AccountApple) -> Result<()> {
        self.account_link(session, "link", "apple", &QueryParams::new(), account).await
    }

    pub async fn link_custom(&self, session: &Session, account: &AccountCustom) -> Result<()> {
        self.account_link(session, "link", "custom", &QueryParams::new(), account).await
    }

    pub async fn link_device(&self, session: &Session, account: &AccountDevice) -> Result<()> {
        self.account_link(session, "link", "device", &QueryParams::new(), account).await
    }

    pub async fn link_email(&self, session: &Session, account: &AccountEmail) -> Result<()> {
        self.account_link(session, "link", "email", &QueryParams::new(), account).await
    }

    pub async fn link_facebook(
        &self,
        session: &Session,
        account: &AccountFacebook,
        sync: Option<bool>,
    ) -> Result<()> {
        let mut query = QueryParams::new();
        query.push_opt("sync", sync);
        self.account_link(session, "link", "facebook", &query, account).await
    }

    pub async fn link_facebook_instant_game(
        &self,
        session: &Session,
        account: &AccountFacebookInstantGame,
    ) -> Result<()> {
        self.account_link(
            session,
            "link",
            "facebookinstantgame",
            &QueryParams::new(),
            account,
        )
        .await
    }

    pub async fn link_game_center(
        &self,
        session: &Session,
        account: &AccountGameCenter,
    ) -> Result<()> {
        self.account_link(session, "link", "gamecenter", &QueryParams::new(), account).await
    }

    pub async fn link_google(&self, session: &Session, account: &AccountGoogle) -> Result<()> {
        self.account_link(session, "link", "google", &QueryParams::new(), account).await
    }

    /// Link a Steam account; `sync` imports Steam friends.
    pub async fn link_steam(
        &self,
        session: &Session,
        account: &AccountSteam,
        sync: bool,
    ) -> Result<()> {
        #[derive(Serialize)]
        struct Request<'a> {
            account: &'a AccountSteam,
            sync: bool,
        }

        self.account_link(
            session,
            "link",
            "steam",
            &QueryParams::new(),
            &Request { account, sync },
        )
        .await
    }

    pub async fn unlink_apple(&self, session: &Session, account: &AccountApple) -> Result<()> {
        self.account_link(session, "unlink", "apple", &QueryParams::new(), account).await
    }

    pub async fn unlink_custom(&self, session: &Session, account: &AccountCustom) -> Result<()> {
        self.account_link(session, "unlink", "custom", &QueryParams::new(), account).await
    }

    pub async fn unlink_device(&self, session: &Session, account: &AccountDevice) -> Result<()> {
        self.account_link(session, "unlink", "device", &QueryParams::new(), account).await
    }

    pub async fn unlink_email(&self, session: &Session, account: &AccountEmail) -> Result<()> {
        self.account_link(session, "unlink", "email", &QueryParams::new(), account).await
    }

    pub async fn unlink_facebook(
        &self,
        session: &Session,
        account: &AccountFacebook,
    ) -> Result<()> {
        self.account_link(session, "unlink", "facebook", &QueryParams::new(), account).await
    }

    pub async fn unlink_facebook_instant_game(
        &self,
        session: &Session,
        account: &AccountFacebookInstantGame,
    ) -> Result<()> {
        self.account_link(
            session,
            "unlink",
            "facebookinstantgame",
            &QueryParams::new(),
            account,
        )
        .await
    }

    pub async fn unlink_game_center(
        &self,
        session: &Session,
        account: &AccountGameCenter,
    ) -> Result<()> {
        self.account_link(
            session,
            "unlink",
            "gamecenter",
            &QueryParams::new(),
            account,
        ).await
    }

    pub async fn unlink_google(&self, session: &Session, account: &AccountGoogle) -> Result<()> {
        self.account_link(session, "unlink", "google", &QueryParams::new(), account).await
    }

    pub async fn unlink_steam(&self, session: &Session, account: &AccountSteam) -> Result<()> {
        self.account_link(session, "unlink", "steam", &QueryParams::new(), account).await
    }
}
