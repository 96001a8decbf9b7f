//! Friend and user endpoints.

use crate::client::{NakamaClient, NO_BODY};
use crate::error::Result;
use crate::session::Session;
use crate::types::*;
use crate::url::QueryParams;
use reqwest::Method;

fn ids_query(ids: &[&str], usernames: &[&str]) -> QueryParams {
    let mut query = QueryParams::new();
    query.push_all("ids", ids).push_all("usernames", usernames);
    query
}

impl NakamaClient {
    /// List friends of the current user, optionally filtered by state.
    pub async fn list_friends(
        &self,
        session: &Session,
        limit: Option<i32>,
        state: Option<FriendState>,
        cursor: Option<&str>,
    ) -> Result<FriendList> {
        let mut query = QueryParams::new();
        query
            .push_opt("limit", limit)
            .push_opt("state", state)
            .push_opt("cursor", cursor);
        self.invoke(Method::GET, "/v2/friend", &query, NO_BODY, session.into())
            .await
    }

    /// Send friend requests, or accept pending ones, by ID or username.
    pub async fn add_friends(
        &self,
        session: &Session,
        ids: &[&str],
        usernames: &[&str],
    ) -> Result<()> {
        self.invoke_empty(
            Method::POST,
            "/v2/friend",
            &ids_query(ids, usernames),
            NO_BODY,
            session.into(),
        )
        .await
    }

    /// Remove friends or decline requests.
    pub async fn delete_friends(
        &self,
        session: &Session,
        ids: &[&str],
        usernames: &[&str],
    ) -> Result<()> {
        self.invoke_empty(
            Method::DELETE,
            "/v2/friend",
            &ids_query(ids, usernames),
            NO_BODY,
            session.into(),
        )
        .await
    }

    /// Block users.
    pub async fn block_friends(
        &self,
        session: &Session,
        ids: &[&str],
        usernames: &[&str],
    ) -> Result<()> {
        self.invoke_empty(
            Method::POST,
            "/v2/friend/block",
            &ids_query(ids, usernames),
            NO_BODY,
            session.into(),
        )
        .await
    }

    /// Import Facebook friends; `reset` drops previously imported ones first.
    pub async fn import_facebook_friends(
        &self,
        session: &Session,
        account: &AccountFacebook,
        reset: Option<bool>,
    ) -> Result<()> {
        let mut query = QueryParams::new();
        query.push_opt("reset", reset);
        self.invoke_empty(
            Method::POST,
            "/v2/friend/facebook",
            &query,
            Some(account),
            session.into(),
        )
        .await
    }

    /// Import Steam friends; `reset` drops previously imported ones first.
    pub async fn import_steam_friends(
        &self,
        session: &Session,
        account: &AccountSteam,
        reset: Option<bool>,
    ) -> Result<()> {
        let mut query = QueryParams::new();
        query.push_opt("reset", reset);
        self.invoke_empty(
            Method::POST,
            "/v2/friend/steam",
            &query,
            Some(account),
            session.into(),
        )
        .await
    }

    /// List friends of the current user's friends.
    pub async fn list_friends_of_friends(
        &self,
        session: &Session,
        limit: Option<i32>,
        cursor: Option<&str>,
    ) -> Result<FriendsOfFriendsList> {
        let mut query = QueryParams::new();
        query.push_opt("limit", limit).push_opt("cursor", cursor);
        self.invoke(
            Method::GET,
            "/v2/friend/friends",
            &query,
            NO_BODY,
            session.into(),
        )
        .await
    }

    /// Fetch users by ID, username or Facebook ID.
    pub async fn get_users(
        &self,
        session: &Session,
        ids: &[&str],
        usernames: &[&str],
        facebook_ids: &[&str],
    ) -> Result<Users> {
        let mut query = ids_query(ids, usernames);
        query.push_all("facebook_ids", facebook_ids);
        self.invoke(Method::GET, "/v2/user", &query, NO_BODY, session.into())
            .await
    }
}
