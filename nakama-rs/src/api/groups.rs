//! Group endpoints.

use crate::client::{NakamaClient, NO_BODY};
use crate::error::Result;
use crate::session::Session;
use crate::types::*;
use crate::url::{encode_path_segment, QueryParams};
use reqwest::Method;

/// Filters for [`NakamaClient::list_groups`].
#[derive(Debug, Clone, Default)]
pub struct GroupListQuery {
    /// Name prefix, with a trailing `%` for a wildcard match.
    pub name: Option<String>,
    pub cursor: Option<String>,
    pub limit: Option<i32>,
    pub lang_tag: Option<String>,
    /// Exact member count.
    pub members: Option<i32>,
    pub open: Option<bool>,
}

impl GroupListQuery {
    fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        query
            .push_opt("name", self.name.as_deref())
            .push_opt("cursor", self.cursor.as_deref())
            .push_opt("limit", self.limit)
            .push_opt("lang_tag", self.lang_tag.as_deref())
            .push_opt("members", self.members)
            .push_opt("open", self.open);
        query
    }
}

fn group_path(group_id: &str, suffix: &str) -> String {
    format!("/v2/group/{}{}", encode_path_segment(group_id), suffix)
}

fn state_query(
    limit: Option<i32>,
    state: Option<GroupUserState>,
    cursor: Option<&str>,
) -> QueryParams {
    let mut query = QueryParams::new();
    query
        .push_opt("limit", limit)
        .push_opt("state", state)
        .push_opt("cursor", cursor);
    query
}

impl NakamaClient {
    /// List groups matching the filters.
    pub async fn list_groups(
        &self,
        session: &Session,
        filter: &GroupListQuery,
    ) -> Result<GroupList> {
        self.invoke(
            Method::GET,
            "/v2/group",
            &filter.to_query(),
            NO_BODY,
            session.into(),
        )
        .await
    }

    /// Create a group owned by the current user.
    pub async fn create_group(
        &self,
        session: &Session,
        request: &CreateGroupRequest,
    ) -> Result<ApiGroup> {
        self.invoke(
            Method::POST,
            "/v2/group",
            &QueryParams::new(),
            Some(request),
            session.into(),
        )
        .await
    }

    /// Update a group the current user administers.
    pub async fn update_group(
        &self,
        session: &Session,
        group_id: &str,
        request: &UpdateGroupRequest,
    ) -> Result<()> {
        self.invoke_empty(
            Method::PUT,
            &group_path(group_id, ""),
            &QueryParams::new(),
            Some(request),
            session.into(),
        )
        .await
    }

    pub async fn delete_group(&self, session: &Session, group_id: &str) -> Result<()> {
        self.invoke_empty(
            Method::DELETE,
            &group_path(group_id, ""),
            &QueryParams::new(),
            NO_BODY,
            session.into(),
        )
        .await
    }

    async fn group_members_action(
        &self,
        session: &Session,
        group_id: &str,
        action: &str,
        user_ids: &[&str],
    ) -> Result<()> {
        let mut query = QueryParams::new();
        query.push_all("user_ids", user_ids);
        let path = group_path(group_id, &format!("/{action}"));
        self.invoke_empty(Method::POST, &path, &query, NO_BODY, session.into())
            .await
    }

    /// Add users to a group, or accept their join requests.
    pub async fn add_group_users(
        &self,
        session: &Session,
        group_id: &str,
        user_ids: &[&str],
    ) -> Result<()> {
        self.group_members_action(session, group_id, "add", user_ids).await
    }

    pub async fn ban_group_users(
        &self,
        session: &Session,
        group_id: &str,
        user_ids: &[&str],
    ) -> Result<()> {
        self.group_members_action(session, group_id, "ban", user_ids).await
    }

    /// Demote members one rank.
    pub async fn demote_group_users(
        &self,
        session: &Session,
        group_id: &str,
        user_ids: &[&str],
    ) -> Result<()> {
        self.group_members_action(session, group_id, "demote", user_ids).await
    }

    /// Kick members, or decline their join requests.
    pub async fn kick_group_users(
        &self,
        session: &Session,
        group_id: &str,
        user_ids: &[&str],
    ) -> Result<()> {
        self.group_members_action(session, group_id, "kick", user_ids).await
    }

    /// Promote members one rank.
    pub async fn promote_group_users(
        &self,
        session: &Session,
        group_id: &str,
        user_ids: &[&str],
    ) -> Result<()> {
        self.group_members_action(session, group_id, "promote", user_ids).await
    }

    /// Join an open group, or request to join a closed one.
    pub async fn join_group(&self, session: &Session, group_id: &str) -> Result<()> {
        self.invoke_empty(
            Method::POST,
            &group_path(group_id, "/join"),
            &QueryParams::new(),
            NO_BODY,
            session.into(),
        )
        .await
    }

    pub async fn leave_group(&self, session: &Session, group_id: &str) -> Result<()> {
        self.invoke_empty(
            Method::POST,
            &group_path(group_id, "/leave"),
            &QueryParams::new(),
            NO_BODY,
            session.into(),
        )
        .await
    }

    /// List members of a group.
    pub async fn list_group_users(
        &self,
        session: &Session,
        group_id: &str,
        limit: Option<i32>,
        state: Option<GroupUserState>,
        cursor: Option<&str>,
    ) -> Result<GroupUserList> {
        self.invoke(
            Method::GET,
            &group_path(group_id, "/user"),
            &state_query(limit, state, cursor),
            NO_BODY,
            session.into(),
        )
        .await
    }

    /// List groups a user belongs to.
    pub async fn list_user_groups(
        &self,
        session: &Session,
        user_id: &str,
        limit: Option<i32>,
        state: Option<GroupUserState>,
        cursor: Option<&str>,
    ) -> Result<UserGroupList> {
        let path = format!("/v2/user/{}/group", encode_path_segment(user_id));
        self.invoke(
            Method::GET,
            &path,
            &state_query(limit, state, cursor),
            NO_BODY,
            session.into(),
        )
        .await
    }
}
