//! Match listing and chat history.

use crate::client::{NakamaClient, NO_BODY};
use crate::error::Result;
use crate::session::Session;
use crate::types::{ChannelMessageList, MatchList};
use crate::url::{encode_path_segment, QueryParams};
use reqwest::Method;

/// Filters for [`NakamaClient::list_matches`].
#[derive(Debug, Clone, Default)]
pub struct MatchListQuery {
    pub limit: Option<i32>,
    pub authoritative: Option<bool>,
    pub label: Option<String>,
    pub min_size: Option<i32>,
    pub max_size: Option<i32>,
    /// Search query over authoritative match labels.
    pub query: Option<String>,
}

impl MatchListQuery {
    fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        query
            .push_opt("limit", self.limit)
            .push_opt("authoritative", self.authoritative)
            .push_opt("label", self.label.as_deref())
            .push_opt("min_size", self.min_size)
            .push_opt("max_size", self.max_size)
            .push_opt("query", self.query.as_deref());
        query
    }
}

impl NakamaClient {
    /// List running matches.
    pub async fn list_matches(
        &self,
        session: &Session,
        filter: &MatchListQuery,
    ) -> Result<MatchList> {
        self.invoke(
            Method::GET,
            "/v2/match",
            &filter.to_query(),
            NO_BODY,
            session.into(),
        )
        .await
    }

    /// List messages of a chat channel. `forward` walks from oldest to newest.
    pub async fn list_channel_messages(
        &self,
        session: &Session,
        channel_id: &str,
        limit: Option<i32>,
        forward: Option<bool>,
        cursor: Option<&str>,
    ) -> Result<ChannelMessageList> {
        let mut query = QueryParams::new();
        query
            .push_opt("limit", limit)
            .push_opt("forward", forward)
            .push_opt("cursor", cursor);
        let path = format!("/v2/channel/{}", encode_path_segment(channel_id));
        self.invoke(Method::GET, &path, &query, NO_BODY, session.into())
            .await
    }
}
