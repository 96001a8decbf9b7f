//! Leaderboard and tournament endpoints.

use crate::client::{NakamaClient, NO_BODY};
use crate::error::Result;
use crate::session::Session;
use crate::types::*;
use crate::url::{encode_path_segment, QueryParams};
use reqwest::Method;

/// Filters for [`NakamaClient::list_tournaments`].
#[derive(Debug, Clone, Default)]
pub struct TournamentListQuery {
    pub category_start: Option<u32>,
    pub category_end: Option<u32>,
    /// Unix time lower bound on the start time.
    pub start_time: Option<u32>,
    /// Unix time upper bound on the end time.
    pub end_time: Option<u32>,
    pub limit: Option<i32>,
    pub cursor: Option<String>,
}

impl TournamentListQuery {
    fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        query
            .push_opt("category_start", self.category_start)
            .push_opt("category_end", self.category_end)
            .push_opt("start_time", self.start_time)
            .push_opt("end_time", self.end_time)
            .push_opt("limit", self.limit)
            .push_opt("cursor", self.cursor.as_deref());
        query
    }
}

fn records_query(
    owner_ids: &[&str],
    limit: Option<i32>,
    cursor: Option<&str>,
    expiry: Option<i64>,
) -> QueryParams {
    let mut query = QueryParams::new();
    query
        .push_all("owner_ids", owner_ids)
        .push_opt("limit", limit)
        .push_opt("cursor", cursor)
        .push_opt("expiry", expiry);
    query
}

fn around_owner_query(
    limit: Option<u32>,
    expiry: Option<i64>,
    cursor: Option<&str>,
) -> QueryParams {
    let mut query = QueryParams::new();
    query
        .push_opt("limit", limit)
        .push_opt("expiry", expiry)
        .push_opt("cursor", cursor);
    query
}

impl NakamaClient {
    // ========================================================================
    // Leaderboards
    // ========================================================================

    /// List records of a leaderboard, plus those of `owner_ids` when given.
    ///
    /// `expiry` selects a past reset period by its Unix expiry time.
    pub async fn list_leaderboard_records(
        &self,
        session: &Session,
        leaderboard_id: &str,
        owner_ids: &[&str],
        limit: Option<i32>,
        cursor: Option<&str>,
        expiry: Option<i64>,
    ) -> Result<LeaderboardRecordList> {
        let path = format!("/v2/leaderboard/{}", encode_path_segment(leaderboard_id));
        self.invoke(
            Method::GET,
            &path,
            &records_query(owner_ids, limit, cursor, expiry),
            NO_BODY,
            session.into(),
        )
        .await
    }

    /// List leaderboard records ranked around an owner.
    pub async fn list_leaderboard_records_around_owner(
        &self,
        session: &Session,
        leaderboard_id: &str,
        owner_id: &str,
        limit: Option<u32>,
        expiry: Option<i64>,
        cursor: Option<&str>,
    ) -> Result<LeaderboardRecordList> {
        let path = format!(
            "/v2/leaderboard/{}/owner/{}",
            encode_path_segment(leaderboard_id),
            encode_path_segment(owner_id)
        );
        self.invoke(
            Method::GET,
            &path,
            &around_owner_query(limit, expiry, cursor),
            NO_BODY,
            session.into(),
        )
        .await
    }

    /// Submit a score for the current user.
    pub async fn write_leaderboard_record(
        &self,
        session: &Session,
        leaderboard_id: &str,
        record: &LeaderboardRecordWrite,
    ) -> Result<LeaderboardRecord> {
        let path = format!("/v2/leaderboard/{}", encode_path_segment(leaderboard_id));
        self.invoke(
            Method::POST,
            &path,
            &QueryParams::new(),
            Some(record),
            session.into(),
        )
        .await
    }

    /// Delete the current user's record.
    pub async fn delete_leaderboard_record(
        &self,
        session: &Session,
        leaderboard_id: &str,
    ) -> Result<()> {
        let path = format!("/v2/leaderboard/{}", encode_path_segment(leaderboard_id));
        self.invoke_empty(
            Method::DELETE,
            &path,
            &QueryParams::new(),
            NO_BODY,
            session.into(),
        )
        .await
    }

    // ========================================================================
    // Tournaments
    // ========================================================================

    /// List tournaments matching the filters.
    pub async fn list_tournaments(
        &self,
        session: &Session,
        filter: &TournamentListQuery,
    ) -> Result<TournamentList> {
        self.invoke(
            Method::GET,
            "/v2/tournament",
            &filter.to_query(),
            NO_BODY,
            session.into(),
        )
        .await
    }

    /// List records of a tournament, plus those of `owner_ids` when given.
    pub async fn list_tournament_records(
        &self,
        session: &Session,
        tournament_id: &str,
        owner_ids: &[&str],
        limit: Option<i32>,
        cursor: Option<&str>,
        expiry: Option<i64>,
    ) -> Result<TournamentRecordList> {
        let path = format!("/v2/tournament/{}", encode_path_segment(tournament_id));
        self.invoke(
            Method::GET,
            &path,
            &records_query(owner_ids, limit, cursor, expiry),
            NO_BODY,
            session.into(),
        )
        .await
    }

    /// List tournament records ranked around an owner.
    pub async fn list_tournament_records_around_owner(
        &self,
        session: &Session,
        tournament_id: &str,
        owner_id: &str,
        limit: Option<u32>,
        expiry: Option<i64>,
        cursor: Option<&str>,
    ) -> Result<TournamentRecordList> {
        let path = format!(
            "/v2/tournament/{}/owner/{}",
            encode_path_segment(tournament_id),
            encode_path_segment(owner_id)
        );
        self.invoke(
            Method::GET,
            &path,
            &around_owner_query(limit, expiry, cursor),
            NO_BODY,
            session.into(),
        )
        .await
    }

    /// Submit a tournament score for the current user.
    pub async fn write_tournament_record(
        &self,
        session: &Session,
        tournament_id: &str,
        record: &LeaderboardRecordWrite,
    ) -> Result<LeaderboardRecord> {
        let path = format!("/v2/tournament/{}", encode_path_segment(tournament_id));
        self.invoke(
            Method::PUT,
            &path,
            &QueryParams::new(),
            Some(record),
            session.into(),
        )
        .await
    }

    /// Delete the current user's tournament record.
    pub async fn delete_tournament_record(
        &self,
        session: &Session,
        tournament_id: &str,
    ) -> Result<()> {
        let path = format!("/v2/tournament/{}", encode_path_segment(tournament_id));
        self.invoke_empty(
            Method::DELETE,
            &path,
            &QueryParams::new(),
            NO_BODY,
            session.into(),
        )
        .await
    }

    /// Join a tournament that requires joining before submitting scores.
    pub async fn join_tournament(&self, session: &Session, tournament_id: &str) -> Result<()> {
        let path = format!("/v2/tournament/{}/join", encode_path_segment(tournament_id));
        self.invoke_empty(
            Method::POST,
            &path,
            &QueryParams::new(),
            NO_BODY,
            session.into(),
        )
        .await
    }
}
