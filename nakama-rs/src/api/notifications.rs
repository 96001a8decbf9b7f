use crate::client::{NakamaClient, NO_BODY};
use crate::error::Result;
use crate::session::Session;
use crate::types::NotificationList;
use crate::url::QueryParams;
use reqwest::Method;

impl NakamaClient {
    /// List notifications for the current user.
    ///
    /// Pass the previous page's `cacheable_cursor` to fetch only newer ones.
    pub async fn list_notifications(
        &self,
        session: &Session,
        limit: Option<i32>,
        cacheable_cursor: Option<&str>,
    ) -> Result<NotificationList> {
        let mut query = QueryParams::new();
        query
            .push_opt("limit", limit)
            .push_opt("cacheable_cursor", cacheable_cursor);
        self.invoke(
            Method::GET,
            "/v2/notification",
            &query,
            NO_BODY,
            session.into(),
        )
        .await
    }

    pub async fn delete_notifications(&self, session: &Session, ids: &[&str]) -> Result<()> {
        let mut query = QueryParams::new();
        query.push_all("ids", ids);
        self.invoke_empty(
            Method::DELETE,
            "/v2/notification",
            &query,
            NO_BODY,
            session.into(),
        )
        .await
    }
}
