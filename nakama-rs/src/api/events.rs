use crate::client::NakamaClient;
use crate::error::Result;
use crate::session::Session;
use crate::types::Event;
use crate::url::QueryParams;
use reqwest::Method;

impl NakamaClient {
    /// Submit a custom event to the server's event pipeline.
    pub async fn event(&self, session: &Session, event: &Event) -> Result<()> {
        self.invoke_empty(
            Method::POST,
            "/v2/event",
            &QueryParams::new(),
            Some(event),
            session.into(),
        )
        .await
    }
}
