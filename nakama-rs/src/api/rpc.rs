//! Server runtime function calls.
//!
//! The gateway expects the payload as a JSON string value, so a payload of
//! `{"a":1}` goes over the wire as `"{\"a\":1}"`.

use crate::client::{NakamaClient, NO_BODY};
use crate::dispatch::Authorization;
use crate::error::Result;
use crate::session::Session;
use crate::types::Rpc;
use crate::url::{encode_path_segment, QueryParams};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

fn rpc_path(id: &str) -> String {
    format!("/v2/rpc/{}", encode_path_segment(id))
}

impl NakamaClient {
    /// Call a runtime function as the session user.
    pub async fn rpc(&self, session: &Session, id: &str, payload: Option<&str>) -> Result<Rpc> {
        self.invoke(
            Method::POST,
            &rpc_path(id),
            &QueryParams::new(),
            payload,
            session.into(),
        )
        .await
    }

    /// Call a runtime function with the server's HTTP key instead of a session.
    pub async fn rpc_http_key(
        &self,
        http_key: &str,
        id: &str,
        payload: Option<&str>,
    ) -> Result<Rpc> {
        let mut query = QueryParams::new();
        query.push("http_key", http_key);
        self.invoke(
            Method::POST,
            &rpc_path(id),
            &query,
            payload,
            Authorization::None,
        )
        .await
    }

    /// Call a runtime function over GET, passing the payload in the query.
    pub async fn rpc_get(&self, session: &Session, id: &str, payload: Option<&str>) -> Result<Rpc> {
        let mut query = QueryParams::new();
        query.push_opt("payload", payload);
        self.invoke(Method::GET, &rpc_path(id), &query, NO_BODY, session.into())
            .await
    }

    /// Call a runtime function with typed input and output.
    ///
    /// An empty response payload decodes as `R::default()`.
    pub async fn rpc_json<P, R>(&self, session: &Session, id: &str, payload: &P) -> Result<R>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned + Default,
    {
        let input = serde_json::to_string(payload)?;
        let rpc = self.rpc(session, id, Some(&input)).await?;
        if rpc.payload.is_empty() {
            return Ok(R::default());
        }
        Ok(serde_json::from_str(&rpc.payload)?)
    }
}
