//! Storage engine endpoints.

use crate::client::{NakamaClient, NO_BODY};
use crate::error::Result;
use crate::session::Session;
use crate::types::*;
use crate::url::{encode_path_segment, QueryParams};
use reqwest::Method;
use serde::Serialize;

#[derive(Serialize)]
struct ObjectIds<'a, T> {
    object_ids: &'a [T],
}

fn page_query(user_id: Option<&str>, limit: Option<i32>, cursor: Option<&str>) -> QueryParams {
    let mut query = QueryParams::new();
    query
        .push_opt("user_id", user_id)
        .push_opt("limit", limit)
        .push_opt("cursor", cursor);
    query
}

impl NakamaClient {
    /// Read a batch of objects by collection, key and owner.
    pub async fn read_storage_objects(
        &self,
        session: &Session,
        ids: &[ReadStorageObjectId],
    ) -> Result<StorageObjects> {
        self.invoke(
            Method::POST,
            "/v2/storage",
            &QueryParams::new(),
            Some(&ObjectIds { object_ids: ids }),
            session.into(),
        )
        .await
    }

    /// Write a batch of objects owned by the current user.
    pub async fn write_storage_objects(
        &self,
        session: &Session,
        objects: &[WriteStorageObject],
    ) -> Result<StorageObjectAcks> {
        #[derive(Serialize)]
        struct Request<'a> {
            objects: &'a [WriteStorageObject],
        }

        self.invoke(
            Method::PUT,
            "/v2/storage",
            &QueryParams::new(),
            Some(&Request { objects }),
            session.into(),
        )
        .await
    }

    /// Delete a batch of objects owned by the current user.
    pub async fn delete_storage_objects(
        &self,
        session: &Session,
        ids: &[DeleteStorageObjectId],
    ) -> Result<()> {
        self.invoke_empty(
            Method::PUT,
            "/v2/storage/delete",
            &QueryParams::new(),
            Some(&ObjectIds { object_ids: ids }),
            session.into(),
        )
        .await
    }

    /// List readable objects in a collection, optionally restricted to one owner.
    pub async fn list_storage_objects(
        &self,
        session: &Session,
        collection: &str,
        user_id: Option<&str>,
        limit: Option<i32>,
        cursor: Option<&str>,
    ) -> Result<StorageObjectList> {
        let path = format!("/v2/storage/{}", encode_path_segment(collection));
        self.invoke(
            Method::GET,
            &path,
            &page_query(user_id, limit, cursor),
            NO_BODY,
            session.into(),
        )
        .await
    }

    /// List objects in a collection owned by `user_id`.
    pub async fn list_user_storage_objects(
        &self,
        session: &Session,
        collection: &str,
        user_id: &str,
        limit: Option<i32>,
        cursor: Option<&str>,
    ) -> Result<StorageObjectList> {
        let path = format!(
            "/v2/storage/{}/{}",
            encode_path_segment(collection),
            encode_path_segment(user_id)
        );
        self.invoke(
            Method::GET,
            &path,
            &page_query(None, limit, cursor),
            NO_BODY,
            session.into(),
        )
        .await
    }
}
