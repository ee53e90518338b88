//! Per-path metadata: passwords, write access, hidden files and readmes.
use serde::{Deserialize, Serialize};

use crate::{
    api::{decode, BaseResponse, Page, Response},
    client::{Client, RequestOptions},
};

/// Metadata attached to a path. Each rule can optionally apply to
/// subfolders too (the `*_sub` flags).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// Id. Ignored when creating.
    #[serde(default)]
    pub id: u64,
    /// Path the rules apply to.
    pub path: String,
    /// Password required to browse the path. Empty for none.
    #[serde(default)]
    pub password: String,
    /// Apply `password` to subfolders.
    #[serde(default)]
    pub p_sub: bool,
    /// Let guests write.
    #[serde(default)]
    pub write: bool,
    /// Apply `write` to subfolders.
    #[serde(default)]
    pub w_sub: bool,
    /// Regular expressions, one per line, of names to hide.
    #[serde(default)]
    pub hide: String,
    /// Apply `hide` to subfolders.
    #[serde(default)]
    pub h_sub: bool,
    /// Readme (markdown) shown below listings.
    #[serde(default)]
    pub readme: String,
    /// Apply `readme` to subfolders.
    #[serde(default)]
    pub r_sub: bool,
    /// Header (markdown) shown above listings.
    #[serde(default)]
    pub header: String,
    /// Apply `header` to subfolders.
    #[serde(default)]
    pub header_sub: bool,
}

impl Meta {
    /// No rules at all for `path`.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}

/// Metadata endpoints.
#[derive(Debug, Clone, Copy)]
pub struct MetaApi<'a> {
    client: &'a Client,
}

impl<'a> MetaApi<'a> {
    /// Borrow a client.
    #[must_use]
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// List metadata. Paging parameters are only sent when given.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - not an admin
    pub async fn list(
        &self,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> crate::Result<Response<Page<Meta>>> {
        decode(
            self.client
                .get("/api/admin/meta/list", super::paged(page, per_page))
                .await?,
        )
    }

    /// # Errors
    ///
    /// - network errors
    /// - not an admin
    /// - no such metadata
    pub async fn get(&self, id: u64) -> crate::Result<Response<Meta>> {
        decode(
            self.client
                .get("/api/admin/meta/get", RequestOptions::new().query("id", id))
                .await?,
        )
    }

    /// Create metadata. `meta.id` is ignored.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - not an admin
    /// - there is already metadata for the path
    pub async fn create(&self, meta: &Meta) -> crate::Result<BaseResponse> {
        let meta = Meta {
            id: 0,
            ..meta.clone()
        };

        decode(
            self.client
                .post("/api/admin/meta/create", RequestOptions::new().json(&meta)?)
                .await?,
        )
    }

    /// Replace metadata, identified by `meta.id`.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - not an admin
    /// - no such metadata
    pub async fn update(&self, meta: &Meta) -> crate::Result<BaseResponse> {
        decode(
            self.client
                .post("/api/admin/meta/update", RequestOptions::new().json(meta)?)
                .await?,
        )
    }

    /// # Errors
    ///
    /// - network errors
    /// - not an admin
    pub async fn delete(&self, id: u64) -> crate::Result<BaseResponse> {
        decode(
            self.client
                .post("/api/admin/meta/delete", RequestOptions::new().query("id", id))
                .await?,
        )
    }
}
