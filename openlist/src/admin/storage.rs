//! Mounting and managing storages.
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use tracing::instrument;

use crate::{
    api::{decode, BaseResponse, Page, Response, WithId},
    client::{Client, RequestOptions},
    serde::OptDateTime,
};

/// A mounted storage.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Storage {
    /// Id.
    pub id: u64,
    /// Where it is mounted.
    pub mount_path: String,
    /// Sort order among storages.
    #[serde(default)]
    pub order: i64,
    /// Driver name, e.g. `Local`.
    pub driver: String,
    /// Minutes to cache listings for.
    #[serde(default)]
    pub cache_expiration: i64,
    /// `work` when healthy, otherwise an error message.
    #[serde(default)]
    pub status: String,
    /// Driver specific configuration, as a JSON string.
    #[serde(default)]
    pub addition: String,
    /// Free-form remark.
    #[serde(default)]
    pub remark: String,
    /// Last modification.
    #[serde_as(as = "OptDateTime")]
    #[serde(default)]
    pub modified: Option<DateTime<FixedOffset>>,
    /// Whether the storage is disabled.
    #[serde(default)]
    pub disabled: bool,
    /// Sign download links.
    #[serde(default)]
    pub enable_sign: bool,
    /// Sort key of listings.
    #[serde(default)]
    pub order_by: String,
    /// `asc` or `desc`.
    #[serde(default)]
    pub order_direction: String,
    /// `front`, `back` or empty: where to put folders in listings.
    #[serde(default)]
    pub extract_folder: String,
    /// Proxy downloads through the server.
    #[serde(default)]
    pub web_proxy: bool,
    /// `native_proxy`, `use_proxy_url` or `302_redirect`.
    #[serde(default)]
    pub webdav_policy: String,
    /// Download proxy url.
    #[serde(default)]
    pub down_proxy_url: String,
}

/// A storage to be mounted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewStorage {
    /// Where to mount it.
    pub mount_path: String,
    /// Driver name.
    pub driver: String,
    /// Driver specific configuration, as a JSON string. See
    /// [`DriverApi::info`](super::driver::DriverApi::info).
    pub addition: String,
    /// Sort key of listings.
    pub order_by: String,
    /// `asc` or `desc`.
    pub order_direction: String,
    /// `front`, `back` or empty.
    pub extract_folder: String,
    /// Proxy downloads through the server.
    pub web_proxy: bool,
    /// Sign download links.
    pub enable_sign: bool,
    /// Initial status.
    pub status: String,
    /// Sort order among storages.
    pub order: i64,
    /// Minutes to cache listings for.
    pub cache_expiration: i64,
    /// Free-form remark.
    pub remark: String,
    /// WebDAV policy.
    pub webdav_policy: String,
    /// Download proxy url.
    pub down_proxy_url: String,
}

impl NewStorage {
    /// Mount `driver` at `mount_path`, with the server's usual defaults.
    #[must_use]
    pub fn new(
        mount_path: impl Into<String>,
        driver: impl Into<String>,
        addition: impl Into<String>,
    ) -> Self {
        Self {
            mount_path: mount_path.into(),
            driver: driver.into(),
            addition: addition.into(),
            order_by: "name".into(),
            order_direction: "asc".into(),
            extract_folder: "front".into(),
            web_proxy: false,
            enable_sign: false,
            status: "work".into(),
            order: 0,
            cache_expiration: 30,
            remark: String::new(),
            webdav_policy: "native_proxy".into(),
            down_proxy_url: String::new(),
        }
    }
}

/// Changes to a storage. The optional fields are not sent when `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageUpdate {
    /// Id of the storage to update.
    pub id: u64,
    /// Mount path.
    pub mount_path: String,
    /// Driver name.
    pub driver: String,
    /// Driver specific configuration, as a JSON string.
    pub addition: String,
    /// Sort key of listings.
    pub order_by: String,
    /// `asc` or `desc`.
    pub order_direction: String,
    /// `front`, `back` or empty.
    pub extract_folder: String,
    /// Proxy downloads through the server.
    pub web_proxy: bool,
    /// Sign download links.
    pub enable_sign: bool,
    /// Status.
    pub status: String,
    /// Sort order among storages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    /// Minutes to cache listings for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_expiration: Option<i64>,
    /// Free-form remark.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    /// WebDAV policy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webdav_policy: Option<String>,
    /// Download proxy url.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub down_proxy_url: Option<String>,
}

impl From<&Storage> for StorageUpdate {
    /// Start from the current state of a storage, every field set.
    fn from(storage: &Storage) -> Self {
        Self {
            id: storage.id,
            mount_path: storage.mount_path.clone(),
            driver: storage.driver.clone(),
            addition: storage.addition.clone(),
            order_by: storage.order_by.clone(),
            order_direction: storage.order_direction.clone(),
            extract_folder: storage.extract_folder.clone(),
            web_proxy: storage.web_proxy,
            enable_sign: storage.enable_sign,
            status: storage.status.clone(),
            order: Some(storage.order),
            cache_expiration: Some(storage.cache_expiration),
            remark: Some(storage.remark.clone()),
            webdav_policy: Some(storage.webdav_policy.clone()),
            down_proxy_url: Some(storage.down_proxy_url.clone()),
        }
    }
}

/// Id of a created storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageId {
    /// Id.
    pub id: u64,
}

/// Storage endpoints.
#[derive(Debug, Clone, Copy)]
pub struct StorageApi<'a> {
    client: &'a Client,
}

impl<'a> StorageApi<'a> {
    /// Borrow a client.
    #[must_use]
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// List storages. Paging parameters are only sent when given.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - not an admin
    pub async fn list(
        &self,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> crate::Result<Response<Page<Storage>>> {
        decode(
            self.client
                .get("/api/admin/storage/list", super::paged(page, per_page))
                .await?,
        )
    }

    /// # Errors
    ///
    /// - network errors
    /// - not an admin
    /// - no such storage
    pub async fn get(&self, id: u64) -> crate::Result<Response<Storage>> {
        decode(
            self.client
                .get("/api/admin/storage/get", RequestOptions::new().query("id", id))
                .await?,
        )
    }

    /// Mount a storage.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - not an admin
    /// - invalid `addition`
    /// - mount path taken
    #[instrument(level = "trace", skip_all, fields(mount_path = %storage.mount_path, driver = %storage.driver))]
    pub async fn create(&self, storage: &NewStorage) -> crate::Result<Response<StorageId>> {
        let body = WithId {
            id: 0,
            inner: storage,
        };

        decode(
            self.client
                .post("/api/admin/storage/create", RequestOptions::new().json(&body)?)
                .await?,
        )
    }

    /// # Errors
    ///
    /// - network errors
    /// - not an admin
    /// - no such storage
    #[instrument(level = "trace", skip_all, fields(id = update.id))]
    pub async fn update(&self, update: &StorageUpdate) -> crate::Result<BaseResponse> {
        decode(
            self.client
                .post("/api/admin/storage/update", RequestOptions::new().json(update)?)
                .await?,
        )
    }

    async fn by_id(&self, action: &str, id: u64) -> crate::Result<BaseResponse> {
        decode(
            self.client
                .post(
                    &format!("/api/admin/storage/{action}"),
                    RequestOptions::new().query("id", id),
                )
                .await?,
        )
    }

    /// # Errors
    ///
    /// - network errors
    /// - not an admin
    pub async fn enable(&self, id: u64) -> crate::Result<BaseResponse> {
        self.by_id("enable", id).await
    }

    /// # Errors
    ///
    /// - network errors
    /// - not an admin
    pub async fn disable(&self, id: u64) -> crate::Result<BaseResponse> {
        self.by_id("disable", id).await
    }

    /// Unmount a storage. Nothing is deleted from the storage itself.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - not an admin
    pub async fn delete(&self, id: u64) -> crate::Result<BaseResponse> {
        self.by_id("delete", id).await
    }

    /// Reload every storage.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - not an admin
    pub async fn load_all(&self) -> crate::Result<BaseResponse> {
        decode(
            self.client
                .post("/api/admin/storage/load_all", RequestOptions::new())
                .await?,
        )
    }
}
