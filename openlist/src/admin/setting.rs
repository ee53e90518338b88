//! Server settings and external downloader configuration.
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    api::{decode, BaseResponse, Response},
    client::{Client, RequestOptions},
};

/// Settings are organized in groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingGroup {
    /// Site title, announcement...
    Site,
    /// Logo, colors...
    Style,
    /// File previews.
    Preview,
    /// Hidden files, proxies...
    Global,
    /// Downloader configuration and the token.
    Other,
    /// Single sign-on.
    Sso,
}

impl SettingGroup {
    /// Numeric id used by the server.
    #[must_use]
    pub fn id(self) -> u8 {
        match self {
            Self::Site => 1,
            Self::Style => 2,
            Self::Preview => 3,
            Self::Global => 4,
            Self::Other => 5,
            Self::Sso => 7,
        }
    }
}

/// A setting. Only `key` and `value` are needed when [saving](SettingApi::save).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    /// Key, e.g. `site_title`.
    pub key: String,
    /// Value, always as a string.
    pub value: String,
    /// Help text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    /// `string`, `number`, `bool`, `select` or `text`.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Comma separated choices, for `select`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,
    /// Numeric [`SettingGroup`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<u8>,
    /// `0` public, `1` private, `2` read-only, `3` deprecated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<u8>,
    /// Sort order within the group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,
}

impl Setting {
    /// Set `key` to `value`.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            ..Self::default()
        }
    }
}

/// Setting endpoints.
#[derive(Debug, Clone, Copy)]
pub struct SettingApi<'a> {
    client: &'a Client,
}

impl<'a> SettingApi<'a> {
    /// Borrow a client.
    #[must_use]
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// List settings, optionally in a single `group` or in several `groups`.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - not an admin
    pub async fn list(
        &self,
        group: Option<SettingGroup>,
        groups: Option<&[SettingGroup]>,
    ) -> crate::Result<Vec<Setting>> {
        let mut options = RequestOptions::new();

        if let Some(group) = group {
            options = options.query("group", group.id());
        }

        if let Some(groups) = groups {
            let groups = groups
                .iter()
                .map(|g| g.id().to_string())
                .collect::<Vec<_>>()
                .join(",");

            options = options.query("groups", groups);
        }

        let res: Response<Option<Vec<Setting>>> =
            decode(self.client.get("/api/admin/setting/list", options).await?)?;

        Ok(res.data.unwrap_or_default())
    }

    /// A single setting, if it exists.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - not an admin
    pub async fn get(&self, key: &str) -> crate::Result<Option<Setting>> {
        let res: Response<Option<Setting>> = decode(
            self.client
                .get(
                    "/api/admin/setting/get",
                    RequestOptions::new().query("key", key),
                )
                .await?,
        )?;

        Ok(res.data)
    }

    /// Save settings.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - not an admin
    /// - invalid values
    #[instrument(level = "trace", skip_all, fields(count = settings.len()))]
    pub async fn save(&self, settings: &[Setting]) -> crate::Result<BaseResponse> {
        decode(
            self.client
                .post(
                    "/api/admin/setting/save",
                    RequestOptions::new().json(settings)?,
                )
                .await?,
        )
    }

    /// # Errors
    ///
    /// - network errors
    /// - not an admin
    pub async fn delete(&self, key: &str) -> crate::Result<BaseResponse> {
        decode(
            self.client
                .post(
                    "/api/admin/setting/delete",
                    RequestOptions::new().query("key", key),
                )
                .await?,
        )
    }

    /// Generate a new token for the admin, invalidating the old one.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - not an admin
    pub async fn reset_token(&self) -> crate::Result<BaseResponse> {
        decode(
            self.client
                .post("/api/admin/setting/reset_token", RequestOptions::new())
                .await?,
        )
    }

    /// Configure the aria2 RPC endpoint used for offline downloads.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - not an admin
    /// - aria2 unreachable
    #[instrument(level = "trace", skip(self, secret))]
    pub async fn set_aria2(&self, uri: &str, secret: &str) -> crate::Result<BaseResponse> {
        #[derive(Serialize)]
        struct Aria2Req<'a> {
            uri: &'a str,
            secret: &'a str,
        }

        decode(
            self.client
                .post(
                    "/api/admin/setting/set_aria2",
                    RequestOptions::new().json(&Aria2Req { uri, secret })?,
                )
                .await?,
        )
    }

    /// Configure the qBittorrent web UI used for offline downloads.
    /// `seedtime` is in minutes.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - not an admin
    /// - qBittorrent unreachable
    #[instrument(level = "trace", skip(self))]
    pub async fn set_qbittorrent(&self, url: &str, seedtime: u64) -> crate::Result<BaseResponse> {
        #[derive(Serialize)]
        struct QbitReq<'a> {
            url: &'a str,
            seedtime: u64,
        }

        decode(
            self.client
                .post(
                    "/api/admin/setting/set_qbit",
                    RequestOptions::new().json(&QbitReq { url, seedtime })?,
                )
                .await?,
        )
    }
}
