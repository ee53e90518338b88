//! Endpoints that work without a token.
use std::collections::BTreeMap;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    api::{decode, Response},
    client::{Client, RequestOptions},
};

/// Public site settings.
///
/// The server sends every value as a string. The most common keys are
/// typed; the rest, which vary between versions, end up in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    /// Site title.
    pub site_title: String,
    /// Server version, e.g. `v3.25.1`.
    pub version: String,
    /// Announcement (markdown).
    pub announcement: String,
    /// Logo url.
    pub logo: String,
    /// Favicon url.
    pub favicon: String,
    /// Theme color.
    pub main_color: String,
    /// Default page size, as a string.
    pub default_page_size: String,
    /// `all`, `pagination`, `load_more` or `auto_load_more`.
    pub pagination_type: String,
    /// Whether search is enabled, `"true"` or `"false"`.
    pub search_index: String,
    /// Whether SSO login is enabled, `"true"` or `"false"`.
    pub sso_login_enabled: String,
    /// Everything else.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Public endpoints.
#[derive(Debug, Clone, Copy)]
pub struct PublicApi<'a> {
    client: &'a Client,
}

impl<'a> PublicApi<'a> {
    /// Borrow a client.
    #[must_use]
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Site settings.
    ///
    /// # Errors
    ///
    /// - network errors
    pub async fn settings(&self) -> crate::Result<Response<SiteSettings>> {
        decode(
            self.client
                .get("/api/public/settings", RequestOptions::new())
                .await?,
        )
    }

    /// Health check. Returns `pong`, as plain text.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - the server is unhealthy
    pub async fn ping(&self) -> crate::Result<String> {
        self.client
            .request_text(Method::GET, "/ping", RequestOptions::new())
            .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::SiteSettings;

    #[test]
    fn unknown_settings_are_kept() {
        let settings: SiteSettings = serde_json::from_value(json!({
            "site_title": "OpenList",
            "version": "v4.0.0",
            "robots_txt": "User-agent: *\nAllow: /",
            "hide_files": "/\\/README.md/i"
        }))
        .unwrap();

        assert_eq!(settings.site_title, "OpenList");
        assert_eq!(settings.logo, "");
        assert_eq!(settings.extra.len(), 2);
        assert_eq!(settings.extra["robots_txt"], "User-agent: *\nAllow: /");
    }
}
