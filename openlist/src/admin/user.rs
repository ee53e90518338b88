//! User management.
use serde::Serialize;
use tracing::instrument;

use crate::{
    api::{decode, BaseResponse, Page, Response, WithId},
    auth::UserInfo,
    client::{Client, RequestOptions},
};

/// A user to be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewUser {
    /// Username.
    pub username: String,
    /// Plaintext password.
    pub password: String,
    /// Root folder.
    pub base_path: String,
    /// `0` regular, `1` guest, `2` admin.
    pub role: i64,
    /// Permission bit set.
    pub permission: i64,
    /// Create the account disabled.
    pub disabled: bool,
    /// SSO id.
    pub sso_id: String,
}

impl NewUser {
    /// A regular user rooted at `/` without any permissions.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            base_path: "/".into(),
            role: 0,
            permission: 0,
            disabled: false,
            sso_id: String::new(),
        }
    }
}

/// Changes to a user. Fields left as `None` are not sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserUpdate {
    /// Id of the user to update.
    pub id: u64,
    /// Username.
    pub username: String,
    /// New plaintext password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// New root folder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    /// New role.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<i64>,
    /// New permission bit set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission: Option<i64>,
    /// Disable or enable the account.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    /// New SSO id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sso_id: Option<String>,
}

impl UserUpdate {
    /// Change nothing but (maybe) the username.
    #[must_use]
    pub fn new(id: u64, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            password: None,
            base_path: None,
            role: None,
            permission: None,
            disabled: None,
            sso_id: None,
        }
    }
}

/// User endpoints.
#[derive(Debug, Clone, Copy)]
pub struct UserApi<'a> {
    client: &'a Client,
}

impl<'a> UserApi<'a> {
    /// Borrow a client.
    #[must_use]
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// All users.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - not an admin
    pub async fn list(&self) -> crate::Result<Response<Page<UserInfo>>> {
        decode(
            self.client
                .get("/api/admin/user/list", RequestOptions::new())
                .await?,
        )
    }

    /// # Errors
    ///
    /// - network errors
    /// - not an admin
    /// - no such user
    pub async fn get(&self, id: u64) -> crate::Result<Response<UserInfo>> {
        decode(
            self.client
                .get("/api/admin/user/get", RequestOptions::new().query("id", id))
                .await?,
        )
    }

    /// # Errors
    ///
    /// - network errors
    /// - not an admin
    /// - username taken
    #[instrument(level = "trace", skip_all, fields(username = %user.username))]
    pub async fn create(&self, user: &NewUser) -> crate::Result<BaseResponse> {
        let body = WithId { id: 0, inner: user };

        decode(
            self.client
                .post("/api/admin/user/create", RequestOptions::new().json(&body)?)
                .await?,
        )
    }

    /// # Errors
    ///
    /// - network errors
    /// - not an admin
    /// - no such user
    #[instrument(level = "trace", skip_all, fields(id = update.id))]
    pub async fn update(&self, update: &UserUpdate) -> crate::Result<BaseResponse> {
        decode(
            self.client
                .post("/api/admin/user/update", RequestOptions::new().json(update)?)
                .await?,
        )
    }

    /// Turn off two-factor authentication for a user who lost their device.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - not an admin
    pub async fn cancel_2fa(&self, id: u64) -> crate::Result<BaseResponse> {
        decode(
            self.client
                .post(
                    "/api/admin/user/cancel_2fa",
                    RequestOptions::new().query("id", id),
                )
                .await?,
        )
    }

    /// # Errors
    ///
    /// - network errors
    /// - not an admin
    /// - the user is the admin
    pub async fn delete(&self, id: u64) -> crate::Result<BaseResponse> {
        decode(
            self.client
                .post("/api/admin/user/delete", RequestOptions::new().query("id", id))
                .await?,
        )
    }

    /// Evict a user from the server's cache.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - not an admin
    pub async fn delete_cache(&self, username: &str) -> crate::Result<BaseResponse> {
        decode(
            self.client
                .post(
                    "/api/admin/user/del_cache",
                    RequestOptions::new().query("username", username),
                )
                .await?,
        )
    }
}
