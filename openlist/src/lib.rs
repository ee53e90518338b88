#![doc = include_str!("../README.md")]
#![warn(
    unreachable_pub,
    missing_debug_implementations,
    missing_docs,
    clippy::pedantic
)]
use std::time::Duration;

pub mod admin;
pub mod api;
pub mod auth;
pub mod client;
pub mod errors;
pub mod files;
pub mod fs;
pub mod path;
pub mod public;
pub(crate) mod serde;

pub use api::{BaseResponse, Page, Response};
pub use client::Client;
pub use errors::{Error, ErrorKind, RawResponse};
pub use reqwest;

pub(crate) type Result<T> = core::result::Result<T, errors::Error>;

use admin::AdminApi;
use auth::AuthApi;
use fs::FsApi;
use public::PublicApi;

/// Entry point to every API group, sharing one [`Client`].
///
/// ```no_run
/// # async fn run() -> Result<(), openlist::Error> {
/// use openlist::{files::ListReq, OpenList};
///
/// let openlist = OpenList::new("http://localhost:5244")?;
///
/// let login = openlist.auth().login("admin", "password", None).await?;
/// openlist.set_token(login.data.token);
///
/// let root = openlist.fs().list(&ListReq::new("/")).await?;
///
/// for item in root.data.content {
///     println!("{}", item.name);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OpenList {
    client: Client,
}

impl OpenList {
    /// Connect to `base_url` with the [default timeout](client::DEFAULT_TIMEOUT).
    ///
    /// # Errors
    ///
    /// See [`Client::new`].
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_timeout(base_url, client::DEFAULT_TIMEOUT)
    }

    /// Connect to `base_url` with a custom timeout.
    ///
    /// # Errors
    ///
    /// See [`Client::new`].
    pub fn with_timeout(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self> {
        Ok(Self::from_client(Client::new(base_url, timeout)?))
    }

    /// Wrap an existing client.
    #[must_use]
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// The underlying transport.
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Set the token used by all subsequent requests.
    pub fn set_token(&self, token: impl Into<String>) {
        self.client.set_credential(token);
    }

    /// The current token, if any.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.client.credential()
    }

    /// Authentication.
    #[must_use]
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(&self.client)
    }

    /// Files and folders.
    #[must_use]
    pub fn fs(&self) -> FsApi<'_> {
        FsApi::new(&self.client)
    }

    /// Endpoints that don't require a token.
    #[must_use]
    pub fn public(&self) -> PublicApi<'_> {
        PublicApi::new(&self.client)
    }

    /// Administration.
    #[must_use]
    pub fn admin(&self) -> AdminApi<'_> {
        AdminApi::new(&self.client)
    }
}
