//! Administration endpoints, rooted at `/api/admin`. They all require an
//! admin token.
use crate::client::{Client, RequestOptions};

pub mod driver;
pub mod meta;
pub mod setting;
pub mod storage;
pub mod task;
pub mod user;

use driver::DriverApi;
use meta::MetaApi;
use setting::SettingApi;
use storage::StorageApi;
use task::{TaskApi, TaskKind};
use user::UserApi;

/// Optional paging, sent as query parameters. Zero means unset.
pub(crate) fn paged(page: Option<u32>, per_page: Option<u32>) -> RequestOptions {
    let mut options = RequestOptions::new();

    if let Some(page) = page.filter(|&p| p != 0) {
        options = options.query("page", page);
    }

    if let Some(per_page) = per_page.filter(|&p| p != 0) {
        options = options.query("per_page", per_page);
    }

    options
}

/// All administration groups.
#[derive(Debug, Clone, Copy)]
pub struct AdminApi<'a> {
    client: &'a Client,
}

impl<'a> AdminApi<'a> {
    /// Borrow a client.
    #[must_use]
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Per-path metadata (passwords, readmes, hidden files).
    #[must_use]
    pub fn meta(&self) -> MetaApi<'a> {
        MetaApi::new(self.client)
    }

    /// Users.
    #[must_use]
    pub fn user(&self) -> UserApi<'a> {
        UserApi::new(self.client)
    }

    /// Mounted storages.
    #[must_use]
    pub fn storage(&self) -> StorageApi<'a> {
        StorageApi::new(self.client)
    }

    /// Storage drivers.
    #[must_use]
    pub fn driver(&self) -> DriverApi<'a> {
        DriverApi::new(self.client)
    }

    /// Server settings.
    #[must_use]
    pub fn setting(&self) -> SettingApi<'a> {
        SettingApi::new(self.client)
    }

    /// Upload tasks.
    #[must_use]
    pub fn task(&self) -> TaskApi<'a> {
        self.task_of(TaskKind::Upload)
    }

    /// Tasks of any kind.
    #[must_use]
    pub fn task_of(&self, kind: TaskKind) -> TaskApi<'a> {
        TaskApi::new(self.client, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::paged;

    #[test]
    fn paging_is_optional() {
        assert!(paged(None, None).query.is_empty());
        assert!(paged(Some(0), Some(0)).query.is_empty());
        assert_eq!(paged(Some(0), Some(20)).query, [("per_page".to_owned(), "20".to_owned())]);
        assert_eq!(paged(Some(2), None).query, [("page".to_owned(), "2".to_owned())]);
        assert_eq!(
            paged(Some(1), Some(50)).query,
            [
                ("page".to_owned(), "1".to_owned()),
                ("per_page".to_owned(), "50".to_owned())
            ]
        );
    }
}
