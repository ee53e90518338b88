//! Background tasks: uploads, copies, offline downloads and decompressions.
use strum::{Display, EnumIter};

use crate::{
    api::{decode, BaseResponse, Response},
    client::{Client, RequestOptions},
    files::TaskInfo,
};

/// Kind of task, each managed under its own path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum TaskKind {
    /// Uploads run as tasks.
    #[default]
    Upload,
    /// Copies between storages.
    Copy,
    /// Offline downloads, to the server's temporary folder.
    OfflineDownload,
    /// Transfers of finished offline downloads to their storage.
    OfflineDownloadTransfer,
    /// Archive extraction.
    Decompress,
    /// Transfers of extracted files to their storage.
    DecompressUpload,
}

/// Task endpoints for a single [`TaskKind`].
#[derive(Debug, Clone, Copy)]
pub struct TaskApi<'a> {
    client: &'a Client,
    kind: TaskKind,
}

impl<'a> TaskApi<'a> {
    /// Borrow a client.
    #[must_use]
    pub fn new(client: &'a Client, kind: TaskKind) -> Self {
        Self { client, kind }
    }

    /// The kind of tasks managed.
    #[must_use]
    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    fn path(&self, action: &str) -> String {
        format!("/api/admin/task/{}/{action}", self.kind)
    }

    async fn list(&self, action: &str) -> crate::Result<Response<Vec<TaskInfo>>> {
        let res: Response<Option<Vec<TaskInfo>>> = decode(
            self.client
                .get(&self.path(action), RequestOptions::new())
                .await?,
        )?;

        Ok(res.map(Option::unwrap_or_default))
    }

    async fn by_tid(&self, action: &str, tid: &str) -> crate::Result<BaseResponse> {
        decode(
            self.client
                .post(&self.path(action), RequestOptions::new().query("tid", tid))
                .await?,
        )
    }

    async fn clear(&self, action: &str) -> crate::Result<BaseResponse> {
        decode(
            self.client
                .post(&self.path(action), RequestOptions::new())
                .await?,
        )
    }

    /// # Errors
    ///
    /// - network errors
    /// - not an admin
    /// - no such task
    pub async fn info(&self, tid: &str) -> crate::Result<Response<TaskInfo>> {
        decode(
            self.client
                .get(&self.path("info"), RequestOptions::new().query("tid", tid))
                .await?,
        )
    }

    /// Finished tasks, whether they succeeded or not.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - not an admin
    pub async fn done(&self) -> crate::Result<Response<Vec<TaskInfo>>> {
        self.list("done").await
    }

    /// Pending and running tasks.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - not an admin
    pub async fn undone(&self) -> crate::Result<Response<Vec<TaskInfo>>> {
        self.list("undone").await
    }

    /// # Errors
    ///
    /// - network errors
    /// - not an admin
    pub async fn delete(&self, tid: &str) -> crate::Result<BaseResponse> {
        self.by_tid("delete", tid).await
    }

    /// # Errors
    ///
    /// - network errors
    /// - not an admin
    pub async fn cancel(&self, tid: &str) -> crate::Result<BaseResponse> {
        self.by_tid("cancel", tid).await
    }

    /// Restart a failed task.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - not an admin
    pub async fn retry(&self, tid: &str) -> crate::Result<BaseResponse> {
        self.by_tid("retry", tid).await
    }

    /// Forget every finished task.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - not an admin
    pub async fn clear_done(&self) -> crate::Result<BaseResponse> {
        self.clear("clear_done").await
    }

    /// Forget every task that succeeded.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - not an admin
    pub async fn clear_succeeded(&self) -> crate::Result<BaseResponse> {
        self.clear("clear_succeeded").await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use strum::IntoEnumIterator;

    use super::{TaskApi, TaskKind};
    use crate::Client;

    #[test]
    fn kind_paths() {
        let client = Client::new("http://localhost:5244", Duration::from_secs(1)).unwrap();

        let paths: Vec<String> = TaskKind::iter()
            .map(|kind| TaskApi::new(&client, kind).path("done"))
            .collect();

        assert_eq!(
            paths,
            [
                "/api/admin/task/upload/done",
                "/api/admin/task/copy/done",
                "/api/admin/task/offline_download/done",
                "/api/admin/task/offline_download_transfer/done",
                "/api/admin/task/decompress/done",
                "/api/admin/task/decompress_upload/done",
            ]
        );
    }
}
