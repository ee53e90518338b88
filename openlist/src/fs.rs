//! Browsing, searching and manipulating files and folders.
use reqwest::{
    header::{self, HeaderName, HeaderValue},
    multipart::{Form, Part},
    Body,
};
use serde::Serialize;
use tracing::instrument;

use crate::{
    api::{decode, BaseResponse, Page, Response},
    client::{Client, RequestOptions},
    files::{
        DeletePolicy, DirItem, FileInfo, ListData, ListReq, OfflineDownload, OfflineTool,
        RenameObject, SearchItem, SearchReq, UploadTask,
    },
    path,
};

/// Header carrying the percent-encoded destination of an upload.
pub const FILE_PATH: &str = "file-path";

/// Header telling whether to upload in the background (`true`) or before
/// responding (`false`).
pub const AS_TASK: &str = "as-task";

#[derive(Debug, Serialize)]
struct MoveReq<'a> {
    src_dir: &'a str,
    dst_dir: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    names: Option<&'a [&'a str]>,
}

/// File system endpoints, rooted at `/api/fs`.
#[derive(Debug, Clone, Copy)]
pub struct FsApi<'a> {
    client: &'a Client,
}

impl<'a> FsApi<'a> {
    /// Borrow a client.
    #[must_use]
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    async fn post<T, B>(&self, path: &str, body: &B) -> crate::Result<Response<T>>
    where
        T: serde::de::DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let options = RequestOptions::new().json(body)?;

        decode(self.client.post(path, options).await?)
    }

    /// List a folder. Similar to the UNIX `ls` command.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - no such folder
    /// - wrong folder password
    pub async fn list(&self, req: &ListReq) -> crate::Result<Response<ListData>> {
        self.post("/api/fs/list", req).await
    }

    /// Metadata of a single file or folder, including its direct url.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - no such file or folder
    pub async fn get(&self, req: &ListReq) -> crate::Result<Response<FileInfo>> {
        self.post("/api/fs/get", req).await
    }

    /// Subfolders of `path`.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - no such folder
    pub async fn dirs(
        &self,
        path: &str,
        password: &str,
        force_root: bool,
    ) -> crate::Result<Response<Vec<DirItem>>> {
        #[derive(Serialize)]
        struct DirsReq<'a> {
            path: &'a str,
            password: &'a str,
            force_root: bool,
        }

        let res: Response<Option<Vec<DirItem>>> = self
            .post(
                "/api/fs/dirs",
                &DirsReq {
                    path,
                    password,
                    force_root,
                },
            )
            .await?;

        Ok(res.map(Option::unwrap_or_default))
    }

    /// Search for files and folders.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - search is disabled on the server
    pub async fn search(&self, req: &SearchReq) -> crate::Result<Response<Page<SearchItem>>> {
        self.post("/api/fs/search", req).await
    }

    /// Create a folder, and its parents if need be.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - permission denied
    #[instrument(level = "trace", skip(self))]
    pub async fn mkdir(&self, path: &str) -> crate::Result<BaseResponse> {
        #[derive(Serialize)]
        struct MkdirReq<'a> {
            path: &'a str,
        }

        self.post("/api/fs/mkdir", &MkdirReq { path }).await
    }

    /// Rename a file or folder. `name` is the new name, not a path.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - no such file or folder
    #[instrument(level = "trace", skip(self))]
    pub async fn rename(&self, path: &str, name: &str) -> crate::Result<BaseResponse> {
        #[derive(Serialize)]
        struct RenameReq<'a> {
            path: &'a str,
            name: &'a str,
        }

        self.post("/api/fs/rename", &RenameReq { path, name }).await
    }

    /// Move `names` from `src_dir` to `dst_dir`.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - no such file or folder
    #[instrument(level = "trace", skip(self))]
    pub async fn move_to(
        &self,
        src_dir: &str,
        dst_dir: &str,
        names: &[&str],
    ) -> crate::Result<BaseResponse> {
        let req = MoveReq {
            src_dir,
            dst_dir,
            names: Some(names),
        };

        self.post("/api/fs/move", &req).await
    }

    /// Copy `names` from `src_dir` to `dst_dir`. Copies between storages
    /// run as [tasks](crate::admin::task::TaskKind::Copy).
    ///
    /// # Errors
    ///
    /// - network errors
    /// - no such file or folder
    #[instrument(level = "trace", skip(self))]
    pub async fn copy(
        &self,
        src_dir: &str,
        dst_dir: &str,
        names: &[&str],
    ) -> crate::Result<BaseResponse> {
        let req = MoveReq {
            src_dir,
            dst_dir,
            names: Some(names),
        };

        self.post("/api/fs/copy", &req).await
    }

    /// Delete `names` in `dir`. There is no trash can.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - no such file or folder
    #[instrument(level = "trace", skip(self))]
    pub async fn remove(&self, dir: &str, names: &[&str]) -> crate::Result<BaseResponse> {
        #[derive(Serialize)]
        struct RemoveReq<'a> {
            dir: &'a str,
            names: &'a [&'a str],
        }

        self.post("/api/fs/remove", &RemoveReq { dir, names }).await
    }

    /// Rename several files in one go.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - name conflicts
    #[instrument(level = "trace", skip(self))]
    pub async fn batch_rename(
        &self,
        src_dir: &str,
        rename_objects: &[RenameObject],
    ) -> crate::Result<BaseResponse> {
        #[derive(Serialize)]
        struct BatchRenameReq<'a> {
            src_dir: &'a str,
            rename_objects: &'a [RenameObject],
        }

        self.post(
            "/api/fs/batch_rename",
            &BatchRenameReq {
                src_dir,
                rename_objects,
            },
        )
        .await
    }

    /// Rename every file in `src_dir` matching `src_name_regex`.
    /// `new_name_regex` may refer to capture groups (`$1`).
    ///
    /// # Errors
    ///
    /// - network errors
    /// - invalid regex
    #[instrument(level = "trace", skip(self))]
    pub async fn regex_rename(
        &self,
        src_dir: &str,
        src_name_regex: &str,
        new_name_regex: &str,
    ) -> crate::Result<BaseResponse> {
        #[derive(Serialize)]
        struct RegexRenameReq<'a> {
            src_dir: &'a str,
            src_name_regex: &'a str,
            new_name_regex: &'a str,
        }

        self.post(
            "/api/fs/regex_rename",
            &RegexRenameReq {
                src_dir,
                src_name_regex,
                new_name_regex,
            },
        )
        .await
    }

    /// Move every file below `src_dir`, flattened, into `dst_dir`.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - no such folder
    #[instrument(level = "trace", skip(self))]
    pub async fn recursive_move(&self, src_dir: &str, dst_dir: &str) -> crate::Result<BaseResponse> {
        let req = MoveReq {
            src_dir,
            dst_dir,
            names: None,
        };

        self.post("/api/fs/recursive_move", &req).await
    }

    /// Delete all empty folders below `src_dir`.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - no such folder
    #[instrument(level = "trace", skip(self))]
    pub async fn remove_empty_directory(&self, src_dir: &str) -> crate::Result<BaseResponse> {
        #[derive(Serialize)]
        struct RemoveEmptyReq<'a> {
            src_dir: &'a str,
        }

        self.post("/api/fs/remove_empty_directory", &RemoveEmptyReq { src_dir })
            .await
    }

    /// Let the server download `urls` into `path`.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - the tool isn't configured
    #[instrument(level = "trace", skip(self))]
    pub async fn add_offline_download(
        &self,
        path: &str,
        urls: &[&str],
        tool: OfflineTool,
        delete_policy: DeletePolicy,
    ) -> crate::Result<Response<OfflineDownload>> {
        #[derive(Serialize)]
        struct OfflineDownloadReq<'a> {
            path: &'a str,
            urls: &'a [&'a str],
            tool: OfflineTool,
            delete_policy: DeletePolicy,
        }

        self.post(
            "/api/fs/add_offline_download",
            &OfflineDownloadReq {
                path,
                urls,
                tool,
                delete_policy,
            },
        )
        .await
    }

    fn upload_options(path: &str, as_task: bool) -> crate::Result<RequestOptions> {
        Ok(RequestOptions::new()
            .header(HeaderName::from_static(FILE_PATH), path::header_value(path)?)
            .header(
                HeaderName::from_static(AS_TASK),
                HeaderValue::from_static(if as_task { "true" } else { "false" }),
            ))
    }

    /// Upload a file as `multipart/form-data`. The whole file is buffered,
    /// prefer [`FsApi::stream_upload`] for large files.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - permission denied
    #[instrument(level = "trace", skip(self, data))]
    pub async fn form_upload(
        &self,
        path: &str,
        data: impl Into<Vec<u8>>,
        as_task: bool,
    ) -> crate::Result<Response<UploadTask>> {
        let file_name = path.rsplit('/').next().unwrap_or(path).to_owned();
        let part = Part::bytes(data.into()).file_name(file_name);
        let form = Form::new().part("file", part);

        let options = Self::upload_options(path, as_task)?.multipart(form);

        let res: Response<Option<UploadTask>> =
            decode(self.client.put("/api/fs/form", options).await?)?;

        Ok(res.map(Option::unwrap_or_default))
    }

    /// Upload a file as a raw `application/octet-stream` body. The body may be
    /// a stream (see [`Body::wrap_stream`]).
    ///
    /// # Errors
    ///
    /// - network errors
    /// - permission denied
    #[instrument(level = "trace", skip(self, body))]
    pub async fn stream_upload(
        &self,
        path: &str,
        body: impl Into<Body>,
        as_task: bool,
    ) -> crate::Result<Response<UploadTask>> {
        let options = Self::upload_options(path, as_task)?
            .header(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/octet-stream"),
            )
            .body(body);

        let res: Response<Option<UploadTask>> =
            decode(self.client.put("/api/fs/put", options).await?)?;

        Ok(res.map(Option::unwrap_or_default))
    }
}
