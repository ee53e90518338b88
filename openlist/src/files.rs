//! Request and response bodies of the `/api/fs` endpoints.
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use serde_with::serde_as;

use crate::serde::OptDateTime;

/// Body of `/api/fs/list` and `/api/fs/get`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListReq {
    /// Folder (or file, for `get`) to look at.
    pub path: String,
    /// Password of the folder, if it has one.
    pub password: String,
    /// Page number, starting at `1`.
    pub page: u32,
    /// Items per page. `0` means everything.
    pub per_page: u32,
    /// Bypass the server's cache.
    pub refresh: bool,
}

impl ListReq {
    /// First page, everything on it, no password, no refresh.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            password: String::new(),
            page: 1,
            per_page: 0,
            refresh: false,
        }
    }

    /// Set the folder password.
    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Select a page.
    #[must_use]
    pub fn page(mut self, page: u32, per_page: u32) -> Self {
        self.page = page;
        self.per_page = per_page;
        self
    }

    /// Ask the server to bypass its cache.
    #[must_use]
    pub fn refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }
}

/// A file or folder in a listing.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileItem {
    /// Name, not the full path.
    pub name: String,
    /// Size in bytes. Usually `0` for folders.
    pub size: u64,
    /// Whether it's a folder.
    pub is_dir: bool,
    /// Modification date.
    #[serde_as(as = "OptDateTime")]
    #[serde(default)]
    pub modified: Option<DateTime<FixedOffset>>,
    /// Creation date, if the storage knows it.
    #[serde_as(as = "OptDateTime")]
    #[serde(default)]
    pub created: Option<DateTime<FixedOffset>>,
    /// Signature to append to download links (`?sign=`).
    #[serde(default)]
    pub sign: String,
    /// Thumbnail url.
    #[serde(default)]
    pub thumb: String,
    /// File type, as guessed by the server from the extension.
    #[serde(rename = "type")]
    pub kind: i64,
    /// Hashes, serialized.
    #[serde(default)]
    pub hashinfo: String,
    /// Hashes.
    #[serde(default)]
    pub hash_info: Option<Value>,
}

/// Folder listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListData {
    /// Items on this page.
    #[serde(default, deserialize_with = "crate::serde::null_as_default")]
    pub content: Vec<FileItem>,
    /// Items in the folder, on all pages.
    pub total: u64,
    /// Readme (markdown) configured for the folder.
    #[serde(default)]
    pub readme: String,
    /// Header (markdown) configured for the folder.
    #[serde(default)]
    pub header: String,
    /// Whether the current user may write here.
    #[serde(default)]
    pub write: bool,
    /// Storage driver backing the folder.
    #[serde(default)]
    pub provider: String,
}

/// A single file or folder, with some extras.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Base properties.
    #[serde(flatten)]
    pub item: FileItem,
    /// Direct url to the content.
    #[serde(default)]
    pub raw_url: String,
    /// Readme (markdown).
    #[serde(default)]
    pub readme: String,
    /// Header (markdown).
    #[serde(default)]
    pub header: String,
    /// Storage driver.
    #[serde(default)]
    pub provider: String,
    /// Related files, like subtitles next to a video.
    #[serde(default)]
    pub related: Option<Value>,
}

/// A folder in a `/api/fs/dirs` response.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirItem {
    /// Name.
    pub name: String,
    /// Modification date.
    #[serde_as(as = "OptDateTime")]
    #[serde(default)]
    pub modified: Option<DateTime<FixedOffset>>,
}

/// What to look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchScope {
    /// Files and folders.
    #[default]
    All,
    /// Folders only.
    Folders,
    /// Files only.
    Files,
}

impl Serialize for SearchScope {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(match self {
            Self::All => 0,
            Self::Folders => 1,
            Self::Files => 2,
        })
    }
}

/// Body of `/api/fs/search`. Requires the search index to be enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchReq {
    /// Folder to search in.
    pub parent: String,
    /// What to search for.
    pub keywords: String,
    /// Files, folders or both.
    pub scope: SearchScope,
    /// Page number, starting at `1`.
    pub page: u32,
    /// Results per page.
    pub per_page: u32,
    /// Password of `parent`.
    pub password: String,
}

impl SearchReq {
    /// First 100 files and folders matching `keywords`.
    #[must_use]
    pub fn new(parent: impl Into<String>, keywords: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            keywords: keywords.into(),
            scope: SearchScope::All,
            page: 1,
            per_page: 100,
            password: String::new(),
        }
    }

    /// Restrict to files or folders.
    #[must_use]
    pub fn scope(mut self, scope: SearchScope) -> Self {
        self.scope = scope;
        self
    }

    /// Select a page.
    #[must_use]
    pub fn page(mut self, page: u32, per_page: u32) -> Self {
        self.page = page;
        self.per_page = per_page;
        self
    }

    /// Password of `parent`.
    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }
}

/// A search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchItem {
    /// Folder containing the hit.
    pub parent: String,
    /// Name.
    pub name: String,
    /// Whether it's a folder.
    pub is_dir: bool,
    /// Size in bytes.
    pub size: u64,
    /// File type.
    #[serde(rename = "type")]
    pub kind: i64,
}

/// One rename in a [batch](crate::fs::FsApi::batch_rename).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameObject {
    /// Current name.
    pub src_name: String,
    /// New name.
    pub new_name: String,
}

impl RenameObject {
    /// Rename `src_name` to `new_name`.
    #[must_use]
    pub fn new(src_name: impl Into<String>, new_name: impl Into<String>) -> Self {
        Self {
            src_name: src_name.into(),
            new_name: new_name.into(),
        }
    }
}

/// A background task (upload, copy, offline download...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInfo {
    /// Task id.
    pub id: String,
    /// Human-readable description.
    pub name: String,
    /// `0` pending, `1` running, `2` succeeded, `3` failed, `4` canceled.
    pub state: i64,
    /// Status text.
    #[serde(default)]
    pub status: String,
    /// Percentage, `0` to `100`.
    #[serde(default)]
    pub progress: f64,
    /// Error message, empty unless the task failed.
    #[serde(default)]
    pub error: String,
}

/// Tasks created by [`add_offline_download`](crate::fs::FsApi::add_offline_download).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfflineDownload {
    /// One task per url.
    #[serde(default, deserialize_with = "crate::serde::null_as_default")]
    pub tasks: Vec<TaskInfo>,
}

/// Result of an upload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadTask {
    /// The upload task. Absent when not uploading as a task.
    #[serde(default)]
    pub task: Option<TaskInfo>,
}

/// Downloader used for offline downloads. It must be configured on the
/// server first, see [`SettingApi`](crate::admin::setting::SettingApi).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OfflineTool {
    /// [aria2](https://aria2.github.io/).
    #[serde(rename = "aria2")]
    Aria2,
    /// Built-in HTTP downloader.
    #[default]
    SimpleHttp,
    /// [qBittorrent](https://www.qbittorrent.org/).
    #[serde(rename = "qBittorrent")]
    QBittorrent,
}

/// What to do with the temporary file once an offline download has
/// been transferred to its storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletePolicy {
    /// Delete it if the transfer succeeded.
    #[default]
    DeleteOnUploadSucceed,
    /// Delete it if the transfer failed.
    DeleteOnUploadFailed,
    /// Keep it.
    DeleteNever,
    /// Delete it no matter what.
    DeleteAlways,
}
