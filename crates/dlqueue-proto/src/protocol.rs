use serde::{Deserialize, Serialize};

/// Queue buckets, grouped by download state.
pub const STATUS_PATH: &str = "/api/status";
/// Files present in the server's downloads directory.
pub const DOWNLOADED_FILES_PATH: &str = "/api/downloaded_files";
pub const ADD_URL_PATH: &str = "/api/add_url";
pub const DELETE_FILE_PATH: &str = "/api/delete_file";
/// Prefix under which the server exposes downloaded files for playback.
pub const DOWNLOADS_PREFIX: &str = "/downloads/";

/// A queue entry that ended in failure.
///
/// The server reports the raw status string as `error`, which usually
/// carries a `failed: ` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub url: String,
    #[serde(default)]
    pub error: String,
}

/// One entry of a queue bucket.
///
/// On the wire a bucket is a JSON array mixing bare URL strings and
/// `{url, error}` objects. Deserialisation resolves the shape once, here;
/// everything downstream matches on the variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueueEntry {
    Url(String),
    Failed(FailureRecord),
}

impl QueueEntry {
    pub fn url(&self) -> &str {
        match self {
            Self::Url(url) => url,
            Self::Failed(record) => &record.url,
        }
    }
}

/// Point-in-time read of `/api/status`. Bucket order is server order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    #[serde(default)]
    pub downloading: Vec<QueueEntry>,
    #[serde(default)]
    pub queued: Vec<QueueEntry>,
    #[serde(default)]
    pub completed: Vec<QueueEntry>,
    #[serde(default)]
    pub failed: Vec<QueueEntry>,
}

/// Point-in-time read of `/api/downloaded_files`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FileListWire")]
pub struct FileListSnapshot {
    pub files: Vec<String>,
    pub mp3_count: usize,
}

impl FileListSnapshot {
    /// Build a snapshot from bare filenames, deriving the MP3 counter.
    pub fn from_files(files: Vec<String>) -> Self {
        let mp3_count = count_mp3(&files);
        Self { files, mp3_count }
    }
}

/// Older servers answer with a bare array of names and no counter.
#[derive(Deserialize)]
#[serde(untagged)]
enum FileListWire {
    Counted {
        files: Vec<String>,
        #[serde(default)]
        mp3_count: Option<usize>,
    },
    Bare(Vec<String>),
}

impl From<FileListWire> for FileListSnapshot {
    fn from(wire: FileListWire) -> Self {
        match wire {
            FileListWire::Counted {
                files,
                mp3_count: Some(mp3_count),
            } => Self { files, mp3_count },
            FileListWire::Counted {
                files,
                mp3_count: None,
            }
            | FileListWire::Bare(files) => Self::from_files(files),
        }
    }
}

/// Number of names with an `.mp3` extension (ASCII case-insensitive).
pub fn count_mp3(files: &[String]) -> usize {
    files
        .iter()
        .filter(|name| {
            name.len() >= 4
                && name.is_char_boundary(name.len() - 4)
                && name[name.len() - 4..].eq_ignore_ascii_case(".mp3")
        })
        .count()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddUrlRequest {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteFileRequest {
    pub filename: String,
}

/// Body returned by the mutating endpoints. Every field is optional because
/// the server only fills in what applies (`{}` is a valid success reply).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiReply {
    pub fn ok() -> Self {
        Self {
            success: Some(true),
            ..Self::default()
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: Some(false),
            error: Some(error.into()),
            message: None,
        }
    }

    /// The `error` field, ignoring blank strings.
    pub fn error_text(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.trim().is_empty())
    }
}
