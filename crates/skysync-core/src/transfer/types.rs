//! Core domain types for transfers.
//!
//! Pure data types with no I/O dependencies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Unique identifier for a transfer, stable for its entire lifetime.
///
/// Tags are assigned by the transfer engine and never reused while the
/// transfer is alive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransferTag(pub u64);

impl fmt::Display for TransferTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TransferTag {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Direction of a transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferKind {
    /// From the cloud to local storage.
    Download,
    /// From local storage to the cloud.
    Upload,
}

impl TransferKind {
    /// Get the canonical string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Download => "download",
            Self::Upload => "upload",
        }
    }
}

impl fmt::Display for TransferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle state of a transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferState {
    /// Waiting for the engine to pick it up.
    Queued,
    /// Bytes are moving.
    Active,
    /// Suspended by the user or by the engine.
    Paused,
    /// The engine is retrying after a temporary error.
    Retrying,
    /// Finished successfully.
    Completed,
    /// Aborted by the user.
    Cancelled,
    /// Finished with a fatal error.
    Failed,
}

impl TransferState {
    /// True for states that accept no further progress events.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Failed)
    }

    /// Get the canonical string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Retrying => "retrying",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
        }
    }

    /// Parse from string representation.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "active" => Self::Active,
            "paused" => Self::Paused,
            "retrying" => Self::Retrying,
            "completed" => Self::Completed,
            "cancelled" => Self::Cancelled,
            "failed" => Self::Failed,
            // "queued" or unknown values default to Queued
            _ => Self::Queued,
        }
    }

    /// All states, in emission order for statistics snapshots.
    pub const ALL: [Self; 7] = [
        Self::Queued,
        Self::Active,
        Self::Paused,
        Self::Retrying,
        Self::Completed,
        Self::Cancelled,
        Self::Failed,
    ];
}

impl fmt::Display for TransferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Coarse file category derived from the file name at insertion time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileTypeCategory {
    Text,
    Audio,
    Video,
    Archive,
    Document,
    Image,
    Other,
}

/// Extensions classified as archives; MIME top-level types don't
/// distinguish these from generic application payloads.
const ARCHIVE_EXTENSIONS: &[&str] = &["7z", "bz2", "gz", "rar", "tar", "tgz", "xz", "zip", "zst"];

/// Extensions classified as documents.
const DOCUMENT_EXTENSIONS: &[&str] = &[
    "doc", "docx", "odp", "ods", "odt", "pdf", "ppt", "pptx", "rtf", "xls", "xlsx",
];

impl FileTypeCategory {
    /// Derive the category from a file name's extension.
    #[must_use]
    pub fn from_filename(name: &str) -> Self {
        let ext = Path::new(name)
            .extension()
            .and_then(std::ffi::OsStr::to_str)
            .map(str::to_ascii_lowercase);

        if let Some(ext) = ext {
            if ARCHIVE_EXTENSIONS.contains(&ext.as_str()) {
                return Self::Archive;
            }
            if DOCUMENT_EXTENSIONS.contains(&ext.as_str()) {
                return Self::Document;
            }
        }

        mime_guess::from_path(name)
            .first()
            .map_or(Self::Other, |mime| match mime.type_().as_str() {
                "audio" => Self::Audio,
                "video" => Self::Video,
                "image" => Self::Image,
                "text" => Self::Text,
                _ => Self::Other,
            })
    }

    /// Get the canonical string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Archive => "archive",
            Self::Document => "document",
            Self::Image => "image",
            Self::Other => "other",
        }
    }

    /// All categories, in emission order for statistics snapshots.
    pub const ALL: [Self; 7] = [
        Self::Text,
        Self::Audio,
        Self::Video,
        Self::Archive,
        Self::Document,
        Self::Image,
        Self::Other,
    ];
}

impl fmt::Display for FileTypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Engine error pair attached to failure and temporary-error events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferError {
    /// Engine error code; 0 means no error.
    pub code: i32,
    /// Engine-specific error detail value.
    pub value: i64,
}

impl TransferError {
    /// Create a new error pair.
    #[must_use]
    pub const fn new(code: i32, value: i64) -> Self {
        Self { code, value }
    }

    /// True when the pair represents "no error".
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code == 0
    }
}

/// The transfer payload carried by every engine event.
///
/// This is the engine's own view of a transfer at the moment the event was
/// produced. The failed-transfer side table retains the full notice so a
/// retry command can hand it back to the engine unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransferNotice {
    /// Unique transfer identifier.
    pub tag: TransferTag,
    /// Transfer direction.
    pub kind: TransferKind,
    /// State reported by the engine.
    pub state: TransferState,
    /// Ordering key; 0 means the engine has not queued this transfer.
    pub priority: u64,
    /// Total size in bytes, once known.
    pub total_bytes: u64,
    /// Bytes moved so far.
    pub transferred_bytes: u64,
    /// Instantaneous speed in bytes per second.
    pub speed: u64,
    /// Lifetime mean speed in bytes per second.
    pub mean_speed: u64,
    /// Engine-side timestamp of the last change, in milliseconds.
    pub updated_at_ms: i64,
    /// Streaming transfers never enter the queue model.
    pub is_streaming: bool,
    /// Folder aggregates never enter the queue model.
    pub is_folder: bool,
    /// Whether the transfer originates from a public link.
    pub is_public_link: bool,
    /// Whether the transfer was initiated by the sync engine.
    pub is_sync_originated: bool,
    /// File name, used to derive the file-type category.
    pub file_name: String,
    /// Last extended error known to the engine, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<TransferError>,
}

impl TransferNotice {
    /// True when this notice describes a transfer the queue model tracks.
    #[must_use]
    pub const fn is_queueable(&self) -> bool {
        !self.is_streaming && !self.is_folder
    }

    /// Bytes still to move; saturates at zero if counters are inconsistent.
    #[must_use]
    pub const fn remaining_bytes(&self) -> u64 {
        self.total_bytes.saturating_sub(self.transferred_bytes)
    }
}

/// One row of the queue model: the canonical record for a transfer tag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransferRecord {
    /// Unique transfer identifier.
    pub tag: TransferTag,
    /// Transfer direction.
    pub kind: TransferKind,
    /// Current lifecycle state.
    pub state: TransferState,
    /// Ordering key; drives the row position.
    pub priority: u64,
    /// Total size in bytes.
    pub total_bytes: u64,
    /// Bytes moved so far.
    pub transferred_bytes: u64,
    /// Instantaneous speed in bytes per second.
    pub speed: u64,
    /// Lifetime mean speed in bytes per second.
    pub mean_speed: u64,
    /// Engine-side timestamp of the last change, in milliseconds.
    pub updated_at_ms: i64,
    /// Last recorded engine error code; 0 means none.
    pub error_code: i32,
    /// Last recorded engine error detail value.
    pub error_value: i64,
    /// Whether the transfer originates from a public link.
    pub is_public_link: bool,
    /// Whether the transfer was initiated by the sync engine.
    pub is_sync_originated: bool,
    /// File name.
    pub file_name: String,
    /// Category derived from the file name at insertion.
    pub file_type: FileTypeCategory,
    /// Smoothed estimate of seconds until completion.
    pub remaining_secs: u64,
    /// Set while a locally applied reorder awaits engine confirmation.
    pub pending_move: bool,
}

impl TransferRecord {
    /// Build a record from an engine notice and an initial remaining-time
    /// estimate. The file-type category is derived here, once.
    #[must_use]
    pub fn from_notice(notice: &TransferNotice, remaining_secs: u64) -> Self {
        let error = notice.error.unwrap_or_default();
        Self {
            tag: notice.tag,
            kind: notice.kind,
            state: notice.state,
            priority: notice.priority,
            total_bytes: notice.total_bytes,
            transferred_bytes: notice.transferred_bytes,
            speed: notice.speed,
            mean_speed: notice.mean_speed,
            updated_at_ms: notice.updated_at_ms,
            error_code: error.code,
            error_value: error.value,
            is_public_link: notice.is_public_link,
            is_sync_originated: notice.is_sync_originated,
            file_name: notice.file_name.clone(),
            file_type: FileTypeCategory::from_filename(&notice.file_name),
            remaining_secs,
            pending_move: false,
        }
    }

    /// Apply the values of an accepted progress update.
    #[allow(clippy::too_many_arguments)]
    pub fn apply_update(
        &mut self,
        updated_at_ms: i64,
        remaining_secs: u64,
        error: TransferError,
        mean_speed: u64,
        speed: u64,
        priority: u64,
        state: TransferState,
        transferred_bytes: u64,
    ) {
        self.updated_at_ms = updated_at_ms;
        self.remaining_secs = remaining_secs;
        self.error_code = error.code;
        self.error_value = error.value;
        self.mean_speed = mean_speed;
        self.speed = speed;
        self.priority = priority;
        self.state = state;
        self.transferred_bytes = transferred_bytes;
    }

    /// Apply the terminal values of a finish event.
    pub fn apply_finish(
        &mut self,
        updated_at_ms: i64,
        error: TransferError,
        mean_speed: u64,
        state: TransferState,
        transferred_bytes: u64,
    ) {
        self.updated_at_ms = updated_at_ms;
        self.error_code = error.code;
        self.error_value = error.value;
        self.mean_speed = mean_speed;
        self.speed = 0;
        self.state = state;
        self.transferred_bytes = transferred_bytes;
        self.remaining_secs = 0;
    }

    /// True once the record reached a terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}
