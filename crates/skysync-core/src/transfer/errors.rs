//! Queue model error types.
//!
//! These errors are designed to be serializable and not depend on external
//! error types. Stale or duplicate engine events are not errors — they are
//! silently discarded by the notification gate and never surface here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::TransferTag;

/// Error type for queue model operations.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum ModelError {
    /// A row range passed to a removal or move operation is invalid.
    #[error("Invalid row range: start {start}, count {count}")]
    InvalidRange {
        /// First row of the rejected range.
        start: usize,
        /// Number of rows in the rejected range.
        count: usize,
    },

    /// An operation referenced a tag not present in the model.
    #[error("Unknown transfer tag: {tag}")]
    UnknownTag {
        /// The tag that wasn't found.
        tag: TransferTag,
    },

    /// The engine rejected a command issued on the consumer's behalf.
    ///
    /// The local row state has already been updated optimistically when this
    /// is returned; there is no rollback.
    #[error("Engine rejected command: {message}")]
    EngineRejected {
        /// Description of the rejection.
        message: String,
    },
}

impl ModelError {
    /// Create an invalid range error.
    #[must_use]
    pub const fn invalid_range(start: usize, count: usize) -> Self {
        Self::InvalidRange { start, count }
    }

    /// Create an unknown tag error.
    #[must_use]
    pub const fn unknown_tag(tag: TransferTag) -> Self {
        Self::UnknownTag { tag }
    }

    /// Create an engine rejection error.
    pub fn engine_rejected(message: impl Into<String>) -> Self {
        Self::EngineRejected {
            message: message.into(),
        }
    }
}

/// Convenience result type for queue model operations.
pub type ModelResult<T> = Result<T, ModelError>;
