//! Engine-side and consumer-side event types.
//!
//! The engine's listener surface collapses into one tagged variant,
//! [`EngineEvent`], consumed by a single dispatch function in the queue
//! model. Consumer notifications are the discriminated union [`ModelEvent`].

use serde::{Deserialize, Serialize};

use super::types::{TransferError, TransferNotice};

/// An event from the transfer engine.
///
/// Every event carries the engine's view of the transfer and a monotonically
/// increasing notification sequence number used for staleness filtering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    /// The engine started tracking a new transfer.
    Started {
        /// The transfer payload.
        notice: TransferNotice,
        /// Notification sequence number.
        seq: u64,
    },

    /// Progress, priority, or state changed on a known transfer.
    Updated {
        /// The transfer payload.
        notice: TransferNotice,
        /// Notification sequence number.
        seq: u64,
    },

    /// A non-fatal error occurred; the engine will keep retrying.
    TemporaryError {
        /// The transfer payload.
        notice: TransferNotice,
        /// The error that triggered the retry.
        error: TransferError,
        /// Notification sequence number.
        seq: u64,
    },

    /// The transfer reached a terminal state.
    Finished {
        /// The transfer payload.
        notice: TransferNotice,
        /// Terminal error, if the transfer did not complete cleanly.
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<TransferError>,
        /// Notification sequence number.
        seq: u64,
    },
}

impl EngineEvent {
    /// Create a started event.
    #[must_use]
    pub const fn started(notice: TransferNotice, seq: u64) -> Self {
        Self::Started { notice, seq }
    }

    /// Create an updated event.
    #[must_use]
    pub const fn updated(notice: TransferNotice, seq: u64) -> Self {
        Self::Updated { notice, seq }
    }

    /// Create a temporary error event.
    #[must_use]
    pub const fn temporary_error(notice: TransferNotice, error: TransferError, seq: u64) -> Self {
        Self::TemporaryError { notice, error, seq }
    }

    /// Create a finished event.
    #[must_use]
    pub const fn finished(notice: TransferNotice, error: Option<TransferError>, seq: u64) -> Self {
        Self::Finished { notice, error, seq }
    }

    /// The notification sequence number of this event.
    #[must_use]
    pub const fn seq(&self) -> u64 {
        match self {
            Self::Started { seq, .. }
            | Self::Updated { seq, .. }
            | Self::TemporaryError { seq, .. }
            | Self::Finished { seq, .. } => *seq,
        }
    }

    /// The transfer payload of this event.
    #[must_use]
    pub const fn notice(&self) -> &TransferNotice {
        match self {
            Self::Started { notice, .. }
            | Self::Updated { notice, .. }
            | Self::TemporaryError { notice, .. }
            | Self::Finished { notice, .. } => notice,
        }
    }
}

/// A snapshot of the engine's full transfer set, input to the bulk loader.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    /// All transfers the engine currently knows about.
    pub transfers: Vec<TransferNotice>,
    /// The engine's notification watermark at the time of the snapshot.
    pub watermark: u64,
}

impl EngineSnapshot {
    /// Create a new snapshot.
    #[must_use]
    pub const fn new(transfers: Vec<TransferNotice>, watermark: u64) -> Self {
        Self {
            transfers,
            watermark,
        }
    }
}

/// Statistics dimension identifiers for `StatChanged` notifications.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatDimension {
    /// Count of transfers per lifecycle state.
    State,
    /// Count of non-terminal transfers per direction.
    Kind,
    /// Count of live transfers per file-type category.
    FileType,
}

impl StatDimension {
    /// Get the canonical string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::State => "state",
            Self::Kind => "kind",
            Self::FileType => "file_type",
        }
    }
}

/// Single discriminated union for all consumer notifications.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelEvent {
    /// A contiguous row range was inserted.
    RowsInserted {
        /// First inserted row.
        first: usize,
        /// Last inserted row (inclusive).
        last: usize,
    },

    /// A contiguous row range was removed.
    RowsRemoved {
        /// First removed row.
        first: usize,
        /// Last removed row (inclusive).
        last: usize,
    },

    /// Rows moved; everything between `from` and `to` shifted.
    RowsMoved {
        /// Row the move started from.
        from: usize,
        /// Row the move ended at.
        to: usize,
    },

    /// The record at a row changed in place.
    RowChanged {
        /// The affected row.
        row: usize,
    },

    /// An aggregate count changed.
    StatChanged {
        /// Which statistics dimension changed.
        dimension: StatDimension,
        /// Key within the dimension (state, kind, or category name).
        key: String,
        /// The new count.
        count: usize,
    },
}

impl ModelEvent {
    /// Create a rows inserted event.
    #[must_use]
    pub const fn rows_inserted(first: usize, last: usize) -> Self {
        Self::RowsInserted { first, last }
    }

    /// Create a rows removed event.
    #[must_use]
    pub const fn rows_removed(first: usize, last: usize) -> Self {
        Self::RowsRemoved { first, last }
    }

    /// Create a rows moved event.
    #[must_use]
    pub const fn rows_moved(from: usize, to: usize) -> Self {
        Self::RowsMoved { from, to }
    }

    /// Create a row changed event.
    #[must_use]
    pub const fn row_changed(row: usize) -> Self {
        Self::RowChanged { row }
    }

    /// Create a statistic changed event.
    pub fn stat_changed(dimension: StatDimension, key: impl Into<String>, count: usize) -> Self {
        Self::StatChanged {
            dimension,
            key: key.into(),
            count,
        }
    }

    /// Get the event name for wire protocols.
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::RowsInserted { .. } => "transfers:rows_inserted",
            Self::RowsRemoved { .. } => "transfers:rows_removed",
            Self::RowsMoved { .. } => "transfers:rows_moved",
            Self::RowChanged { .. } => "transfers:row_changed",
            Self::StatChanged { .. } => "transfers:stat_changed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::types::{TransferKind, TransferState, TransferTag};

    fn notice(tag: u64) -> TransferNotice {
        TransferNotice {
            tag: TransferTag(tag),
            kind: TransferKind::Download,
            state: TransferState::Queued,
            priority: 1,
            total_bytes: 0,
            transferred_bytes: 0,
            speed: 0,
            mean_speed: 0,
            updated_at_ms: 0,
            is_streaming: false,
            is_folder: false,
            is_public_link: false,
            is_sync_originated: false,
            file_name: "a.txt".to_string(),
            error: None,
        }
    }

    #[test]
    fn test_engine_event_accessors() {
        let event = EngineEvent::started(notice(3), 17);
        assert_eq!(event.seq(), 17);
        assert_eq!(event.notice().tag, TransferTag(3));
    }

    #[test]
    fn test_model_event_serialization_tags() {
        let json = serde_json::to_string(&ModelEvent::rows_moved(2, 5)).unwrap();
        assert!(json.contains("\"rows_moved\""));

        let json =
            serde_json::to_string(&ModelEvent::stat_changed(StatDimension::Kind, "upload", 4))
                .unwrap();
        assert!(json.contains("\"kind\""));
        assert!(json.contains("\"upload\""));
    }

    #[test]
    fn test_event_names() {
        assert_eq!(
            ModelEvent::row_changed(0).event_name(),
            "transfers:row_changed"
        );
        assert_eq!(
            ModelEvent::rows_inserted(0, 0).event_name(),
            "transfers:rows_inserted"
        );
    }
}
