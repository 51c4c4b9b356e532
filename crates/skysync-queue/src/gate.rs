//! Notification gate.
//!
//! Filters stale, duplicate, and irrelevant engine events before they reach
//! the mutation path. Staleness is detected with a monotonic watermark over
//! the engine's notification sequence numbers; no wall-clock expiry is
//! involved.

use skysync_core::TransferNotice;

/// Monotonic watermark over engine notification sequence numbers.
///
/// Sync type with no internal locking — the model mutates it under its own
/// write lock.
#[derive(Debug, Default)]
pub struct NotificationGate {
    watermark: u64,
}

impl NotificationGate {
    /// Create a gate with a zero watermark (accepts everything).
    #[must_use]
    pub const fn new() -> Self {
        Self { watermark: 0 }
    }

    /// The highest sequence number processed so far.
    #[must_use]
    pub const fn watermark(&self) -> u64 {
        self.watermark
    }

    /// True if an event with this sequence number is fresh.
    ///
    /// Events at or below the watermark are stale or duplicates.
    #[must_use]
    pub const fn accepts(&self, seq: u64) -> bool {
        seq > self.watermark
    }

    /// Combined admission check: fresh sequence number and a transfer shape
    /// the queue model tracks (no streaming, no folder aggregates).
    #[must_use]
    pub const fn admits(&self, notice: &TransferNotice, seq: u64) -> bool {
        notice.is_queueable() && self.accepts(seq)
    }

    /// Advance the watermark. Never moves backwards.
    pub const fn advance(&mut self, seq: u64) {
        if seq > self.watermark {
            self.watermark = seq;
        }
    }
}
