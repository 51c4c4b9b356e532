//! Aggregate transfer statistics.
//!
//! Maintains counts of transfers by state, by direction, and by file-type
//! category, adjusted exactly once per transition. Sync type with no
//! internal locking — the model mutates it under its own write lock.
//!
//! # Bookkeeping rules
//!
//! - State counts mirror each record's current state; their sum always
//!   equals the live record count.
//! - Kind counts track **non-terminal** records per direction: incremented
//!   at insert, decremented once when a record enters a terminal state, and
//!   at removal only if the record never got there.
//! - File-type counts track live records per category: incremented at
//!   insert, decremented at removal.

use std::collections::HashMap;

use skysync_core::{FileTypeCategory, ModelEvent, StatDimension, TransferKind, TransferState};

/// Counters over the three statistics dimensions.
///
/// Every mutating method returns the `StatChanged` notifications it
/// produced, for the model to dispatch once its lock is released.
#[derive(Debug, Default)]
pub struct TransferStatistics {
    per_state: HashMap<TransferState, usize>,
    per_kind: HashMap<TransferKind, usize>,
    per_file_type: HashMap<FileTypeCategory, usize>,
}

impl TransferStatistics {
    /// Create empty statistics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count of records in a state.
    #[must_use]
    pub fn state_count(&self, state: TransferState) -> usize {
        self.per_state.get(&state).copied().unwrap_or(0)
    }

    /// Count of non-terminal records of a direction.
    #[must_use]
    pub fn kind_count(&self, kind: TransferKind) -> usize {
        self.per_kind.get(&kind).copied().unwrap_or(0)
    }

    /// Count of live records of a file-type category.
    #[must_use]
    pub fn file_type_count(&self, file_type: FileTypeCategory) -> usize {
        self.per_file_type.get(&file_type).copied().unwrap_or(0)
    }

    /// Sum of all state counts; equals the live record count.
    #[must_use]
    pub fn total(&self) -> usize {
        self.per_state.values().sum()
    }

    /// Account for a newly inserted record.
    pub fn record_insert(
        &mut self,
        state: TransferState,
        kind: TransferKind,
        file_type: FileTypeCategory,
    ) -> Vec<ModelEvent> {
        let mut events = Vec::with_capacity(3);
        events.push(self.bump_state(state, 1));
        if !state.is_terminal() {
            events.push(self.bump_kind(kind, 1));
        }
        events.push(self.bump_file_type(file_type, 1));
        events
    }

    /// Account for a state transition on an existing record.
    pub fn record_state_change(
        &mut self,
        prev: TransferState,
        next: TransferState,
        kind: TransferKind,
    ) -> Vec<ModelEvent> {
        if prev == next {
            return Vec::new();
        }

        let mut events = vec![self.bump_state(prev, -1), self.bump_state(next, 1)];

        // The one-way transition into a terminal state retires the record
        // from the active kind counts, exactly once.
        if !prev.is_terminal() && next.is_terminal() {
            events.push(self.bump_kind(kind, -1));
        }

        events
    }

    /// Account for a removed record.
    pub fn record_remove(
        &mut self,
        state: TransferState,
        kind: TransferKind,
        file_type: FileTypeCategory,
    ) -> Vec<ModelEvent> {
        let mut events = Vec::with_capacity(3);
        events.push(self.bump_state(state, -1));
        if !state.is_terminal() {
            events.push(self.bump_kind(kind, -1));
        }
        events.push(self.bump_file_type(file_type, -1));
        events
    }

    /// Re-emit the current count for every key ever seen, in canonical
    /// order. Used at model init and after bulk-load batches.
    #[must_use]
    pub fn emit_all(&self) -> Vec<ModelEvent> {
        let mut events = Vec::new();

        for state in TransferState::ALL {
            if let Some(count) = self.per_state.get(&state) {
                events.push(ModelEvent::stat_changed(
                    StatDimension::State,
                    state.as_str(),
                    *count,
                ));
            }
        }
        for kind in [TransferKind::Download, TransferKind::Upload] {
            if let Some(count) = self.per_kind.get(&kind) {
                events.push(ModelEvent::stat_changed(
                    StatDimension::Kind,
                    kind.as_str(),
                    *count,
                ));
            }
        }
        for file_type in FileTypeCategory::ALL {
            if let Some(count) = self.per_file_type.get(&file_type) {
                events.push(ModelEvent::stat_changed(
                    StatDimension::FileType,
                    file_type.as_str(),
                    *count,
                ));
            }
        }

        events
    }

    fn bump_state(&mut self, state: TransferState, delta: isize) -> ModelEvent {
        let count = Self::bump(self.per_state.entry(state).or_insert(0), delta);
        ModelEvent::stat_changed(StatDimension::State, state.as_str(), count)
    }

    fn bump_kind(&mut self, kind: TransferKind, delta: isize) -> ModelEvent {
        let count = Self::bump(self.per_kind.entry(kind).or_insert(0), delta);
        ModelEvent::stat_changed(StatDimension::Kind, kind.as_str(), count)
    }

    fn bump_file_type(&mut self, file_type: FileTypeCategory, delta: isize) -> ModelEvent {
        let count = Self::bump(self.per_file_type.entry(file_type).or_insert(0), delta);
        ModelEvent::stat_changed(StatDimension::FileType, file_type.as_str(), count)
    }

    fn bump(slot: &mut usize, delta: isize) -> usize {
        *slot = slot.saturating_add_signed(delta);
        *slot
    }
}
