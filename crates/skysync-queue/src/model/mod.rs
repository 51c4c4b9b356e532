//! The transfer queue model.
//!
//! Maintains the authoritative, priority-ordered view of all tracked
//! transfers and exposes it as a randomly-indexable row sequence.
//!
//! # Architecture
//!
//! - **`TransferModel`**: owns the mutation lock and orchestrates the store,
//!   order index, statistics, and notification gate
//! - **Engine events**: arrive as [`EngineEvent`] and funnel through one
//!   dispatch function, `handle_event`
//! - **Consumer notifications**: collected while the lock is held, emitted
//!   strictly after it is released — a notification handler may query the
//!   model again without deadlocking
//!
//! # Concurrency Model
//!
//! - One `RwLock` guards all queue state; reads take the read half
//! - No engine call and no emitter call happens inside the lock
//! - The bulk loader reacquires the lock per batch so live events interleave

mod loader;

use std::sync::Arc;

use tokio::sync::RwLock;

use skysync_core::{
    EngineEvent, EngineSnapshot, FileTypeCategory, ModelError, ModelEvent, ModelEventEmitterPort,
    TransferEnginePort, TransferError, TransferKind, TransferNotice, TransferRecord, TransferState,
    TransferTag,
};

use crate::estimator::RemainingTimeEstimator;
use crate::gate::NotificationGate;
use crate::order::OrderIndex;
use crate::stats::TransferStatistics;
use crate::store::TransferStore;

pub use loader::LOAD_BATCH_SIZE;

/// Engine reorder command selected for a consumer move request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MoveCommand {
    ToFirst,
    ToLast,
    Up,
    Down,
}

/// Everything guarded by the model's mutation lock.
struct ModelState {
    store: TransferStore,
    order: OrderIndex,
    stats: TransferStatistics,
    gate: NotificationGate,
    downloads_paused: bool,
    uploads_paused: bool,
}

impl ModelState {
    fn new() -> Self {
        Self {
            store: TransferStore::new(),
            order: OrderIndex::new(),
            stats: TransferStatistics::new(),
            gate: NotificationGate::new(),
            downloads_paused: false,
            uploads_paused: false,
        }
    }

    /// Insert a record for a queueable notice and return its row plus the
    /// statistics notifications. Shared by the start path and the loader.
    fn insert_notice(&mut self, notice: &TransferNotice) -> (usize, Vec<ModelEvent>) {
        let mut estimator = RemainingTimeEstimator::new();
        let remaining = estimator.estimate(notice.speed, notice.remaining_bytes());
        let record = TransferRecord::from_notice(notice, remaining);

        let row = self.order.insert(record.tag, record.priority);
        let stat_events = self
            .stats
            .record_insert(record.state, record.kind, record.file_type);
        self.store.insert(record, estimator);

        (row, stat_events)
    }

    fn on_started(&mut self, notice: &TransferNotice, seq: u64) -> Vec<ModelEvent> {
        if !self.gate.admits(notice, seq) {
            return Vec::new();
        }
        self.gate.advance(seq);

        if self.store.contains(notice.tag) {
            tracing::warn!(tag = %notice.tag, "Start event for a tag already tracked, ignoring");
            return Vec::new();
        }

        let (row, mut events) = self.insert_notice(notice);
        events.insert(0, ModelEvent::rows_inserted(row, row));
        tracing::debug!(tag = %notice.tag, row, priority = notice.priority, "Transfer inserted");
        events
    }

    /// Shared body of the update and temporary-error paths.
    fn on_progress(
        &mut self,
        notice: &TransferNotice,
        error: Option<TransferError>,
        seq: u64,
    ) -> Vec<ModelEvent> {
        if !self.gate.admits(notice, seq) {
            return Vec::new();
        }
        self.gate.advance(seq);

        let Some(row) = self.order.position_of(notice.tag) else {
            tracing::warn!(tag = %notice.tag, "Update for unknown tag, ignoring");
            return Vec::new();
        };
        let Some((prev_state, prev_priority, kind)) = self
            .store
            .get(notice.tag)
            .map(|r| (r.state, r.priority, r.kind))
        else {
            tracing::warn!(tag = %notice.tag, "Row without record, ignoring");
            return Vec::new();
        };

        let remaining = self
            .store
            .estimator_mut(notice.tag)
            .map_or(0, |est| est.estimate(notice.speed, notice.remaining_bytes()));

        if let Some(record) = self.store.get_mut(notice.tag) {
            record.apply_update(
                notice.updated_at_ms,
                remaining,
                error.unwrap_or_default(),
                notice.mean_speed,
                notice.speed,
                notice.priority,
                notice.state,
                notice.transferred_bytes,
            );
            // The engine's view is authoritative again
            record.pending_move = false;
        }

        let mut events = Vec::new();
        if notice.priority == prev_priority {
            events.push(ModelEvent::row_changed(row));
        } else if let Some((from, to)) = self.order.reposition(notice.tag, notice.priority) {
            if from == to {
                events.push(ModelEvent::row_changed(from));
            } else {
                tracing::debug!(tag = %notice.tag, from, to, "Transfer repositioned");
                events.push(ModelEvent::rows_moved(from, to));
            }
        }

        if notice.state != prev_state {
            events.extend(
                self.stats
                    .record_state_change(prev_state, notice.state, kind),
            );
        }

        events
    }

    fn on_finished(
        &mut self,
        notice: &TransferNotice,
        error: Option<TransferError>,
        seq: u64,
    ) -> Vec<ModelEvent> {
        if !self.gate.admits(notice, seq) {
            return Vec::new();
        }
        self.gate.advance(seq);

        let Some(row) = self.order.position_of(notice.tag) else {
            tracing::warn!(tag = %notice.tag, "Finish for unknown tag, ignoring");
            return Vec::new();
        };
        let Some((prev_state, kind)) = self.store.get(notice.tag).map(|r| (r.state, r.kind))
        else {
            tracing::warn!(tag = %notice.tag, "Row without record, ignoring");
            return Vec::new();
        };

        if let Some(record) = self.store.get_mut(notice.tag) {
            record.apply_finish(
                notice.updated_at_ms,
                error.unwrap_or_default(),
                notice.mean_speed,
                notice.state,
                notice.transferred_bytes,
            );
            record.pending_move = false;
        }

        if notice.state == TransferState::Failed {
            // Retained until removal or retry
            self.store.retain_failed(notice.tag, notice.clone());
        }

        let mut events = vec![ModelEvent::row_changed(row)];
        if notice.state != prev_state {
            events.extend(
                self.stats
                    .record_state_change(prev_state, notice.state, kind),
            );
        }

        // The record stays in the model; only its estimator is released here
        self.store.release_estimator(notice.tag);
        tracing::debug!(tag = %notice.tag, state = %notice.state, "Transfer finished");

        events
    }

    fn remove_rows(&mut self, start: usize, count: usize) -> Result<Vec<ModelEvent>, ModelError> {
        let Some(tags) = self.order.remove_range(start, count) else {
            return Err(ModelError::invalid_range(start, count));
        };

        let mut events = vec![ModelEvent::rows_removed(start, start + count - 1)];
        for tag in tags {
            if let Some(record) = self.store.remove(tag) {
                events.extend(
                    self.stats
                        .record_remove(record.state, record.kind, record.file_type),
                );
            }
        }

        tracing::debug!(start, count, "Rows removed");
        Ok(events)
    }

    /// Validate and locally apply a consumer move request; returns the
    /// engine commands to issue once the lock is released.
    fn move_rows(
        &mut self,
        start: usize,
        count: usize,
        destination: usize,
    ) -> Result<(Vec<(TransferTag, MoveCommand)>, Vec<ModelEvent>), ModelError> {
        let row_count = self.order.len();
        let valid = count > 0
            && start
                .checked_add(count)
                .is_some_and(|end| end <= row_count);
        if !valid {
            return Err(ModelError::invalid_range(start, count));
        }
        let last = start + count - 1;
        if destination > row_count || (destination >= start && destination <= last) {
            return Err(ModelError::invalid_range(start, count));
        }

        // Geometric command selection against the engine's four reorder
        // primitives. Other destinations have no engine equivalent and stay
        // local-only, matching the engine command surface.
        let command = if destination == 0 {
            Some(MoveCommand::ToFirst)
        } else if destination == row_count {
            Some(MoveCommand::ToLast)
        } else if destination + 1 == start {
            Some(MoveCommand::Up)
        } else if destination == last + 2 {
            Some(MoveCommand::Down)
        } else {
            None
        };

        let tags: Vec<TransferTag> = (start..=last).filter_map(|r| self.order.tag_at(r)).collect();
        for &tag in &tags {
            if let Some(record) = self.store.get_mut(tag) {
                record.pending_move = true;
            }
        }

        self.order.move_block(start, count, destination);

        // Order of command issuance preserves relative sequence: front to
        // back when the block moves toward the back, back to front when it
        // moves toward the front.
        let ordered: Vec<TransferTag> = if destination > last {
            tags
        } else {
            tags.into_iter().rev().collect()
        };
        let commands = command.map_or_else(Vec::new, |c| {
            ordered.into_iter().map(|tag| (tag, c)).collect()
        });

        let events = vec![ModelEvent::rows_moved(start, destination)];
        Ok((commands, events))
    }
}

/// The queue model: engine events in, ordered rows and notifications out.
///
/// All mutation — engine-originated and consumer-originated alike — is
/// serialized behind one lock; neither source is prioritized beyond lock
/// acquisition order.
pub struct TransferModel {
    engine: Arc<dyn TransferEnginePort>,
    emitter: Arc<dyn ModelEventEmitterPort>,
    state: RwLock<ModelState>,
}

impl TransferModel {
    /// Create a model wired to an engine and a consumer emitter.
    pub fn new(
        engine: Arc<dyn TransferEnginePort>,
        emitter: Arc<dyn ModelEventEmitterPort>,
    ) -> Self {
        Self {
            engine,
            emitter,
            state: RwLock::new(ModelState::new()),
        }
    }

    /// Dispatch pending notifications. Always called with the lock released.
    fn dispatch(&self, events: Vec<ModelEvent>) {
        for event in events {
            self.emitter.emit(event);
        }
    }

    /// Feed one engine event through the gate and into the mutation path.
    ///
    /// Stale or duplicate events (sequence number at or below the
    /// watermark), streaming transfers, and folder aggregates are discarded
    /// silently. Events for unknown tags are logged and ignored.
    pub async fn handle_event(&self, event: EngineEvent) {
        let events = {
            let mut state = self.state.write().await;
            match &event {
                EngineEvent::Started { notice, seq } => state.on_started(notice, *seq),
                EngineEvent::Updated { notice, seq } => state.on_progress(notice, None, *seq),
                EngineEvent::TemporaryError { notice, error, seq } => {
                    // The engine reports temporary errors for transfers it
                    // has not queued yet; those never reach the model
                    if notice.priority == 0 {
                        Vec::new()
                    } else {
                        state.on_progress(notice, Some(*error), *seq)
                    }
                }
                EngineEvent::Finished { notice, error, seq } => {
                    state.on_finished(notice, *error, *seq)
                }
            }
        };
        self.dispatch(events);
    }

    /// Attach to the engine: emit the (empty) statistics baseline, fetch
    /// the engine's snapshot, and bulk-load it.
    ///
    /// Returns the number of rows loaded.
    pub async fn initialize(&self) -> Result<usize, ModelError> {
        self.emit_statistics().await;
        let snapshot = self.engine.snapshot().await?;
        Ok(self.load_initial(snapshot).await)
    }

    /// Perform the initial bulk load from an engine snapshot.
    ///
    /// Qualifying transfers are inserted in batches of [`LOAD_BATCH_SIZE`];
    /// the lock is reacquired per batch and the insertion rows are computed
    /// from the live state inside each batch, so events interleaved between
    /// batches are not corrupted. Statistics are re-emitted after every
    /// batch; the watermark is taken from the snapshot only once the load
    /// completes. Returns the number of rows loaded.
    pub async fn load_initial(&self, snapshot: EngineSnapshot) -> usize {
        let qualifying = loader::qualifying_transfers(snapshot.transfers);
        let total = qualifying.len();
        let mut loaded = 0usize;

        for batch in qualifying.chunks(LOAD_BATCH_SIZE) {
            let events = {
                let mut state = self.state.write().await;
                let mut range: Option<(usize, usize)> = None;

                for notice in batch {
                    // A start event may have slipped in between batches
                    if state.store.contains(notice.tag) {
                        continue;
                    }
                    let (row, _) = state.insert_notice(notice);
                    loaded += 1;
                    range = Some(match range {
                        None => (row, row),
                        Some((first, last)) => (first.min(row), last.max(row)),
                    });
                }

                let mut events = Vec::new();
                if let Some((first, last)) = range {
                    events.push(ModelEvent::rows_inserted(first, last));
                }
                events.extend(state.stats.emit_all());
                events
            };
            self.dispatch(events);
        }

        {
            let mut state = self.state.write().await;
            state.gate.advance(snapshot.watermark);
        }

        tracing::info!(loaded, total, watermark = snapshot.watermark, "Initial load complete");
        loaded
    }

    /// Remove a contiguous row range.
    ///
    /// Removes the records, their retained failed copies, and their
    /// estimators; statistics are decremented per record. Fails without
    /// mutating anything when the range is invalid.
    pub async fn remove_rows(&self, start: usize, count: usize) -> Result<(), ModelError> {
        let events = {
            let mut state = self.state.write().await;
            state.remove_rows(start, count)?
        };
        self.dispatch(events);
        Ok(())
    }

    /// Retry a failed transfer.
    ///
    /// Valid only for transfers that reached the failed terminal state; for
    /// any other tag this is a no-op. The retained engine copy is handed
    /// back to the engine and the row is removed. The row removal is not
    /// rolled back if the engine rejects the command.
    pub async fn retry_transfer(&self, tag: TransferTag) -> Result<(), ModelError> {
        let (copy, events) = {
            let mut state = self.state.write().await;
            let Some(copy) = state.store.take_failed(tag) else {
                return Ok(());
            };
            let events = match state.order.position_of(tag) {
                Some(row) => state.remove_rows(row, 1).unwrap_or_default(),
                None => Vec::new(),
            };
            (copy, events)
        };
        self.dispatch(events);

        tracing::info!(tag = %tag, "Retrying failed transfer");
        self.engine.retry_transfer(copy).await
    }

    /// Move a row block to a new destination, on the consumer's behalf.
    ///
    /// `destination` is the row before which the block is re-inserted, in
    /// pre-move coordinates; it must lie outside the source range. The local
    /// order is updated optimistically and each moved record is marked
    /// pending until the engine's follow-up events confirm the reorder; the
    /// matching engine commands are issued after the lock is released.
    pub async fn move_rows(
        &self,
        source_start: usize,
        count: usize,
        destination: usize,
    ) -> Result<(), ModelError> {
        let (commands, events) = {
            let mut state = self.state.write().await;
            state.move_rows(source_start, count, destination)?
        };
        self.dispatch(events);

        for (tag, command) in commands {
            match command {
                MoveCommand::ToFirst => self.engine.move_to_first(tag).await?,
                MoveCommand::ToLast => self.engine.move_to_last(tag).await?,
                MoveCommand::Up => self.engine.move_up(tag).await?,
                MoveCommand::Down => self.engine.move_down(tag).await?,
            }
        }
        Ok(())
    }

    /// Update the pause flags and refresh every visible row.
    pub async fn set_pause_state(&self, downloads_paused: bool, uploads_paused: bool) {
        let events = {
            let mut state = self.state.write().await;
            state.downloads_paused = downloads_paused;
            state.uploads_paused = uploads_paused;
            (0..state.order.len())
                .map(ModelEvent::row_changed)
                .collect::<Vec<_>>()
        };
        self.dispatch(events);
    }

    /// Re-emit the current count for every known statistics key.
    pub async fn emit_statistics(&self) {
        let events = {
            let state = self.state.read().await;
            state.stats.emit_all()
        };
        self.dispatch(events);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Consumer queries
    // ─────────────────────────────────────────────────────────────────────

    /// Number of visible rows.
    pub async fn row_count(&self) -> usize {
        self.state.read().await.order.len()
    }

    /// Snapshot of the record at a row.
    pub async fn record_at(&self, row: usize) -> Option<TransferRecord> {
        let state = self.state.read().await;
        let tag = state.order.tag_at(row)?;
        state.store.get(tag).cloned()
    }

    /// The row a tag currently occupies.
    pub async fn position_of(&self, tag: TransferTag) -> Option<usize> {
        self.state.read().await.order.position_of(tag)
    }

    /// True when a failed copy is retained for the tag (i.e. it can retry).
    pub async fn can_retry(&self, tag: TransferTag) -> bool {
        self.state.read().await.store.has_failed(tag)
    }

    /// Count of records in a state.
    pub async fn state_count(&self, state: TransferState) -> usize {
        self.state.read().await.stats.state_count(state)
    }

    /// Count of non-terminal records of a direction.
    pub async fn kind_count(&self, kind: TransferKind) -> usize {
        self.state.read().await.stats.kind_count(kind)
    }

    /// Count of live records of a file-type category.
    pub async fn file_type_count(&self, file_type: FileTypeCategory) -> usize {
        self.state.read().await.stats.file_type_count(file_type)
    }

    /// The highest notification sequence number processed so far.
    pub async fn watermark(&self) -> u64 {
        self.state.read().await.gate.watermark()
    }

    /// Whether downloads are currently paused.
    pub async fn downloads_paused(&self) -> bool {
        self.state.read().await.downloads_paused
    }

    /// Whether uploads are currently paused.
    pub async fn uploads_paused(&self) -> bool {
        self.state.read().await.uploads_paused
    }
}
