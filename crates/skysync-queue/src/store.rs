//! Canonical record storage.
//!
//! Owns the record for each live transfer tag, the per-tag remaining-time
//! estimators, and the side table of engine transfer copies retained for
//! failed transfers until they are removed or retried. Sync type with no
//! internal locking — the model mutates it under its own write lock.

use std::collections::HashMap;

use indexmap::IndexMap;
use skysync_core::{TransferNotice, TransferRecord, TransferTag};

use crate::estimator::RemainingTimeEstimator;

/// Keyed storage for transfer records and their per-tag resources.
#[derive(Debug, Default)]
pub struct TransferStore {
    records: HashMap<TransferTag, TransferRecord>,
    estimators: HashMap<TransferTag, RemainingTimeEstimator>,
    // Insertion-ordered so failed-transfer listings stay deterministic
    failed: IndexMap<TransferTag, TransferNotice>,
}

impl TransferStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no records are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when a record exists for the tag.
    #[must_use]
    pub fn contains(&self, tag: TransferTag) -> bool {
        self.records.contains_key(&tag)
    }

    /// Insert a record together with its remaining-time estimator.
    pub fn insert(&mut self, record: TransferRecord, estimator: RemainingTimeEstimator) {
        self.estimators.insert(record.tag, estimator);
        self.records.insert(record.tag, record);
    }

    /// Look up a record.
    #[must_use]
    pub fn get(&self, tag: TransferTag) -> Option<&TransferRecord> {
        self.records.get(&tag)
    }

    /// Look up a record for mutation.
    pub fn get_mut(&mut self, tag: TransferTag) -> Option<&mut TransferRecord> {
        self.records.get_mut(&tag)
    }

    /// The estimator for a tag, if it hasn't been released yet.
    pub fn estimator_mut(&mut self, tag: TransferTag) -> Option<&mut RemainingTimeEstimator> {
        self.estimators.get_mut(&tag)
    }

    /// Release the estimator for a tag.
    ///
    /// Called at the finish event; removal releases it implicitly. Dropping
    /// twice is harmless — the second call finds nothing.
    pub fn release_estimator(&mut self, tag: TransferTag) {
        self.estimators.remove(&tag);
    }

    /// Retain the engine-side copy of a failed transfer for later retry.
    pub fn retain_failed(&mut self, tag: TransferTag, notice: TransferNotice) {
        self.failed.insert(tag, notice);
    }

    /// Take the retained failed copy, if any.
    pub fn take_failed(&mut self, tag: TransferTag) -> Option<TransferNotice> {
        self.failed.shift_remove(&tag)
    }

    /// True when a failed copy is retained for the tag.
    #[must_use]
    pub fn has_failed(&self, tag: TransferTag) -> bool {
        self.failed.contains_key(&tag)
    }

    /// Remove a record and every per-tag resource attached to it.
    pub fn remove(&mut self, tag: TransferTag) -> Option<TransferRecord> {
        self.estimators.remove(&tag);
        self.failed.shift_remove(&tag);
        self.records.remove(&tag)
    }
}
