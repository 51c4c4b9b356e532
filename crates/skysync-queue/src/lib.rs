//! Transfer queue model for skysync.
//!
//! Keeps an authoritative, priority-ordered view of all active and
//! recently-finished transfers reported by the transfer engine, and exposes
//! it to the presentation layer as a stable, randomly-indexable row
//! sequence.
//!
//! # Modules
//!
//! - `model` - the orchestrating [`TransferModel`] and bulk loader
//! - `order` - the priority-ordered row index
//! - `store` - canonical record storage and per-tag resources
//! - `stats` - per-state / per-kind / per-file-type counters
//! - `estimator` - remaining-time estimation
//! - `gate` - staleness filtering via the notification watermark

// Re-export core types for convenience
pub use skysync_core::{
    EngineEvent, EngineSnapshot, FileTypeCategory, ModelError, ModelEvent, ModelEventEmitterPort,
    ModelResult, NoopModelEmitter, StatDimension, TransferEnginePort, TransferError, TransferKind,
    TransferNotice, TransferRecord, TransferState, TransferTag,
};

pub mod estimator;
pub mod gate;
pub mod order;
pub mod stats;
pub mod store;

mod model;

pub use estimator::RemainingTimeEstimator;
pub use gate::NotificationGate;
pub use model::{LOAD_BATCH_SIZE, TransferModel};
pub use order::OrderIndex;
pub use stats::TransferStatistics;
pub use store::TransferStore;
