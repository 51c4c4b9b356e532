//! Core domain types and port definitions for skysync.
//!
//! Pure data layer for the transfer subsystem: transfer records, engine
//! events, consumer notifications, errors, and the trait seams to the
//! transfer engine and the presentation layer. No I/O and no locking.

pub mod ports;
pub mod transfer;

// Re-export commonly used types for convenience
pub use ports::{ModelEventEmitterPort, NoopModelEmitter, TransferEnginePort};
pub use transfer::{
    EngineEvent, EngineSnapshot, FileTypeCategory, ModelError, ModelEvent, ModelResult,
    StatDimension, TransferError, TransferKind, TransferNotice, TransferRecord, TransferState,
    TransferTag,
};
