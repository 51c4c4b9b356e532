//! Transfer domain types, events, and errors.
//!
//! This module contains pure data types for the transfer queue model.
//! No I/O, locking, or runtime dependencies allowed.
//!
//! # Structure
//!
//! - `types` - Core identifiers and data structures (`TransferTag`, `TransferRecord`, `TransferNotice`)
//! - `events` - Engine events and consumer notifications (`EngineEvent`, `ModelEvent`)
//! - `errors` - Error types for queue model operations

pub mod errors;
pub mod events;
pub mod types;

// Re-export commonly used types
pub use errors::{ModelError, ModelResult};
pub use events::{EngineEvent, EngineSnapshot, ModelEvent, StatDimension};
pub use types::{
    FileTypeCategory, TransferError, TransferKind, TransferNotice, TransferRecord, TransferState,
    TransferTag,
};
