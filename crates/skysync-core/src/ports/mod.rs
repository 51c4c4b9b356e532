//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the queue model expects from infrastructure:
//! the transfer engine it issues commands to, and the consumer it notifies.
//! They contain no implementation details and use only domain types.

pub mod engine;
pub mod model_event_emitter;

pub use engine::TransferEnginePort;
pub use model_event_emitter::{ModelEventEmitterPort, NoopModelEmitter};
