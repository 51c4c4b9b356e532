//! Transfer engine command port.
//!
//! The queue model never mutates engine state directly; consumer-initiated
//! reorder, retry, and removal requests are translated into these commands.
//! The model only changes its own order once the engine confirms via the
//! event feed — or optimistically, in which case the affected rows carry a
//! pending-confirmation marker until the feed catches up.

use async_trait::async_trait;

use crate::transfer::{EngineSnapshot, ModelError, TransferNotice, TransferTag};

/// Port for issuing commands to the transfer engine.
///
/// Implementations wrap the engine SDK. All methods are called outside the
/// queue model's mutation lock, so they may block on I/O.
#[async_trait]
pub trait TransferEnginePort: Send + Sync {
    /// Ask the engine to retry a previously failed transfer.
    ///
    /// The notice is the copy retained when the transfer failed; the engine
    /// creates a brand-new transfer (new tag) from it.
    async fn retry_transfer(&self, notice: TransferNotice) -> Result<(), ModelError>;

    /// Move a transfer to the front of the engine's queue.
    async fn move_to_first(&self, tag: TransferTag) -> Result<(), ModelError>;

    /// Move a transfer to the back of the engine's queue.
    async fn move_to_last(&self, tag: TransferTag) -> Result<(), ModelError>;

    /// Move a transfer one rank toward the front.
    async fn move_up(&self, tag: TransferTag) -> Result<(), ModelError>;

    /// Move a transfer one rank toward the back.
    async fn move_down(&self, tag: TransferTag) -> Result<(), ModelError>;

    /// Fetch the engine's full transfer set and current notification
    /// watermark, for the initial bulk load.
    async fn snapshot(&self) -> Result<EngineSnapshot, ModelError>;
}
