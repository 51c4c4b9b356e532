//! Initial bulk load helpers.
//!
//! The engine may already be tracking thousands of transfers when the model
//! attaches. The loader filters and orders that snapshot; the model inserts
//! it in fixed-size batches, releasing the mutation lock between batches so
//! concurrently arriving single-transfer events interleave instead of
//! starving.

use skysync_core::TransferNotice;

/// Number of rows inserted per batch during the initial load.
pub const LOAD_BATCH_SIZE: usize = 50;

/// Filter and order a snapshot for loading.
///
/// Streaming transfers, folder aggregates, and entries the engine has not
/// prioritized yet (priority 0) are dropped. The rest is sorted ascending by
/// priority; the sort is stable, so equal priorities keep snapshot order.
pub(crate) fn qualifying_transfers(transfers: Vec<TransferNotice>) -> Vec<TransferNotice> {
    let mut qualifying: Vec<TransferNotice> = transfers
        .into_iter()
        .filter(|t| t.is_queueable() && t.priority != 0)
        .collect();
    qualifying.sort_by_key(|t| t.priority);
    qualifying
}

#[cfg(test)]
mod tests {
    use super::*;
    use skysync_core::{TransferKind, TransferState, TransferTag};

    fn notice(tag: u64, priority: u64) -> TransferNotice {
        TransferNotice {
            tag: TransferTag(tag),
            kind: TransferKind::Download,
            state: TransferState::Queued,
            priority,
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
    fn test_filters_and_sorts() {
        let mut streaming = notice(10, 5);
        streaming.is_streaming = true;
        let mut folder = notice(11, 6);
        folder.is_folder = true;

        let input = vec![notice(1, 30), streaming, notice(2, 10), folder, notice(3, 0)];
        let qualifying = qualifying_transfers(input);

        let tags: Vec<u64> = qualifying.iter().map(|t| t.tag.0).collect();
        assert_eq!(tags, vec![2, 1]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_priorities() {
        let input = vec![notice(1, 5), notice(2, 5), notice(3, 5)];
        let qualifying = qualifying_transfers(input);

        let tags: Vec<u64> = qualifying.iter().map(|t| t.tag.0).collect();
        assert_eq!(tags, vec![1, 2, 3]);
    }
}
