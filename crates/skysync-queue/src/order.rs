//! Priority-ordered row index.
//!
//! This module provides a pure state machine for the ordered sequence of
//! transfer tags that defines row positions. No locking is performed here;
//! the caller (`TransferModel`) is responsible for synchronization.
//!
//! # Ordering
//!
//! Entries are sorted by ascending priority. Equal priorities preserve
//! insertion order. A repositioned entry scans outward from its current
//! position, so the cost is proportional to the distance actually moved —
//! the expected case, since the engine shifts priorities one rank at a time.

use skysync_core::TransferTag;

/// One slot of the ordered sequence.
#[derive(Clone, Copy, Debug)]
struct OrderEntry {
    tag: TransferTag,
    priority: u64,
}

/// The ordered sequence of transfer tags.
///
/// Every live tag appears exactly once; the store and the index are kept in
/// lockstep by the model.
#[derive(Debug, Default)]
pub struct OrderIndex {
    entries: Vec<OrderEntry>,
}

impl OrderIndex {
    /// Create an empty index.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The tag at a row, if the row exists.
    #[must_use]
    pub fn tag_at(&self, row: usize) -> Option<TransferTag> {
        self.entries.get(row).map(|e| e.tag)
    }

    /// The priority recorded for a row, if the row exists.
    #[must_use]
    pub fn priority_at(&self, row: usize) -> Option<u64> {
        self.entries.get(row).map(|e| e.priority)
    }

    /// Iterate over tags in row order.
    pub fn tags(&self) -> impl Iterator<Item = TransferTag> + '_ {
        self.entries.iter().map(|e| e.tag)
    }

    /// The row a tag currently occupies.
    #[must_use]
    pub fn position_of(&self, tag: TransferTag) -> Option<usize> {
        self.entries.iter().position(|e| e.tag == tag)
    }

    /// Insert a tag at its priority-correct row and return that row.
    ///
    /// The new entry lands after any existing entries of equal priority,
    /// preserving arrival order for ties.
    pub fn insert(&mut self, tag: TransferTag, priority: u64) -> usize {
        let row = self.entries.partition_point(|e| e.priority <= priority);
        self.entries.insert(row, OrderEntry { tag, priority });
        row
    }

    /// Remove a contiguous row range, returning the removed tags in order.
    ///
    /// Returns `None` without mutating when the range is empty or out of
    /// bounds.
    pub fn remove_range(&mut self, start: usize, count: usize) -> Option<Vec<TransferTag>> {
        let end = start.checked_add(count)?;
        if count == 0 || end > self.entries.len() {
            return None;
        }
        Some(self.entries.drain(start..end).map(|e| e.tag).collect())
    }

    /// Record a priority change and move the entry to its new row.
    ///
    /// Scans outward from the current row in the direction of the change
    /// until the first neighbor that is not surpassed, so the number of
    /// comparisons is bounded by the distance moved. Returns the old and new
    /// rows; equal values mean no movement was required. Returns `None` for
    /// an unknown tag.
    pub fn reposition(&mut self, tag: TransferTag, new_priority: u64) -> Option<(usize, usize)> {
        let old_row = self.position_of(tag)?;
        let old_priority = self.entries[old_row].priority;
        self.entries[old_row].priority = new_priority;

        let last = self.entries.len() - 1;
        let mut new_row = old_row;

        if new_priority > old_priority {
            // Pass neighbors with strictly smaller priority; stopping at an
            // equal one keeps the moved entry ahead of its peers.
            while new_row < last && self.entries[new_row + 1].priority < new_priority {
                new_row += 1;
            }
            self.entries[old_row..=new_row].rotate_left(1);
        } else if new_priority < old_priority {
            while new_row > 0 && self.entries[new_row - 1].priority > new_priority {
                new_row -= 1;
            }
            self.entries[new_row..=old_row].rotate_right(1);
        }

        Some((old_row, new_row))
    }

    /// Move a row block to a destination, ignoring priorities.
    ///
    /// `destination` is the row before which the block is re-inserted,
    /// expressed in pre-move coordinates. Used for optimistic consumer
    /// reorders; the engine's follow-up priority updates restore the sorted
    /// invariant. Returns false without mutating when the range is invalid
    /// or the destination falls inside it.
    pub fn move_block(&mut self, start: usize, count: usize, destination: usize) -> bool {
        let Some(end) = start.checked_add(count) else {
            return false;
        };
        if count == 0
            || end > self.entries.len()
            || destination > self.entries.len()
            || (destination >= start && destination < end)
        {
            return false;
        }

        let block: Vec<OrderEntry> = self.entries.drain(start..end).collect();
        let insert_at = if destination > start {
            destination - count
        } else {
            destination
        };
        self.entries.splice(insert_at..insert_at, block);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(raw: u64) -> TransferTag {
        TransferTag(raw)
    }

    fn rows(index: &OrderIndex) -> Vec<u64> {
        index.tags().map(|t| t.0).collect()
    }

    #[test]
    fn test_insert_keeps_ascending_priority() {
        let mut index = OrderIndex::new();
        // Arrival order 5, 3, 8 — rows must come out 3, 5, 8
        index.insert(tag(1), 5);
        index.insert(tag(2), 3);
        index.insert(tag(3), 8);

        assert_eq!(rows(&index), vec![2, 1, 3]);
        assert_eq!(index.priority_at(0), Some(3));
        assert_eq!(index.priority_at(2), Some(8));
    }

    #[test]
    fn test_insert_ties_preserve_arrival_order() {
        let mut index = OrderIndex::new();
        index.insert(tag(1), 4);
        index.insert(tag(2), 4);
        index.insert(tag(3), 4);

        assert_eq!(rows(&index), vec![1, 2, 3]);
    }

    #[test]
    fn test_insert_positions() {
        let mut index = OrderIndex::new();
        assert_eq!(index.insert(tag(1), 10), 0);
        assert_eq!(index.insert(tag(2), 5), 0);
        assert_eq!(index.insert(tag(3), 20), 2);
        assert_eq!(index.insert(tag(4), 10), 2); // after the existing 10
    }

    #[test]
    fn test_position_of() {
        let mut index = OrderIndex::new();
        index.insert(tag(1), 1);
        index.insert(tag(2), 2);

        assert_eq!(index.position_of(tag(2)), Some(1));
        assert_eq!(index.position_of(tag(9)), None);
    }

    #[test]
    fn test_reposition_forward() {
        let mut index = OrderIndex::new();
        index.insert(tag(1), 3);
        index.insert(tag(2), 5);
        index.insert(tag(3), 8);
        index.insert(tag(4), 12);

        // 5 -> 9: passes 8, stops before 12
        let moved = index.reposition(tag(2), 9).unwrap();
        assert_eq!(moved, (1, 2));
        assert_eq!(rows(&index), vec![1, 3, 2, 4]);
    }

    #[test]
    fn test_reposition_backward_to_front() {
        let mut index = OrderIndex::new();
        index.insert(tag(1), 3);
        index.insert(tag(2), 5);
        index.insert(tag(3), 8);

        let moved = index.reposition(tag(3), 1).unwrap();
        assert_eq!(moved, (2, 0));
        assert_eq!(rows(&index), vec![3, 1, 2]);
    }

    #[test]
    fn test_reposition_to_end() {
        let mut index = OrderIndex::new();
        index.insert(tag(1), 3);
        index.insert(tag(2), 5);

        let moved = index.reposition(tag(1), 99).unwrap();
        assert_eq!(moved, (0, 1));
        assert_eq!(rows(&index), vec![2, 1]);
    }

    #[test]
    fn test_reposition_no_move_needed() {
        let mut index = OrderIndex::new();
        index.insert(tag(1), 3);
        index.insert(tag(2), 5);

        // Still between neighbors: stays put
        let moved = index.reposition(tag(2), 4).unwrap();
        assert_eq!(moved, (1, 1));
        assert_eq!(rows(&index), vec![1, 2]);
    }

    #[test]
    fn test_reposition_single_element_is_noop() {
        let mut index = OrderIndex::new();
        index.insert(tag(1), 3);

        assert_eq!(index.reposition(tag(1), 50), Some((0, 0)));
        assert_eq!(rows(&index), vec![1]);
    }

    #[test]
    fn test_reposition_adjacent_swap_scans_one_neighbor() {
        let mut index = OrderIndex::new();
        for i in 0..100 {
            index.insert(tag(i), i * 10);
        }

        // One-rank shift reports a distance-1 move, not a full reorder
        let moved = index.reposition(tag(50), 515).unwrap();
        assert_eq!(moved, (50, 51));
    }

    #[test]
    fn test_reposition_unknown_tag() {
        let mut index = OrderIndex::new();
        index.insert(tag(1), 3);
        assert_eq!(index.reposition(tag(9), 1), None);
    }

    #[test]
    fn test_remove_range() {
        let mut index = OrderIndex::new();
        index.insert(tag(1), 1);
        index.insert(tag(2), 2);
        index.insert(tag(3), 3);

        let removed = index.remove_range(1, 2).unwrap();
        assert_eq!(removed, vec![tag(2), tag(3)]);
        assert_eq!(rows(&index), vec![1]);
    }

    #[test]
    fn test_remove_range_rejects_invalid() {
        let mut index = OrderIndex::new();
        index.insert(tag(1), 1);

        assert!(index.remove_range(0, 0).is_none());
        assert!(index.remove_range(1, 1).is_none());
        assert!(index.remove_range(0, 2).is_none());
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_move_block_toward_back() {
        let mut index = OrderIndex::new();
        for i in 1..=5 {
            index.insert(tag(i), i);
        }

        // Move rows 0..=1 before row 4
        assert!(index.move_block(0, 2, 4));
        assert_eq!(rows(&index), vec![3, 4, 1, 2, 5]);
    }

    #[test]
    fn test_move_block_toward_front() {
        let mut index = OrderIndex::new();
        for i in 1..=5 {
            index.insert(tag(i), i);
        }

        assert!(index.move_block(3, 2, 0));
        assert_eq!(rows(&index), vec![4, 5, 1, 2, 3]);
    }

    #[test]
    fn test_move_block_to_end() {
        let mut index = OrderIndex::new();
        for i in 1..=4 {
            index.insert(tag(i), i);
        }

        assert!(index.move_block(0, 1, 4));
        assert_eq!(rows(&index), vec![2, 3, 4, 1]);
    }

    #[test]
    fn test_move_block_rejects_destination_inside_range() {
        let mut index = OrderIndex::new();
        for i in 1..=4 {
            index.insert(tag(i), i);
        }

        assert!(!index.move_block(1, 2, 2));
        assert_eq!(rows(&index), vec![1, 2, 3, 4]);
    }
}
