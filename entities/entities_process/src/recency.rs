//! Dispatch Recency Table
//!
//! Records the simulated time each process was last dispatched. It is the only
//! input to LRU victim selection: the smallest time is the least recently used.
//! The table is updated once per dispatch and never by allocation attempts.

use crate::process::ProcessIndex;

/// Last-dispatch time per process index
#[derive(Debug, Clone, Default)]
pub struct RecencyTable {
    last_dispatch: Vec<Option<u32>>,
}

impl RecencyTable {
    /// Create a table for `count` processes, none dispatched yet
    pub fn new(count: usize) -> Self {
        Self {
            last_dispatch: vec![None; count],
        }
    }

    pub fn len(&self) -> usize {
        self.last_dispatch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_dispatch.is_empty()
    }

    /// Record that `process` was dispatched at `time`
    pub fn record_dispatch(&mut self, process: ProcessIndex, time: u32) {
        if let Some(slot) = self.last_dispatch.get_mut(process) {
            *slot = Some(time);
        }
    }

    pub fn last_dispatch(&self, process: ProcessIndex) -> Option<u32> {
        self.last_dispatch.get(process).copied().flatten()
    }

    /// Sort key for LRU order: earlier dispatch first, ties by lower index
    ///
    /// A process that was never dispatched ranks after every dispatched one.
    pub fn eviction_rank(&self, process: ProcessIndex) -> (u32, ProcessIndex) {
        (self.last_dispatch(process).unwrap_or(u32::MAX), process)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_read() {
        let mut table = RecencyTable::new(3);
        assert_eq!(table.last_dispatch(1), None);
        table.record_dispatch(1, 4);
        table.record_dispatch(1, 6);
        assert_eq!(table.last_dispatch(1), Some(6));
        // out of range is ignored
        table.record_dispatch(9, 1);
        assert_eq!(table.last_dispatch(9), None);
    }

    #[test]
    fn test_eviction_rank_order() {
        let mut table = RecencyTable::new(3);
        table.record_dispatch(0, 8);
        table.record_dispatch(2, 8);
        let mut order = vec![0, 1, 2];
        order.sort_by_key(|&p| table.eviction_rank(p));
        assert_eq!(order, vec![0, 2, 1]);
    }
}
