//! Queue of index entries that may have gone stale
//!
//! Every field overwrite enqueues the key it replaced, much like a weak
//! reference being enqueued once its referent is no longer strongly held. The
//! cache drains the queue automatically; callers never evict anything.

use std::collections::VecDeque;

use crate::models::{ImageHandle, Locator, RecordId};

#[derive(Debug, Clone)]
pub(crate) enum StaleKey {
    Name(String),
    Locator(Locator),
    Image(ImageHandle),
}

#[derive(Debug, Clone)]
pub(crate) struct StaleEntry {
    pub(crate) key: StaleKey,
    /// Record the key belonged to when it was replaced
    pub(crate) record: RecordId,
}

#[derive(Debug)]
pub(crate) struct ReclaimQueue {
    pending: VecDeque<StaleEntry>,
    threshold: usize,
}

impl ReclaimQueue {
    pub(crate) fn new(threshold: usize) -> Self {
        Self {
            pending: VecDeque::new(),
            threshold: threshold.max(1),
        }
    }

    pub(crate) fn push(&mut self, key: StaleKey, record: RecordId) {
        self.pending.push_back(StaleEntry { key, record });
    }

    pub(crate) fn pop(&mut self) -> Option<StaleEntry> {
        self.pending.pop_front()
    }

    pub(crate) fn should_drain(&self) -> bool {
        self.pending.len() >= self.threshold
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }

    pub(crate) fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(slot: usize) -> RecordId {
        RecordId {
            slot,
            generation: 0,
        }
    }

    #[test]
    fn test_threshold_controls_drain() {
        let mut queue = ReclaimQueue::new(2);
        queue.push(StaleKey::Name("a".to_string()), id(0));
        assert!(!queue.should_drain());
        queue.push(StaleKey::Name("b".to_string()), id(0));
        assert!(queue.should_drain());
    }

    #[test]
    fn test_zero_threshold_means_eager() {
        let mut queue = ReclaimQueue::new(0);
        assert!(!queue.should_drain());
        queue.push(StaleKey::Name("a".to_string()), id(1));
        assert!(queue.should_drain());
    }

    #[test]
    fn test_pop_is_fifo() {
        let mut queue = ReclaimQueue::new(1);
        queue.push(StaleKey::Name("first".to_string()), id(0));
        queue.push(StaleKey::Name("second".to_string()), id(1));

        let first = queue.pop().unwrap();
        assert!(matches!(first.key, StaleKey::Name(ref n) if n == "first"));
        assert_eq!(first.record, id(0));
        assert_eq!(queue.len(), 1);
        queue.clear();
        assert!(queue.pop().is_none());
    }
}
