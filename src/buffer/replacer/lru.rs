//! LRU (Least-Recently-Used) replacement policy.

use std::collections::{BTreeMap, HashMap};

use crate::common::BlockId;

/// Least-recently-used eviction order over resident blocks.
///
/// Every access stamps the block with the next tick of a logical clock.
/// `by_tick` is ordered by that stamp, so its first entry is always the
/// least recently used block. Ticks are unique, which makes the order total:
/// two blocks can never tie for eviction.
pub struct LruReplacer {
    /// Tick → block, oldest first.
    by_tick: BTreeMap<u64, BlockId>,

    /// Block → its current tick, for O(1) membership and refresh.
    ticks: HashMap<BlockId, u64>,

    /// Logical clock, incremented on every access.
    clock: u64,
}

impl LruReplacer {
    /// Create an empty replacer.
    pub fn new() -> Self {
        Self {
            by_tick: BTreeMap::new(),
            ticks: HashMap::new(),
            clock: 0,
        }
    }

    /// Record an access, making `block_id` the most recently used.
    ///
    /// Unknown blocks are added; known blocks are moved to the back.
    pub fn record_access(&mut self, block_id: BlockId) {
        self.clock += 1;
        if let Some(old) = self.ticks.insert(block_id, self.clock) {
            self.by_tick.remove(&old);
        }
        self.by_tick.insert(self.clock, block_id);
    }

    /// The least recently used block, without removing it.
    ///
    /// The pool removes the victim only after it has been written back.
    pub fn peek_victim(&self) -> Option<BlockId> {
        self.by_tick.values().next().copied()
    }

    /// Stop tracking `block_id`. No-op if it is unknown.
    pub fn remove(&mut self, block_id: BlockId) {
        if let Some(tick) = self.ticks.remove(&block_id) {
            self.by_tick.remove(&tick);
        }
    }

    /// Tracked blocks, least recently used first.
    pub fn order(&self) -> Vec<BlockId> {
        self.by_tick.values().copied().collect()
    }
}

impl Default for LruReplacer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u32]) -> Vec<BlockId> {
        raw.iter().copied().map(BlockId::new).collect()
    }

    /// Drain the replacer the way the pool does: peek, then remove.
    fn drain(replacer: &mut LruReplacer) -> Vec<BlockId> {
        let mut victims = vec![];
        while let Some(victim) = replacer.peek_victim() {
            replacer.remove(victim);
            victims.push(victim);
        }
        victims
    }

    #[test]
    fn test_lru_basic() {
        let mut replacer = LruReplacer::new();

        replacer.record_access(BlockId::new(1));
        replacer.record_access(BlockId::new(2));
        replacer.record_access(BlockId::new(3));

        assert_eq!(replacer.order(), ids(&[1, 2, 3]));
        assert_eq!(drain(&mut replacer), ids(&[1, 2, 3]));
        assert_eq!(replacer.peek_victim(), None);
    }

    #[test]
    fn test_lru_reaccess_reorders() {
        let mut replacer = LruReplacer::new();

        replacer.record_access(BlockId::new(1));
        replacer.record_access(BlockId::new(2));
        replacer.record_access(BlockId::new(1)); // 1 becomes most recent

        assert_eq!(replacer.order(), ids(&[2, 1]));
        assert_eq!(replacer.peek_victim(), Some(BlockId::new(2)));
    }

    #[test]
    fn test_lru_peek_does_not_remove() {
        let mut replacer = LruReplacer::new();
        assert_eq!(replacer.peek_victim(), None);

        replacer.record_access(BlockId::new(4));
        replacer.record_access(BlockId::new(5));

        assert_eq!(replacer.peek_victim(), Some(BlockId::new(4)));
        assert_eq!(replacer.order(), ids(&[4, 5]));
    }

    #[test]
    fn test_lru_remove() {
        let mut replacer = LruReplacer::new();

        replacer.record_access(BlockId::new(0));
        replacer.record_access(BlockId::new(1));
        replacer.remove(BlockId::new(0));
        replacer.remove(BlockId::new(42)); // unknown, ignored

        assert_eq!(replacer.order(), ids(&[1]));
        assert_eq!(drain(&mut replacer), ids(&[1]));
    }
}
