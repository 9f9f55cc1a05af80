//! Buffer Pool Manager - the LRU block caching layer.
//!
//! The [`BufferPoolManager`] provides:
//! - Block caching between the backing file and memory
//! - LRU eviction bounded by a fixed capacity
//! - Dirty tracking with write-back before a slot is reused
//! - Explicit and on-drop flushing of remaining dirty blocks

use std::collections::HashMap;
use std::path::Path;

use parking_lot::Mutex;
use tracing::{debug, error, info, trace};

use crate::buffer::replacer::LruReplacer;
use crate::buffer::{BufferPoolStats, CachedBlock};
use crate::common::{BlockId, BufferPoolConfig, Error, Result};
use crate::storage::BlockStore;

/// Cache contents and recency order, guarded together by one lock.
struct PoolState {
    cache: HashMap<BlockId, CachedBlock>,
    replacer: LruReplacer,
}

/// A bounded, LRU-ordered cache of blocks over a [`BlockStore`].
///
/// # Architecture
/// ```text
/// ┌───────────────────────────────────────────────────────────┐
/// │                    BufferPoolManager                      │
/// │  ┌─────────────────── Mutex<PoolState> ────────────────┐  │
/// │  │  cache: BlockId → CachedBlock { data, dirty }       │  │
/// │  │  replacer: LruReplacer (LRU first … MRU last)       │  │
/// │  └─────────────────────────────────────────────────────┘  │
/// │  ┌──────────────┐  ┌──────────────────────────────────┐   │
/// │  │    stats     │  │ store: BlockStore (per-call I/O) │   │
/// │  │   atomics    │  └──────────────────────────────────┘   │
/// │  └──────────────┘                                         │
/// └───────────────────────────────────────────────────────────┘
/// ```
///
/// # Thread Safety
/// - `state`: `Mutex`. Held for the whole operation, including any store
///   call, so there is exactly one writer to the backing file at a time.
/// - `stats`: no lock, atomic counters
///
/// # Durability
/// A dirty block is stored before its slot is reused. Dirty blocks that are
/// still resident are stored by [`flush_all`](Self::flush_all),
/// [`close`](Self::close), or, as a last resort, when the pool is dropped.
///
/// # Usage
/// ```no_run
/// use blockcache::{BlockId, BlockStore, BufferPoolManager};
///
/// BlockStore::create("blocks.bin", 12, 10)?;
/// let bpm = BufferPoolManager::new(3, 12, "blocks.bin")?;
///
/// bpm.write(BlockId::new(1), b"Block 1 data")?;
/// assert_eq!(bpm.read(BlockId::new(1))?, b"Block 1 data");
///
/// bpm.close()?;
/// # Ok::<(), blockcache::Error>(())
/// ```
pub struct BufferPoolManager {
    state: Mutex<PoolState>,

    /// Handles all disk I/O.
    store: BlockStore,

    stats: BufferPoolStats,

    /// Maximum number of resident blocks (immutable after construction).
    capacity: usize,

    /// Set by `close`; `Drop` then skips its own flush.
    closed: bool,
}

impl BufferPoolManager {
    /// Create a pool of `capacity` blocks over an existing backing file.
    ///
    /// Writes are synced to disk; use [`with_config`](Self::with_config) to
    /// change that.
    ///
    /// # Errors
    /// - `Error::InvalidConfig` if `capacity` or `block_size` is 0
    /// - `Error::Io` if the backing file doesn't exist
    pub fn new<P: AsRef<Path>>(capacity: usize, block_size: usize, path: P) -> Result<Self> {
        Self::with_config(BufferPoolConfig::new(capacity, block_size, path))
    }

    /// Create a pool from a full [`BufferPoolConfig`].
    pub fn with_config(config: BufferPoolConfig) -> Result<Self> {
        config.validate()?;
        let store = BlockStore::open(&config.path, config.block_size)?
            .with_sync_writes(config.sync_writes);
        Self::from_store(config.capacity, store)
    }

    /// Create a pool over an already-opened store.
    ///
    /// # Errors
    /// Returns `Error::InvalidConfig` if `capacity` is 0.
    pub fn from_store(capacity: usize, store: BlockStore) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidConfig("capacity must be > 0".to_string()));
        }

        debug!(
            capacity,
            block_size = store.block_size(),
            path = %store.path().display(),
            "buffer pool created"
        );

        Ok(Self {
            state: Mutex::new(PoolState {
                cache: HashMap::with_capacity(capacity),
                replacer: LruReplacer::new(),
            }),
            store,
            stats: BufferPoolStats::new(),
            capacity,
            closed: false,
        })
    }

    // ========================================================================
    // Public API: Read and write
    // ========================================================================

    /// Read a block, loading it from disk on a miss.
    ///
    /// A hit refreshes the block's recency and leaves its data and dirty flag
    /// alone. A miss loads the record, evicts the LRU entry if the pool is
    /// full, and caches the block as clean.
    ///
    /// # Errors
    /// - `Error::BlockNotFound` if the record doesn't exist; nothing is cached
    /// - Store errors from loading the block or storing a dirty victim
    pub fn read(&self, block_id: BlockId) -> Result<Vec<u8>> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        if let Some(block) = state.cache.get(&block_id) {
            let data = block.data().to_vec();
            state.replacer.record_access(block_id);
            self.stats.record_hit();
            trace!(%block_id, "read hit");
            return Ok(data);
        }

        self.stats.record_miss();
        let stored = self.store.load(block_id)?;
        self.stats.record_read();

        self.make_room(state)?;
        state
            .cache
            .insert(block_id, CachedBlock::clean(stored.data.clone()));
        state.replacer.record_access(block_id);

        Ok(stored.data)
    }

    /// Write a block into the pool, marking it dirty.
    ///
    /// No record is written unless a dirty victim has to make room. A new
    /// block is checked against the file size first, so an id the file was
    /// never sized for is rejected here rather than at eviction time.
    ///
    /// # Errors
    /// - `Error::SizeMismatch` if `data.len() != block_size`; the pool is
    ///   left unchanged
    /// - `Error::OutOfBounds` if `block_id` is not resident and its record
    ///   lies outside the backing file; the pool is left unchanged
    /// - Store errors from persisting a dirty victim; the victim stays
    ///   resident and dirty, and `block_id` is not inserted
    pub fn write(&self, block_id: BlockId, data: &[u8]) -> Result<()> {
        self.store.check_size(data)?;

        let mut guard = self.state.lock();
        let state = &mut *guard;

        if let Some(block) = state.cache.get_mut(&block_id) {
            block.overwrite(data);
            state.replacer.record_access(block_id);
            self.stats.record_hit();
            trace!(%block_id, "write hit");
            return Ok(());
        }

        self.stats.record_miss();
        // Resident entries always have a record, so only new ones are checked.
        self.store.check_bounds(block_id)?;
        self.make_room(state)?;
        state
            .cache
            .insert(block_id, CachedBlock::dirty(data.to_vec()));
        state.replacer.record_access(block_id);

        Ok(())
    }

    // ========================================================================
    // Public API: Flush and close
    // ========================================================================

    /// Store a resident block if it is dirty, then mark it clean.
    ///
    /// No-op if the block is absent or already clean. Recency is unchanged.
    pub fn flush_block(&self, block_id: BlockId) -> Result<()> {
        let mut state = self.state.lock();
        if let Some(block) = state.cache.get_mut(&block_id) {
            self.flush_cached(block_id, block)?;
        }
        Ok(())
    }

    /// Store every dirty resident block, least recently used first.
    ///
    /// Blocks stay resident and become clean. Stops at the first error;
    /// blocks already stored stay clean, the rest stay dirty.
    pub fn flush_all(&self) -> Result<()> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let mut flushed = 0usize;
        for block_id in state.replacer.order() {
            if let Some(block) = state.cache.get_mut(&block_id) {
                if block.is_dirty() {
                    self.flush_cached(block_id, block)?;
                    flushed += 1;
                }
            }
        }

        if flushed > 0 {
            info!(flushed, "flushed dirty blocks");
        }
        Ok(())
    }

    /// Flush every dirty block and release the pool.
    ///
    /// Prefer this over relying on `Drop`, which can only log a failure.
    /// Whatever the outcome, `Drop` does not flush again afterwards.
    pub fn close(mut self) -> Result<()> {
        self.closed = true;
        self.flush_all()
    }

    // ========================================================================
    // Public API: Stats and info
    // ========================================================================

    /// Get buffer pool statistics.
    pub fn stats(&self) -> &BufferPoolStats {
        &self.stats
    }

    /// The underlying block store.
    pub fn block_store(&self) -> &BlockStore {
        &self.store
    }

    /// Maximum number of resident blocks.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Payload size of every block.
    pub fn block_size(&self) -> usize {
        self.store.block_size()
    }

    /// Number of resident blocks.
    pub fn len(&self) -> usize {
        self.state.lock().cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `block_id` is resident. Does not affect recency.
    pub fn contains(&self, block_id: BlockId) -> bool {
        self.state.lock().cache.contains_key(&block_id)
    }

    /// Dirty flag of a resident block, or `None` if it is absent.
    pub fn is_dirty(&self, block_id: BlockId) -> Option<bool> {
        self.state
            .lock()
            .cache
            .get(&block_id)
            .map(CachedBlock::is_dirty)
    }

    /// Number of resident dirty blocks.
    pub fn dirty_count(&self) -> usize {
        self.state
            .lock()
            .cache
            .values()
            .filter(|block| block.is_dirty())
            .count()
    }

    /// Resident blocks, least recently used first.
    pub fn lru_order(&self) -> Vec<BlockId> {
        self.state.lock().replacer.order()
    }

    // ========================================================================
    // Internal: Eviction and write-back
    // ========================================================================

    /// Evict the LRU entry if the pool is full.
    ///
    /// A dirty victim is stored before it leaves the cache, so a failed
    /// store leaves the pool exactly as it was.
    fn make_room(&self, state: &mut PoolState) -> Result<()> {
        if state.cache.len() < self.capacity {
            return Ok(());
        }

        let Some(victim) = state.replacer.peek_victim() else {
            return Ok(());
        };

        if let Some(block) = state.cache.get_mut(&victim) {
            let was_dirty = block.is_dirty();
            self.flush_cached(victim, block)?;
            debug!(block_id = %victim, dirty = was_dirty, "evicting block");
        }

        state.replacer.remove(victim);
        state.cache.remove(&victim);
        self.stats.record_eviction();

        Ok(())
    }

    /// Store `block` if dirty and mark it clean.
    fn flush_cached(&self, block_id: BlockId, block: &mut CachedBlock) -> Result<()> {
        if block.is_dirty() {
            self.store.store(block_id, block.data())?;
            block.mark_clean();
            self.stats.record_write();
        }
        Ok(())
    }
}

impl Drop for BufferPoolManager {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.flush_all() {
            error!(error = %e, dirty = self.dirty_count(), "failed to flush buffer pool on drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const BLOCK_SIZE: usize = 12;

    /// Helper to create a BPM over a freshly formatted file.
    fn create_test_bpm(capacity: usize, records: u64) -> (BufferPoolManager, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blocks.bin");
        let store = BlockStore::create(&path, BLOCK_SIZE, records)
            .unwrap()
            .with_sync_writes(false);
        (BufferPoolManager::from_store(capacity, store).unwrap(), dir)
    }

    /// Twelve bytes, distinct per label.
    fn block(label: u8) -> Vec<u8> {
        format!("Blk {:03} data", label).into_bytes()
    }

    fn ids(raw: &[u32]) -> Vec<BlockId> {
        raw.iter().copied().map(BlockId::new).collect()
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blocks.bin");
        let store = BlockStore::create(&path, BLOCK_SIZE, 1).unwrap();

        assert!(matches!(
            BufferPoolManager::from_store(0, store),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_new_requires_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.bin");

        assert!(matches!(
            BufferPoolManager::new(3, BLOCK_SIZE, &path),
            Err(Error::Io(_))
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_read_your_writes() {
        let (bpm, _dir) = create_test_bpm(3, 10);

        bpm.write(BlockId::new(1), &block(1)).unwrap();
        assert_eq!(bpm.read(BlockId::new(1)).unwrap(), block(1));
        assert_eq!(bpm.is_dirty(BlockId::new(1)), Some(true));
    }

    #[test]
    fn test_write_defers_disk_io() {
        let (bpm, _dir) = create_test_bpm(3, 10);

        bpm.write(BlockId::new(1), &block(1)).unwrap();

        let on_disk = bpm.block_store().load(BlockId::new(1)).unwrap();
        assert_eq!(on_disk.dirty_flag, 0);
        assert_eq!(bpm.stats().snapshot().blocks_written, 0);
    }

    #[test]
    fn test_write_eviction_persists_dirty_victim() {
        let (bpm, _dir) = create_test_bpm(3, 10);

        for i in 1..=3 {
            bpm.write(BlockId::new(i), &block(i as u8)).unwrap();
        }
        assert_eq!(bpm.lru_order(), ids(&[1, 2, 3]));

        bpm.write(BlockId::new(4), &block(4)).unwrap();

        assert_eq!(bpm.lru_order(), ids(&[2, 3, 4]));
        assert!(!bpm.contains(BlockId::new(1)));

        let on_disk = bpm.block_store().load(BlockId::new(1)).unwrap();
        assert_eq!(on_disk.data, block(1));
        assert_eq!(on_disk.dirty_flag, 1);

        let snapshot = bpm.stats().snapshot();
        assert_eq!(snapshot.evictions, 1);
        assert_eq!(snapshot.blocks_written, 1);
    }

    #[test]
    fn test_read_hit_refreshes_recency() {
        let (bpm, _dir) = create_test_bpm(3, 10);

        for i in 1..=3 {
            bpm.write(BlockId::new(i), &block(i as u8)).unwrap();
        }

        // 1 becomes most recent, so 2 is the next victim.
        bpm.read(BlockId::new(1)).unwrap();
        assert_eq!(bpm.lru_order(), ids(&[2, 3, 1]));

        bpm.write(BlockId::new(4), &block(4)).unwrap();
        assert!(bpm.contains(BlockId::new(1)));
        assert!(!bpm.contains(BlockId::new(2)));
    }

    #[test]
    fn test_write_hit_refreshes_recency() {
        let (bpm, _dir) = create_test_bpm(2, 10);

        bpm.write(BlockId::new(1), &block(1)).unwrap();
        bpm.write(BlockId::new(2), &block(2)).unwrap();
        bpm.write(BlockId::new(1), &block(9)).unwrap();

        assert_eq!(bpm.lru_order(), ids(&[2, 1]));
        assert_eq!(bpm.len(), 2);
        assert_eq!(bpm.read(BlockId::new(1)).unwrap(), block(9));
    }

    #[test]
    fn test_read_miss_caches_clean() {
        let (bpm, _dir) = create_test_bpm(3, 10);
        bpm.block_store()
            .store(BlockId::new(5), &block(5))
            .unwrap();

        assert_eq!(bpm.read(BlockId::new(5)).unwrap(), block(5));
        assert_eq!(bpm.is_dirty(BlockId::new(5)), Some(false));

        let snapshot = bpm.stats().snapshot();
        assert_eq!(snapshot.cache_misses, 1);
        assert_eq!(snapshot.blocks_read, 1);
    }

    #[test]
    fn test_read_hit_keeps_dirty_flag() {
        let (bpm, _dir) = create_test_bpm(3, 10);

        bpm.write(BlockId::new(1), &block(1)).unwrap();
        bpm.read(BlockId::new(1)).unwrap();

        assert_eq!(bpm.is_dirty(BlockId::new(1)), Some(true));
        assert_eq!(bpm.stats().snapshot().cache_hits, 1);
    }

    #[test]
    fn test_read_miss_respects_capacity() {
        let (bpm, _dir) = create_test_bpm(2, 10);

        for i in 0..5 {
            bpm.read(BlockId::new(i)).unwrap();
            assert!(bpm.len() <= 2);
        }

        assert_eq!(bpm.lru_order(), ids(&[3, 4]));
        assert_eq!(bpm.stats().snapshot().evictions, 3);
    }

    #[test]
    fn test_clean_victim_is_not_stored() {
        let (bpm, _dir) = create_test_bpm(1, 10);

        bpm.read(BlockId::new(0)).unwrap();
        bpm.read(BlockId::new(1)).unwrap();

        let snapshot = bpm.stats().snapshot();
        assert_eq!(snapshot.evictions, 1);
        assert_eq!(snapshot.blocks_written, 0);
        assert_eq!(bpm.block_store().load(BlockId::new(0)).unwrap().dirty_flag, 0);
    }

    #[test]
    fn test_read_not_found_caches_nothing() {
        let (bpm, _dir) = create_test_bpm(2, 4);

        bpm.write(BlockId::new(1), &block(1)).unwrap();
        bpm.write(BlockId::new(2), &block(2)).unwrap();

        let result = bpm.read(BlockId::new(99));
        assert!(matches!(result, Err(Error::BlockNotFound(99))));

        // Pool full, but nothing was evicted for the missing block.
        assert_eq!(bpm.lru_order(), ids(&[1, 2]));
        assert_eq!(bpm.stats().snapshot().evictions, 0);
    }

    #[test]
    fn test_size_mismatch_leaves_pool_unchanged() {
        let (bpm, _dir) = create_test_bpm(2, 4);

        bpm.write(BlockId::new(1), &block(1)).unwrap();
        bpm.write(BlockId::new(2), &block(2)).unwrap();

        let result = bpm.write(BlockId::new(1), b"too short");
        assert!(matches!(
            result,
            Err(Error::SizeMismatch {
                expected: BLOCK_SIZE,
                actual: 9
            })
        ));

        let result = bpm.write(BlockId::new(3), &[0u8; BLOCK_SIZE + 1]);
        assert!(result.is_err());

        assert_eq!(bpm.lru_order(), ids(&[1, 2]));
        assert!(!bpm.contains(BlockId::new(3)));
        assert_eq!(bpm.read(BlockId::new(1)).unwrap(), block(1));
    }

    #[test]
    fn test_failed_victim_store_keeps_victim() {
        let (bpm, _dir) = create_test_bpm(1, 2);

        bpm.write(BlockId::new(1), &block(1)).unwrap();

        // Shrink the file to one record behind the pool's back.
        let file = std::fs::OpenOptions::new()
            .write(true)
            .open(bpm.block_store().path())
            .unwrap();
        file.set_len(crate::storage::record::record_size(BLOCK_SIZE))
            .unwrap();
        drop(file);

        let result = bpm.write(BlockId::new(0), &block(0));
        assert!(matches!(result, Err(Error::OutOfBounds { block_id: 1, .. })));

        assert_eq!(bpm.lru_order(), ids(&[1]));
        assert_eq!(bpm.is_dirty(BlockId::new(1)), Some(true));
        assert!(!bpm.contains(BlockId::new(0)));
        assert_eq!(bpm.stats().snapshot().evictions, 0);
    }

    #[test]
    fn test_write_beyond_file_rejected_immediately() {
        let (bpm, _dir) = create_test_bpm(1, 4);

        let result = bpm.write(BlockId::new(50), &block(50));
        assert!(matches!(
            result,
            Err(Error::OutOfBounds {
                block_id: 50,
                offset: 850,
                file_size: 68
            })
        ));
        assert!(bpm.is_empty());

        // The pool keeps working for every id the file was sized for.
        for i in 0..4 {
            bpm.write(BlockId::new(i), &block(i as u8)).unwrap();
            assert_eq!(bpm.read(BlockId::new(i)).unwrap(), block(i as u8));
        }
        for i in 0..4 {
            assert_eq!(bpm.read(BlockId::new(i)).unwrap(), block(i as u8));
        }
        assert!(!bpm.contains(BlockId::new(50)));
    }

    #[test]
    fn test_rejected_write_leaves_resident_blocks() {
        let (bpm, _dir) = create_test_bpm(2, 4);

        bpm.write(BlockId::new(3), &block(3)).unwrap();
        bpm.write(BlockId::new(4), &block(4)).unwrap_err();
        bpm.write(BlockId::new(3), &block(9)).unwrap();

        assert_eq!(bpm.lru_order(), ids(&[3]));
        assert_eq!(bpm.read(BlockId::new(3)).unwrap(), block(9));
    }

    #[test]
    fn test_flush_block() {
        let (bpm, _dir) = create_test_bpm(3, 10);

        bpm.write(BlockId::new(2), &block(2)).unwrap();
        bpm.flush_block(BlockId::new(2)).unwrap();
        bpm.flush_block(BlockId::new(7)).unwrap(); // absent: no-op

        assert_eq!(bpm.is_dirty(BlockId::new(2)), Some(false));
        assert_eq!(bpm.block_store().load(BlockId::new(2)).unwrap().data, block(2));

        // Clean now, so a second flush writes nothing.
        bpm.flush_block(BlockId::new(2)).unwrap();
        assert_eq!(bpm.stats().snapshot().blocks_written, 1);
    }

    #[test]
    fn test_flush_all() {
        let (bpm, _dir) = create_test_bpm(5, 10);

        for i in 0..4 {
            bpm.write(BlockId::new(i), &block(i as u8)).unwrap();
        }
        bpm.read(BlockId::new(8)).unwrap(); // clean, not written

        bpm.flush_all().unwrap();

        assert_eq!(bpm.dirty_count(), 0);
        assert_eq!(bpm.len(), 5);
        assert_eq!(bpm.stats().snapshot().blocks_written, 4);
        for i in 0..4 {
            let on_disk = bpm.block_store().load(BlockId::new(i)).unwrap();
            assert_eq!(on_disk.data, block(i as u8));
        }
    }

    #[test]
    fn test_flushed_block_evicts_without_store() {
        let (bpm, _dir) = create_test_bpm(1, 10);

        bpm.write(BlockId::new(0), &block(0)).unwrap();
        bpm.flush_all().unwrap();
        bpm.write(BlockId::new(1), &block(1)).unwrap();

        let snapshot = bpm.stats().snapshot();
        assert_eq!(snapshot.evictions, 1);
        assert_eq!(snapshot.blocks_written, 1);
    }

    #[test]
    fn test_drop_flushes_dirty_blocks() {
        let (bpm, dir) = create_test_bpm(3, 10);
        let path = dir.path().join("blocks.bin");

        bpm.write(BlockId::new(6), &block(6)).unwrap();
        drop(bpm);

        let store = BlockStore::open(&path, BLOCK_SIZE).unwrap();
        assert_eq!(store.load(BlockId::new(6)).unwrap().data, block(6));
    }

    #[test]
    fn test_drop_after_close_does_not_flush_again() {
        let (mut bpm, dir) = create_test_bpm(3, 10);
        let path = dir.path().join("blocks.bin");

        bpm.write(BlockId::new(6), &block(6)).unwrap();
        // What `close` sets before its own flush attempt.
        bpm.closed = true;
        drop(bpm);

        let store = BlockStore::open(&path, BLOCK_SIZE).unwrap();
        assert_eq!(store.load(BlockId::new(6)).unwrap().dirty_flag, 0);
    }

    #[test]
    fn test_close_flushes_dirty_blocks() {
        let (bpm, dir) = create_test_bpm(3, 10);
        let path = dir.path().join("blocks.bin");

        bpm.write(BlockId::new(3), &block(3)).unwrap();
        bpm.close().unwrap();

        let store = BlockStore::open(&path, BLOCK_SIZE).unwrap();
        let on_disk = store.load(BlockId::new(3)).unwrap();
        assert_eq!(on_disk.data, block(3));
        assert_eq!(on_disk.dirty_flag, 1);
    }

    #[test]
    fn test_concurrent_writers() {
        use std::sync::Arc;
        use std::thread;

        let (bpm, _dir) = create_test_bpm(4, 16);
        let bpm = Arc::new(bpm);

        let mut handles = vec![];
        for t in 0..4u32 {
            let bpm_clone = Arc::clone(&bpm);
            handles.push(thread::spawn(move || {
                for i in 0..4u32 {
                    let id = t * 4 + i;
                    bpm_clone.write(BlockId::new(id), &block(id as u8)).unwrap();
                    assert!(bpm_clone.len() <= 4);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(bpm.len(), 4);
        for id in 0..16u32 {
            assert_eq!(bpm.read(BlockId::new(id)).unwrap(), block(id as u8));
        }
    }
}
