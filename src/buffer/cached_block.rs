//! Cached block - one resident entry of the buffer pool.

/// A block held in memory by the buffer pool.
///
/// `dirty` means the in-memory data may differ from the on-disk record and
/// must be stored before the entry is discarded.
///
/// # State Machine
/// ```text
/// Absent ──read miss──▶ Clean ──write──▶ Dirty ──evict (store)──▶ Absent
///                         ▲                 │
///                         └──── flush ──────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedBlock {
    data: Vec<u8>,
    dirty: bool,
}

impl CachedBlock {
    /// A block just loaded from disk.
    pub fn clean(data: Vec<u8>) -> Self {
        Self { data, dirty: false }
    }

    /// A block just written by a caller.
    pub fn dirty(data: Vec<u8>) -> Self {
        Self { data, dirty: true }
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Replace the contents with `data` and mark the block dirty.
    ///
    /// The caller has already checked the length.
    pub fn overwrite(&mut self, data: &[u8]) {
        self.data.clear();
        self.data.extend_from_slice(data);
        self.dirty = true;
    }

    /// Record that the current contents have been stored.
    #[inline]
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }
}
