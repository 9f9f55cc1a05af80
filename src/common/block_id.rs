//! Block identifier type.

use std::fmt;

/// Identifies a block in the backing file.
///
/// Block ids are assigned by the caller and double as the record index:
/// block `n` lives in record `n` of the file. There is no allocation table,
/// so ids should be small and densely packed.
///
/// # Example
/// ```
/// use blockcache::BlockId;
///
/// let block_id = BlockId::new(42);
/// assert_eq!(block_id.0, 42);
/// assert_eq!(block_id.index(), 42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);

impl BlockId {
    /// Create a new BlockId.
    #[inline]
    pub fn new(id: u32) -> Self {
        BlockId(id)
    }

    /// Record index of this block within the backing file.
    #[inline]
    pub fn index(&self) -> u64 {
        self.0 as u64
    }
}

impl From<u32> for BlockId {
    fn from(id: u32) -> Self {
        BlockId(id)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Block({})", self.0)
    }
}
