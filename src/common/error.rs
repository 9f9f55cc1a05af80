//! Error types for blockcache.

use thiserror::Error;

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors raised by the block store and buffer pool.
///
/// The buffer pool never adds error kinds of its own beyond
/// [`Error::SizeMismatch`]; store errors are propagated unchanged.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error from disk operations.
    ///
    /// Covers open/seek failures and short reads or writes, including a
    /// record whose header is present but whose payload is truncated.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No record for this block exists within the backing file.
    ///
    /// This is the "never written" sentinel and is expected on first-touch
    /// reads. Writes never produce it.
    #[error("Block {0} not found")]
    BlockNotFound(u32),

    /// Payload length does not equal the configured block size.
    #[error("Block size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// The record for this block does not fit inside the backing file.
    ///
    /// The file must be pre-sized (see `BlockStore::create`) before a block
    /// can be written.
    #[error("Block {block_id} is out of bounds: record at offset {offset} exceeds file size {file_size}")]
    OutOfBounds {
        block_id: u32,
        offset: u64,
        file_size: u64,
    },

    /// A written record carries a different block id than the one requested.
    #[error("Corrupt record: requested block {requested}, record holds block {stored}")]
    CorruptRecord { requested: u32, stored: u32 },

    /// Construction parameters were rejected.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Whether this is the [`Error::BlockNotFound`] sentinel.
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::BlockNotFound(_))
    }
}
