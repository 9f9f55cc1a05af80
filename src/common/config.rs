//! Configuration for blockcache.

use std::path::{Path, PathBuf};

use crate::common::{Error, Result};

/// Size of the on-disk record header in bytes.
///
/// `block_id` (u32, little-endian) followed by `dirty_flag` (u8).
pub const RECORD_HEADER_SIZE: usize = 5;

/// Default payload size of a block in bytes.
pub const DEFAULT_BLOCK_SIZE: usize = 512;

/// Default number of blocks held in memory.
pub const DEFAULT_CAPACITY: usize = 3;

/// Construction parameters for a [`BufferPoolManager`].
///
/// All state the pool needs is passed in here; nothing is global and the
/// backing file is never created implicitly.
///
/// # Example
/// ```
/// use blockcache::BufferPoolConfig;
///
/// let config = BufferPoolConfig::new(3, 12, "blocks.bin").with_sync_writes(false);
/// assert!(config.validate().is_ok());
/// ```
///
/// [`BufferPoolManager`]: crate::buffer::BufferPoolManager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferPoolConfig {
    /// Maximum number of resident blocks.
    pub capacity: usize,
    /// Payload size of every block; must match the backing file's format.
    pub block_size: usize,
    /// Path of the pre-formatted backing file.
    pub path: PathBuf,
    /// Whether each record write is followed by `fsync`.
    pub sync_writes: bool,
}

impl BufferPoolConfig {
    /// Create a config with `sync_writes` enabled.
    pub fn new<P: AsRef<Path>>(capacity: usize, block_size: usize, path: P) -> Self {
        Self {
            capacity,
            block_size,
            path: path.as_ref().to_path_buf(),
            sync_writes: true,
        }
    }

    /// Enable or disable `fsync` after every record write.
    pub fn with_sync_writes(mut self, sync_writes: bool) -> Self {
        self.sync_writes = sync_writes;
        self
    }

    /// Check that capacity and block size are positive.
    ///
    /// # Errors
    /// Returns `Error::InvalidConfig` describing the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::InvalidConfig("capacity must be > 0".to_string()));
        }
        if self.block_size == 0 {
            return Err(Error::InvalidConfig("block_size must be > 0".to_string()));
        }
        Ok(())
    }
}
