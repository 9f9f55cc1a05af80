//! Buffer pool management.
//!
//! The buffer pool is the in-memory cache between callers and the backing
//! file. It holds at most `capacity` blocks and writes dirty ones back
//! before their slot is reused.
//!
//! # Components
//! - [`BufferPoolManager`] - The block cache
//! - [`CachedBlock`] - A resident block plus its dirty flag
//! - [`BufferPoolStats`] - Performance statistics
//! - [`replacer`] - Eviction policy (LRU)

mod buffer_pool_manager;
mod cached_block;
pub mod replacer;
mod stats;

pub use buffer_pool_manager::BufferPoolManager;
pub use cached_block::CachedBlock;
pub use stats::{BufferPoolStats, StatsSnapshot};
