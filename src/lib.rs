//! blockcache - a fixed-size, disk-backed LRU block cache.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                           blockcache                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │              Buffer Pool (buffer/)                       │   │
//! │  │   BufferPoolManager + LruReplacer + CachedBlock + Stats  │   │
//! │  │        read / write / flush_all / close                  │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │               miss: load ↓            ↑ evict: store            │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │              Storage Layer (storage/)                    │   │
//! │  │        BlockStore + RecordHeader (5-byte header)         │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │          backing file: [hdr|payload][hdr|payload]...            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (BlockId, Error, config)
//! - [`buffer`] - Buffer pool management and eviction policy
//! - [`storage`] - Record format and file I/O
//!
//! # Quick Start
//! ```no_run
//! use blockcache::{BlockId, BlockStore, BufferPoolManager};
//!
//! // Pre-format a file with 10 empty 512-byte records
//! BlockStore::create("blocks.bin", 512, 10).unwrap();
//!
//! let bpm = BufferPoolManager::new(3, 512, "blocks.bin").unwrap();
//! bpm.write(BlockId::new(1), &[0xAB; 512]).unwrap();
//! bpm.close().unwrap();
//! ```
//!
//! # Logging
//! Events are emitted through [`tracing`]; install a subscriber in the
//! application to see them.

pub mod buffer;
pub mod common;
pub mod storage;

// Re-export commonly used items at crate root for convenience
pub use common::config::{DEFAULT_BLOCK_SIZE, RECORD_HEADER_SIZE};
pub use common::{BlockId, BufferPoolConfig, Error, Result};

pub use buffer::{BufferPoolManager, BufferPoolStats, CachedBlock, StatsSnapshot};
pub use storage::{BlockRecord, BlockStore, RecordHeader, StoredBlock};
