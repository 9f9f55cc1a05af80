//! Common types and utilities shared across blockcache.
//!
//! - Configuration constants and [`BufferPoolConfig`]
//! - Error types
//! - [`BlockId`]

mod block_id;
pub mod config;
pub mod error;

pub use block_id::BlockId;
pub use config::BufferPoolConfig;
pub use error::{Error, Result};
