//! Eviction policy implementations (replacers).
//!
//! - [`LruReplacer`] - Least Recently Used, one strict total order

mod lru;

pub use lru::LruReplacer;
