//! Storage layer - record format and file I/O.
//!
//! - [`BlockStore`] - Record-level reads and writes against the backing file
//! - [`record`] - On-disk header layout and offset arithmetic

mod block_store;
pub mod record;

pub use block_store::{BlockRecord, BlockStore, StoredBlock};
pub use record::RecordHeader;
