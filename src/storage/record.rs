//! On-disk record format.
//!
//! Every block is stored as a fixed-width record: a [`RecordHeader`]
//! followed by `block_size` payload bytes.

use crate::common::config::RECORD_HEADER_SIZE;
use crate::common::BlockId;

/// Metadata stored at the beginning of every record.
///
/// # Layout (5 bytes)
/// ```text
/// Offset  Size  Field
/// ------  ----  -----
/// 0       4     block_id (u32, little-endian)
/// 4       1     dirty_flag (u8)
/// ```
///
/// A pre-formatted record carries `(0, 0)`. Every record written through
/// `BlockStore::store` carries `(block_id, 1)`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Block id recorded at the last write.
    pub block_id: u32,
    /// 1 once the record has been explicitly written, 0 when freshly formatted.
    pub dirty_flag: u8,
}

impl RecordHeader {
    /// Size of the header in bytes.
    pub const SIZE: usize = RECORD_HEADER_SIZE;

    /// Byte offset of `block_id` within the header.
    pub const OFFSET_BLOCK_ID: usize = 0;
    /// Byte offset of `dirty_flag` within the header.
    pub const OFFSET_DIRTY_FLAG: usize = 4;

    /// Header written by the block store for `block_id`.
    pub fn written(block_id: BlockId) -> Self {
        Self {
            block_id: block_id.0,
            dirty_flag: 1,
        }
    }

    /// Whether the record has ever been written (as opposed to formatted).
    #[inline]
    pub fn is_written(&self) -> bool {
        self.dirty_flag != 0
    }

    /// Read a header from the beginning of a byte slice.
    ///
    /// # Panics
    /// Panics if `data.len() < RecordHeader::SIZE`.
    pub fn from_bytes(data: &[u8]) -> Self {
        assert!(data.len() >= Self::SIZE, "buffer too small for RecordHeader");

        let block_id = u32::from_le_bytes([
            data[Self::OFFSET_BLOCK_ID],
            data[Self::OFFSET_BLOCK_ID + 1],
            data[Self::OFFSET_BLOCK_ID + 2],
            data[Self::OFFSET_BLOCK_ID + 3],
        ]);

        Self {
            block_id,
            dirty_flag: data[Self::OFFSET_DIRTY_FLAG],
        }
    }

    /// Write this header to the beginning of a byte slice.
    ///
    /// # Panics
    /// Panics if `data.len() < RecordHeader::SIZE`.
    pub fn write_to(&self, data: &mut [u8]) {
        assert!(data.len() >= Self::SIZE, "buffer too small for RecordHeader");

        data[Self::OFFSET_BLOCK_ID..Self::OFFSET_BLOCK_ID + 4]
            .copy_from_slice(&self.block_id.to_le_bytes());
        data[Self::OFFSET_DIRTY_FLAG] = self.dirty_flag;
    }

    /// Encode into a fresh array.
    pub fn to_bytes(&self) -> [u8; RECORD_HEADER_SIZE] {
        let mut buf = [0u8; RECORD_HEADER_SIZE];
        self.write_to(&mut buf);
        buf
    }
}

/// Width of one record (header plus payload) in bytes.
#[inline]
pub fn record_size(block_size: usize) -> u64 {
    (RecordHeader::SIZE + block_size) as u64
}

/// File offset of the record holding `block_id`.
///
/// The block id is the record index: `block_id * (5 + block_size)`.
#[inline]
pub fn record_offset(block_id: BlockId, block_size: usize) -> u64 {
    block_id.index() * record_size(block_size)
}
