//! Block Store - record-level file I/O for cached blocks.
//!
//! The [`BlockStore`] translates a [`BlockId`] into a byte-exact record
//! position and reads or writes that record. It knows nothing about caching.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::common::{BlockId, Error, Result};
use crate::storage::record::{record_offset, record_size, RecordHeader};

/// Payload and header flag returned by [`BlockStore::load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlock {
    /// Exactly `block_size` payload bytes.
    pub data: Vec<u8>,
    /// The record's `dirty_flag`: 1 once written, 0 when freshly formatted.
    pub dirty_flag: u8,
}

/// One record as seen by [`BlockStore::scan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRecord {
    /// Position of the record in the file.
    pub index: u64,
    pub header: RecordHeader,
    pub data: Vec<u8>,
}

/// Reads and writes fixed-width block records in a single backing file.
///
/// # File Layout
/// ```text
/// ┌──────────────────────┬──────────────────────┬─────┬──────────────────────┐
/// │ Record 0             │ Record 1             │ ... │ Record N             │
/// │ hdr(5) + payload(B)  │ hdr(5) + payload(B)  │     │ hdr(5) + payload(B)  │
/// └──────────────────────┴──────────────────────┴─────┴──────────────────────┘
/// Offset: 0              5+B                            N×(5+B)
/// ```
///
/// # File Handles
/// No handle is held between calls. Every operation opens the file, does its
/// work and closes it again when the `File` drops, on success and error paths
/// alike.
///
/// # Thread Safety
/// `BlockStore` does not serialize access. Concurrent `store` calls against
/// the same file must be serialized by the caller; `BufferPoolManager` does
/// this by holding its pool lock across every store call.
#[derive(Debug, Clone)]
pub struct BlockStore {
    path: PathBuf,
    block_size: usize,
    sync_writes: bool,
}

impl BlockStore {
    /// Create a new backing file pre-formatted with `record_count` empty
    /// records (header `(0, 0)`, zeroed payload).
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be created, or
    /// `Error::InvalidConfig` if `block_size` is 0.
    pub fn create<P: AsRef<Path>>(path: P, block_size: usize, record_count: u64) -> Result<Self> {
        if block_size == 0 {
            return Err(Error::InvalidConfig("block_size must be > 0".to_string()));
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(&path)?;

        // Zero-extension yields headers of (0, 0) and zeroed payloads.
        file.set_len(record_count * record_size(block_size))?;
        file.sync_all()?;

        info!(
            path = %path.as_ref().display(),
            block_size,
            record_count,
            "formatted backing file"
        );

        Ok(Self {
            path: path.as_ref().to_path_buf(),
            block_size,
            sync_writes: true,
        })
    }

    /// Attach to an existing backing file.
    ///
    /// Only checks that the path names a regular file; no handle is kept.
    ///
    /// # Errors
    /// Returns `Error::Io` if the file doesn't exist, or
    /// `Error::InvalidConfig` if it is not a regular file or `block_size` is 0.
    pub fn open<P: AsRef<Path>>(path: P, block_size: usize) -> Result<Self> {
        if block_size == 0 {
            return Err(Error::InvalidConfig("block_size must be > 0".to_string()));
        }

        let metadata = fs::metadata(&path)?;
        if !metadata.is_file() {
            return Err(Error::InvalidConfig(format!(
                "{} is not a regular file",
                path.as_ref().display()
            )));
        }

        Ok(Self {
            path: path.as_ref().to_path_buf(),
            block_size,
            sync_writes: true,
        })
    }

    /// Enable or disable `fsync` after every [`store`](Self::store).
    pub fn with_sync_writes(mut self, sync_writes: bool) -> Self {
        self.sync_writes = sync_writes;
        self
    }

    /// Load the record for `block_id`.
    ///
    /// # Errors
    /// - `Error::BlockNotFound` if fewer than 5 header bytes exist at the
    ///   record's offset (end of file)
    /// - `Error::Io` if the header is present but the payload is truncated
    /// - `Error::CorruptRecord` if a written record carries another block id
    pub fn load(&self, block_id: BlockId) -> Result<StoredBlock> {
        let offset = record_offset(block_id, self.block_size);

        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(offset))?;

        let mut header_buf = [0u8; RecordHeader::SIZE];
        if read_up_to(&mut file, &mut header_buf)? < RecordHeader::SIZE {
            debug!(%block_id, offset, "no record at offset");
            return Err(Error::BlockNotFound(block_id.0));
        }

        let header = RecordHeader::from_bytes(&header_buf);
        if header.is_written() && header.block_id != block_id.0 {
            return Err(Error::CorruptRecord {
                requested: block_id.0,
                stored: header.block_id,
            });
        }

        let mut data = vec![0u8; self.block_size];
        file.read_exact(&mut data)?;

        debug!(%block_id, offset, dirty_flag = header.dirty_flag, "loaded block");

        Ok(StoredBlock {
            data,
            dirty_flag: header.dirty_flag,
        })
    }

    /// Write `data` as the record for `block_id`, with header `(block_id, 1)`.
    ///
    /// The file is never created, truncated or extended.
    ///
    /// # Errors
    /// - `Error::SizeMismatch` if `data.len() != block_size` (file untouched)
    /// - `Error::OutOfBounds` if the record does not fit in the current file
    /// - `Error::Io` on open/seek/write/sync failure
    pub fn store(&self, block_id: BlockId, data: &[u8]) -> Result<()> {
        self.check_size(data)?;

        let offset = record_offset(block_id, self.block_size);
        let mut file = OpenOptions::new().read(true).write(true).open(&self.path)?;

        self.check_fits(block_id, file.metadata()?.len())?;

        let mut record = Vec::with_capacity(RecordHeader::SIZE + self.block_size);
        record.extend_from_slice(&RecordHeader::written(block_id).to_bytes());
        record.extend_from_slice(data);

        file.seek(SeekFrom::Start(offset))?;
        file.write_all(&record)?;
        if self.sync_writes {
            file.sync_all()?;
        }

        debug!(%block_id, offset, "stored block");
        Ok(())
    }

    /// Check that the record for `block_id` lies inside the current file.
    ///
    /// This is the same check [`store`](Self::store) applies, without
    /// opening the file for writing.
    ///
    /// # Errors
    /// - `Error::OutOfBounds` if the record does not fit
    /// - `Error::Io` if the file's metadata cannot be read
    pub fn check_bounds(&self, block_id: BlockId) -> Result<()> {
        self.check_fits(block_id, fs::metadata(&self.path)?.len())
    }

    /// Read every whole record in file order.
    ///
    /// Diagnostic only; a trailing partial record is ignored.
    pub fn scan(&self) -> Result<Vec<BlockRecord>> {
        let file = File::open(&self.path)?;
        let count = file.metadata()?.len() / record_size(self.block_size);
        let mut reader = BufReader::new(file);

        let mut records = Vec::with_capacity(count as usize);
        let mut header_buf = [0u8; RecordHeader::SIZE];
        for index in 0..count {
            reader.read_exact(&mut header_buf)?;
            let mut data = vec![0u8; self.block_size];
            reader.read_exact(&mut data)?;
            records.push(BlockRecord {
                index,
                header: RecordHeader::from_bytes(&header_buf),
                data,
            });
        }

        Ok(records)
    }

    /// Number of whole records currently in the file.
    pub fn record_count(&self) -> Result<u64> {
        Ok(fs::metadata(&self.path)?.len() / record_size(self.block_size))
    }

    /// Payload size of every record.
    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Path of the backing file.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether writes are followed by `fsync`.
    #[inline]
    pub fn sync_writes(&self) -> bool {
        self.sync_writes
    }

    fn check_fits(&self, block_id: BlockId, file_size: u64) -> Result<()> {
        let offset = record_offset(block_id, self.block_size);
        if offset + record_size(self.block_size) > file_size {
            return Err(Error::OutOfBounds {
                block_id: block_id.0,
                offset,
                file_size,
            });
        }
        Ok(())
    }

    pub(crate) fn check_size(&self, data: &[u8]) -> Result<()> {
        if data.len() != self.block_size {
            return Err(Error::SizeMismatch {
                expected: self.block_size,
                actual: data.len(),
            });
        }
        Ok(())
    }
}

/// Fill `buf` as far as the reader allows, returning the bytes read.
///
/// Unlike `read_exact`, hitting end of file early is not an error.
fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
