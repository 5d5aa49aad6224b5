use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::IoError;
use crate::format::RecordHeader;

fn create(path: &Path) -> Result<BufWriter<File>, IoError> {
    let file = File::create(path).map_err(|source| IoError::CannotOpen {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufWriter::new(file))
}

/// Writes compressed chunks as size-prefixed records, in index order.
pub struct ContainerWriter {
    dst: BufWriter<File>,
}

impl ContainerWriter {
    /// Create (or overwrite) the container file at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, IoError> {
        Ok(Self {
            dst: create(path.as_ref())?,
        })
    }

    /// Append one record: both u32 size fields little-endian, then the
    /// payload bytes.
    pub fn put(&mut self, original_size: u32, compressed: &[u8]) -> Result<(), IoError> {
        debug_assert!(compressed.len() <= u32::MAX as usize);
        let header = RecordHeader {
            original_size,
            compressed_size: compressed.len() as u32,
        };
        self.dst
            .write_all(&header.to_bytes())
            .map_err(|source| IoError::Write { source })?;
        self.dst
            .write_all(compressed)
            .map_err(|source| IoError::Write { source })
    }

    /// Flush buffered records to disk. Consumes the writer so a flush cannot
    /// be skipped on the success path.
    pub fn finish(mut self) -> Result<(), IoError> {
        self.dst.flush().map_err(|source| IoError::Write { source })
    }
}

/// Writes decompressed chunks verbatim, in index order. Concatenation
/// reconstructs the original file exactly.
pub struct PlainWriter {
    dst: BufWriter<File>,
}

impl PlainWriter {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, IoError> {
        Ok(Self {
            dst: create(path.as_ref())?,
        })
    }

    pub fn put(&mut self, bytes: &[u8]) -> Result<(), IoError> {
        self.dst
            .write_all(bytes)
            .map_err(|source| IoError::Write { source })
    }

    pub fn finish(mut self) -> Result<(), IoError> {
        self.dst.flush().map_err(|source| IoError::Write { source })
    }
}
