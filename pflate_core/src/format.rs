/// Default raw bytes per chunk: 1 MiB.
///
/// This is a tuning default, not part of the container contract: each record
/// carries its own sizes, so a file written with one chunk size decompresses
/// correctly regardless of the reader's configuration.
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

/// Upper limit on the configurable chunk size: 1 GiB.
///
/// Keeps both size fields of a record representable as u32 even after
/// worst-case deflate expansion of an incompressible chunk.
pub const MAX_CHUNK_SIZE: usize = 1024 * 1024 * 1024;

/// Size of the per-record header in bytes.
///   original_size:u32 + compressed_size:u32 = 4 + 4 = 8
pub const RECORD_HEADER_SIZE: usize = 8;

/// Decoded representation of the 8-byte record header.
///
/// A container file is nothing but a concatenation of records:
/// ```text
/// [original_size:u32 LE][compressed_size:u32 LE][payload: compressed_size bytes]
/// ```
/// There is no file header, trailer, or record count; readers parse records
/// until clean EOF at a record boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Exact length of the chunk before compression.
    pub original_size: u32,
    /// Length of the compressed payload that follows the header.
    pub compressed_size: u32,
}

impl RecordHeader {
    /// Serialize to exactly `RECORD_HEADER_SIZE` bytes.
    pub fn to_bytes(&self) -> [u8; RECORD_HEADER_SIZE] {
        let mut buf = [0u8; RECORD_HEADER_SIZE];
        buf[..4].copy_from_slice(&self.original_size.to_le_bytes());
        buf[4..].copy_from_slice(&self.compressed_size.to_le_bytes());
        buf
    }

    /// Deserialize from `RECORD_HEADER_SIZE` bytes.
    pub fn from_bytes(buf: &[u8; RECORD_HEADER_SIZE]) -> Self {
        Self {
            original_size: u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]),
            compressed_size: u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]),
        }
    }
}

/// One fully read container record: the original chunk length plus the
/// compressed payload, as handed to the decompression workers.
#[derive(Debug, Clone)]
pub struct Record {
    pub original_size: u32,
    pub payload: Vec<u8>,
}
