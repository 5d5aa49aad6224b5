use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use crate::error::IoError;
use crate::format::{Record, RecordHeader, RECORD_HEADER_SIZE};

/// Splits a plain input file into an ordered sequence of fixed-size chunks.
///
/// Chunk index is the position in the returned vector; indices are contiguous
/// from zero by construction.
pub struct ChunkReader {
    src: BufReader<File>,
}

impl ChunkReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| IoError::CannotOpen {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            src: BufReader::new(file),
        })
    }

    /// Read the whole input as chunks of at most `chunk_size` bytes.
    ///
    /// The last chunk may be shorter. A file whose length is an exact
    /// multiple of `chunk_size` produces no empty trailing chunk, and an
    /// empty file produces no chunks at all.
    pub fn read_all(mut self, chunk_size: usize) -> Result<Vec<Vec<u8>>, IoError> {
        let mut chunks = Vec::new();
        loop {
            let mut chunk = vec![0u8; chunk_size];
            let filled = read_full(&mut self.src, &mut chunk)?;
            chunk.truncate(filled);
            if chunk.is_empty() {
                break;
            }
            let at_eof = filled < chunk_size;
            chunks.push(chunk);
            if at_eof {
                break;
            }
        }
        Ok(chunks)
    }
}

/// Reads a container file back into its ordered record sequence.
pub struct RecordReader {
    src: BufReader<File>,
}

impl RecordReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| IoError::CannotOpen {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            src: BufReader::new(file),
        })
    }

    /// Parse records until clean EOF at a record boundary.
    ///
    /// EOF in the middle of a size pair or payload is corruption, reported as
    /// [`IoError::TruncatedRecord`] with the index of the offending record.
    pub fn read_all(mut self) -> Result<Vec<Record>, IoError> {
        let mut records = Vec::new();
        loop {
            let mut header_buf = [0u8; RECORD_HEADER_SIZE];
            match read_full(&mut self.src, &mut header_buf)? {
                0 => break,
                RECORD_HEADER_SIZE => {}
                n => {
                    return Err(IoError::TruncatedRecord {
                        record: records.len(),
                        detail: format!("size pair cut short after {n} of {RECORD_HEADER_SIZE} bytes"),
                    })
                }
            }
            let header = RecordHeader::from_bytes(&header_buf);

            // No deflate stream for original_size bytes can be this large;
            // rejecting here keeps a corrupt length field from driving a
            // multi-gigabyte allocation.
            let cap = worst_case_payload(header.original_size);
            if u64::from(header.compressed_size) > cap {
                return Err(IoError::TruncatedRecord {
                    record: records.len(),
                    detail: format!(
                        "compressed size {} is implausible for original size {}",
                        header.compressed_size, header.original_size
                    ),
                });
            }

            let mut payload = vec![0u8; header.compressed_size as usize];
            let got = read_full(&mut self.src, &mut payload)?;
            if got != payload.len() {
                return Err(IoError::TruncatedRecord {
                    record: records.len(),
                    detail: format!("payload has {got} of {} bytes", payload.len()),
                });
            }

            records.push(Record {
                original_size: header.original_size,
                payload,
            });
        }
        Ok(records)
    }
}

/// Loose upper bound on a zlib stream for `original_size` raw bytes. Stored
/// blocks expand input by well under 1/8 plus a constant, so anything above
/// this is a corrupt length field.
fn worst_case_payload(original_size: u32) -> u64 {
    let n = u64::from(original_size);
    n + n / 8 + 512
}

/// Fill `buf` from `src`, looping over short reads, and return the number of
/// bytes actually read. Returns less than `buf.len()` only at end of stream.
fn read_full(src: &mut impl Read, buf: &mut [u8]) -> Result<usize, IoError> {
    let mut filled = 0;
    while filled < buf.len() {
        match src.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(source) => return Err(IoError::Read { source }),
        }
    }
    Ok(filled)
}
