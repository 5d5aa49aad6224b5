use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures reported by the deflate primitive for a single chunk.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("deflate compression failed: {0}")]
    Compression(String),

    #[error("inflate decompression failed: {0}")]
    Decompression(String),
}

/// File and container level I/O failures. All of these abort the run.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("cannot open {path}: {source}")]
    CannotOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The container ended mid-record or declared an impossible payload
    /// length. A file that fails with this must not be treated as a valid
    /// (short) archive.
    #[error("truncated container record {record}: {detail}")]
    TruncatedRecord { record: usize, detail: String },

    #[error("read failed: {source}")]
    Read {
        #[source]
        source: io::Error,
    },

    #[error("write failed: {source}")]
    Write {
        #[source]
        source: io::Error,
    },
}

/// Union error returned by the pipeline entry points.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] IoError),

    /// Codec failure attributed to the chunk it occurred on. When several
    /// chunks fail in one run, the lowest chunk index is the one surfaced.
    #[error("chunk {chunk}: {source}")]
    Codec {
        chunk: usize,
        #[source]
        source: CodecError,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}
