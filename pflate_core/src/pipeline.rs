use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use log::debug;

use crate::codec::{Deflate, DEFAULT_LEVEL};
use crate::error::Error;
use crate::format::{Record, DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE, RECORD_HEADER_SIZE};
use crate::parallel::process_ordered;
use crate::reader::{ChunkReader, RecordReader};
use crate::writer::{ContainerWriter, PlainWriter};

/// Tunables for one pipeline run.
#[derive(Debug, Clone)]
pub struct Options {
    /// Raw bytes per chunk. Only affects compression; the container is
    /// self-describing, so decompression takes sizes from the records.
    pub chunk_size: usize,
    /// Worker threads. `None` uses the machine's available parallelism.
    pub workers: Option<usize>,
    /// Deflate level, 1 (fastest) through 12 (smallest). Compression only.
    pub level: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            workers: None,
            level: DEFAULT_LEVEL,
        }
    }
}

impl Options {
    fn validate(&self) -> Result<(), Error> {
        if self.chunk_size == 0 || self.chunk_size > MAX_CHUNK_SIZE {
            return Err(Error::Config(format!(
                "chunk size {} out of range 1..={MAX_CHUNK_SIZE}",
                self.chunk_size
            )));
        }
        Ok(())
    }

    fn effective_workers(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
        })
    }
}

/// What a completed run did, for reporting.
#[derive(Debug, Clone, Copy)]
pub struct Summary {
    pub chunks: usize,
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub elapsed: Duration,
}

/// Compress `input` into a chunk container at `output`.
///
/// Reader, processor, and writer run strictly in sequence: the whole chunk
/// sequence is materialized, every chunk is compressed on the bounded pool,
/// and records are written in chunk order. Any stage failure aborts the run
/// before the next stage touches the output.
pub fn compress(input: &Path, output: &Path, options: &Options) -> Result<Summary, Error> {
    let start = Instant::now();
    options.validate()?;
    let codec = Deflate::new(options.level)?;

    let chunks = ChunkReader::open(input)?.read_all(options.chunk_size)?;
    let bytes_in: u64 = chunks.iter().map(|c| c.len() as u64).sum();
    let workers = options.effective_workers();
    debug!(
        "compressing {} chunks (chunk size {}) on {} workers",
        chunks.len(),
        options.chunk_size,
        workers
    );

    let compressed = process_ordered(&chunks, workers, |i, chunk: &Vec<u8>| {
        codec
            .compress_chunk(chunk)
            .map(|bytes| (chunk.len() as u32, bytes))
            .map_err(|source| Error::Codec { chunk: i, source })
    })?;

    let mut writer = ContainerWriter::create(output)?;
    let mut bytes_out = 0u64;
    for (original_size, bytes) in &compressed {
        writer.put(*original_size, bytes)?;
        bytes_out += RECORD_HEADER_SIZE as u64 + bytes.len() as u64;
    }
    writer.finish()?;

    Ok(Summary {
        chunks: compressed.len(),
        bytes_in,
        bytes_out,
        elapsed: start.elapsed(),
    })
}

/// Decompress a chunk container at `input` back into the original bytes at
/// `output`.
pub fn decompress(input: &Path, output: &Path, options: &Options) -> Result<Summary, Error> {
    let start = Instant::now();
    let codec = Deflate::default();

    let records = RecordReader::open(input)?.read_all()?;
    let bytes_in: u64 = records
        .iter()
        .map(|r| RECORD_HEADER_SIZE as u64 + r.payload.len() as u64)
        .sum();
    let workers = options.effective_workers();
    debug!("decompressing {} records on {} workers", records.len(), workers);

    let decompressed = process_ordered(&records, workers, |i, record: &Record| {
        codec
            .decompress_chunk(&record.payload, record.original_size)
            .map_err(|source| Error::Codec { chunk: i, source })
    })?;

    let mut writer = PlainWriter::create(output)?;
    let mut bytes_out = 0u64;
    for bytes in &decompressed {
        writer.put(bytes)?;
        bytes_out += bytes.len() as u64;
    }
    writer.finish()?;

    Ok(Summary {
        chunks: decompressed.len(),
        bytes_in,
        bytes_out,
        elapsed: start.elapsed(),
    })
}
