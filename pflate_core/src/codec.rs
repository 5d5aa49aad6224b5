use libdeflater::{CompressionLvl, Compressor, Decompressor};

use crate::error::{CodecError, Error};

/// Default deflate level on the libdeflate scale (1 = fastest, 12 = smallest).
pub const DEFAULT_LEVEL: u32 = 6;

/// Adapter around the libdeflate zlib primitive.
///
/// Chunks are compressed independently, each into its own zlib stream, so any
/// chunk can be inflated without touching its neighbours. Compression
/// allocates the worst-case output buffer up front and truncates to the
/// actual length; decompression allocates exactly the recorded original size
/// and verifies the inflated length against it.
pub struct Deflate {
    level: CompressionLvl,
}

impl Default for Deflate {
    fn default() -> Self {
        Self {
            level: CompressionLvl::default(),
        }
    }
}

impl Deflate {
    /// `level` follows the libdeflate scale, 1 (fastest) through 12
    /// (smallest output).
    pub fn new(level: u32) -> Result<Self, Error> {
        let level = CompressionLvl::new(level as i32)
            .map_err(|_| Error::Config(format!("invalid deflate level {level}, expected 1-12")))?;
        Ok(Self { level })
    }

    /// Worst-case compressed size for `len` input bytes, used to pre-size
    /// output buffers.
    pub fn compress_bound(&self, len: usize) -> usize {
        Compressor::new(self.level).zlib_compress_bound(len)
    }

    /// Compress one chunk into a standalone zlib stream.
    pub fn compress_chunk(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut compressor = Compressor::new(self.level);
        let mut out = vec![0u8; compressor.zlib_compress_bound(data.len())];
        let n = compressor
            .zlib_compress(data, &mut out)
            .map_err(|e| CodecError::Compression(e.to_string()))?;
        out.truncate(n);
        Ok(out)
    }

    /// Inflate one chunk whose exact decompressed length is known from its
    /// container record.
    pub fn decompress_chunk(
        &self,
        compressed: &[u8],
        original_size: u32,
    ) -> Result<Vec<u8>, CodecError> {
        let mut out = vec![0u8; original_size as usize];
        let mut decompressor = Decompressor::new();
        let n = decompressor
            .zlib_decompress(compressed, &mut out)
            .map_err(|e| CodecError::Decompression(e.to_string()))?;
        if n != original_size as usize {
            return Err(CodecError::Decompression(format!(
                "inflated to {n} bytes but the record says {original_size}"
            )));
        }
        Ok(out)
    }
}
