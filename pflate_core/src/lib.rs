pub mod codec;
pub mod error;
pub mod format;
pub mod parallel;
pub mod pipeline;
pub mod reader;
pub mod writer;

pub use codec::{Deflate, DEFAULT_LEVEL};
pub use error::{CodecError, Error, IoError};
pub use format::{Record, RecordHeader, DEFAULT_CHUNK_SIZE, RECORD_HEADER_SIZE};
pub use pipeline::{compress, decompress, Options, Summary};
pub use reader::{ChunkReader, RecordReader};
pub use writer::{ContainerWriter, PlainWriter};
