//! The codec implementation for Scroll batches and chunks.

pub use batch_header::BatchHeader;
mod batch_header;

pub use bitmap::{decode_skipped_bitmap, is_l1_message_skipped};
mod bitmap;

pub use block::BlockContext;
pub mod block;

pub use chunk::{count_total_l1_message_popped, BatchBlock, BatchChunk, Chunk, ChunkTransactions};
pub mod chunk;

pub use decoding::decode_chunks;
pub mod decoding;

pub use error::{CodecError, DecodingError, InvalidChunksError};
mod error;

/// The codec version of a batch.
///
/// The version is read from the committed batch and selects how the chunks of the batch are
/// decoded and hashed. Versions never mix within a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum CodecVersion {
    /// V0 variant of the codec.
    /// <https://github.com/scroll-tech/scroll-contracts/blob/81f0db72ca5335e0dddfaa99cb415e3d1cee895f/src/libraries/codec/ChunkCodecV0.sol>
    #[display("v0")]
    V0,
    /// V1 variant of the codec.
    /// <https://github.com/scroll-tech/scroll-contracts/blob/81f0db72ca5335e0dddfaa99cb415e3d1cee895f/src/libraries/codec/ChunkCodecV1.sol>
    #[display("v1")]
    V1,
}

impl CodecVersion {
    /// Returns the version byte.
    pub const fn as_u8(&self) -> u8 {
        match self {
            Self::V0 => 0,
            Self::V1 => 1,
        }
    }
}

impl TryFrom<u8> for CodecVersion {
    type Error = DecodingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::V0),
            1 => Ok(Self::V1),
            v => Err(DecodingError::UnsupportedCodecVersion(v)),
        }
    }
}

impl From<CodecVersion> for u8 {
    fn from(value: CodecVersion) -> Self {
        value.as_u8()
    }
}
