//! Decoding implementations for the commit data.

pub(crate) mod constants;

mod macros;

/// V0 implementation of the decoding.
pub mod v0;

/// V1 implementation of the decoding.
pub mod v1;

use crate::{
    error::DecodingError, from_be_bytes_slice_and_advance_buf, BlockContext, Chunk, CodecError,
    CodecVersion,
};
use constants::TRANSACTION_LENGTH_BYTES_SIZE;

use alloy_primitives::{bytes::Buf, Bytes};
use std::vec::Vec;

/// Decodes the raw chunks of a batch with the provided codec version.
pub fn decode_chunks<T: AsRef<[u8]>>(
    version: CodecVersion,
    chunks: &[T],
) -> Result<Vec<Chunk>, CodecError> {
    let chunks = chunks
        .iter()
        .map(|chunk| match version {
            CodecVersion::V0 => v0::decode_v0_chunk(chunk.as_ref()),
            CodecVersion::V1 => v1::decode_v1_chunk(chunk.as_ref()),
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::trace!(target: "scroll::codec", %version, chunks = chunks.len(), "decoded chunks");
    Ok(chunks)
}

/// Reads the block count prefix of the chunk.
pub(crate) fn read_blocks_count(buf: &mut &[u8]) -> Result<usize, DecodingError> {
    let count = buf.first().copied().ok_or(DecodingError::TruncatedChunk {
        expected: 1,
        remaining: 0,
    })? as usize;
    buf.advance(1);

    if count == 0 {
        return Err(DecodingError::EmptyChunk)
    }
    Ok(count)
}

/// Ensures the buffer holds at least `expected` bytes.
pub(crate) const fn ensure_remaining(buf: &[u8], expected: usize) -> Result<(), DecodingError> {
    if buf.len() < expected {
        return Err(DecodingError::TruncatedChunk { expected, remaining: buf.len() })
    }
    Ok(())
}

/// Checks the block context declares at least as many transactions as L1 messages.
pub(crate) const fn validate_block_context(context: &BlockContext) -> Result<(), DecodingError> {
    if context.num_transactions < context.num_l1_messages {
        return Err(DecodingError::InvalidBlockContext {
            number: context.number,
            num_transactions: context.num_transactions,
            num_l1_messages: context.num_l1_messages,
        })
    }
    Ok(())
}

/// Reads a length prefixed transaction from the buffer.
pub(crate) fn read_transaction(buf: &mut &[u8]) -> Result<Bytes, DecodingError> {
    ensure_remaining(buf, TRANSACTION_LENGTH_BYTES_SIZE)?;
    let length = from_be_bytes_slice_and_advance_buf!(u32, buf) as usize;

    ensure_remaining(buf, length)?;
    let tx = Bytes::copy_from_slice(&buf[..length]);
    buf.advance(length);

    Ok(tx)
}
