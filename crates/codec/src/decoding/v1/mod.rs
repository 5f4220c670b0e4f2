//! Implements the V1 decoding of a chunk.

pub(crate) use block_context::BlockContextV1;
mod block_context;

use crate::{
    decoding::{ensure_remaining, read_blocks_count, read_transaction, validate_block_context},
    error::DecodingError,
    BlockContext, Chunk, ChunkTransactions,
};
use std::vec::Vec;

/// Decodes a V1 chunk.
///
/// Exactly `num_transactions - num_l1_messages` L2 transactions are read for each block and the
/// chunk must be fully consumed.
pub fn decode_v1_chunk(chunk: &[u8]) -> Result<Chunk, DecodingError> {
    let buf = &mut &*chunk;

    let blocks_count = read_blocks_count(buf)?;
    ensure_remaining(buf, blocks_count * BlockContextV1::BYTES_LENGTH)?;

    let mut blocks: Vec<BlockContext> = Vec::with_capacity(blocks_count);
    for _ in 0..blocks_count {
        let context: BlockContext = BlockContextV1::try_from_buf(buf)?.into();
        validate_block_context(&context)?;
        blocks.push(context);
    }

    let mut transactions = Vec::with_capacity(blocks_count);
    for context in &blocks {
        let block_transactions = (0..context.l2_transactions_count())
            .map(|_| read_transaction(buf))
            .collect::<Result<Vec<_>, _>>()?;
        transactions.push(block_transactions);
    }

    if !buf.is_empty() {
        return Err(DecodingError::TrailingBytes(buf.len()))
    }

    Ok(Chunk { blocks, transactions: ChunkTransactions::PerBlock(transactions) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decode_chunks, CodecVersion};

    use alloy_primitives::{bytes, Bytes, U256};

    fn encode_chunk(blocks: &[BlockContext], transactions: &[Bytes]) -> Vec<u8> {
        let mut chunk = vec![blocks.len() as u8];
        for block in blocks {
            chunk.extend_from_slice(&block.encode());
        }
        for tx in transactions {
            chunk.extend_from_slice(&(tx.len() as u32).to_be_bytes());
            chunk.extend_from_slice(tx);
        }
        chunk
    }

    fn context(number: u64, num_transactions: u16, num_l1_messages: u16) -> BlockContext {
        BlockContext {
            number,
            timestamp: 1_700_000_000 + number,
            base_fee: U256::from(0x1234u64),
            gas_limit: 10_000_000,
            num_transactions,
            num_l1_messages,
        }
    }

    #[test]
    fn test_should_decode_v1() -> eyre::Result<()> {
        let blocks = [context(10, 3, 1), context(11, 0, 0), context(12, 1, 0)];
        let raw = encode_chunk(&blocks, &[bytes!("01"), bytes!("0203"), bytes!("04")]);

        let chunks = decode_chunks(CodecVersion::V1, &[raw])?;

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].blocks, blocks.to_vec());
        assert_eq!(
            chunks[0].transactions,
            ChunkTransactions::PerBlock(vec![
                vec![bytes!("01"), bytes!("0203")],
                vec![],
                vec![bytes!("04")]
            ])
        );

        Ok(())
    }

    #[test]
    fn test_should_only_read_low_base_fee_bytes() -> eyre::Result<()> {
        let mut raw = encode_chunk(&[context(1, 0, 0)], &[]);
        // set a byte of the base fee outside of the low 8 bytes.
        raw[1 + 16] = 0xff;

        let chunk = decode_v1_chunk(&raw)?;
        assert_eq!(chunk.blocks[0].base_fee, U256::from(0x1234u64));

        Ok(())
    }

    #[test]
    fn test_should_fail_on_trailing_bytes() {
        let raw = encode_chunk(&[context(1, 1, 0)], &[bytes!("01"), bytes!("02")]);
        assert_eq!(decode_v1_chunk(&raw), Err(DecodingError::TrailingBytes(5)));
    }

    #[test]
    fn test_should_fail_on_missing_transaction() {
        let raw = encode_chunk(&[context(1, 2, 0)], &[bytes!("01")]);
        assert_eq!(
            decode_v1_chunk(&raw),
            Err(DecodingError::TruncatedChunk { expected: 4, remaining: 0 })
        );
    }
}
