//! Implements the V0 decoding of a chunk.

pub(crate) use block_context::BlockContextV0;
mod block_context;

use crate::{
    decoding::{ensure_remaining, read_blocks_count, read_transaction, validate_block_context},
    error::DecodingError,
    BlockContext, Chunk, ChunkTransactions,
};
use std::vec::Vec;

/// Decodes a V0 chunk.
///
/// The L2 transactions of all the blocks are read until the end of the chunk into a flat list,
/// which must match the count declared by the block contexts.
pub fn decode_v0_chunk(chunk: &[u8]) -> Result<Chunk, DecodingError> {
    let buf = &mut &*chunk;

    let blocks_count = read_blocks_count(buf)?;
    ensure_remaining(buf, blocks_count * BlockContextV0::BYTES_LENGTH)?;

    let mut blocks: Vec<BlockContext> = Vec::with_capacity(blocks_count);
    for _ in 0..blocks_count {
        let context: BlockContext = BlockContextV0::try_from_buf(buf)?.into();
        validate_block_context(&context)?;
        blocks.push(context);
    }

    let expected = blocks.iter().map(BlockContext::l2_transactions_count).sum();
    let mut transactions = Vec::with_capacity(expected);
    while !buf.is_empty() {
        transactions.push(read_transaction(buf)?);
    }

    if transactions.len() != expected {
        return Err(DecodingError::TransactionCountMismatch { expected, got: transactions.len() })
    }

    Ok(Chunk { blocks, transactions: ChunkTransactions::Flat(transactions) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decode_chunks, CodecError, CodecVersion};

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

    fn last_block_context() -> BlockContext {
        BlockContext {
            number: 680,
            timestamp: 1696933798,
            base_fee: U256::ZERO,
            gas_limit: 10000000,
            num_transactions: 1,
            num_l1_messages: 0,
        }
    }

    #[test]
    fn test_should_decode_v0() -> eyre::Result<()> {
        // <https://etherscan.io/tx/0x2c7bb77d6086befd9bdcf936479fd246d1065cbd2c6aff55b1d39a67aff965c1>
        let tx = bytes!(
            "f88c8202418417d7840082a4f294530000000000000000000000000000000000000280a4bede39b50000000000000000000000000000000000000000000000000000000156faa40283104ec3a01339778fe9b41ef708daaa24c455bf93a7b4689863553deb5a508d671556da71a03de900a02261954daee0fd5ed3009984417509f955875784688ae3228a0c5a55"
        );
        let l1_block = BlockContext {
            number: 679,
            base_fee: U256::from(1u64 << 40),
            num_transactions: 3,
            num_l1_messages: 2,
            ..last_block_context()
        };
        let raw = encode_chunk(&[l1_block.clone(), last_block_context()], &[
            bytes!("02aa"),
            tx.clone(),
        ]);

        let chunk = decode_v0_chunk(&raw)?;

        assert_eq!(chunk.blocks, vec![l1_block, last_block_context()]);
        assert_eq!(chunk.transactions, ChunkTransactions::Flat(vec![bytes!("02aa"), tx.clone()]));
        let last = chunk.l2_blocks()?.last().map(|(_, txs)| txs.to_vec());
        assert_eq!(last, Some(vec![tx]));

        Ok(())
    }

    #[test]
    fn test_should_read_full_base_fee() -> eyre::Result<()> {
        let context = BlockContext { base_fee: U256::MAX, ..last_block_context() };
        let raw = encode_chunk(&[context], &[bytes!("01")]);

        let chunks = decode_chunks(CodecVersion::V0, &[raw])?;
        assert_eq!(chunks[0].blocks[0].base_fee, U256::MAX);

        Ok(())
    }

    #[test]
    fn test_should_fail_on_transaction_count_mismatch() {
        let raw = encode_chunk(&[last_block_context()], &[bytes!("01"), bytes!("02")]);
        assert_eq!(
            decode_v0_chunk(&raw),
            Err(DecodingError::TransactionCountMismatch { expected: 1, got: 2 })
        );
    }

    #[test]
    fn test_should_fail_on_invalid_context() {
        let context = BlockContext { num_transactions: 1, num_l1_messages: 2, ..Default::default() };
        let raw = encode_chunk(&[context], &[]);
        assert_eq!(
            decode_v0_chunk(&raw),
            Err(DecodingError::InvalidBlockContext {
                number: 0,
                num_transactions: 1,
                num_l1_messages: 2
            })
        );
    }

    #[test]
    fn test_should_fail_on_truncated_chunk() {
        let raw = encode_chunk(&[last_block_context(), last_block_context()], &[]);
        assert!(matches!(
            decode_chunks(CodecVersion::V0, &[&raw[..100]]),
            Err(CodecError::Decoding(DecodingError::TruncatedChunk { expected: 120, remaining: 99 }))
        ));
        assert!(matches!(
            decode_chunks(CodecVersion::V0, &[[0u8]]),
            Err(CodecError::Decoding(DecodingError::EmptyChunk))
        ));
    }
}
