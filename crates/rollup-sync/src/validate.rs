use crate::RollupSyncError;

use alloy_primitives::B256;
use rollup_node_primitives::{ChunkBlockRange, FinalizedBatchMeta};
use rollup_node_providers::L2BlockReader;
use scroll_codec::{
    decode_chunks, BatchBlock, BatchChunk, BatchHeader, BlockContext, Chunk, CodecError,
    CodecVersion,
};
use scroll_l1::abi::calls::CommitBatchCall;

/// A finalize event of the Scroll Chain contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalizeBatchEvent {
    /// The index of the batch.
    pub batch_index: u64,
    /// The hash of the batch.
    pub batch_hash: B256,
    /// The state root after the batch.
    pub state_root: B256,
    /// The withdraw root after the batch.
    pub withdraw_root: B256,
}

/// The roots of the local chain after a block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalRoots {
    /// The state root.
    pub state_root: B256,
    /// The withdraw trie root.
    pub withdraw_root: B256,
}

/// Decodes the commit calldata of the batch into the codec version and the block range of every
/// chunk.
///
/// Fails with [`RollupSyncError::EmptyBatch`] if the batch commits no chunk.
pub fn decode_chunk_block_ranges(
    batch_index: u64,
    calldata: &[u8],
) -> Result<(CodecVersion, Vec<ChunkBlockRange>), RollupSyncError> {
    let call = CommitBatchCall::try_decode(calldata).ok_or(RollupSyncError::InvalidCommitCalldata)?;
    let version = CodecVersion::try_from(call.version())?;
    let chunks = decode_chunks(version, call.chunks())?;
    let ranges: Vec<_> = chunks.iter().filter_map(Chunk::block_range).collect();
    if ranges.is_empty() {
        return Err(RollupSyncError::EmptyBatch(batch_index))
    }
    Ok((version, ranges))
}

/// Validates the finalized batch against the batch recomputed from the local chain.
///
/// Returns the last block of the batch along the new [`FinalizedBatchMeta`].
pub fn validate_batch(
    version: CodecVersion,
    event: &FinalizeBatchEvent,
    parent: &FinalizedBatchMeta,
    chunks: &[BatchChunk],
    local_roots: LocalRoots,
) -> Result<(u64, FinalizedBatchMeta), RollupSyncError> {
    let batch_index = event.batch_index;
    let last_block_number = chunks
        .last()
        .and_then(BatchChunk::block_range)
        .map(|range| range.end_block_number)
        .ok_or(RollupSyncError::EmptyBatch(batch_index))?;

    let header = BatchHeader::new(
        version.as_u8(),
        batch_index,
        parent.total_l1_message_popped,
        parent.batch_hash,
        chunks,
    )?;
    let batch_hash = header.hash();

    if batch_hash != event.batch_hash {
        return Err(RollupSyncError::BatchHashMismatch {
            batch_index,
            local: batch_hash,
            finalized: event.batch_hash,
        })
    }
    if local_roots.state_root != event.state_root {
        return Err(RollupSyncError::StateRootMismatch {
            batch_index,
            local: local_roots.state_root,
            finalized: event.state_root,
        })
    }
    if local_roots.withdraw_root != event.withdraw_root {
        return Err(RollupSyncError::WithdrawRootMismatch {
            batch_index,
            local: local_roots.withdraw_root,
            finalized: event.withdraw_root,
        })
    }

    let meta = FinalizedBatchMeta {
        batch_index,
        batch_hash,
        total_l1_message_popped: header.total_l1_message_popped,
        state_root: local_roots.state_root,
        withdraw_root: local_roots.withdraw_root,
    };
    Ok((last_block_number, meta))
}

/// Reads the blocks of the chunk ranges from the local chain and builds the chunks of the batch.
///
/// Returns the chunks along the roots of the last block.
pub async fn build_batch_chunks<R: L2BlockReader>(
    reader: &R,
    ranges: &[ChunkBlockRange],
    total_l1_message_popped_before: u64,
) -> Result<(Vec<BatchChunk>, LocalRoots), RollupSyncError> {
    let mut total_l1_message_popped = total_l1_message_popped_before;
    let mut local_roots = LocalRoots::default();
    let mut chunks = Vec::with_capacity(ranges.len());

    for range in ranges {
        let mut blocks = Vec::new();
        for number in range.blocks() {
            let block = reader
                .executed_block(number)
                .await?
                .ok_or(RollupSyncError::MissingLocalBlock(number))?;
            let context = BlockContext::from_block(
                block.number,
                block.timestamp,
                block.base_fee,
                block.gas_limit,
                &block.transactions,
                total_l1_message_popped,
            )
            .map_err(CodecError::from)?;

            total_l1_message_popped += context.num_l1_messages as u64;
            local_roots =
                LocalRoots { state_root: block.state_root, withdraw_root: block.withdraw_root };
            blocks.push(BatchBlock::new(context, block.transactions));
        }
        chunks.push(BatchChunk::new(blocks));
    }

    Ok((chunks, local_roots))
}
