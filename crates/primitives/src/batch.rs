use alloy_primitives::B256;

/// The running checkpoint of the last finalized and validated batch.
///
/// A new [`FinalizedBatchMeta`] is produced for every validated finalize event, the previous
/// value is never mutated.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct FinalizedBatchMeta {
    /// The index of the finalized batch.
    pub batch_index: u64,
    /// The hash of the finalized batch.
    pub batch_hash: B256,
    /// The total amount of L1 messages popped after the batch.
    pub total_l1_message_popped: u64,
    /// The state root after the last block of the batch.
    pub state_root: B256,
    /// The withdraw root after the last block of the batch.
    pub withdraw_root: B256,
}

/// The inclusive range of L2 block numbers covered by a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[display("[{start_block_number}, {end_block_number}]")]
pub struct ChunkBlockRange {
    /// The first block number of the chunk.
    pub start_block_number: u64,
    /// The last block number of the chunk.
    pub end_block_number: u64,
}

impl ChunkBlockRange {
    /// Returns a new [`ChunkBlockRange`].
    pub const fn new(start_block_number: u64, end_block_number: u64) -> Self {
        Self { start_block_number, end_block_number }
    }

    /// Returns the block numbers of the range.
    pub const fn blocks(&self) -> core::ops::RangeInclusive<u64> {
        self.start_block_number..=self.end_block_number
    }
}
