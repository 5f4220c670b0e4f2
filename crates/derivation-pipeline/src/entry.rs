use alloy_eips::eip4844::Blob;
use alloy_primitives::B256;
use rollup_node_primitives::TxL1Message;
use scroll_codec::{BatchHeader, Chunk, CodecVersion};
use std::sync::Arc;

/// An entry of data read from the L1, in the order it was emitted.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::From)]
pub enum DaEntry {
    /// A batch was committed.
    Commit(CommitBatch),
    /// A committed batch was reverted.
    Revert(RevertBatch),
    /// A committed batch was finalized.
    Finalize(FinalizeBatch),
}

impl DaEntry {
    /// Returns the index of the batch the entry refers to.
    pub const fn batch_index(&self) -> u64 {
        match self {
            Self::Commit(commit) => commit.batch_index,
            Self::Revert(revert) => revert.batch_index,
            Self::Finalize(finalize) => finalize.batch_index,
        }
    }

    /// Returns the number of the L1 block the entry was emitted in.
    pub const fn l1_block_number(&self) -> u64 {
        match self {
            Self::Commit(commit) => commit.l1_block_number,
            Self::Revert(revert) => revert.l1_block_number,
            Self::Finalize(finalize) => finalize.l1_block_number,
        }
    }
}

/// A committed batch, along the L1 messages it includes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitBatch {
    /// The codec version of the batch.
    pub version: CodecVersion,
    /// The index of the batch.
    pub batch_index: u64,
    /// The header of the parent batch, absent for the genesis batch.
    pub parent_batch_header: Option<BatchHeader>,
    /// The skipped L1 message bitmap of the batch.
    pub skipped_l1_message_bitmap: Vec<u8>,
    /// The chunks of the batch.
    pub chunks: Vec<Chunk>,
    /// The L1 messages included in the batch, in queue order. Skipped messages are absent.
    pub l1_messages: Vec<TxL1Message>,
    /// The versioned hash of the blob carrying the batch data, for blob-era commits.
    pub blob_versioned_hash: Option<B256>,
    /// The blob carrying the batch data, for blob-era commits.
    pub blob: Option<Arc<Blob>>,
    /// The number of the L1 block the commit was emitted in.
    pub l1_block_number: u64,
}

impl CommitBatch {
    /// Returns the genesis commit: no chunks, no L1 messages and no parent.
    pub const fn genesis(l1_block_number: u64) -> Self {
        Self {
            version: CodecVersion::V0,
            batch_index: 0,
            parent_batch_header: None,
            skipped_l1_message_bitmap: Vec::new(),
            chunks: Vec::new(),
            l1_messages: Vec::new(),
            blob_versioned_hash: None,
            blob: None,
            l1_block_number,
        }
    }

    /// Returns the total amount of L1 messages popped before the batch.
    pub fn total_l1_message_popped_before(&self) -> u64 {
        self.parent_batch_header.as_ref().map(|parent| parent.total_l1_message_popped).unwrap_or_default()
    }
}

/// A reverted batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevertBatch {
    /// The index of the batch.
    pub batch_index: u64,
    /// The number of the L1 block the revert was emitted in.
    pub l1_block_number: u64,
}

/// A finalized batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalizeBatch {
    /// The index of the batch.
    pub batch_index: u64,
    /// The hash of the batch.
    pub batch_hash: B256,
    /// The state root after the batch.
    pub state_root: B256,
    /// The withdraw root after the batch.
    pub withdraw_root: B256,
    /// The number of the L1 block the finalization was emitted in.
    pub l1_block_number: u64,
}
