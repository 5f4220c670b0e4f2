//! Chunk implementations.

use crate::{BlockContext, CodecVersion, DecodingError};

use alloy_primitives::{bytes::BufMut, keccak256, Bytes, B256};
use rollup_node_primitives::{ChunkBlockRange, L2Transaction, TxL1Message};
use std::vec::Vec;

/// The L2 transactions of a chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkTransactions {
    /// A flat list of the L2 transactions of all the blocks in the chunk.
    Flat(Vec<Bytes>),
    /// The L2 transactions segmented per block.
    PerBlock(Vec<Vec<Bytes>>),
}

/// A chunk decoded from the commit calldata.
///
/// The chunk only contains the L2 transactions. The L1 messages of each block are referenced by
/// the count in the block context and resolved from the L1 message queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// The contexts of the blocks in the chunk.
    pub blocks: Vec<BlockContext>,
    /// The L2 transactions of the chunk.
    pub transactions: ChunkTransactions,
}

impl Chunk {
    /// Returns the block contexts of the chunk along the L2 transactions of each block.
    ///
    /// Fails if the transactions of the chunk do not match the counts declared by the contexts.
    pub fn l2_blocks(&self) -> Result<Vec<(&BlockContext, &[Bytes])>, DecodingError> {
        let expected: usize = self.blocks.iter().map(BlockContext::l2_transactions_count).sum();
        let mismatch = |got| DecodingError::TransactionCountMismatch { expected, got };

        match &self.transactions {
            ChunkTransactions::Flat(txs) => {
                if txs.len() != expected {
                    return Err(mismatch(txs.len()))
                }
                let mut remaining = txs.as_slice();
                Ok(self
                    .blocks
                    .iter()
                    .map(|context| {
                        let (block_txs, rest) = remaining.split_at(context.l2_transactions_count());
                        remaining = rest;
                        (context, block_txs)
                    })
                    .collect())
            }
            ChunkTransactions::PerBlock(txs) => {
                let got = txs.iter().map(Vec::len).sum();
                let consistent = txs.len() == self.blocks.len() &&
                    self.blocks
                        .iter()
                        .zip(txs)
                        .all(|(context, block_txs)| context.l2_transactions_count() == block_txs.len());
                if !consistent {
                    return Err(mismatch(got))
                }
                Ok(self.blocks.iter().zip(txs).map(|(context, txs)| (context, txs.as_slice())).collect())
            }
        }
    }

    /// Returns the block range covered by the chunk.
    pub fn block_range(&self) -> Option<ChunkBlockRange> {
        let start = self.blocks.first()?.number;
        let end = self.blocks.last()?.number;
        Some(ChunkBlockRange::new(start, end))
    }

    /// Returns the amount of L1 messages popped by the chunk.
    pub fn l1_message_popped(&self) -> u64 {
        self.blocks.iter().map(|b| b.num_l1_messages as u64).sum()
    }
}

/// Sums the L1 message count of every block in the chunks.
pub fn count_total_l1_message_popped(chunks: &[Chunk]) -> u64 {
    chunks.iter().map(Chunk::l1_message_popped).sum()
}

/// A block with its context and full list of transactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchBlock {
    /// The context of the block.
    pub context: BlockContext,
    /// The transactions of the block, L1 messages first.
    pub transactions: Vec<L2Transaction>,
}

impl BatchBlock {
    /// Returns a new [`BatchBlock`].
    pub const fn new(context: BlockContext, transactions: Vec<L2Transaction>) -> Self {
        Self { context, transactions }
    }

    /// Returns an iterator over the L1 messages of the block.
    pub fn l1_messages(&self) -> impl Iterator<Item = &TxL1Message> + '_ {
        self.transactions.iter().filter_map(L2Transaction::as_l1_message)
    }
}

/// A chunk with the full transaction list of its blocks, used to compute commitments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchChunk {
    /// The blocks of the chunk.
    pub blocks: Vec<BatchBlock>,
}

impl BatchChunk {
    /// Returns a new [`BatchChunk`].
    pub const fn new(blocks: Vec<BatchBlock>) -> Self {
        Self { blocks }
    }

    /// Returns the block range covered by the chunk.
    pub fn block_range(&self) -> Option<ChunkBlockRange> {
        let start = self.blocks.first()?.context.number;
        let end = self.blocks.last()?.context.number;
        Some(ChunkBlockRange::new(start, end))
    }

    /// Computes the data hash of the chunk.
    ///
    /// The hash commits to the block contexts and the hashes of the L1 messages of each block.
    /// V0 additionally commits to the hashes of the L2 transactions.
    pub fn data_hash(&self, version: CodecVersion) -> B256 {
        let mut bytes = Vec::with_capacity(self.blocks.len() * BlockContext::BYTES_LENGTH);
        for block in &self.blocks {
            bytes.put_slice(&block.context.encode()[..BlockContext::HASHED_BYTES_LENGTH]);
        }

        for block in &self.blocks {
            for tx in block.l1_messages() {
                bytes.put_slice(tx.tx_hash().as_slice());
            }
            if version == CodecVersion::V0 {
                for tx in block.transactions.iter().filter(|tx| !tx.is_l1_message()) {
                    bytes.put_slice(tx.tx_hash().as_slice());
                }
            }
        }

        keccak256(bytes)
    }
}
