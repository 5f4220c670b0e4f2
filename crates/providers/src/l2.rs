use alloy_consensus::Header;
use alloy_primitives::{Bloom, B256, U256};
use rollup_node_primitives::{BlockInfo, DerivedBlock, L2Transaction};

/// An error returned by the L2 chain collaborators.
#[derive(Debug, thiserror::Error)]
pub enum L2ChainError {
    /// The chain rejected the block.
    #[error("failed to insert block {index}: {reason}")]
    Insertion {
        /// The number of the rejected block.
        index: u64,
        /// The reason for the rejection.
        reason: String,
    },
    /// The chain failed to preprocess the block.
    #[error("failed to preprocess block: {0}")]
    Preprocess(String),
    /// Any other chain error.
    #[error("{0}")]
    Other(String),
}

/// The execution derived fields of a block, computed by the chain ahead of insertion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreprocessedBlock {
    /// The receipts root of the block.
    pub receipts_root: B256,
    /// The logs bloom of the block.
    pub logs_bloom: Bloom,
    /// The state root after the block.
    pub state_root: B256,
    /// The gas used by the block.
    pub gas_used: u64,
}

/// A block executed by the local chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutedBlock {
    /// The block number.
    pub number: u64,
    /// The block timestamp.
    pub timestamp: u64,
    /// The block base fee.
    pub base_fee: U256,
    /// The block gas limit.
    pub gas_limit: u64,
    /// The transactions of the block.
    pub transactions: Vec<L2Transaction>,
    /// The local state root after the block.
    pub state_root: B256,
    /// The local withdraw trie root after the block.
    pub withdraw_root: B256,
}

/// The chain the derived blocks are inserted into.
#[async_trait::async_trait]
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait L2Chain: Send + Sync {
    /// Returns the current head of the chain.
    async fn current_head(&self) -> Result<BlockInfo, L2ChainError>;

    /// Executes the block without inserting it and returns the execution derived fields.
    async fn preprocess_block(
        &self,
        block: &DerivedBlock,
    ) -> Result<PreprocessedBlock, L2ChainError>;

    /// Inserts the unsealed block and returns the new head.
    async fn insert_unsealed(
        &self,
        header: Header,
        transactions: Vec<L2Transaction>,
    ) -> Result<BlockInfo, L2ChainError>;
}

/// Read access to the blocks executed by the local chain.
#[async_trait::async_trait]
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait L2BlockReader: Send + Sync {
    /// Returns the executed block for the number, if any.
    async fn executed_block(&self, number: u64) -> Result<Option<ExecutedBlock>, L2ChainError>;
}
