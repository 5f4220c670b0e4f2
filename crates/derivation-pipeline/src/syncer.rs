use crate::DerivationPipelineError;

use alloy_consensus::{constants::EMPTY_OMMER_ROOT_HASH, proofs::ordered_trie_root_with_encoder, Header};
use alloy_primitives::{Address, U256};
use rollup_node_primitives::{BlockInfo, DerivedBlock, L2Transaction};
use rollup_node_providers::L2Chain;

/// Inserts the derived blocks one at a time in the chain.
#[derive(Debug, Clone)]
pub struct ChainSyncer<C> {
    chain: C,
}

impl<C: L2Chain> ChainSyncer<C> {
    /// Returns a new instance of the [`ChainSyncer`].
    pub const fn new(chain: C) -> Self {
        Self { chain }
    }

    /// Returns the current head of the chain.
    pub async fn head(&self) -> Result<BlockInfo, DerivationPipelineError> {
        self.chain.current_head().await.map_err(DerivationPipelineError::ChainHead)
    }

    /// Inserts the block on top of the chain head and returns the new head.
    ///
    /// The block must extend the head. The header fields not committed on L1 are computed by the
    /// chain when preprocessing the block.
    #[tracing::instrument(target = "scroll::derivation_pipeline", skip_all, fields(number = block.number))]
    pub async fn sync_one_block(
        &self,
        block: DerivedBlock,
    ) -> Result<BlockInfo, DerivationPipelineError> {
        let head = self.head().await?;
        if block.number != head.number + 1 {
            return Err(DerivationPipelineError::NonConsecutiveBlock {
                expected: head.number + 1,
                got: block.number,
            })
        }

        let index = block.number;
        let preprocessed = self
            .chain
            .preprocess_block(&block)
            .await
            .map_err(|source| DerivationPipelineError::Chain { index, source })?;

        let header = Header {
            parent_hash: head.hash,
            ommers_hash: EMPTY_OMMER_ROOT_HASH,
            beneficiary: Address::ZERO,
            state_root: preprocessed.state_root,
            transactions_root: transactions_root(&block.transactions),
            receipts_root: preprocessed.receipts_root,
            logs_bloom: preprocessed.logs_bloom,
            difficulty: U256::ZERO,
            number: block.number,
            gas_limit: block.gas_limit,
            gas_used: preprocessed.gas_used,
            timestamp: block.timestamp,
            base_fee_per_gas: None,
            ..Default::default()
        };

        let head = self
            .chain
            .insert_unsealed(header, block.transactions)
            .await
            .map_err(|source| DerivationPipelineError::Chain { index, source })?;
        tracing::trace!(target: "scroll::derivation_pipeline", %head, "inserted block");

        Ok(head)
    }
}

/// Returns the root of the trie of the EIP-2718 encoded transactions.
fn transactions_root(transactions: &[L2Transaction]) -> alloy_primitives::B256 {
    ordered_trie_root_with_encoder(transactions, |tx, buf| buf.extend_from_slice(&tx.encoded_2718()))
}
