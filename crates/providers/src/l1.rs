use alloy_eips::eip4844::Blob;
use alloy_json_rpc::RpcError;
use alloy_primitives::{Address, Bytes, B256};
use alloy_transport::TransportErrorKind;
use rollup_node_primitives::TxL1Message;
use scroll_db::DatabaseError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

mod alloy;
pub use alloy::AlloyL1Client;

mod blob;
pub use blob::{BeaconClientProvider, BlobProvider, MockBeaconProvider};

mod message;
pub use message::{DatabaseL1MessageProvider, L1MessageProvider};

mod snapshot;
pub use snapshot::{L1Snapshot, SnapshotL1Client};

/// An error occurring at one of the L1 providers.
#[derive(Debug, thiserror::Error)]
pub enum L1ProviderError {
    /// L1 RPC error.
    #[error(transparent)]
    Rpc(#[from] RpcError<TransportErrorKind>),
    /// Database error.
    #[error(transparent)]
    Database(#[from] DatabaseError),
    /// Error at the beacon provider.
    #[error("beacon provider error: {0}")]
    BeaconProvider(#[from] reqwest::Error),
    /// The block timestamp precedes the beacon genesis.
    #[error("invalid block timestamp: genesis {genesis}, provided {timestamp}")]
    InvalidBlockTimestamp {
        /// The genesis timestamp of the beacon chain.
        genesis: u64,
        /// The provided block timestamp.
        timestamp: u64,
    },
    /// The requested block does not exist.
    #[error("unknown block {0}")]
    MissingBlock(B256),
    /// The L1 has no finalized block.
    #[error("missing finalized block")]
    MissingFinalizedBlock,
    /// The transaction could not be found by hash nor in its block.
    #[error("transaction {tx_hash} not found in block {block_hash}")]
    TransactionNotFound {
        /// The hash of the transaction.
        tx_hash: B256,
        /// The hash of the block the transaction was searched in.
        block_hash: B256,
    },
    /// A log returned by the L1 misses a field.
    #[error("missing {0} for log")]
    MissingLogField(&'static str),
    /// The snapshot file could not be read.
    #[error("failed to read snapshot: {0}")]
    SnapshotIo(#[from] std::io::Error),
    /// The snapshot file could not be parsed.
    #[error("failed to parse snapshot: {0}")]
    SnapshotFormat(#[from] serde_json::Error),
}

/// A log filter over an inclusive range of L1 blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct L1LogFilter {
    /// The address of the emitting contract.
    pub address: Address,
    /// The accepted event signatures.
    pub event_signatures: Vec<B256>,
    /// The first block of the range.
    pub from_block: u64,
    /// The last block of the range.
    pub to_block: u64,
}

impl L1LogFilter {
    /// Returns true if the log matches the filter.
    pub fn matches(&self, log: &L1Log) -> bool {
        log.address == self.address &&
            (self.from_block..=self.to_block).contains(&log.block_number) &&
            log.topics.first().is_some_and(|topic| self.event_signatures.contains(topic))
    }
}

/// A log emitted on L1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct L1Log {
    /// The address of the emitting contract.
    pub address: Address,
    /// The topics of the log.
    pub topics: Vec<B256>,
    /// The data of the log.
    pub data: Bytes,
    /// The number of the block containing the log.
    pub block_number: u64,
    /// The hash of the block containing the log.
    pub block_hash: B256,
    /// The hash of the transaction that emitted the log.
    pub transaction_hash: B256,
    /// The index of the log in the block.
    pub log_index: u64,
}

/// An L1 transaction, reduced to the fields needed for derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct L1Transaction {
    /// The hash of the transaction.
    pub hash: B256,
    /// The calldata of the transaction.
    pub input: Bytes,
    /// The versioned hashes of the blobs carried by the transaction.
    #[serde(default)]
    pub blob_versioned_hashes: Vec<B256>,
}

/// An L1 block along its transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct L1Block {
    /// The hash of the block.
    pub hash: B256,
    /// The number of the block.
    pub number: u64,
    /// The timestamp of the block.
    #[serde(default)]
    pub timestamp: u64,
    /// The transactions of the block.
    pub transactions: Vec<L1Transaction>,
}

/// The L1 transport used to fetch the rollup events and their calldata.
#[async_trait::async_trait]
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait L1Client: Send + Sync {
    /// Returns the logs matching the filter, ordered by block number and log index.
    async fn filter_logs(&self, filter: L1LogFilter) -> Result<Vec<L1Log>, L1ProviderError>;

    /// Returns the transaction for the hash.
    async fn transaction_by_hash(
        &self,
        hash: B256,
    ) -> Result<Option<L1Transaction>, L1ProviderError>;

    /// Returns the block for the hash, along its transactions.
    async fn block_by_hash(&self, hash: B256) -> Result<Option<L1Block>, L1ProviderError>;

    /// Returns the chain id of the L1.
    async fn chain_id(&self) -> Result<u64, L1ProviderError>;

    /// Returns the number of the latest finalized L1 block.
    async fn finalized_block_number(&self) -> Result<u64, L1ProviderError>;

    /// Returns the transaction that emitted the log.
    ///
    /// Falls back to searching the transaction in the block of the log if the transaction is not
    /// indexed by the L1 node.
    async fn transaction(&self, log: &L1Log) -> Result<L1Transaction, L1ProviderError> {
        if let Some(tx) = self.transaction_by_hash(log.transaction_hash).await? {
            return Ok(tx)
        }
        tracing::debug!(target: "scroll::providers", tx_hash = ?log.transaction_hash, block_number = log.block_number, "transaction not indexed, fetching the block");

        let block = self
            .block_by_hash(log.block_hash)
            .await?
            .ok_or(L1ProviderError::MissingBlock(log.block_hash))?;
        block.transactions.into_iter().find(|tx| tx.hash == log.transaction_hash).ok_or(
            L1ProviderError::TransactionNotFound {
                tx_hash: log.transaction_hash,
                block_hash: log.block_hash,
            },
        )
    }

    /// Returns the calldata of the transaction that emitted the log.
    async fn transaction_input(&self, log: &L1Log) -> Result<Bytes, L1ProviderError> {
        Ok(self.transaction(log).await?.input)
    }

    /// Returns the timestamp of the block.
    async fn block_timestamp(&self, hash: B256) -> Result<u64, L1ProviderError> {
        self.block_by_hash(hash)
            .await?
            .map(|block| block.timestamp)
            .ok_or(L1ProviderError::MissingBlock(hash))
    }
}

/// An instance of the trait can be used to provide the L1 data referenced by the commits: L1
/// messages and blobs.
pub trait L1Provider: BlobProvider + L1MessageProvider {}
impl<T> L1Provider for T where T: BlobProvider + L1MessageProvider {}

/// An [`L1Provider`] combining an [`L1MessageProvider`] and a [`BlobProvider`].
#[derive(Debug, Clone)]
pub struct FullL1Provider<M, B> {
    l1_message_provider: M,
    blob_provider: B,
}

impl<M, B> FullL1Provider<M, B> {
    /// Returns a new [`FullL1Provider`] from the providers.
    pub const fn new(l1_message_provider: M, blob_provider: B) -> Self {
        Self { l1_message_provider, blob_provider }
    }
}

#[async_trait::async_trait]
impl<M: L1MessageProvider, B: BlobProvider> L1MessageProvider for FullL1Provider<M, B> {
    async fn get_l1_message(
        &self,
        queue_index: u64,
    ) -> Result<Option<TxL1Message>, L1ProviderError> {
        self.l1_message_provider.get_l1_message(queue_index).await
    }
}

#[async_trait::async_trait]
impl<M: L1MessageProvider, B: BlobProvider> BlobProvider for FullL1Provider<M, B> {
    async fn blob(
        &self,
        block_timestamp: u64,
        hash: B256,
    ) -> Result<Option<Arc<Blob>>, L1ProviderError> {
        self.blob_provider.blob(block_timestamp, hash).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockL1Client, MockL1Provider};
    use alloy_primitives::bytes;

    fn log(tx_hash: B256) -> L1Log {
        L1Log {
            address: Address::ZERO,
            topics: vec![],
            data: Bytes::new(),
            block_number: 5,
            block_hash: B256::repeat_byte(5),
            transaction_hash: tx_hash,
            log_index: 0,
        }
    }

    #[tokio::test]
    async fn test_should_propagate_transaction_lookup_error() -> eyre::Result<()> {
        let client = MockL1Client::new(1, 10);
        let log = log(B256::repeat_byte(1));
        // the transaction is reachable through its block, the fallback must not hide the error.
        client.add_log_with_unindexed_transaction(log.clone(), bytes!("01"));
        client.fail_next_transaction_calls(1);

        assert!(matches!(client.transaction_input(&log).await, Err(L1ProviderError::Rpc(_))));
        assert_eq!(client.transaction_input(&log).await?, bytes!("01"));

        Ok(())
    }

    #[tokio::test]
    async fn test_should_return_transaction_with_blob_hashes() -> eyre::Result<()> {
        let client = MockL1Client::new(1, 10);
        let log = log(B256::repeat_byte(2));
        let hashes = vec![B256::repeat_byte(0x01), B256::repeat_byte(0x02)];
        client.add_log_with_blobs(log.clone(), bytes!("02"), hashes.clone(), 1_700_000_000);

        let tx = client.transaction(&log).await?;
        assert_eq!(tx.input, bytes!("02"));
        assert_eq!(tx.blob_versioned_hashes, hashes);
        assert_eq!(client.block_timestamp(log.block_hash).await?, 1_700_000_000);

        Ok(())
    }

    #[tokio::test]
    async fn test_full_provider_combines_messages_and_blobs() -> eyre::Result<()> {
        let message = TxL1Message { queue_index: 4, ..Default::default() };
        let inner = MockL1Provider::new([message.clone()]);
        let hash = B256::repeat_byte(3);
        inner.add_blob(hash, Blob::repeat_byte(9));
        let inner = Arc::new(inner);
        let provider = FullL1Provider::new(inner.clone(), inner.clone());

        assert_eq!(provider.get_l1_message(4).await?, Some(message));
        assert_eq!(provider.blob(12, hash).await?.as_deref(), Some(&Blob::repeat_byte(9)));
        assert_eq!(provider.blob(12, B256::ZERO).await?, None);
        assert_eq!(*inner.blob_requests.lock(), vec![(12, hash), (12, B256::ZERO)]);
        assert_eq!(MockBeaconProvider.blob(12, hash).await?, None);

        Ok(())
    }
}
