use super::{L1Block, L1Client, L1Log, L1LogFilter, L1ProviderError, L1Transaction};

use alloy_eips::BlockNumberOrTag;
use alloy_network::{Ethereum, TransactionResponse};
use alloy_primitives::B256;
use alloy_provider::Provider;
use alloy_rpc_types_eth::{Filter, Log, Transaction, TransactionTrait};

/// An [`L1Client`] backed by an alloy [`Provider`].
///
/// The provider should implement some backoff strategy using
/// [`alloy_transport::layers::RetryBackoffLayer`] in the client/transport in order to avoid
/// excessive queries on the RPC provider.
#[derive(Debug, Clone)]
pub struct AlloyL1Client<P> {
    provider: P,
}

impl<P> AlloyL1Client<P> {
    /// Returns a new [`AlloyL1Client`] wrapping the provider.
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }
}

impl TryFrom<Log> for L1Log {
    type Error = L1ProviderError;

    fn try_from(log: Log) -> Result<Self, Self::Error> {
        Ok(Self {
            address: log.address(),
            topics: log.topics().to_vec(),
            data: log.data().data.clone(),
            block_number: log.block_number.ok_or(L1ProviderError::MissingLogField("block number"))?,
            block_hash: log.block_hash.ok_or(L1ProviderError::MissingLogField("block hash"))?,
            transaction_hash: log
                .transaction_hash
                .ok_or(L1ProviderError::MissingLogField("transaction hash"))?,
            log_index: log.log_index.ok_or(L1ProviderError::MissingLogField("log index"))?,
        })
    }
}

impl From<&Transaction> for L1Transaction {
    fn from(tx: &Transaction) -> Self {
        Self {
            hash: tx.tx_hash(),
            input: tx.input().clone(),
            blob_versioned_hashes: tx.blob_versioned_hashes().map(<[B256]>::to_vec).unwrap_or_default(),
        }
    }
}

#[async_trait::async_trait]
impl<P> L1Client for AlloyL1Client<P>
where
    P: Provider<Ethereum> + Send + Sync,
{
    async fn filter_logs(&self, filter: L1LogFilter) -> Result<Vec<L1Log>, L1ProviderError> {
        let filter = Filter::new()
            .address(filter.address)
            .event_signature(filter.event_signatures)
            .from_block(filter.from_block)
            .to_block(filter.to_block);
        tracing::trace!(target: "scroll::providers", ?filter, "fetching logs");

        let mut logs = self
            .provider
            .get_logs(&filter)
            .await?
            .into_iter()
            .map(L1Log::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        logs.sort_by_key(|log| (log.block_number, log.log_index));

        Ok(logs)
    }

    async fn transaction_by_hash(
        &self,
        hash: B256,
    ) -> Result<Option<L1Transaction>, L1ProviderError> {
        Ok(self.provider.get_transaction_by_hash(hash).await?.as_ref().map(Into::into))
    }

    async fn block_by_hash(&self, hash: B256) -> Result<Option<L1Block>, L1ProviderError> {
        let Some(block) = self.provider.get_block_by_hash(hash).full().await? else {
            return Ok(None)
        };
        let transactions = block
            .transactions
            .as_transactions()
            .map(|txs| txs.iter().map(Into::into).collect())
            .unwrap_or_default();

        Ok(Some(L1Block {
            hash: block.header.hash,
            number: block.header.number,
            timestamp: block.header.timestamp,
            transactions,
        }))
    }

    async fn block_timestamp(&self, hash: B256) -> Result<u64, L1ProviderError> {
        self.provider
            .get_block_by_hash(hash)
            .await?
            .map(|block| block.header.timestamp)
            .ok_or(L1ProviderError::MissingBlock(hash))
    }

    async fn chain_id(&self) -> Result<u64, L1ProviderError> {
        Ok(self.provider.get_chain_id().await?)
    }

    async fn finalized_block_number(&self) -> Result<u64, L1ProviderError> {
        self.provider
            .get_block_by_number(BlockNumberOrTag::Finalized)
            .await?
            .map(|block| block.header.number)
            .ok_or(L1ProviderError::MissingFinalizedBlock)
    }
}
