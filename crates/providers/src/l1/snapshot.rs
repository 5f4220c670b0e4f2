use super::{L1Block, L1Client, L1Log, L1LogFilter, L1ProviderError, L1Transaction};

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, path::Path};

/// A recorded view of the L1, replayed by the [`SnapshotL1Client`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct L1Snapshot {
    /// The chain id of the recorded L1.
    pub chain_id: u64,
    /// The finalized block at the time of the recording.
    pub finalized_block_number: u64,
    /// The recorded logs.
    pub logs: Vec<L1Log>,
    /// The recorded transactions.
    pub transactions: Vec<L1Transaction>,
    /// The recorded blocks.
    #[serde(default)]
    pub blocks: Vec<L1Block>,
}

/// An [`L1Client`] replaying a recorded [`L1Snapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotL1Client {
    chain_id: u64,
    finalized_block_number: u64,
    logs: Vec<L1Log>,
    transactions: HashMap<B256, L1Transaction>,
    blocks: HashMap<B256, L1Block>,
}

impl SnapshotL1Client {
    /// Loads the JSON snapshot at the path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, L1ProviderError> {
        let path = path.as_ref();
        tracing::info!(target: "scroll::providers", ?path, "loading L1 snapshot");
        let raw = std::fs::read(path)?;
        Ok(serde_json::from_slice::<L1Snapshot>(&raw)?.into())
    }
}

impl From<L1Snapshot> for SnapshotL1Client {
    fn from(snapshot: L1Snapshot) -> Self {
        let mut logs = snapshot.logs;
        logs.sort_by_key(|log| (log.block_number, log.log_index));

        Self {
            chain_id: snapshot.chain_id,
            finalized_block_number: snapshot.finalized_block_number,
            logs,
            transactions: snapshot.transactions.into_iter().map(|tx| (tx.hash, tx)).collect(),
            blocks: snapshot.blocks.into_iter().map(|block| (block.hash, block)).collect(),
        }
    }
}

#[async_trait::async_trait]
impl L1Client for SnapshotL1Client {
    async fn filter_logs(&self, filter: L1LogFilter) -> Result<Vec<L1Log>, L1ProviderError> {
        Ok(self.logs.iter().filter(|log| filter.matches(log)).cloned().collect())
    }

    async fn transaction_by_hash(
        &self,
        hash: B256,
    ) -> Result<Option<L1Transaction>, L1ProviderError> {
        Ok(self.transactions.get(&hash).cloned())
    }

    async fn block_by_hash(&self, hash: B256) -> Result<Option<L1Block>, L1ProviderError> {
        Ok(self.blocks.get(&hash).cloned())
    }

    async fn chain_id(&self) -> Result<u64, L1ProviderError> {
        Ok(self.chain_id)
    }

    async fn finalized_block_number(&self) -> Result<u64, L1ProviderError> {
        Ok(self.finalized_block_number)
    }
}
