use crate::{CommitBatch, DaEntry, DaQueue, DerivationPipelineError, FinalizeBatch};
use std::collections::BTreeMap;

use rollup_node_providers::{L1Client, L1Provider};

/// A committed batch resolved by its finalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBatch {
    /// The commit of the batch.
    pub commit: CommitBatch,
    /// The finalization of the batch.
    pub finalize: FinalizeBatch,
    /// The L1 block the pipeline can safely restart from once the batch is derived, minus one.
    pub safe_l1_block: u64,
}

/// Tracks the pending batches and resolves them on finalization.
#[derive(Debug)]
pub struct BatchQueue<C, M> {
    da_queue: DaQueue<C, M>,
    /// The committed but not yet finalized batches.
    pending: BTreeMap<u64, CommitBatch>,
    /// The index of the last batch durably derived.
    derived_batch_index: Option<u64>,
}

impl<C, M> BatchQueue<C, M>
where
    C: L1Client + Clone,
    M: L1Provider + Clone,
{
    /// Returns a new batch queue. Batches at or below `derived_batch_index` are ignored.
    pub const fn new(da_queue: DaQueue<C, M>, derived_batch_index: Option<u64>) -> Self {
        Self { da_queue, pending: BTreeMap::new(), derived_batch_index }
    }

    /// Returns the next finalized batch, or `None` if no batch could be resolved from the
    /// available L1 data.
    pub async fn next_batch(&mut self) -> Result<Option<ResolvedBatch>, DerivationPipelineError> {
        while let Some(entry) = self.da_queue.next_da().await? {
            if self.derived_batch_index.is_some_and(|index| entry.batch_index() <= index) {
                tracing::trace!(target: "scroll::derivation_pipeline", batch_index = entry.batch_index(), "skipping derived batch");
                continue
            }

            match entry {
                DaEntry::Commit(commit) => {
                    if let Some(previous) = self.pending.insert(commit.batch_index, commit) {
                        tracing::debug!(target: "scroll::derivation_pipeline", batch_index = previous.batch_index, "overwriting pending batch");
                    }
                }
                DaEntry::Revert(revert) => {
                    self.pending.remove(&revert.batch_index);
                }
                DaEntry::Finalize(finalize) => {
                    let commit = self
                        .pending
                        .remove(&finalize.batch_index)
                        .ok_or(DerivationPipelineError::UnknownBatch(finalize.batch_index))?;
                    let safe_l1_block = self
                        .pending
                        .values()
                        .map(|commit| commit.l1_block_number)
                        .chain(std::iter::once(finalize.l1_block_number))
                        .min()
                        .unwrap_or(finalize.l1_block_number)
                        .saturating_sub(1);

                    tracing::debug!(target: "scroll::derivation_pipeline", batch_index = finalize.batch_index, safe_l1_block, "resolved batch");
                    return Ok(Some(ResolvedBatch { commit, finalize, safe_l1_block }))
                }
            }
        }

        Ok(None)
    }

    /// Returns the amount of pending batches.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{test_utils::*, DataSourceConfig, DataSourceFactory};
    use std::sync::Arc;

    use alloy_primitives::{Bytes, B256};
    use rollup_node_providers::test_utils::{MockL1Client, MockL1Provider};

    fn batch_queue(
        client: Arc<MockL1Client>,
        derived_batch_index: Option<u64>,
    ) -> BatchQueue<Arc<MockL1Client>, Arc<MockL1Provider>> {
        let config = DataSourceConfig {
            scroll_chain_address: SCROLL_CHAIN_ADDRESS,
            blob_activation_height: 1_000,
            fetch_range: 100,
        };
        let messages = Arc::new(MockL1Provider::new([l1_message(0), l1_message(1)]));
        let factory = DataSourceFactory::new(client, messages, config);
        BatchQueue::new(DaQueue::new(factory, 0), derived_batch_index)
    }

    fn empty_commit_calldata(batch_index: u64) -> Bytes {
        let chunk = encode_chunk_v0(&[context(batch_index * 10, 0, 0)], &[]);
        commit_calldata(&parent_header(batch_index - 1, 2), vec![chunk], vec![])
    }

    #[tokio::test]
    async fn test_should_resolve_finalized_commit() -> eyre::Result<()> {
        let client = Arc::new(MockL1Client::new(1, 100));
        client.add_log(commit_log(5, 10, 0), empty_commit_calldata(5));
        client.add_log(finalize_log(5, B256::ZERO, 12, 0), Bytes::new());
        let mut queue = batch_queue(client, None);

        let batch = queue.next_batch().await?.expect("resolved batch");
        assert_eq!(batch.commit.batch_index, 5);
        assert_eq!(batch.finalize.batch_index, 5);
        assert_eq!(batch.safe_l1_block, 11);
        assert_eq!(queue.pending_len(), 0);
        assert!(queue.next_batch().await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_should_fail_on_finalize_without_commit() {
        let client = Arc::new(MockL1Client::new(1, 100));
        client.add_log(finalize_log(5, B256::ZERO, 12, 0), Bytes::new());
        let mut queue = batch_queue(client, None);

        assert!(matches!(queue.next_batch().await, Err(DerivationPipelineError::UnknownBatch(5))));
    }

    #[tokio::test]
    async fn test_should_forget_reverted_commit() {
        let client = Arc::new(MockL1Client::new(1, 100));
        client.add_log(commit_log(5, 10, 0), empty_commit_calldata(5));
        client.add_log(revert_log(5, 11, 0), Bytes::new());
        client.add_log(finalize_log(5, B256::ZERO, 12, 0), Bytes::new());
        let mut queue = batch_queue(client, None);

        assert!(matches!(queue.next_batch().await, Err(DerivationPipelineError::UnknownBatch(5))));
    }

    #[tokio::test]
    async fn test_should_checkpoint_before_oldest_pending_commit() -> eyre::Result<()> {
        let client = Arc::new(MockL1Client::new(1, 100));
        client.add_log(commit_log(5, 10, 0), empty_commit_calldata(5));
        client.add_log(commit_log(6, 11, 0), empty_commit_calldata(6));
        client.add_log(finalize_log(5, B256::ZERO, 20, 0), Bytes::new());
        let mut queue = batch_queue(client, None);

        let batch = queue.next_batch().await?.expect("resolved batch");
        assert_eq!(batch.commit.batch_index, 5);
        assert_eq!(batch.safe_l1_block, 10);
        assert_eq!(queue.pending_len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_should_skip_derived_batches() -> eyre::Result<()> {
        let client = Arc::new(MockL1Client::new(1, 100));
        add_two_batches(&client);
        let mut queue = batch_queue(client, Some(0));

        let batch = queue.next_batch().await?.expect("resolved batch");
        assert_eq!(batch.commit.batch_index, 1);
        assert_eq!(batch.safe_l1_block, 12);

        Ok(())
    }
}
