use crate::{
    BatchCheckpoint, BatchQueue, BlockQueue, ChainSyncer, DaQueue, DataSourceConfig,
    DataSourceFactory, DerivationPipelineError, DerivationPipelineMetrics, ErrorKind, QueuedBlock,
};
use std::{sync::Arc, time::Duration};

use rollup_node_providers::{L1Client, L1Provider, L2Chain};
use scroll_db::{Database, DatabaseOperations, MetadataKey};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// The default interval between two derivation steps.
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(1);

/// The configuration of the [`SyncingPipeline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivationPipelineConfig {
    /// The configuration of the data sources.
    pub data_source: DataSourceConfig,
    /// The L1 block the Scroll Chain contract was deployed at.
    pub l1_deployment_block: u64,
    /// The interval between two derivation steps.
    pub sync_interval: Duration,
}

/// Derives the L2 chain from the data committed on L1 and inserts it in the chain.
///
/// The pipeline owns the queues. They are built from the durable checkpoint on the first step and
/// rebuilt after an error that leaves them in an unknown state.
#[derive(Debug)]
pub struct SyncingPipeline<C, M, L2> {
    factory: DataSourceFactory<C, M>,
    syncer: ChainSyncer<L2>,
    database: Arc<Database>,
    config: DerivationPipelineConfig,
    block_queue: Option<BlockQueue<C, M>>,
    metrics: DerivationPipelineMetrics,
}

impl<C, M, L2> SyncingPipeline<C, M, L2>
where
    C: L1Client + Clone,
    M: L1Provider + Clone,
    L2: L2Chain,
{
    /// Returns a new instance of the [`SyncingPipeline`].
    pub fn new(
        l1_client: C,
        l1_provider: M,
        chain: L2,
        database: Arc<Database>,
        config: DerivationPipelineConfig,
    ) -> Self {
        Self {
            factory: DataSourceFactory::new(l1_client, l1_provider, config.data_source),
            syncer: ChainSyncer::new(chain),
            database,
            config,
            block_queue: None,
            metrics: DerivationPipelineMetrics::default(),
        }
    }

    /// Runs the pipeline until the token is cancelled or an integrity error occurs.
    pub async fn run(mut self, token: CancellationToken) -> Result<(), DerivationPipelineError> {
        tracing::info!(target: "scroll::derivation_pipeline", config = ?self.config, "starting derivation pipeline");
        let mut interval = tokio::time::interval(self.config.sync_interval);

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = interval.tick() => {}
            }

            let result = tokio::select! {
                biased;
                _ = token.cancelled() => break,
                result = self.step() => result,
            };
            if let Err(err) = result {
                self.handle_error(err)?;
            }
        }

        tracing::info!(target: "scroll::derivation_pipeline", "stopping derivation pipeline");
        Ok(())
    }

    /// Derives and inserts all the available blocks. Returns the amount of inserted blocks.
    ///
    /// Blocks at or below the chain head were inserted before a restart and are skipped.
    #[tracing::instrument(target = "scroll::derivation_pipeline", skip_all)]
    pub async fn step(&mut self) -> Result<u64, DerivationPipelineError> {
        if self.block_queue.is_none() {
            self.block_queue = Some(self.build_block_queue().await?);
        }
        let Some(queue) = self.block_queue.as_mut() else { return Ok(0) };

        let start = Instant::now();
        let mut head = self.syncer.head().await?;
        let mut inserted = 0;

        while let Some(QueuedBlock { block, checkpoint }) = queue.next_block().await? {
            if block.number <= head.number {
                tracing::trace!(target: "scroll::derivation_pipeline", number = block.number, head = head.number, "skipping block below head");
            } else {
                head = self.syncer.sync_one_block(block).await?;
                inserted += 1;
                self.metrics.derived_blocks.increment(1);
                self.metrics.l2_head.set(head.number as f64);
            }

            if let Some(checkpoint) = checkpoint {
                write_checkpoint(&self.database, checkpoint).await?;
                self.metrics.derived_batches.increment(1);
                self.metrics.synced_l1_block.set(checkpoint.safe_l1_block as f64);
                tracing::info!(target: "scroll::derivation_pipeline", batch_index = checkpoint.batch_index, safe_l1_block = checkpoint.safe_l1_block, %head, "derived batch");
            }
        }

        if inserted > 0 {
            let elapsed = start.elapsed().as_secs_f64();
            self.metrics.blocks_per_second.set(inserted as f64 / elapsed.max(f64::EPSILON));
            tracing::debug!(target: "scroll::derivation_pipeline", inserted, elapsed, "derivation step done");
        }

        Ok(inserted)
    }

    /// Handles an error of a step depending on its [`ErrorKind`]. Returns the error if the
    /// pipeline must halt.
    pub fn handle_error(
        &mut self,
        err: DerivationPipelineError,
    ) -> Result<(), DerivationPipelineError> {
        match err.kind() {
            ErrorKind::Transport => {
                tracing::warn!(target: "scroll::derivation_pipeline", ?err, "derivation step failed, retrying");
            }
            ErrorKind::Rebuild => {
                tracing::warn!(target: "scroll::derivation_pipeline", ?err, "derivation step failed, rebuilding queues from checkpoint");
                self.block_queue = None;
            }
            ErrorKind::Integrity => {
                tracing::error!(target: "scroll::derivation_pipeline", ?err, "integrity failure, halting derivation pipeline");
                return Err(err)
            }
        }
        Ok(())
    }

    /// Builds the queues from the durable checkpoint.
    async fn build_block_queue(&self) -> Result<BlockQueue<C, M>, DerivationPipelineError> {
        let synced_l1_block = self.database.get_metadata(MetadataKey::DaSyncedL1Block).await?;
        let derived_batch_index =
            self.database.get_metadata(MetadataKey::DaDerivedBatchIndex).await?;
        let l1_height =
            synced_l1_block.map(|block| block + 1).unwrap_or(self.config.l1_deployment_block);
        tracing::info!(target: "scroll::derivation_pipeline", l1_height, ?derived_batch_index, "building queues");

        let da_queue = DaQueue::new(self.factory.clone(), l1_height);
        Ok(BlockQueue::new(BatchQueue::new(da_queue, derived_batch_index)))
    }
}

/// Writes the checkpoint of a derived batch atomically.
async fn write_checkpoint(
    database: &Database,
    checkpoint: BatchCheckpoint,
) -> Result<(), DerivationPipelineError> {
    let tx = database.tx().await?;
    tx.set_metadata(MetadataKey::DaSyncedL1Block, checkpoint.safe_l1_block).await?;
    tx.set_metadata(MetadataKey::DaDerivedBatchIndex, checkpoint.batch_index).await?;
    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{test_utils::*, DEFAULT_FETCH_RANGE};

    use alloy_primitives::{Bytes, B256};
    use rollup_node_primitives::BlockInfo;
    use rollup_node_providers::test_utils::{MockL1Client, MockL1Provider, MockL2Chain};
    use scroll_db::test_utils::setup_test_db;

    type TestPipeline =
        SyncingPipeline<Arc<MockL1Client>, Arc<MockL1Provider>, Arc<MockL2Chain>>;

    fn config() -> DerivationPipelineConfig {
        DerivationPipelineConfig {
            data_source: DataSourceConfig {
                scroll_chain_address: SCROLL_CHAIN_ADDRESS,
                blob_activation_height: 1_000,
                fetch_range: DEFAULT_FETCH_RANGE,
            },
            l1_deployment_block: 5,
            sync_interval: DEFAULT_SYNC_INTERVAL,
        }
    }

    fn pipeline(
        client: Arc<MockL1Client>,
        chain: Arc<MockL2Chain>,
        database: Arc<Database>,
    ) -> TestPipeline {
        let messages = Arc::new(MockL1Provider::new([l1_message(0), l1_message(1)]));
        SyncingPipeline::new(client, messages, chain, database, config())
    }

    #[tokio::test]
    async fn test_should_derive_and_checkpoint_batches() -> eyre::Result<()> {
        let database = Arc::new(setup_test_db().await);
        let client = Arc::new(MockL1Client::new(1, 100));
        add_two_batches(&client);
        let chain = Arc::new(MockL2Chain::new(BlockInfo::new(0, B256::ZERO)));
        let mut pipeline = pipeline(client.clone(), chain.clone(), database.clone());

        assert_eq!(pipeline.step().await?, 2);
        assert_eq!(chain.inserted_numbers(), vec![1, 2]);
        assert_eq!(database.get_metadata(MetadataKey::DaSyncedL1Block).await?, Some(12));
        assert_eq!(database.get_metadata(MetadataKey::DaDerivedBatchIndex).await?, Some(1));
        assert_eq!(client.filters.lock()[0].from_block, 5);

        // caught up.
        assert_eq!(pipeline.step().await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_should_resume_from_checkpoint() -> eyre::Result<()> {
        let database = Arc::new(setup_test_db().await);
        database.set_metadata(MetadataKey::DaSyncedL1Block, 12).await?;
        database.set_metadata(MetadataKey::DaDerivedBatchIndex, 1).await?;
        let client = Arc::new(MockL1Client::new(1, 100));
        add_two_batches(&client);
        let chain = Arc::new(MockL2Chain::new(BlockInfo::new(2, B256::ZERO)));
        let mut pipeline = pipeline(client.clone(), chain.clone(), database);

        assert_eq!(pipeline.step().await?, 0);
        assert!(chain.inserted.lock().is_empty());
        assert_eq!(client.filters.lock()[0].from_block, 13);

        Ok(())
    }

    #[tokio::test]
    async fn test_should_skip_blocks_below_head() -> eyre::Result<()> {
        let database = Arc::new(setup_test_db().await);
        let client = Arc::new(MockL1Client::new(1, 100));
        add_two_batches(&client);
        let chain = Arc::new(MockL2Chain::new(BlockInfo::new(1, B256::ZERO)));
        let mut pipeline = pipeline(client, chain.clone(), database);

        assert_eq!(pipeline.step().await?, 1);
        assert_eq!(chain.inserted_numbers(), vec![2]);

        Ok(())
    }

    #[tokio::test]
    async fn test_should_rebuild_queues_after_insertion_failure() -> eyre::Result<()> {
        let database = Arc::new(setup_test_db().await);
        let client = Arc::new(MockL1Client::new(1, 100));
        add_two_batches(&client);
        let chain = Arc::new(MockL2Chain::new(BlockInfo::new(0, B256::ZERO)));
        chain.reject(2);
        let mut pipeline = pipeline(client, chain.clone(), database.clone());

        let err = pipeline.step().await.expect_err("insertion failure");
        assert_eq!(err.kind(), ErrorKind::Rebuild);
        pipeline.handle_error(err)?;
        assert!(pipeline.block_queue.is_none());
        assert_eq!(database.get_metadata(MetadataKey::DaDerivedBatchIndex).await?, None);

        *chain.reject_block.lock() = None;
        assert_eq!(pipeline.step().await?, 1);
        assert_eq!(chain.inserted_numbers(), vec![1, 2]);
        assert_eq!(database.get_metadata(MetadataKey::DaDerivedBatchIndex).await?, Some(1));

        Ok(())
    }

    #[tokio::test]
    async fn test_should_keep_queues_on_transport_failure() -> eyre::Result<()> {
        let database = Arc::new(setup_test_db().await);
        let client = Arc::new(MockL1Client::new(1, 100));
        add_two_batches(&client);
        client.fail_next_filter_calls(1);
        let chain = Arc::new(MockL2Chain::new(BlockInfo::new(0, B256::ZERO)));
        let mut pipeline = pipeline(client, chain.clone(), database);

        let err = pipeline.step().await.expect_err("transport failure");
        assert_eq!(err.kind(), ErrorKind::Transport);
        pipeline.handle_error(err)?;
        assert!(pipeline.block_queue.is_some());
        assert_eq!(pipeline.step().await?, 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_should_halt_on_unknown_batch() {
        let database = Arc::new(setup_test_db().await);
        let client = Arc::new(MockL1Client::new(1, 100));
        client.add_log(finalize_log(3, B256::ZERO, 10, 0), Bytes::new());
        let chain = Arc::new(MockL2Chain::new(BlockInfo::new(0, B256::ZERO)));
        let pipeline = pipeline(client, chain, database);

        let result = pipeline.run(CancellationToken::new()).await;
        assert!(matches!(result, Err(DerivationPipelineError::UnknownBatch(3))));
    }

    #[tokio::test]
    async fn test_should_stop_on_cancellation() -> eyre::Result<()> {
        let database = Arc::new(setup_test_db().await);
        let client = Arc::new(MockL1Client::new(1, 100));
        let chain = Arc::new(MockL2Chain::new(BlockInfo::new(0, B256::ZERO)));
        let pipeline = pipeline(client, chain, database);

        let token = CancellationToken::new();
        let handle = tokio::spawn(pipeline.run(token.clone()));
        token.cancel();
        handle.await??;

        Ok(())
    }
}
