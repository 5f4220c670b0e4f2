use crate::{
    build_batch_chunks, decode_chunk_block_ranges, validate_batch, FinalizeBatchEvent,
    RollupSyncError, RollupSyncMetrics,
};
use std::{sync::Arc, time::Duration};

use alloy_primitives::Address;
use rollup_node_primitives::FinalizedBatchMeta;
use rollup_node_providers::{L1Client, L1LogFilter, L2BlockReader};
use scroll_codec::CodecVersion;
use scroll_db::{Database, DatabaseOperations, DatabaseTransaction, MetadataKey};
use scroll_l1::{RollupEvent, ROLLUP_EVENT_SIGNATURES};
use tokio_util::sync::CancellationToken;

/// The default interval between two rollup sync steps.
pub const DEFAULT_ROLLUP_SYNC_INTERVAL: Duration = Duration::from_secs(60);

/// The default amount of L1 blocks fetched per window.
pub const DEFAULT_ROLLUP_SYNC_FETCH_RANGE: u64 = 100;

/// The configuration of the [`RollupSyncService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollupSyncConfig {
    /// The expected chain id of the L1.
    pub l1_chain_id: u64,
    /// The address of the Scroll Chain contract.
    pub scroll_chain_address: Address,
    /// The L1 block the Scroll Chain contract was deployed at.
    pub l1_deployment_block: u64,
    /// The amount of L1 blocks fetched per window.
    pub fetch_range: u64,
    /// The interval between two steps.
    pub interval: Duration,
}

/// Validates the finalized batches against the local chain.
///
/// The service records the chunk block ranges of the committed batches and, on finalization,
/// recomputes the batch hash from the local blocks and compares the hash and roots with the
/// finalized ones. Every window of L1 blocks is processed in a single database transaction.
#[derive(Debug)]
pub struct RollupSyncService<C, R> {
    l1_client: C,
    l2_reader: R,
    database: Arc<Database>,
    config: RollupSyncConfig,
    metrics: RollupSyncMetrics,
}

impl<C: L1Client, R: L2BlockReader> RollupSyncService<C, R> {
    /// Returns a new instance of the [`RollupSyncService`].
    pub fn new(
        l1_client: C,
        l2_reader: R,
        database: Arc<Database>,
        config: RollupSyncConfig,
    ) -> Self {
        Self { l1_client, l2_reader, database, config, metrics: RollupSyncMetrics::default() }
    }

    /// Runs the service until the token is cancelled or the local chain diverges from the L1.
    pub async fn run(self, token: CancellationToken) -> Result<(), RollupSyncError> {
        tokio::select! {
            biased;
            _ = token.cancelled() => return Ok(()),
            result = self.check_chain_id() => result?,
        }
        tracing::info!(target: "scroll::rollup_sync", config = ?self.config, "starting rollup sync service");

        let mut interval = tokio::time::interval(self.config.interval);
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
            match result {
                Err(err) if err.is_integrity_failure() => {
                    tracing::error!(target: "scroll::rollup_sync", ?err, "rollup validation failed, halting");
                    return Err(err)
                }
                Err(err) => {
                    tracing::warn!(target: "scroll::rollup_sync", ?err, "rollup sync step failed, retrying");
                }
                Ok(()) => {}
            }
        }

        tracing::info!(target: "scroll::rollup_sync", "stopping rollup sync service");
        Ok(())
    }

    /// Checks the L1 provider is connected to the expected chain.
    pub async fn check_chain_id(&self) -> Result<(), RollupSyncError> {
        let chain_id = self.l1_client.chain_id().await?;
        if chain_id != self.config.l1_chain_id {
            return Err(RollupSyncError::ChainIdMismatch {
                expected: self.config.l1_chain_id,
                got: chain_id,
            })
        }
        Ok(())
    }

    /// Processes the rollup events up to the L1 finalized block.
    #[tracing::instrument(target = "scroll::rollup_sync", skip_all)]
    pub async fn step(&self) -> Result<(), RollupSyncError> {
        let mut from = self
            .database
            .get_metadata(MetadataKey::RollupSyncL1Block)
            .await?
            .map(|block| block + 1)
            .unwrap_or(self.config.l1_deployment_block);
        let finalized = self.l1_client.finalized_block_number().await?;

        while from <= finalized {
            let to = from.saturating_add(self.config.fetch_range.max(1) - 1).min(finalized);
            self.process_window(from, to).await?;
            from = to + 1;
        }

        Ok(())
    }

    /// Processes the rollup events of the inclusive window of L1 blocks.
    async fn process_window(&self, from: u64, to: u64) -> Result<(), RollupSyncError> {
        let filter = L1LogFilter {
            address: self.config.scroll_chain_address,
            event_signatures: ROLLUP_EVENT_SIGNATURES.to_vec(),
            from_block: from,
            to_block: to,
        };
        let logs = self.l1_client.filter_logs(filter).await?;
        tracing::trace!(target: "scroll::rollup_sync", from, to, logs = logs.len(), "fetched rollup events");

        let tx = self.database.tx().await?;
        for log in logs {
            match RollupEvent::try_decode(&log.topics, &log.data)? {
                RollupEvent::Commit { batch_index, .. } => {
                    if batch_index == 0 {
                        continue
                    }
                    let calldata = self.l1_client.transaction_input(&log).await?;
                    let (version, ranges) = decode_chunk_block_ranges(batch_index, &calldata)?;
                    tracing::trace!(target: "scroll::rollup_sync", batch_index, %version, chunks = ranges.len(), "recording chunk block ranges");
                    tx.insert_batch_chunk_ranges(batch_index, version.as_u8(), ranges).await?;
                }
                RollupEvent::Revert { batch_index, .. } => {
                    tracing::trace!(target: "scroll::rollup_sync", batch_index, "deleting reverted chunk block ranges");
                    tx.delete_batch_chunk_ranges(batch_index).await?;
                }
                RollupEvent::Finalize { batch_index, batch_hash, state_root, withdraw_root } => {
                    let event =
                        FinalizeBatchEvent { batch_index, batch_hash, state_root, withdraw_root };
                    let (last_block_number, meta) = if batch_index == 0 {
                        let meta = FinalizedBatchMeta {
                            batch_index,
                            batch_hash,
                            total_l1_message_popped: 0,
                            state_root,
                            withdraw_root,
                        };
                        (0, meta)
                    } else {
                        self.validate_finalized_batch(&tx, &event).await?
                    };

                    tx.insert_finalized_batch(meta, last_block_number).await?;
                    tx.set_metadata(MetadataKey::FinalizedL2Block, last_block_number).await?;

                    self.metrics.validated_batches.increment(1);
                    self.metrics.finalized_batch_index.set(batch_index as f64);
                    self.metrics.finalized_l2_block.set(last_block_number as f64);
                    tracing::info!(target: "scroll::rollup_sync", batch_index, ?batch_hash, last_block_number, "validated finalized batch");
                }
            }
        }

        tx.set_metadata(MetadataKey::RollupSyncL1Block, to).await?;
        tx.commit().await?;
        self.metrics.synced_l1_block.set(to as f64);

        Ok(())
    }

    /// Validates the finalized batch against the local chain, chaining on the parent meta.
    async fn validate_finalized_batch(
        &self,
        tx: &DatabaseTransaction,
        event: &FinalizeBatchEvent,
    ) -> Result<(u64, FinalizedBatchMeta), RollupSyncError> {
        let batch_index = event.batch_index;
        let parent = tx
            .get_finalized_batch(batch_index - 1)
            .await?
            .ok_or(RollupSyncError::MissingParentBatch(batch_index))?;
        let (version, ranges) = tx
            .get_batch_chunk_ranges(batch_index)
            .await?
            .ok_or(RollupSyncError::MissingChunkRanges(batch_index))?;
        let version = CodecVersion::try_from(version)?;

        let (chunks, local_roots) =
            build_batch_chunks(&self.l2_reader, &ranges, parent.total_l1_message_popped).await?;
        validate_batch(version, event, &parent, &chunks, local_roots)
    }
}
