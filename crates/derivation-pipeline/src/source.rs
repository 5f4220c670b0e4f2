use crate::{CommitBatch, DaEntry, DataSourceError, FinalizeBatch, RevertBatch};
use std::sync::Arc;

use alloy_eips::eip4844::Blob;
use alloy_primitives::{Address, B256};
use rollup_node_providers::{L1Client, L1Log, L1LogFilter, L1Provider, L1Transaction};
use scroll_codec::{
    count_total_l1_message_popped, decode_chunks, decode_skipped_bitmap, is_l1_message_skipped,
    BatchHeader, CodecVersion,
};
use scroll_l1::{abi::calls::CommitBatchCall, RollupEvent, ROLLUP_EVENT_SIGNATURES};

/// The default amount of L1 blocks fetched per window.
pub const DEFAULT_FETCH_RANGE: u64 = 100;

/// The era of the L1 a data source reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum DataSourceKind {
    /// Batches committed before the blob activation.
    #[display("calldata")]
    Calldata,
    /// Batches committed after the blob activation, which may carry their data in a blob.
    #[display("blob")]
    BlobEra,
}

/// The configuration of the data sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataSourceConfig {
    /// The address of the Scroll Chain contract.
    pub scroll_chain_address: Address,
    /// The first L1 block of the blob era.
    pub blob_activation_height: u64,
    /// The amount of L1 blocks fetched per window.
    pub fetch_range: u64,
}

/// Opens the [`L1EventSource`] matching an L1 height.
#[derive(Debug, Clone)]
pub struct DataSourceFactory<C, P> {
    client: C,
    l1_provider: P,
    config: DataSourceConfig,
}

impl<C: Clone, P: Clone> DataSourceFactory<C, P> {
    /// Returns a new instance of the [`DataSourceFactory`].
    pub const fn new(client: C, l1_provider: P, config: DataSourceConfig) -> Self {
        Self { client, l1_provider, config }
    }

    /// Opens a source starting at the L1 height.
    ///
    /// Heights before the blob activation open a calldata source bounded by the last block
    /// before the activation. Other heights open a blob era source bounded by L1 finality.
    pub fn open(&self, l1_height: u64) -> L1EventSource<C, P> {
        let (kind, max_l1_height) = if l1_height < self.config.blob_activation_height {
            (DataSourceKind::Calldata, Some(self.config.blob_activation_height - 1))
        } else {
            (DataSourceKind::BlobEra, None)
        };
        tracing::debug!(target: "scroll::derivation_pipeline", %kind, l1_height, ?max_l1_height, "opening data source");

        L1EventSource {
            client: self.client.clone(),
            l1_provider: self.l1_provider.clone(),
            scroll_chain_address: self.config.scroll_chain_address,
            kind,
            l1_height,
            max_l1_height,
            fetch_range: self.config.fetch_range.max(1),
        }
    }
}

/// Reads the rollup events of the Scroll Chain contract in windows of L1 blocks and turns them
/// into [`DaEntry`]s.
///
/// A blob era source also resolves the blob carried by the commit transactions.
#[derive(Debug)]
pub struct L1EventSource<C, P> {
    client: C,
    l1_provider: P,
    scroll_chain_address: Address,
    kind: DataSourceKind,
    l1_height: u64,
    max_l1_height: Option<u64>,
    fetch_range: u64,
}

impl<C, P> L1EventSource<C, P> {
    /// Returns the next L1 height the source will read.
    pub const fn l1_height(&self) -> u64 {
        self.l1_height
    }

    /// Returns the kind of the source.
    pub const fn kind(&self) -> DataSourceKind {
        self.kind
    }
}

impl<C: L1Client, P: L1Provider> L1EventSource<C, P> {
    /// Returns the entries of the next window of L1 blocks.
    ///
    /// Returns [`DataSourceError::Exhausted`] once the source reached its maximum height. A source
    /// without a maximum height is bounded by the L1 finalized block.
    pub async fn next_data(&mut self) -> Result<Vec<DaEntry>, DataSourceError> {
        let max_l1_height = match self.max_l1_height {
            Some(height) => height,
            None => self.client.finalized_block_number().await?,
        };
        let to = self.l1_height.saturating_add(self.fetch_range - 1).min(max_l1_height);
        if self.l1_height > to {
            return Err(DataSourceError::Exhausted)
        }

        let entries = self.next_entries(self.l1_height, to).await?;
        self.l1_height = to + 1;
        Ok(entries)
    }

    /// Returns the entries for the rollup events emitted in the inclusive range of L1 blocks.
    pub async fn next_entries(
        &self,
        from: u64,
        to: u64,
    ) -> Result<Vec<DaEntry>, DataSourceError> {
        let filter = L1LogFilter {
            address: self.scroll_chain_address,
            event_signatures: ROLLUP_EVENT_SIGNATURES.to_vec(),
            from_block: from,
            to_block: to,
        };
        let logs = self.client.filter_logs(filter).await?;
        tracing::trace!(target: "scroll::derivation_pipeline", kind = %self.kind, from, to, logs = logs.len(), "fetched rollup events");

        let mut entries = Vec::with_capacity(logs.len());
        for log in logs {
            let l1_block_number = log.block_number;
            let entry = match RollupEvent::try_decode(&log.topics, &log.data)? {
                RollupEvent::Commit { batch_index, batch_hash } => {
                    tracing::trace!(target: "scroll::derivation_pipeline", batch_index, ?batch_hash, l1_block_number, "found commit batch event");
                    self.commit_batch(batch_index, &log).await?.into()
                }
                RollupEvent::Revert { batch_index, .. } => {
                    tracing::trace!(target: "scroll::derivation_pipeline", batch_index, l1_block_number, "found revert batch event");
                    RevertBatch { batch_index, l1_block_number }.into()
                }
                RollupEvent::Finalize { batch_index, batch_hash, state_root, withdraw_root } => {
                    tracing::trace!(target: "scroll::derivation_pipeline", batch_index, ?batch_hash, l1_block_number, "found finalize batch event");
                    FinalizeBatch { batch_index, batch_hash, state_root, withdraw_root, l1_block_number }
                        .into()
                }
            };
            entries.push(entry);
        }

        Ok(entries)
    }

    /// Decodes the commit calldata of the batch and resolves its L1 messages, along its blob for
    /// blob era commits.
    async fn commit_batch(
        &self,
        batch_index: u64,
        log: &L1Log,
    ) -> Result<CommitBatch, DataSourceError> {
        if batch_index == 0 {
            return Ok(CommitBatch::genesis(log.block_number))
        }

        let tx = self.client.transaction(log).await?;
        let call = CommitBatchCall::try_decode(&tx.input)
            .ok_or(DataSourceError::InvalidCommitCalldata(log.transaction_hash))?;

        let version = CodecVersion::try_from(call.version())?;
        let parent_batch_header = BatchHeader::decode(call.parent_batch_header())?;
        let chunks = decode_chunks(version, call.chunks())?;
        let l1_message_popped = count_total_l1_message_popped(&chunks);
        let skipped_l1_message_bitmap =
            decode_skipped_bitmap(call.skipped_l1_message_bitmap(), l1_message_popped)?;

        let total_l1_message_popped_before = parent_batch_header.total_l1_message_popped;
        let mut l1_messages = Vec::new();
        for index in 0..l1_message_popped {
            if is_l1_message_skipped(&skipped_l1_message_bitmap, index)? {
                continue
            }
            let queue_index = total_l1_message_popped_before + index;
            let message = self
                .l1_provider
                .get_l1_message(queue_index)
                .await?
                .ok_or(DataSourceError::MissingL1Message(queue_index))?;
            l1_messages.push(message);
        }

        let (blob_versioned_hash, blob) = match self.kind {
            DataSourceKind::Calldata => (None, None),
            DataSourceKind::BlobEra => self.commit_blob(&call, &tx, log).await?,
        };

        Ok(CommitBatch {
            version,
            batch_index,
            parent_batch_header: Some(parent_batch_header),
            skipped_l1_message_bitmap,
            chunks,
            l1_messages,
            blob_versioned_hash,
            blob,
            l1_block_number: log.block_number,
        })
    }

    /// Resolves the blob carried by the commit transaction.
    ///
    /// The batch data is in the first blob of the transaction. Commits without a blob proof and
    /// without blobs carry their data in calldata only.
    async fn commit_blob(
        &self,
        call: &CommitBatchCall,
        tx: &L1Transaction,
        log: &L1Log,
    ) -> Result<(Option<B256>, Option<Arc<Blob>>), DataSourceError> {
        let Some(hash) = tx.blob_versioned_hashes.first().copied() else {
            if matches!(call, CommitBatchCall::CommitBatchWithBlobProof(_)) {
                return Err(DataSourceError::MissingBlobVersionedHash(tx.hash))
            }
            return Ok((None, None))
        };

        let block_timestamp = self.client.block_timestamp(log.block_hash).await?;
        let blob = self
            .l1_provider
            .blob(block_timestamp, hash)
            .await?
            .ok_or(DataSourceError::MissingBlob(hash))?;
        tracing::trace!(target: "scroll::derivation_pipeline", ?hash, block_timestamp, l1_block_number = log.block_number, "resolved commit blob");

        Ok((Some(hash), Some(blob)))
    }
}
