//! The derivation pipeline of the Scroll rollup node.
//!
//! The pipeline rebuilds the L2 chain from the data committed on L1. Rollup events are read in
//! windows of L1 blocks by the [`L1EventSource`] and exposed as a flat stream of [`DaEntry`] by
//! the [`DaQueue`]. The [`BatchQueue`] resolves the committed batches on finalization, the
//! [`BlockQueue`] flattens them into blocks and the [`ChainSyncer`] inserts the blocks in the
//! chain. The [`SyncingPipeline`] drives the stages and persists the progress.

pub use batch_queue::{BatchQueue, ResolvedBatch};
mod batch_queue;

pub use block_queue::{flatten_batch, BatchCheckpoint, BlockQueue, QueuedBlock};
mod block_queue;

pub use da_queue::DaQueue;
mod da_queue;

pub use entry::{CommitBatch, DaEntry, FinalizeBatch, RevertBatch};
mod entry;

pub use error::{DataSourceError, DerivationPipelineError, ErrorKind};
mod error;

pub use metrics::DerivationPipelineMetrics;
mod metrics;

pub use pipeline::{DerivationPipelineConfig, SyncingPipeline, DEFAULT_SYNC_INTERVAL};
mod pipeline;

pub use source::{
    DataSourceConfig, DataSourceFactory, DataSourceKind, L1EventSource, DEFAULT_FETCH_RANGE,
};
mod source;

pub use syncer::ChainSyncer;
mod syncer;

#[cfg(test)]
mod test_utils;
