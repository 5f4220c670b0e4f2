//! The rollup sync service of the Scroll rollup node.
//!
//! The service follows the batches committed and finalized on L1 and validates every finalized
//! batch against the local chain, building a chain of [`FinalizedBatchMeta`] linked by batch
//! hash.
//!
//! [`FinalizedBatchMeta`]: rollup_node_primitives::FinalizedBatchMeta

pub use error::RollupSyncError;
mod error;

pub use metrics::RollupSyncMetrics;
mod metrics;

pub use service::{
    RollupSyncConfig, RollupSyncService, DEFAULT_ROLLUP_SYNC_FETCH_RANGE,
    DEFAULT_ROLLUP_SYNC_INTERVAL,
};
mod service;

pub use validate::{
    build_batch_chunks, decode_chunk_block_ranges, validate_batch, FinalizeBatchEvent, LocalRoots,
};
mod validate;

#[cfg(test)]
mod test_utils;
