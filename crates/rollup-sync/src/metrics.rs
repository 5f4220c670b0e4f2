use metrics::{Counter, Gauge};
use metrics_derive::Metrics;

/// The metrics for the [`super::RollupSyncService`].
#[derive(Metrics, Clone)]
#[metrics(scope = "rollup_sync")]
pub struct RollupSyncMetrics {
    /// A counter on the validated batches.
    pub validated_batches: Counter,
    /// The index of the last validated batch.
    pub finalized_batch_index: Gauge,
    /// The last finalized L2 block.
    pub finalized_l2_block: Gauge,
    /// The last processed L1 block.
    pub synced_l1_block: Gauge,
}
