use metrics::{Counter, Gauge};
use metrics_derive::Metrics;

/// The metrics for the [`super::SyncingPipeline`].
#[derive(Metrics, Clone)]
#[metrics(scope = "derivation_pipeline")]
pub struct DerivationPipelineMetrics {
    /// A counter on the derived L2 blocks inserted in the chain.
    pub derived_blocks: Counter,
    /// A counter on the fully derived batches.
    pub derived_batches: Counter,
    /// The blocks per second derived by the pipeline.
    pub blocks_per_second: Gauge,
    /// The L1 block the pipeline restarts after.
    pub synced_l1_block: Gauge,
    /// The number of the last derived L2 block.
    pub l2_head: Gauge,
}
