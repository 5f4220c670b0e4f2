//! Default values of the node arguments.

use std::time::Duration;

/// The max retries for the L1 provider.
pub(crate) const L1_PROVIDER_MAX_RETRIES: u32 = 10;

/// The initial backoff for the L1 provider in milliseconds.
pub(crate) const L1_PROVIDER_INITIAL_BACKOFF: u64 = 100;

/// The default provider compute units per second.
pub(crate) const PROVIDER_COMPUTE_UNITS_PER_SECOND: u64 = 10000;

/// The default interval between two derivation steps in milliseconds.
pub(crate) const DA_SYNC_INTERVAL_MS: u64 =
    scroll_derivation_pipeline::DEFAULT_SYNC_INTERVAL.as_millis() as u64;

/// The default amount of L1 blocks fetched per window by the derivation pipeline.
pub(crate) const DA_FETCH_RANGE: u64 = scroll_derivation_pipeline::DEFAULT_FETCH_RANGE;

/// The default interval between two rollup sync steps in seconds.
pub(crate) const ROLLUP_SYNC_INTERVAL_SECS: u64 =
    scroll_rollup_sync::DEFAULT_ROLLUP_SYNC_INTERVAL.as_secs();

/// The default amount of L1 blocks fetched per window by the rollup sync service.
pub(crate) const ROLLUP_SYNC_FETCH_RANGE: u64 = scroll_rollup_sync::DEFAULT_ROLLUP_SYNC_FETCH_RANGE;

/// The height from which the mainnet commits are read as blob-era commits.
pub const MAINNET_BLOB_ACTIVATION_HEIGHT: u64 = 5_220_340;

/// The height from which the sepolia commits are read as blob-era commits.
pub const SEPOLIA_BLOB_ACTIVATION_HEIGHT: u64 = 3_747_132;

/// The default database url of the rollup node.
pub(crate) const DEFAULT_DATABASE_URL: &str = "sqlite:rollup-node.db?mode=rwc";

/// The grace period given to the tasks on shutdown.
pub(crate) const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);
