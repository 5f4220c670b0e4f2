//! The crate exposes the collaborators of the derivation pipeline and the rollup sync service
//! along with their implementations.

pub use l1::{
    AlloyL1Client, BeaconClientProvider, BlobProvider, DatabaseL1MessageProvider, FullL1Provider,
    L1Block, L1Client, L1Log, L1LogFilter, L1MessageProvider, L1Provider, L1ProviderError,
    L1Snapshot, L1Transaction, MockBeaconProvider, SnapshotL1Client,
};
mod l1;

pub use l2::{ExecutedBlock, L2BlockReader, L2Chain, L2ChainError, PreprocessedBlock};
mod l2;

/// Test utils for the providers.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
