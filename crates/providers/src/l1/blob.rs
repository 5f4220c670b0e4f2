use super::L1ProviderError;
use std::sync::Arc;

use alloy_eips::eip4844::Blob;
use alloy_primitives::B256;

mod beacon;
pub use beacon::BeaconClientProvider;

/// An instance of the trait can be used to fetch L1 blob data.
#[async_trait::async_trait]
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait BlobProvider: Send + Sync {
    /// Returns the blob for the versioned hash, sidecar of a transaction included in the block
    /// with the provided timestamp.
    async fn blob(
        &self,
        block_timestamp: u64,
        hash: B256,
    ) -> Result<Option<Arc<Blob>>, L1ProviderError>;
}

/// A [`BlobProvider`] without access to the beacon chain, which never returns blobs.
#[derive(Debug, Default, Clone, Copy)]
#[non_exhaustive]
pub struct MockBeaconProvider;

#[async_trait::async_trait]
impl BlobProvider for MockBeaconProvider {
    async fn blob(
        &self,
        _block_timestamp: u64,
        _hash: B256,
    ) -> Result<Option<Arc<Blob>>, L1ProviderError> {
        Ok(None)
    }
}
