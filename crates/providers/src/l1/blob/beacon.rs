use super::BlobProvider;
use crate::L1ProviderError;

use alloy_eips::eip4844::{Blob, BlobTransactionSidecarItem};
use alloy_primitives::B256;
use alloy_rpc_types_beacon::sidecar::{BeaconBlobBundle, BlobData};
use lru::LruCache;
use reqwest::Client;
use std::{num::NonZeroUsize, sync::Arc};
use tokio::sync::Mutex;

/// The amount of blobs kept in the cache of the provider.
const PROVIDER_BLOB_CACHE_SIZE: usize = 100;

#[derive(Debug, Clone, serde::Deserialize)]
struct ApiResponse<T> {
    data: T,
}

#[derive(Debug, Clone, serde::Deserialize)]
struct GenesisData {
    #[serde(with = "alloy_serde::quantity")]
    genesis_time: u64,
}

#[derive(Debug, Clone, serde::Deserialize)]
struct SpecData {
    #[serde(rename = "SECONDS_PER_SLOT")]
    #[serde(with = "alloy_serde::quantity")]
    seconds_per_slot: u64,
}

/// A [`BlobProvider`] fetching the blob sidecars from a beacon node.
///
/// The sidecars of a slot are fetched together, the blobs not requested are kept in a LRU cache
/// since the commits of consecutive batches usually land in the same blocks.
#[derive(Debug, Clone)]
pub struct BeaconClientProvider {
    base: String,
    inner: Client,
    cache: Arc<Mutex<LruCache<B256, Arc<Blob>>>>,
    genesis_timestamp: u64,
    slot_interval: u64,
}

impl BeaconClientProvider {
    const SPEC_METHOD: &'static str = "eth/v1/config/spec";
    const GENESIS_METHOD: &'static str = "eth/v1/beacon/genesis";
    const SIDECARS_METHOD_PREFIX: &'static str = "eth/v1/beacon/blob_sidecars";

    /// Connects to the beacon node at the url and fetches the genesis time and slot interval.
    pub async fn new_http(base: reqwest::Url) -> Result<Self, L1ProviderError> {
        let base = base.as_str().trim_end_matches('/').to_string();
        let inner = Client::new();

        let spec: ApiResponse<SpecData> =
            inner.get(format!("{base}/{}", Self::SPEC_METHOD)).send().await?.json().await?;
        let genesis: ApiResponse<GenesisData> =
            inner.get(format!("{base}/{}", Self::GENESIS_METHOD)).send().await?.json().await?;
        tracing::info!(target: "scroll::providers", %base, genesis_timestamp = genesis.data.genesis_time, slot_interval = spec.data.seconds_per_slot, "connected to beacon node");

        Ok(Self::new(base, inner, genesis.data.genesis_time, spec.data.seconds_per_slot))
    }

    fn new(base: String, inner: Client, genesis_timestamp: u64, slot_interval: u64) -> Self {
        let capacity = NonZeroUsize::new(PROVIDER_BLOB_CACHE_SIZE).unwrap_or(NonZeroUsize::MIN);
        Self {
            base,
            inner,
            cache: Arc::new(Mutex::new(LruCache::new(capacity))),
            genesis_timestamp,
            slot_interval: slot_interval.max(1),
        }
    }

    /// Returns the beacon slot of the block timestamp.
    const fn slot(&self, block_timestamp: u64) -> Result<u64, L1ProviderError> {
        if block_timestamp < self.genesis_timestamp {
            return Err(L1ProviderError::InvalidBlockTimestamp {
                genesis: self.genesis_timestamp,
                timestamp: block_timestamp,
            })
        }
        Ok((block_timestamp - self.genesis_timestamp) / self.slot_interval)
    }

    async fn blobs(&self, slot: u64) -> Result<Vec<BlobData>, L1ProviderError> {
        let url = format!("{}/{}/{slot}", self.base, Self::SIDECARS_METHOD_PREFIX);
        let response = self.inner.get(&url).send().await?.error_for_status()?;
        Ok(response.json::<BeaconBlobBundle>().await?.data)
    }
}

#[async_trait::async_trait]
impl BlobProvider for BeaconClientProvider {
    async fn blob(
        &self,
        block_timestamp: u64,
        hash: B256,
    ) -> Result<Option<Arc<Blob>>, L1ProviderError> {
        if let Some(blob) = self.cache.lock().await.get(&hash) {
            return Ok(Some(blob.clone()))
        }

        let slot = self.slot(block_timestamp)?;
        tracing::trace!(target: "scroll::providers", slot, ?hash, "fetching blob sidecars");
        let mut sidecars = self
            .blobs(slot)
            .await?
            .into_iter()
            .map(|blob| BlobTransactionSidecarItem {
                index: blob.index,
                blob: blob.blob,
                kzg_commitment: blob.kzg_commitment,
                kzg_proof: blob.kzg_proof,
            })
            .collect::<Vec<_>>();

        let Some(position) =
            sidecars.iter().position(|sidecar| sidecar.to_kzg_versioned_hash() == hash.0)
        else {
            tracing::debug!(target: "scroll::providers", slot, ?hash, sidecars = sidecars.len(), "blob not found in slot");
            return Ok(None)
        };

        let blob = Arc::new(*sidecars.remove(position).blob);
        let mut cache = self.cache.lock().await;
        for sidecar in sidecars {
            cache.put(sidecar.to_kzg_versioned_hash().into(), Arc::new(*sidecar.blob));
        }
        Ok(Some(blob))
    }
}
