use crate::{constants, L1RpcConfig, L1Source, RollupNodeConfig};
use std::sync::Arc;

use alloy_provider::ProviderBuilder;
use alloy_rpc_client::RpcClient;
use alloy_transport::layers::RetryBackoffLayer;
use eyre::OptionExt;
use rollup_node_providers::{
    AlloyL1Client, BeaconClientProvider, BlobProvider, DatabaseL1MessageProvider, FullL1Provider,
    L1Client, L2BlockReader, L2Chain, MockBeaconProvider, SnapshotL1Client,
};
use scroll_db::{Database, DatabaseConnectionProvider};
use scroll_derivation_pipeline::{DerivationPipelineError, SyncingPipeline};
use scroll_migration::{Migrator, MigratorTrait};
use scroll_rollup_sync::{RollupSyncError, RollupSyncService};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// The handle to the tasks spawned by [`launch`].
#[derive(Debug)]
pub struct RollupNodeHandle {
    /// The derivation pipeline task, if enabled.
    pub derivation_pipeline: Option<JoinHandle<Result<(), DerivationPipelineError>>>,
    /// The rollup sync task, if enabled.
    pub rollup_sync: Option<JoinHandle<Result<(), RollupSyncError>>>,
    /// The database shared by the tasks.
    pub database: Arc<Database>,
    token: CancellationToken,
}

impl RollupNodeHandle {
    /// Cancels the tasks and waits for them to stop.
    ///
    /// Returns the first error a task stopped with.
    pub async fn shutdown(self) -> eyre::Result<()> {
        tracing::info!(target: "scroll::node", "shutting down rollup node tasks");
        self.token.cancel();

        if let Some(handle) = self.derivation_pipeline {
            tokio::time::timeout(constants::SHUTDOWN_TIMEOUT, handle).await???;
        }
        if let Some(handle) = self.rollup_sync {
            tokio::time::timeout(constants::SHUTDOWN_TIMEOUT, handle).await???;
        }
        Ok(())
    }
}

/// Returns the [`L1Client`] reading from the source, if any.
pub fn build_l1_client(source: &L1Source) -> eyre::Result<Option<Arc<dyn L1Client>>> {
    let client: Arc<dyn L1Client> = match source {
        L1Source::None => return Ok(None),
        L1Source::Rpc(L1RpcConfig { url, max_retries, initial_backoff, compute_units_per_second }) => {
            tracing::info!(target: "scroll::node", %url, "connecting to L1 RPC");
            let client = RpcClient::builder()
                .layer(RetryBackoffLayer::new(
                    *max_retries,
                    *initial_backoff,
                    *compute_units_per_second,
                ))
                .http(url.clone());
            Arc::new(AlloyL1Client::new(ProviderBuilder::new().connect_client(client)))
        }
        L1Source::Snapshot(path) => Arc::new(SnapshotL1Client::from_file(path)?),
    };
    Ok(Some(client))
}

/// Returns the [`BlobProvider`] of the beacon node.
///
/// Without a beacon node, the blobs of the blob-era commits are never resolved.
pub async fn build_blob_provider(
    beacon_url: Option<&reqwest::Url>,
) -> eyre::Result<Arc<dyn BlobProvider>> {
    let provider: Arc<dyn BlobProvider> = match beacon_url {
        Some(url) => {
            tracing::info!(target: "scroll::node", %url, "connecting to beacon node");
            Arc::new(BeaconClientProvider::new_http(url.clone()).await?)
        }
        None => {
            tracing::warn!(target: "scroll::node", "no beacon node configured, commits carrying blobs will not be derived");
            Arc::new(MockBeaconProvider::default())
        }
    };
    Ok(provider)
}

/// Opens the database, runs the migrations and spawns the enabled tasks.
///
/// The derivation pipeline inserts the derived blocks in the `chain`, the rollup sync reads the
/// executed blocks from the `l2_reader`. Both tasks stop when the `token` is cancelled.
pub async fn launch<L2, R>(
    config: RollupNodeConfig,
    chain: L2,
    l2_reader: R,
    token: CancellationToken,
) -> eyre::Result<RollupNodeHandle>
where
    L2: L2Chain + 'static,
    R: L2BlockReader + 'static,
{
    let database = Arc::new(Database::new(&config.database_url).await?);
    Migrator::up(database.get_connection(), None).await?;

    let l1_client = build_l1_client(&config.l1_source)?;

    let derivation_pipeline = match config.da_sync {
        Some(da_sync) => {
            let l1_client = l1_client.clone().ok_or_eyre("derivation pipeline requires an L1")?;
            let chain_id = l1_client.chain_id().await?;
            if chain_id != config.l1.chain_id {
                eyre::bail!(
                    "L1 chain id mismatch: expected {}, got {chain_id}",
                    config.l1.chain_id
                );
            }

            let blob_provider = build_blob_provider(config.beacon_url.as_ref()).await?;
            let l1_provider =
                FullL1Provider::new(DatabaseL1MessageProvider::new(database.clone()), blob_provider);
            let pipeline =
                SyncingPipeline::new(l1_client, l1_provider, chain, database.clone(), da_sync);
            Some(tokio::spawn(pipeline.run(token.child_token())))
        }
        None => None,
    };

    let rollup_sync = match config.rollup_sync {
        Some(rollup_sync) => {
            let l1_client = l1_client.ok_or_eyre("rollup sync requires an L1")?;
            let service = RollupSyncService::new(l1_client, l2_reader, database.clone(), rollup_sync);
            Some(tokio::spawn(service.run(token.child_token())))
        }
        None => None,
    };

    tracing::info!(
        target: "scroll::node",
        derivation_pipeline = derivation_pipeline.is_some(),
        rollup_sync = rollup_sync.is_some(),
        "launched rollup node"
    );

    Ok(RollupNodeHandle { derivation_pipeline, rollup_sync, database, token })
}
