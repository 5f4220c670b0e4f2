use crate::constants;
use std::{path::PathBuf, time::Duration};

use alloy_primitives::Address;
use scroll_derivation_pipeline::{DataSourceConfig, DerivationPipelineConfig};
use scroll_rollup_sync::RollupSyncConfig;

/// A struct that represents the arguments for the rollup node.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RollupNodeArgs {
    /// The L1 network arguments.
    #[command(flatten)]
    pub network_args: L1NetworkArgs,
    /// Database args
    #[command(flatten)]
    pub database_args: RollupNodeDatabaseArgs,
    /// The L1 provider arguments
    #[command(flatten)]
    pub l1_provider_args: L1ProviderArgs,
    /// The blob provider arguments.
    #[command(flatten)]
    pub blob_provider_args: BlobProviderArgs,
    /// The derivation pipeline arguments.
    #[command(flatten)]
    pub da_sync_args: DaSyncArgs,
    /// The rollup sync arguments.
    #[command(flatten)]
    pub rollup_sync_args: RollupSyncArgs,
}

impl RollupNodeArgs {
    /// Validates the arguments and converts them into a [`RollupNodeConfig`].
    pub fn validate(&self) -> Result<RollupNodeConfig, ConfigError> {
        let l1 = self.network_args.l1_config();

        let da_sync = self
            .da_sync_args
            .enabled
            .then(|| self.da_sync_args.config(&l1, self.network_args.network))
            .transpose()?;
        let rollup_sync = self.rollup_sync_args.enabled.then(|| self.rollup_sync_args.config(&l1));

        // the snapshot only replaces the provider of the derivation pipeline.
        let l1_source = if da_sync.is_some() && self.da_sync_args.fetcher_mode == FetcherMode::Snapshot
        {
            if rollup_sync.is_some() {
                return Err(ConfigError::SnapshotWithRollupSync);
            }
            let path =
                self.da_sync_args.snapshot_file.clone().ok_or(ConfigError::MissingSnapshotFile)?;
            L1Source::Snapshot(path)
        } else {
            let url = self.l1_provider_args.url.clone();
            match url {
                Some(url) => L1Source::Rpc(L1RpcConfig {
                    url,
                    max_retries: self.l1_provider_args.max_retries,
                    initial_backoff: self.l1_provider_args.initial_backoff,
                    compute_units_per_second: self.l1_provider_args.compute_units_per_second,
                }),
                None if da_sync.is_some() || rollup_sync.is_some() => {
                    return Err(ConfigError::MissingL1Url)
                }
                None => L1Source::None,
            }
        };

        let database_url = self
            .database_args
            .rn_db_path
            .as_ref()
            .map(|path| format!("sqlite:{}?mode=rwc", path.to_string_lossy()))
            .unwrap_or_else(|| constants::DEFAULT_DATABASE_URL.to_string());

        Ok(RollupNodeConfig {
            database_url,
            l1,
            l1_source,
            beacon_url: self.blob_provider_args.beacon_node_url.clone(),
            da_sync,
            rollup_sync,
        })
    }
}

/// An error returned by the validation of the [`RollupNodeArgs`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The L1 url is required to fetch data from the L1 RPC.
    #[error("the L1 url is required when the derivation pipeline or the rollup sync use the L1 RPC")]
    MissingL1Url,
    /// The snapshot fetcher mode requires a snapshot file.
    #[error("the snapshot fetcher mode requires a snapshot file")]
    MissingSnapshotFile,
    /// The rollup sync validates against the live L1 and can't run on a snapshot.
    #[error("the rollup sync can't be enabled with the snapshot fetcher mode")]
    SnapshotWithRollupSync,
    /// A fetch range of zero never advances.
    #[error("the {0} fetch range must be non-zero")]
    ZeroFetchRange(&'static str),
}

/// The L1 network the rollup is settled on.
#[derive(Debug, Default, clap::ValueEnum, Clone, Copy, PartialEq, Eq)]
pub enum L1Network {
    /// The Ethereum mainnet.
    #[default]
    Mainnet,
    /// The Sepolia testnet.
    Sepolia,
}

/// The L1 network arguments.
#[derive(Debug, Default, Clone, clap::Args)]
pub struct L1NetworkArgs {
    /// The L1 network.
    #[arg(long = "l1.network", id = "l1_network", value_name = "L1_NETWORK", value_enum, default_value_t = L1Network::Mainnet)]
    pub network: L1Network,
    /// Overrides the chain id of the network.
    #[arg(long = "l1.chain-id", id = "l1_chain_id", value_name = "L1_CHAIN_ID")]
    pub chain_id: Option<u64>,
    /// Overrides the address of the Scroll Chain contract.
    #[arg(long = "l1.scroll-chain-address", id = "l1_scroll_chain_address", value_name = "L1_SCROLL_CHAIN_ADDRESS")]
    pub scroll_chain_address: Option<Address>,
    /// Overrides the L1 block the Scroll Chain contract was deployed at.
    #[arg(long = "l1.deployment-block", id = "l1_deployment_block", value_name = "L1_DEPLOYMENT_BLOCK")]
    pub deployment_block: Option<u64>,
}

impl L1NetworkArgs {
    /// Returns the [`L1Config`] of the network with the overrides applied.
    pub fn l1_config(&self) -> L1Config {
        let default = match self.network {
            L1Network::Mainnet => L1Config {
                chain_id: scroll_l1::MAINNET_L1_CHAIN_ID,
                scroll_chain_address: scroll_l1::MAINNET_L1_SCROLL_CHAIN_ADDRESS,
                deployment_block: scroll_l1::MAINNET_L1_DEPLOYMENT_BLOCK,
            },
            L1Network::Sepolia => L1Config {
                chain_id: scroll_l1::SEPOLIA_L1_CHAIN_ID,
                scroll_chain_address: scroll_l1::SEPOLIA_L1_SCROLL_CHAIN_ADDRESS,
                deployment_block: scroll_l1::SEPOLIA_L1_DEPLOYMENT_BLOCK,
            },
        };
        L1Config {
            chain_id: self.chain_id.unwrap_or(default.chain_id),
            scroll_chain_address: self.scroll_chain_address.unwrap_or(default.scroll_chain_address),
            deployment_block: self.deployment_block.unwrap_or(default.deployment_block),
        }
    }
}

/// The database arguments.
#[derive(Debug, Default, Clone, clap::Args)]
pub struct RollupNodeDatabaseArgs {
    /// Database path
    #[arg(
        long = "rollup-node-db.path",
        value_name = "DB_PATH",
        help = "The database path for the rollup node database"
    )]
    pub rn_db_path: Option<PathBuf>,
}

/// The arguments for the L1 provider.
#[derive(Debug, Clone, clap::Args)]
pub struct L1ProviderArgs {
    /// The URL for the L1 RPC.
    #[arg(long = "l1.url", id = "l1_url", value_name = "L1_URL")]
    pub url: Option<reqwest::Url>,
    /// The compute units per second for the provider.
    #[arg(long = "l1.cups", id = "l1_compute_units_per_second", value_name = "L1_COMPUTE_UNITS_PER_SECOND", default_value_t = constants::PROVIDER_COMPUTE_UNITS_PER_SECOND)]
    pub compute_units_per_second: u64,
    /// The max amount of retries for the provider.
    #[arg(long = "l1.max-retries", id = "l1_max_retries", value_name = "L1_MAX_RETRIES", default_value_t = constants::L1_PROVIDER_MAX_RETRIES)]
    pub max_retries: u32,
    /// The initial backoff for the provider.
    #[arg(long = "l1.initial-backoff", id = "l1_initial_backoff", value_name = "L1_INITIAL_BACKOFF", default_value_t = constants::L1_PROVIDER_INITIAL_BACKOFF)]
    pub initial_backoff: u64,
}

impl Default for L1ProviderArgs {
    fn default() -> Self {
        Self {
            url: None,
            compute_units_per_second: constants::PROVIDER_COMPUTE_UNITS_PER_SECOND,
            max_retries: constants::L1_PROVIDER_MAX_RETRIES,
            initial_backoff: constants::L1_PROVIDER_INITIAL_BACKOFF,
        }
    }
}

/// The arguments for the blob provider.
#[derive(Debug, Default, Clone, clap::Args)]
pub struct BlobProviderArgs {
    /// The URL of the beacon node serving the blob sidecars.
    #[arg(long = "blob.beacon-node-url", id = "blob_beacon_node_url", value_name = "BLOB_BEACON_NODE_URL")]
    pub beacon_node_url: Option<reqwest::Url>,
}

/// The source the derivation pipeline fetches the L1 data from.
#[derive(Debug, Default, clap::ValueEnum, Clone, Copy, PartialEq, Eq)]
pub enum FetcherMode {
    /// Fetch the rollup events and calldata from the L1 RPC.
    #[default]
    #[value(name = "l1rpc")]
    L1Rpc,
    /// Replay a recorded L1 snapshot file.
    #[value(name = "snapshot")]
    Snapshot,
}

/// The derivation pipeline arguments.
#[derive(Debug, Clone, clap::Args)]
pub struct DaSyncArgs {
    /// Whether the chain should be derived from the data committed on L1.
    #[arg(long = "da.enable", id = "da_enable", default_value_t = false)]
    pub enabled: bool,
    /// The source of the L1 data.
    #[arg(long = "da.fetcher-mode", id = "da_fetcher_mode", value_name = "DA_FETCHER_MODE", value_enum, default_value_t = FetcherMode::L1Rpc)]
    pub fetcher_mode: FetcherMode,
    /// The snapshot file replayed in snapshot mode.
    #[arg(long = "da.snapshot-file", id = "da_snapshot_file", value_name = "DA_SNAPSHOT_FILE")]
    pub snapshot_file: Option<PathBuf>,
    /// The amount of L1 blocks fetched per window.
    #[arg(long = "da.fetch-range", id = "da_fetch_range", value_name = "DA_FETCH_RANGE", default_value_t = constants::DA_FETCH_RANGE)]
    pub fetch_range: u64,
    /// The interval between two derivation steps in milliseconds.
    #[arg(long = "da.sync-interval", id = "da_sync_interval", value_name = "DA_SYNC_INTERVAL_MS", default_value_t = constants::DA_SYNC_INTERVAL_MS)]
    pub sync_interval: u64,
    /// Overrides the height from which the commits are read as blob-era commits.
    #[arg(long = "da.blob-activation-height", id = "da_blob_activation_height", value_name = "DA_BLOB_ACTIVATION_HEIGHT")]
    pub blob_activation_height: Option<u64>,
}

impl Default for DaSyncArgs {
    fn default() -> Self {
        Self {
            enabled: false,
            fetcher_mode: FetcherMode::L1Rpc,
            snapshot_file: None,
            fetch_range: constants::DA_FETCH_RANGE,
            sync_interval: constants::DA_SYNC_INTERVAL_MS,
            blob_activation_height: None,
        }
    }
}

impl DaSyncArgs {
    fn config(
        &self,
        l1: &L1Config,
        network: L1Network,
    ) -> Result<DerivationPipelineConfig, ConfigError> {
        if self.fetch_range == 0 {
            return Err(ConfigError::ZeroFetchRange("derivation pipeline"));
        }
        let blob_activation_height = self.blob_activation_height.unwrap_or(match network {
            L1Network::Mainnet => constants::MAINNET_BLOB_ACTIVATION_HEIGHT,
            L1Network::Sepolia => constants::SEPOLIA_BLOB_ACTIVATION_HEIGHT,
        });

        Ok(DerivationPipelineConfig {
            data_source: DataSourceConfig {
                scroll_chain_address: l1.scroll_chain_address,
                blob_activation_height,
                fetch_range: self.fetch_range,
            },
            l1_deployment_block: l1.deployment_block,
            sync_interval: Duration::from_millis(self.sync_interval),
        })
    }
}

/// The rollup sync arguments.
#[derive(Debug, Clone, clap::Args)]
pub struct RollupSyncArgs {
    /// Whether the finalized batches should be validated against the local chain.
    #[arg(long = "rollup-sync.enable", id = "rollup_sync_enable", default_value_t = false)]
    pub enabled: bool,
    /// The interval between two steps in seconds.
    #[arg(long = "rollup-sync.interval", id = "rollup_sync_interval", value_name = "ROLLUP_SYNC_INTERVAL_SECS", default_value_t = constants::ROLLUP_SYNC_INTERVAL_SECS)]
    pub interval: u64,
    /// The amount of L1 blocks fetched per window.
    #[arg(long = "rollup-sync.fetch-range", id = "rollup_sync_fetch_range", value_name = "ROLLUP_SYNC_FETCH_RANGE", default_value_t = constants::ROLLUP_SYNC_FETCH_RANGE)]
    pub fetch_range: u64,
}

impl Default for RollupSyncArgs {
    fn default() -> Self {
        Self {
            enabled: false,
            interval: constants::ROLLUP_SYNC_INTERVAL_SECS,
            fetch_range: constants::ROLLUP_SYNC_FETCH_RANGE,
        }
    }
}

impl RollupSyncArgs {
    fn config(&self, l1: &L1Config) -> RollupSyncConfig {
        RollupSyncConfig {
            l1_chain_id: l1.chain_id,
            scroll_chain_address: l1.scroll_chain_address,
            l1_deployment_block: l1.deployment_block,
            // a zero range is clamped rather than rejected, the window still advances by one.
            fetch_range: self.fetch_range.max(1),
            interval: Duration::from_secs(self.interval),
        }
    }
}

/// The L1 settings of the rollup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct L1Config {
    /// The chain id of the L1.
    pub chain_id: u64,
    /// The address of the Scroll Chain contract.
    pub scroll_chain_address: Address,
    /// The L1 block the Scroll Chain contract was deployed at.
    pub deployment_block: u64,
}

/// The settings of the retrying L1 RPC provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct L1RpcConfig {
    /// The URL for the L1 RPC.
    pub url: reqwest::Url,
    /// The max amount of retries.
    pub max_retries: u32,
    /// The initial backoff in milliseconds.
    pub initial_backoff: u64,
    /// The compute units per second.
    pub compute_units_per_second: u64,
}

/// The source of the L1 data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum L1Source {
    /// No task needs the L1.
    None,
    /// The L1 RPC.
    Rpc(L1RpcConfig),
    /// A recorded snapshot file.
    Snapshot(PathBuf),
}

/// The validated configuration of the rollup node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollupNodeConfig {
    /// The url of the rollup node database.
    pub database_url: String,
    /// The L1 settings.
    pub l1: L1Config,
    /// The source of the L1 data.
    pub l1_source: L1Source,
    /// The beacon node serving the blobs of the blob-era commits, if any.
    pub beacon_url: Option<reqwest::Url>,
    /// The derivation pipeline configuration, if enabled.
    pub da_sync: Option<DerivationPipelineConfig>,
    /// The rollup sync configuration, if enabled.
    pub rollup_sync: Option<RollupSyncConfig>,
}
