//! The rollup node: command line arguments, configuration and launch of the derivation pipeline
//! and the rollup sync service.

mod args;
pub use args::{
    BlobProviderArgs, ConfigError, DaSyncArgs, FetcherMode, L1Config, L1Network, L1NetworkArgs, L1ProviderArgs,
    L1RpcConfig, L1Source, RollupNodeArgs, RollupNodeConfig, RollupNodeDatabaseArgs,
    RollupSyncArgs,
};

pub mod constants;

mod launch;
pub use launch::{build_blob_provider, build_l1_client, launch, RollupNodeHandle};
