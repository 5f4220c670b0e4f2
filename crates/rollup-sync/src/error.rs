use alloy_primitives::B256;
use rollup_node_providers::{L1ProviderError, L2ChainError};
use scroll_codec::{CodecError, DecodingError};
use scroll_db::DatabaseError;
use scroll_l1::RollupEventError;

/// An error occurring during the rollup sync.
#[derive(Debug, thiserror::Error)]
pub enum RollupSyncError {
    /// The calldata is not a known commit call.
    #[error("invalid commit calldata")]
    InvalidCommitCalldata,
    /// An error in the codec.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// A batch was finalized without chunks.
    #[error("batch {0} has no chunks")]
    EmptyBatch(u64),
    /// The recomputed batch hash differs from the finalized one.
    #[error("batch {batch_index} hash mismatch: local {local}, finalized {finalized}")]
    BatchHashMismatch {
        /// The index of the batch.
        batch_index: u64,
        /// The recomputed hash.
        local: B256,
        /// The finalized hash.
        finalized: B256,
    },
    /// The local state root differs from the finalized one.
    #[error("batch {batch_index} state root mismatch: local {local}, finalized {finalized}")]
    StateRootMismatch {
        /// The index of the batch.
        batch_index: u64,
        /// The local state root.
        local: B256,
        /// The finalized state root.
        finalized: B256,
    },
    /// The local withdraw root differs from the finalized one.
    #[error("batch {batch_index} withdraw root mismatch: local {local}, finalized {finalized}")]
    WithdrawRootMismatch {
        /// The index of the batch.
        batch_index: u64,
        /// The local withdraw root.
        local: B256,
        /// The finalized withdraw root.
        finalized: B256,
    },
    /// The L1 chain id differs from the configured one.
    #[error("L1 chain id mismatch: expected {expected}, got {got}")]
    ChainIdMismatch {
        /// The configured chain id.
        expected: u64,
        /// The chain id of the L1 provider.
        got: u64,
    },
    /// The meta of the parent batch is unknown.
    #[error("missing finalized meta for parent of batch {0}")]
    MissingParentBatch(u64),
    /// The chunk block ranges of the batch are unknown.
    #[error("missing chunk block ranges for batch {0}")]
    MissingChunkRanges(u64),
    /// The local chain has not executed the block yet.
    #[error("missing local block {0}")]
    MissingLocalBlock(u64),
    /// An error at the L1 provider.
    #[error(transparent)]
    L1Provider(#[from] L1ProviderError),
    /// An error reading the local chain.
    #[error(transparent)]
    L2Chain(#[from] L2ChainError),
    /// A rollup event could not be decoded.
    #[error(transparent)]
    RollupEvent(#[from] RollupEventError),
    /// An error in the database.
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<DecodingError> for RollupSyncError {
    fn from(err: DecodingError) -> Self {
        Self::Codec(err.into())
    }
}

impl RollupSyncError {
    /// Returns true if the error means the local chain diverges from the L1 and the service must
    /// halt.
    pub const fn is_integrity_failure(&self) -> bool {
        matches!(
            self,
            Self::BatchHashMismatch { .. } |
                Self::StateRootMismatch { .. } |
                Self::WithdrawRootMismatch { .. } |
                Self::ChainIdMismatch { .. }
        )
    }
}
