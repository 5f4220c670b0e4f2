use alloy_primitives::B256;
use rollup_node_providers::{L1ProviderError, L2ChainError};
use scroll_codec::{CodecError, DecodingError};
use scroll_db::DatabaseError;
use scroll_l1::RollupEventError;

/// An error occurring at a data source.
#[derive(Debug, thiserror::Error)]
pub enum DataSourceError {
    /// The source has no more data up to its maximum L1 height.
    #[error("data source exhausted")]
    Exhausted,
    /// An error at the L1 provider.
    #[error(transparent)]
    L1Provider(#[from] L1ProviderError),
    /// A rollup event could not be decoded.
    #[error(transparent)]
    RollupEvent(#[from] RollupEventError),
    /// The calldata of the commit transaction is not a known commit call.
    #[error("invalid commit calldata in transaction {0}")]
    InvalidCommitCalldata(B256),
    /// An error in the codec.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// The L1 message is missing from the local store.
    #[error("missing L1 message with queue index {0}")]
    MissingL1Message(u64),
    /// A commit with a blob proof was sent by a transaction without blobs.
    #[error("missing blob versioned hash in commit transaction {0}")]
    MissingBlobVersionedHash(B256),
    /// The blob provider has no blob for the versioned hash.
    #[error("missing blob for versioned hash {0}")]
    MissingBlob(B256),
}

impl From<DecodingError> for DataSourceError {
    fn from(err: DecodingError) -> Self {
        Self::Codec(err.into())
    }
}

/// An error occurred during the derivation process.
#[derive(Debug, thiserror::Error)]
pub enum DerivationPipelineError {
    /// An error at the data source.
    #[error(transparent)]
    DataSource(#[from] DataSourceError),
    /// A batch was finalized without a pending commit.
    #[error("unknown batch for index {0}")]
    UnknownBatch(u64),
    /// The block does not extend the head of the chain.
    #[error("non consecutive block: expected {expected}, got {got}")]
    NonConsecutiveBlock {
        /// The expected block number.
        expected: u64,
        /// The received block number.
        got: u64,
    },
    /// L1 messages of the batch are not included by any of its blocks.
    #[error("{count} L1 messages left after flattening batch {batch_index}")]
    UnconsumedL1Messages {
        /// The index of the batch.
        batch_index: u64,
        /// The amount of L1 messages left.
        count: usize,
    },
    /// The transactions of a chunk do not match its block contexts.
    #[error("malformed chunk in batch {batch_index}: {source}")]
    MalformedChunk {
        /// The index of the batch.
        batch_index: u64,
        /// The decoding error.
        #[source]
        source: DecodingError,
    },
    /// The chain failed to preprocess or insert the block.
    #[error("failed to sync block {index}: {source}")]
    Chain {
        /// The number of the failed block.
        index: u64,
        /// The chain error.
        #[source]
        source: L2ChainError,
    },
    /// The chain failed to return its head.
    #[error("failed to read chain head: {0}")]
    ChainHead(#[source] L2ChainError),
    /// An error in the database.
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// The class of a [`DerivationPipelineError`], deciding how the pipeline recovers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The in memory state is kept and the step is retried on the next tick.
    Transport,
    /// The queues are rebuilt from the durable checkpoint on the next tick.
    Rebuild,
    /// The pipeline halts.
    Integrity,
}

impl DerivationPipelineError {
    /// Returns the [`ErrorKind`] of the error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::DataSource(
                DataSourceError::Exhausted |
                DataSourceError::L1Provider(
                    L1ProviderError::Rpc(_) |
                    L1ProviderError::BeaconProvider(_) |
                    L1ProviderError::MissingBlock(_) |
                    L1ProviderError::MissingFinalizedBlock |
                    L1ProviderError::TransactionNotFound { .. },
                ),
            ) => ErrorKind::Transport,
            Self::UnknownBatch(_) |
            Self::NonConsecutiveBlock { .. } |
            Self::UnconsumedL1Messages { .. } |
            Self::MalformedChunk { .. } => ErrorKind::Integrity,
            Self::DataSource(_) | Self::Chain { .. } | Self::ChainHead(_) | Self::Database(_) => {
                ErrorKind::Rebuild
            }
        }
    }
}
