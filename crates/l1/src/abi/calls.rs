use alloy_primitives::Bytes;
use alloy_sol_types::{sol, SolCall};

sol! {
    #[derive(Debug, PartialEq, Eq)]
    function commitBatch(
        uint8 version,
        bytes calldata parent_batch_header,
        bytes[] memory chunks,
        bytes calldata skipped_l1_message_bitmap
    ) external;

    #[derive(Debug, PartialEq, Eq)]
    function commitBatchWithBlobProof(
        uint8 version,
        bytes calldata parent_batch_header,
        bytes[] memory chunks,
        bytes calldata skipped_l1_message_bitmap,
        bytes calldata blob_data_proof
    ) external;
}

/// A call to commit a batch on the L1 Scroll Rollup contract.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::From)]
pub enum CommitBatchCall {
    /// A plain call to commit the batch.
    CommitBatch(commitBatchCall),
    /// A call to commit the batch with a blob proof.
    CommitBatchWithBlobProof(commitBatchWithBlobProofCall),
}

impl CommitBatchCall {
    /// Tries to decode the calldata into a [`CommitBatchCall`].
    pub fn try_decode(calldata: &[u8]) -> Option<Self> {
        let selector: [u8; 4] = calldata.get(0..4)?.try_into().ok()?;
        match selector {
            commitBatchCall::SELECTOR => commitBatchCall::abi_decode(calldata).map(Into::into).ok(),
            commitBatchWithBlobProofCall::SELECTOR => {
                commitBatchWithBlobProofCall::abi_decode(calldata).map(Into::into).ok()
            }
            _ => None,
        }
    }

    /// Returns the version for the commit call.
    pub const fn version(&self) -> u8 {
        match self {
            Self::CommitBatch(b) => b.version,
            Self::CommitBatchWithBlobProof(b) => b.version,
        }
    }

    /// Returns the parent batch header for the commit call.
    pub fn parent_batch_header(&self) -> &[u8] {
        match self {
            Self::CommitBatch(b) => &b.parent_batch_header,
            Self::CommitBatchWithBlobProof(b) => &b.parent_batch_header,
        }
    }

    /// Returns the chunks for the commit call.
    pub fn chunks(&self) -> &[Bytes] {
        match self {
            Self::CommitBatch(b) => &b.chunks,
            Self::CommitBatchWithBlobProof(b) => &b.chunks,
        }
    }

    /// Returns the skipped L1 message bitmap for the commit call.
    pub fn skipped_l1_message_bitmap(&self) -> &[u8] {
        match self {
            Self::CommitBatch(b) => &b.skipped_l1_message_bitmap,
            Self::CommitBatchWithBlobProof(b) => &b.skipped_l1_message_bitmap,
        }
    }
}
