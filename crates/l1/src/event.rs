use crate::abi::logs::{CommitBatch, FinalizeBatch, RevertBatch};

use alloy_primitives::{B256, U256};
use alloy_sol_types::SolEvent;

/// The signatures of the Scroll Chain events relevant to the derivation of the L2.
pub const ROLLUP_EVENT_SIGNATURES: [B256; 3] =
    [CommitBatch::SIGNATURE_HASH, RevertBatch::SIGNATURE_HASH, FinalizeBatch::SIGNATURE_HASH];

/// A rollup event emitted by the Scroll Chain contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollupEvent {
    /// A batch was committed.
    Commit {
        /// The index of the batch.
        batch_index: u64,
        /// The hash of the batch.
        batch_hash: B256,
    },
    /// A committed batch was reverted.
    Revert {
        /// The index of the batch.
        batch_index: u64,
        /// The hash of the batch.
        batch_hash: B256,
    },
    /// A batch was finalized.
    Finalize {
        /// The index of the batch.
        batch_index: u64,
        /// The hash of the batch.
        batch_hash: B256,
        /// The state root after the batch.
        state_root: B256,
        /// The withdraw root after the batch.
        withdraw_root: B256,
    },
}

/// An error occurring while decoding a [`RollupEvent`].
#[derive(Debug, thiserror::Error)]
pub enum RollupEventError {
    /// The log's first topic is not a rollup event signature.
    #[error("unknown rollup event topic {0:?}")]
    UnknownTopic(Option<B256>),
    /// The log could not be decoded.
    #[error("failed to decode {log_type} log: {error}")]
    Decode {
        /// The type of the log.
        log_type: &'static str,
        /// The decoding error.
        error: alloy_sol_types::Error,
    },
    /// The batch index does not fit in 64 bits.
    #[error("batch index {0} overflows u64")]
    BatchIndexOverflow(U256),
}

impl RollupEvent {
    /// Decodes the raw log into a [`RollupEvent`], dispatching on the first topic.
    pub fn try_decode(topics: &[B256], data: &[u8]) -> Result<Self, RollupEventError> {
        match topics.first().copied() {
            Some(CommitBatch::SIGNATURE_HASH) => {
                let event = decode::<CommitBatch>(topics, data, "CommitBatch")?;
                Ok(Self::Commit {
                    batch_index: batch_index(event.batch_index)?,
                    batch_hash: event.batch_hash,
                })
            }
            Some(RevertBatch::SIGNATURE_HASH) => {
                let event = decode::<RevertBatch>(topics, data, "RevertBatch")?;
                Ok(Self::Revert {
                    batch_index: batch_index(event.batch_index)?,
                    batch_hash: event.batch_hash,
                })
            }
            Some(FinalizeBatch::SIGNATURE_HASH) => {
                let event = decode::<FinalizeBatch>(topics, data, "FinalizeBatch")?;
                Ok(Self::Finalize {
                    batch_index: batch_index(event.batch_index)?,
                    batch_hash: event.batch_hash,
                    state_root: event.state_root,
                    withdraw_root: event.withdraw_root,
                })
            }
            topic => Err(RollupEventError::UnknownTopic(topic)),
        }
    }

    /// Returns the index of the batch the event refers to.
    pub const fn batch_index(&self) -> u64 {
        match self {
            Self::Commit { batch_index, .. } |
            Self::Revert { batch_index, .. } |
            Self::Finalize { batch_index, .. } => *batch_index,
        }
    }
}

fn decode<T: SolEvent>(
    topics: &[B256],
    data: &[u8],
    log_type: &'static str,
) -> Result<T, RollupEventError> {
    T::decode_raw_log(topics.iter().copied(), data)
        .map_err(|error| RollupEventError::Decode { log_type, error })
}

fn batch_index(index: U256) -> Result<u64, RollupEventError> {
    index.try_into().map_err(|_| RollupEventError::BatchIndexOverflow(index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_decode_rollup_events() -> eyre::Result<()> {
        let batch_hash = B256::repeat_byte(0xaa);

        let log = CommitBatch { batch_index: U256::from(5), batch_hash }.encode_log_data();
        assert_eq!(
            RollupEvent::try_decode(log.topics(), &log.data)?,
            RollupEvent::Commit { batch_index: 5, batch_hash }
        );

        let log = RevertBatch { batch_index: U256::from(6), batch_hash }.encode_log_data();
        assert_eq!(
            RollupEvent::try_decode(log.topics(), &log.data)?,
            RollupEvent::Revert { batch_index: 6, batch_hash }
        );

        let log = FinalizeBatch {
            batch_index: U256::from(7),
            batch_hash,
            state_root: B256::repeat_byte(1),
            withdraw_root: B256::repeat_byte(2),
        }
        .encode_log_data();
        let event = RollupEvent::try_decode(log.topics(), &log.data)?;
        assert_eq!(
            event,
            RollupEvent::Finalize {
                batch_index: 7,
                batch_hash,
                state_root: B256::repeat_byte(1),
                withdraw_root: B256::repeat_byte(2)
            }
        );
        assert_eq!(event.batch_index(), 7);

        Ok(())
    }

    #[test]
    fn test_should_reject_unknown_topic() {
        let topic = B256::repeat_byte(0x11);
        assert!(matches!(
            RollupEvent::try_decode(&[topic], &[]),
            Err(RollupEventError::UnknownTopic(Some(t))) if t == topic
        ));
        assert!(matches!(
            RollupEvent::try_decode(&[], &[]),
            Err(RollupEventError::UnknownTopic(None))
        ));
    }

    #[test]
    fn test_should_reject_overflowing_batch_index() {
        let log = CommitBatch { batch_index: U256::MAX, batch_hash: B256::ZERO }.encode_log_data();
        assert!(matches!(
            RollupEvent::try_decode(log.topics(), &log.data),
            Err(RollupEventError::BatchIndexOverflow(_))
        ));
    }
}
