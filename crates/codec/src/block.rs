//! Block context implementation.

use crate::error::InvalidChunksError;

use alloy_primitives::{bytes::BufMut, U256};
use rollup_node_primitives::L2Transaction;

/// The block's context, as committed in a chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockContext {
    /// The block number.
    pub number: u64,
    /// The block timestamp.
    pub timestamp: u64,
    /// The block base fee.
    pub base_fee: U256,
    /// The block gas limit.
    pub gas_limit: u64,
    /// The block's transaction count, L1 messages included.
    pub num_transactions: u16,
    /// The amount of L1 message queue indices popped by the block, skipped messages included.
    pub num_l1_messages: u16,
}

impl BlockContext {
    /// The length of the encoded block context.
    pub const BYTES_LENGTH: usize = 60;

    /// The length of the prefix of the encoding that is committed to in the chunk data hash.
    pub const HASHED_BYTES_LENGTH: usize = 58;

    /// Builds the context of a block from its header fields and transactions.
    ///
    /// `total_l1_message_popped_before` is the amount of L1 messages popped before the block and
    /// is used to count the skipped L1 messages preceding the last message of the block.
    pub fn from_block(
        number: u64,
        timestamp: u64,
        base_fee: U256,
        gas_limit: u64,
        transactions: &[L2Transaction],
        total_l1_message_popped_before: u64,
    ) -> Result<Self, InvalidChunksError> {
        let last_queue_index =
            transactions.iter().filter_map(L2Transaction::as_l1_message).map(|tx| tx.queue_index).last();
        let num_l1_messages = match last_queue_index {
            Some(index) if index < total_l1_message_popped_before => {
                return Err(InvalidChunksError::UnexpectedQueueIndex {
                    expected: total_l1_message_popped_before,
                    got: index,
                })
            }
            Some(index) => index - total_l1_message_popped_before + 1,
            None => 0,
        };
        let num_l2_transactions =
            transactions.iter().filter(|tx| !tx.is_l1_message()).count() as u64;
        let num_transactions = num_l1_messages + num_l2_transactions;

        let num_transactions = u16::try_from(num_transactions)
            .map_err(|_| InvalidChunksError::TooManyTransactions(number))?;
        let num_l1_messages = u16::try_from(num_l1_messages)
            .map_err(|_| InvalidChunksError::TooManyTransactions(number))?;

        Ok(Self { number, timestamp, base_fee, gas_limit, num_transactions, num_l1_messages })
    }

    /// Returns the L2 transaction count for the block, excluding L1 messages.
    pub fn l2_transactions_count(&self) -> usize {
        self.num_transactions.saturating_sub(self.num_l1_messages) as usize
    }

    /// Encodes the block context.
    pub fn encode(&self) -> [u8; Self::BYTES_LENGTH] {
        let mut bytes = [0u8; Self::BYTES_LENGTH];
        let mut buf = &mut bytes[..];
        buf.put_u64(self.number);
        buf.put_u64(self.timestamp);
        buf.put_slice(&self.base_fee.to_be_bytes::<32>());
        buf.put_u64(self.gas_limit);
        buf.put_u16(self.num_transactions);
        buf.put_u16(self.num_l1_messages);
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{hex, Bytes};
    use rollup_node_primitives::TxL1Message;

    fn l1_message(queue_index: u64) -> L2Transaction {
        TxL1Message { queue_index, ..Default::default() }.into()
    }

    #[test]
    fn test_should_encode_block_context() {
        let context = BlockContext {
            number: 680,
            timestamp: 1696933798,
            base_fee: U256::from(0x1234),
            gas_limit: 10000000,
            num_transactions: 3,
            num_l1_messages: 2,
        };

        let encoded = context.encode();
        assert_eq!(
            hex::encode(encoded),
            "00000000000002a800000000652527a60000000000000000000000000000000000000000000000000000000000001234000000000098968000030002"
        );
    }

    #[test]
    fn test_should_count_skipped_messages_in_context() -> eyre::Result<()> {
        let transactions = vec![l1_message(3), l1_message(5), L2Transaction::Raw(Bytes::from_static(&[1]))];
        let context = BlockContext::from_block(1, 2, U256::ZERO, 3, &transactions, 2)?;

        // queue indices 2 and 4 are skipped.
        assert_eq!(context.num_l1_messages, 4);
        assert_eq!(context.num_transactions, 5);
        assert_eq!(context.l2_transactions_count(), 1);

        Ok(())
    }

    #[test]
    fn test_should_reject_message_below_popped_count() {
        let transactions = vec![l1_message(1)];
        let err = BlockContext::from_block(1, 2, U256::ZERO, 3, &transactions, 2).unwrap_err();
        assert_eq!(err, InvalidChunksError::UnexpectedQueueIndex { expected: 2, got: 1 });
    }
}
