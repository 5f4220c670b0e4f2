use crate::L2Transaction;

use alloy_primitives::{B256, U256};
use std::vec::Vec;

/// Information about a block.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, derive_more::Display)]
#[display("BlockInfo {{ number: {number}, hash: {hash} }}")]
pub struct BlockInfo {
    /// The block number.
    pub number: u64,
    /// The block hash.
    pub hash: B256,
}

impl BlockInfo {
    /// Returns a new instance of [`BlockInfo`].
    pub const fn new(number: u64, hash: B256) -> Self {
        Self { number, hash }
    }
}

/// An L2 block derived from the data committed on L1, before execution.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DerivedBlock {
    /// The block number.
    pub number: u64,
    /// The block timestamp.
    pub timestamp: u64,
    /// The block gas limit.
    pub gas_limit: u64,
    /// The base fee committed in the block context.
    pub base_fee: U256,
    /// The transactions of the block, L1 messages first.
    pub transactions: Vec<L2Transaction>,
}

impl DerivedBlock {
    /// Returns an iterator over the queue indices of the L1 messages included in the block.
    pub fn l1_message_queue_indices(&self) -> impl Iterator<Item = u64> + '_ {
        self.transactions.iter().filter_map(L2Transaction::as_l1_message).map(|tx| tx.queue_index)
    }
}

#[cfg(feature = "arbitrary")]
impl arbitrary::Arbitrary<'_> for BlockInfo {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let number = u.int_in_range(0..=u32::MAX)?;
        let hash = B256::arbitrary(u)?;
        Ok(Self { number: number as u64, hash })
    }
}
