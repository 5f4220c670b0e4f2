use crate::{
    decoding::ensure_remaining, error::DecodingError, from_be_bytes_slice_and_advance_buf,
    BlockContext,
};

use alloy_primitives::{bytes::Buf, U256};

#[derive(Debug)]
pub(crate) struct BlockContextV1 {
    pub(crate) number: u64,
    pub(crate) timestamp: u64,
    pub(crate) base_fee: u64,
    pub(crate) gas_limit: u64,
    pub(crate) num_transactions: u16,
    pub(crate) num_l1_messages: u16,
}

impl BlockContextV1 {
    pub(crate) const BYTES_LENGTH: usize = 60;

    /// Tries to read from the input buffer into the [`BlockContextV1`].
    /// Returns [`DecodingError::TruncatedChunk`] if the buffer.len() <
    /// [`BlockContextV1::BYTES_LENGTH`].
    pub(crate) fn try_from_buf(buf: &mut &[u8]) -> Result<Self, DecodingError> {
        ensure_remaining(buf, Self::BYTES_LENGTH)?;

        let number = from_be_bytes_slice_and_advance_buf!(u64, buf);
        let timestamp = from_be_bytes_slice_and_advance_buf!(u64, buf);

        // only the low 8 bytes of the base fee are read.
        buf.advance(24);
        let base_fee = from_be_bytes_slice_and_advance_buf!(u64, buf);

        let gas_limit = from_be_bytes_slice_and_advance_buf!(u64, buf);
        let num_transactions = from_be_bytes_slice_and_advance_buf!(u16, buf);
        let num_l1_messages = from_be_bytes_slice_and_advance_buf!(u16, buf);

        Ok(Self { number, timestamp, base_fee, gas_limit, num_transactions, num_l1_messages })
    }
}

impl From<BlockContextV1> for BlockContext {
    fn from(value: BlockContextV1) -> Self {
        Self {
            number: value.number,
            timestamp: value.timestamp,
            base_fee: U256::from(value.base_fee),
            gas_limit: value.gas_limit,
            num_transactions: value.num_transactions,
            num_l1_messages: value.num_l1_messages,
        }
    }
}
