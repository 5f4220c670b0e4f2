use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use alloy_rlp::{BufMut, Encodable, RlpDecodable, RlpEncodable};
use std::vec::Vec;

/// The EIP-2718 transaction type of an L1 message.
pub const L1_MESSAGE_TRANSACTION_TYPE: u8 = 0x7E;

/// An L1 message transaction, enqueued on L1 and included in L2 blocks by queue index.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, RlpEncodable, RlpDecodable)]
pub struct TxL1Message {
    /// The queue index of the message in the L1 message queue.
    pub queue_index: u64,
    /// The gas limit for the message execution.
    pub gas_limit: u64,
    /// The target of the message.
    pub to: Address,
    /// The value sent along the message.
    pub value: U256,
    /// The message calldata.
    pub input: Bytes,
    /// The L1 sender of the message.
    pub sender: Address,
}

impl TxL1Message {
    /// Returns the EIP-2718 encoding of the message: the type byte followed by the RLP list.
    pub fn encoded_2718(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.length());
        out.put_u8(L1_MESSAGE_TRANSACTION_TYPE);
        self.encode(&mut out);
        out
    }

    /// Computes the transaction hash of the message.
    pub fn tx_hash(&self) -> B256 {
        keccak256(self.encoded_2718())
    }
}

#[cfg(feature = "arbitrary")]
impl arbitrary::Arbitrary<'_> for TxL1Message {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        Ok(Self {
            queue_index: u.arbitrary::<u32>()? as u64,
            gas_limit: u.arbitrary()?,
            to: u.arbitrary()?,
            value: u.arbitrary()?,
            input: u.arbitrary()?,
            sender: u.arbitrary()?,
        })
    }
}

/// An L1 message along the L1 block number at which it was enqueued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct L1MessageEnvelope {
    /// The L1 block number at which the L1 message was generated.
    pub block_number: u64,
    /// The L1 message.
    pub transaction: TxL1Message,
}

impl L1MessageEnvelope {
    /// Returns a new [`L1MessageEnvelope`].
    pub const fn new(block_number: u64, transaction: TxL1Message) -> Self {
        Self { block_number, transaction }
    }
}

#[cfg(feature = "arbitrary")]
impl arbitrary::Arbitrary<'_> for L1MessageEnvelope {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        Ok(Self { block_number: u.arbitrary::<u32>()? as u64, transaction: u.arbitrary()? })
    }
}

/// A transaction of an L2 block.
///
/// L2 transactions are kept in their raw EIP-2718 encoded form as published on L1, L1 messages
/// are kept decoded.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::From)]
pub enum L2Transaction {
    /// An L1 message.
    L1Message(TxL1Message),
    /// An EIP-2718 encoded L2 transaction.
    Raw(Bytes),
}

impl L2Transaction {
    /// Returns true if the transaction is an L1 message.
    pub const fn is_l1_message(&self) -> bool {
        matches!(self, Self::L1Message(_))
    }

    /// Returns the L1 message if the transaction is one.
    pub const fn as_l1_message(&self) -> Option<&TxL1Message> {
        match self {
            Self::L1Message(tx) => Some(tx),
            Self::Raw(_) => None,
        }
    }

    /// Returns the EIP-2718 encoding of the transaction.
    pub fn encoded_2718(&self) -> Bytes {
        match self {
            Self::L1Message(tx) => tx.encoded_2718().into(),
            Self::Raw(raw) => raw.clone(),
        }
    }

    /// Computes the transaction hash.
    pub fn tx_hash(&self) -> B256 {
        match self {
            Self::L1Message(tx) => tx.tx_hash(),
            Self::Raw(raw) => keccak256(raw),
        }
    }
}
