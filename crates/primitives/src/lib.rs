//! Primitive types for the Rollup Node.

#![cfg_attr(not(feature = "std"), no_std)]
#[cfg(not(feature = "std"))]
extern crate alloc as std;

pub use batch::{ChunkBlockRange, FinalizedBatchMeta};
mod batch;

pub use block::{BlockInfo, DerivedBlock};
mod block;

pub use transaction::{L1MessageEnvelope, L2Transaction, TxL1Message, L1_MESSAGE_TRANSACTION_TYPE};
mod transaction;
