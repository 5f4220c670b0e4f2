//! Helpers building the L1 data read by the pipeline.

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::{SolCall, SolEvent};
use rollup_node_primitives::TxL1Message;
use rollup_node_providers::{test_utils::MockL1Client, L1Log};
use scroll_codec::{BatchHeader, BlockContext};
use scroll_l1::abi::{
    calls::{commitBatchCall, commitBatchWithBlobProofCall},
    logs::{CommitBatch, FinalizeBatch, RevertBatch},
};

pub(crate) const SCROLL_CHAIN_ADDRESS: Address = Address::repeat_byte(0x5c);

pub(crate) fn context(number: u64, num_transactions: u16, num_l1_messages: u16) -> BlockContext {
    BlockContext {
        number,
        timestamp: 1_700_000_000 + number,
        base_fee: U256::from(1_000),
        gas_limit: 10_000_000,
        num_transactions,
        num_l1_messages,
    }
}

/// Encodes a chunk in the v0 layout.
pub(crate) fn encode_chunk_v0(blocks: &[BlockContext], transactions: &[Bytes]) -> Bytes {
    let mut chunk = vec![blocks.len() as u8];
    for block in blocks {
        chunk.extend_from_slice(&block.encode());
    }
    for tx in transactions {
        chunk.extend_from_slice(&(tx.len() as u32).to_be_bytes());
        chunk.extend_from_slice(tx);
    }
    chunk.into()
}

pub(crate) fn parent_header(batch_index: u64, total_l1_message_popped: u64) -> BatchHeader {
    BatchHeader {
        batch_index,
        total_l1_message_popped,
        data_hash: B256::repeat_byte(batch_index as u8),
        ..Default::default()
    }
}

pub(crate) fn commit_calldata(parent: &BatchHeader, chunks: Vec<Bytes>, bitmap: Vec<u8>) -> Bytes {
    commitBatchCall {
        version: 0,
        parent_batch_header: parent.encode().into(),
        chunks,
        skipped_l1_message_bitmap: bitmap.into(),
    }
    .abi_encode()
    .into()
}

pub(crate) fn commit_with_blob_proof_calldata(parent: &BatchHeader, chunks: Vec<Bytes>) -> Bytes {
    commitBatchWithBlobProofCall {
        version: 1,
        parent_batch_header: parent.encode().into(),
        chunks,
        skipped_l1_message_bitmap: Bytes::new(),
        blob_data_proof: Bytes::from_static(&[0xbb; 160]),
    }
    .abi_encode()
    .into()
}

pub(crate) fn l1_message(queue_index: u64) -> TxL1Message {
    TxL1Message {
        queue_index,
        gas_limit: 100_000,
        to: Address::repeat_byte(0x11),
        sender: Address::repeat_byte(0x22),
        value: U256::from(queue_index),
        ..Default::default()
    }
}

fn log(topics: Vec<B256>, data: Bytes, block_number: u64, log_index: u64) -> L1Log {
    L1Log {
        address: SCROLL_CHAIN_ADDRESS,
        topics,
        data,
        block_number,
        block_hash: B256::left_padding_from(&block_number.to_be_bytes()),
        transaction_hash: B256::left_padding_from(&[block_number as u8, log_index as u8, 0xcc]),
        log_index,
    }
}

pub(crate) fn commit_log(batch_index: u64, block_number: u64, log_index: u64) -> L1Log {
    let data = CommitBatch { batch_index: U256::from(batch_index), batch_hash: B256::ZERO }
        .encode_log_data();
    log(data.topics().to_vec(), data.data, block_number, log_index)
}

pub(crate) fn revert_log(batch_index: u64, block_number: u64, log_index: u64) -> L1Log {
    let data = RevertBatch { batch_index: U256::from(batch_index), batch_hash: B256::ZERO }
        .encode_log_data();
    log(data.topics().to_vec(), data.data, block_number, log_index)
}

pub(crate) fn finalize_log(
    batch_index: u64,
    batch_hash: B256,
    block_number: u64,
    log_index: u64,
) -> L1Log {
    let data = FinalizeBatch {
        batch_index: U256::from(batch_index),
        batch_hash,
        state_root: B256::repeat_byte(0xaa),
        withdraw_root: B256::repeat_byte(0xbb),
    }
    .encode_log_data();
    log(data.topics().to_vec(), data.data, block_number, log_index)
}

/// Adds the genesis batch, committed at L1 block 10 and finalized at 11, and batch 1, committed
/// at L1 block 12 and finalized at 13.
///
/// Batch 1 holds one chunk of two blocks: block 1 includes L1 messages 0 and 1 followed by one L2
/// transaction, block 2 holds one L2 transaction.
pub(crate) fn add_two_batches(client: &MockL1Client) {
    client.add_log(commit_log(0, 10, 0), Bytes::new());
    client.add_log(finalize_log(0, B256::ZERO, 11, 0), Bytes::new());

    let chunk = encode_chunk_v0(
        &[context(1, 3, 2), context(2, 1, 0)],
        &[Bytes::from_static(&[0x01]), Bytes::from_static(&[0x02])],
    );
    client.add_log(commit_log(1, 12, 0), commit_calldata(&parent_header(0, 0), vec![chunk], vec![0; 32]));
    client.add_log(finalize_log(1, B256::repeat_byte(1), 13, 0), Bytes::new());
}
