//! Helpers building the L1 and L2 data read by the rollup sync.

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::{SolCall, SolEvent};
use rollup_node_primitives::{L2Transaction, TxL1Message};
use rollup_node_providers::{ExecutedBlock, L1Log};
use scroll_codec::{BatchHeader, BlockContext};
use scroll_l1::abi::{
    calls::commitBatchCall,
    logs::{CommitBatch, FinalizeBatch, RevertBatch},
};

pub(crate) const SCROLL_CHAIN_ADDRESS: Address = Address::repeat_byte(0x5c);

pub(crate) fn context(number: u64, num_transactions: u16, num_l1_messages: u16) -> BlockContext {
    BlockContext {
        number,
        timestamp: number * 3,
        base_fee: U256::from(1_000),
        gas_limit: 10_000_000,
        num_transactions,
        num_l1_messages,
    }
}

/// Returns the calldata of a v0 commit, one chunk per list of block contexts.
pub(crate) fn commit_calldata(chunks: &[&[BlockContext]]) -> Bytes {
    let chunks = chunks
        .iter()
        .map(|blocks| {
            let mut chunk = vec![blocks.len() as u8];
            for block in *blocks {
                chunk.extend_from_slice(&block.encode());
            }
            for i in 0..blocks.iter().map(BlockContext::l2_transactions_count).sum::<usize>() {
                chunk.extend_from_slice(&1u32.to_be_bytes());
                chunk.push(i as u8);
            }
            chunk.into()
        })
        .collect();

    commitBatchCall {
        version: 0,
        parent_batch_header: BatchHeader::default().encode().into(),
        chunks,
        skipped_l1_message_bitmap: Bytes::new(),
    }
    .abi_encode()
    .into()
}

pub(crate) fn l1_message(queue_index: u64) -> L2Transaction {
    TxL1Message {
        queue_index,
        gas_limit: 100_000,
        to: Address::repeat_byte(0x11),
        sender: Address::repeat_byte(0x22),
        ..Default::default()
    }
    .into()
}

pub(crate) fn executed_block(number: u64, transactions: Vec<L2Transaction>) -> ExecutedBlock {
    ExecutedBlock {
        number,
        timestamp: number * 3,
        base_fee: U256::from(1_000),
        gas_limit: 10_000_000,
        transactions,
        state_root: B256::left_padding_from(&[0x51, number as u8]),
        withdraw_root: B256::left_padding_from(&[0x77, number as u8]),
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

pub(crate) fn commit_log(batch_index: u64, block_number: u64) -> L1Log {
    let data = CommitBatch { batch_index: U256::from(batch_index), batch_hash: B256::ZERO }
        .encode_log_data();
    log(data.topics().to_vec(), data.data, block_number, 0)
}

pub(crate) fn revert_log(batch_index: u64, block_number: u64) -> L1Log {
    let data = RevertBatch { batch_index: U256::from(batch_index), batch_hash: B256::ZERO }
        .encode_log_data();
    log(data.topics().to_vec(), data.data, block_number, 0)
}

pub(crate) fn finalize_log(
    batch_index: u64,
    batch_hash: B256,
    state_root: B256,
    withdraw_root: B256,
    block_number: u64,
) -> L1Log {
    let data =
        FinalizeBatch { batch_index: U256::from(batch_index), batch_hash, state_root, withdraw_root }
            .encode_log_data();
    log(data.topics().to_vec(), data.data, block_number, 0)
}
