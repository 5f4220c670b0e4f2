//! Test utils for providers.

use crate::{
    BlobProvider, ExecutedBlock, L1Block, L1Client, L1Log, L1LogFilter, L1MessageProvider,
    L1ProviderError, L1Transaction, L2BlockReader, L2Chain, L2ChainError, PreprocessedBlock,
};
use std::{collections::HashMap, sync::Arc};

use alloy_consensus::Header;
use alloy_eips::eip4844::Blob;
use alloy_primitives::{Bytes, B256};
use alloy_transport::TransportErrorKind;
use parking_lot::Mutex;
use rollup_node_primitives::{BlockInfo, DerivedBlock, L2Transaction, TxL1Message};

/// An in memory [`L1Client`].
#[derive(Debug, Default)]
pub struct MockL1Client {
    /// The chain id returned by the client.
    pub chain_id: u64,
    /// The finalized L1 block number.
    pub finalized_block_number: Mutex<u64>,
    /// The logs of the L1.
    pub logs: Mutex<Vec<L1Log>>,
    /// The transactions indexed by hash.
    pub transactions: Mutex<HashMap<B256, L1Transaction>>,
    /// The blocks indexed by hash.
    pub blocks: Mutex<HashMap<B256, L1Block>>,
    /// The amount of upcoming `filter_logs` calls failing with a transport error.
    pub failing_filter_calls: Mutex<usize>,
    /// The amount of upcoming `transaction_by_hash` calls failing with a transport error.
    pub failing_transaction_calls: Mutex<usize>,
    /// The filters received by the client.
    pub filters: Mutex<Vec<L1LogFilter>>,
}

impl MockL1Client {
    /// Returns a new mock with the chain id and finalized block.
    pub fn new(chain_id: u64, finalized_block_number: u64) -> Self {
        Self {
            chain_id,
            finalized_block_number: Mutex::new(finalized_block_number),
            ..Default::default()
        }
    }

    /// Adds the log, along the calldata of the transaction that emitted it.
    pub fn add_log(&self, log: L1Log, input: Bytes) {
        self.transactions.lock().insert(
            log.transaction_hash,
            L1Transaction { hash: log.transaction_hash, input, blob_versioned_hashes: vec![] },
        );
        self.logs.lock().push(log);
    }

    /// Adds the log, emitted by a transaction carrying blobs in a block with the timestamp.
    pub fn add_log_with_blobs(
        &self,
        log: L1Log,
        input: Bytes,
        blob_versioned_hashes: Vec<B256>,
        timestamp: u64,
    ) {
        self.blocks
            .lock()
            .entry(log.block_hash)
            .or_insert_with(|| L1Block {
                hash: log.block_hash,
                number: log.block_number,
                timestamp,
                transactions: vec![],
            })
            .timestamp = timestamp;
        self.transactions.lock().insert(
            log.transaction_hash,
            L1Transaction { hash: log.transaction_hash, input, blob_versioned_hashes },
        );
        self.logs.lock().push(log);
    }

    /// Adds the log, with the emitting transaction only reachable through its block.
    pub fn add_log_with_unindexed_transaction(&self, log: L1Log, input: Bytes) {
        let mut blocks = self.blocks.lock();
        let block = blocks.entry(log.block_hash).or_insert_with(|| L1Block {
            hash: log.block_hash,
            number: log.block_number,
            timestamp: 0,
            transactions: vec![],
        });
        block.transactions.push(L1Transaction {
            hash: log.transaction_hash,
            input,
            blob_versioned_hashes: vec![],
        });
        self.logs.lock().push(log);
    }

    /// Sets the finalized block number.
    pub fn set_finalized_block_number(&self, number: u64) {
        *self.finalized_block_number.lock() = number;
    }

    /// Fails the next `count` calls to `filter_logs`.
    pub fn fail_next_filter_calls(&self, count: usize) {
        *self.failing_filter_calls.lock() = count;
    }

    /// Fails the next `count` calls to `transaction_by_hash`.
    pub fn fail_next_transaction_calls(&self, count: usize) {
        *self.failing_transaction_calls.lock() = count;
    }
}

#[async_trait::async_trait]
impl L1Client for MockL1Client {
    async fn filter_logs(&self, filter: L1LogFilter) -> Result<Vec<L1Log>, L1ProviderError> {
        {
            let mut failing = self.failing_filter_calls.lock();
            if *failing > 0 {
                *failing -= 1;
                return Err(TransportErrorKind::custom_str("mock transport failure").into());
            }
        }

        let mut logs: Vec<_> =
            self.logs.lock().iter().filter(|log| filter.matches(log)).cloned().collect();
        logs.sort_by_key(|log| (log.block_number, log.log_index));
        self.filters.lock().push(filter);
        Ok(logs)
    }

    async fn transaction_by_hash(
        &self,
        hash: B256,
    ) -> Result<Option<L1Transaction>, L1ProviderError> {
        {
            let mut failing = self.failing_transaction_calls.lock();
            if *failing > 0 {
                *failing -= 1;
                return Err(TransportErrorKind::custom_str("mock transport failure").into());
            }
        }
        Ok(self.transactions.lock().get(&hash).cloned())
    }

    async fn block_by_hash(&self, hash: B256) -> Result<Option<L1Block>, L1ProviderError> {
        Ok(self.blocks.lock().get(&hash).cloned())
    }

    async fn chain_id(&self) -> Result<u64, L1ProviderError> {
        Ok(self.chain_id)
    }

    async fn finalized_block_number(&self) -> Result<u64, L1ProviderError> {
        Ok(*self.finalized_block_number.lock())
    }
}

/// An in memory [`L1MessageProvider`] and [`BlobProvider`].
#[derive(Debug, Default)]
pub struct MockL1Provider {
    /// The L1 messages indexed by queue index.
    pub messages: Mutex<HashMap<u64, TxL1Message>>,
    /// The blobs indexed by versioned hash.
    pub blobs: Mutex<HashMap<B256, Arc<Blob>>>,
    /// The block timestamps and versioned hashes of the requested blobs.
    pub blob_requests: Mutex<Vec<(u64, B256)>>,
}

impl MockL1Provider {
    /// Returns a provider holding the messages.
    pub fn new(messages: impl IntoIterator<Item = TxL1Message>) -> Self {
        Self {
            messages: Mutex::new(messages.into_iter().map(|msg| (msg.queue_index, msg)).collect()),
            ..Default::default()
        }
    }

    /// Adds the blob for the versioned hash.
    pub fn add_blob(&self, hash: B256, blob: Blob) {
        self.blobs.lock().insert(hash, Arc::new(blob));
    }
}

#[async_trait::async_trait]
impl L1MessageProvider for MockL1Provider {
    async fn get_l1_message(
        &self,
        queue_index: u64,
    ) -> Result<Option<TxL1Message>, L1ProviderError> {
        Ok(self.messages.lock().get(&queue_index).cloned())
    }
}

#[async_trait::async_trait]
impl BlobProvider for MockL1Provider {
    async fn blob(
        &self,
        block_timestamp: u64,
        hash: B256,
    ) -> Result<Option<Arc<Blob>>, L1ProviderError> {
        self.blob_requests.lock().push((block_timestamp, hash));
        Ok(self.blobs.lock().get(&hash).cloned())
    }
}

/// An in memory [`L2Chain`] recording the inserted blocks.
#[derive(Debug, Default)]
pub struct MockL2Chain {
    /// The head of the chain.
    pub head: Mutex<BlockInfo>,
    /// The inserted headers and transactions.
    pub inserted: Mutex<Vec<(Header, Vec<L2Transaction>)>>,
    /// The numbers of the preprocessed blocks.
    pub preprocessed: Mutex<Vec<u64>>,
    /// A block number rejected at insertion.
    pub reject_block: Mutex<Option<u64>>,
}

impl MockL2Chain {
    /// Returns a chain with the provided head.
    pub fn new(head: BlockInfo) -> Self {
        Self { head: Mutex::new(head), ..Default::default() }
    }

    /// Rejects the insertion of the block with the number.
    pub fn reject(&self, number: u64) {
        *self.reject_block.lock() = Some(number);
    }

    /// Returns the numbers of the inserted blocks.
    pub fn inserted_numbers(&self) -> Vec<u64> {
        self.inserted.lock().iter().map(|(header, _)| header.number).collect()
    }
}

#[async_trait::async_trait]
impl L2Chain for MockL2Chain {
    async fn current_head(&self) -> Result<BlockInfo, L2ChainError> {
        Ok(*self.head.lock())
    }

    async fn preprocess_block(
        &self,
        block: &DerivedBlock,
    ) -> Result<PreprocessedBlock, L2ChainError> {
        self.preprocessed.lock().push(block.number);
        Ok(PreprocessedBlock {
            state_root: B256::left_padding_from(&block.number.to_be_bytes()),
            gas_used: 21_000 * block.transactions.len() as u64,
            ..Default::default()
        })
    }

    async fn insert_unsealed(
        &self,
        header: Header,
        transactions: Vec<L2Transaction>,
    ) -> Result<BlockInfo, L2ChainError> {
        if *self.reject_block.lock() == Some(header.number) {
            return Err(L2ChainError::Insertion {
                index: header.number,
                reason: "rejected by mock".to_string(),
            });
        }

        let head = BlockInfo::new(header.number, header.hash_slow());
        *self.head.lock() = head;
        self.inserted.lock().push((header, transactions));
        Ok(head)
    }
}

/// An in memory [`L2BlockReader`].
#[derive(Debug, Default)]
pub struct MockL2BlockReader {
    /// The executed blocks indexed by number.
    pub blocks: Mutex<HashMap<u64, ExecutedBlock>>,
}

impl MockL2BlockReader {
    /// Returns a reader over the blocks.
    pub fn new(blocks: impl IntoIterator<Item = ExecutedBlock>) -> Self {
        Self { blocks: Mutex::new(blocks.into_iter().map(|block| (block.number, block)).collect()) }
    }
}

#[async_trait::async_trait]
impl L2BlockReader for MockL2BlockReader {
    async fn executed_block(&self, number: u64) -> Result<Option<ExecutedBlock>, L2ChainError> {
        Ok(self.blocks.lock().get(&number).cloned())
    }
}
