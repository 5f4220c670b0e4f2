use crate::{BatchQueue, CommitBatch, DerivationPipelineError};
use std::collections::VecDeque;

use rollup_node_primitives::{DerivedBlock, L2Transaction};
use rollup_node_providers::{L1Client, L1Provider};

/// The durable progress reached once a batch is fully derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchCheckpoint {
    /// The index of the derived batch.
    pub batch_index: u64,
    /// The L1 block the pipeline can restart after.
    pub safe_l1_block: u64,
}

/// A block served by the [`BlockQueue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedBlock {
    /// The derived block.
    pub block: DerivedBlock,
    /// The checkpoint of the batch, set on the last block of the batch.
    pub checkpoint: Option<BatchCheckpoint>,
}

/// Flattens the resolved batches into a sequence of blocks.
#[derive(Debug)]
pub struct BlockQueue<C, M> {
    batch_queue: BatchQueue<C, M>,
    blocks: VecDeque<QueuedBlock>,
}

impl<C, M> BlockQueue<C, M>
where
    C: L1Client + Clone,
    M: L1Provider + Clone,
{
    /// Returns a new block queue over the batch queue.
    pub const fn new(batch_queue: BatchQueue<C, M>) -> Self {
        Self { batch_queue, blocks: VecDeque::new() }
    }

    /// Returns the next block, or `None` if no block is available.
    pub async fn next_block(&mut self) -> Result<Option<QueuedBlock>, DerivationPipelineError> {
        while self.blocks.is_empty() {
            let Some(batch) = self.batch_queue.next_batch().await? else { return Ok(None) };
            let checkpoint = BatchCheckpoint {
                batch_index: batch.finalize.batch_index,
                safe_l1_block: batch.safe_l1_block,
            };

            let mut blocks: VecDeque<_> = flatten_batch(batch.commit)?
                .into_iter()
                .map(|block| QueuedBlock { block, checkpoint: None })
                .collect();
            // a batch without blocks is superseded by the checkpoint of the next batch.
            let Some(last) = blocks.back_mut() else {
                tracing::trace!(target: "scroll::derivation_pipeline", batch_index = checkpoint.batch_index, "batch without blocks");
                continue
            };
            last.checkpoint = Some(checkpoint);
            self.blocks = blocks;
        }

        Ok(self.blocks.pop_front())
    }
}

/// Flattens the committed batch into blocks.
///
/// Each block pops `num_l1_messages` queue indices from a cursor starting at the total amount of
/// L1 messages popped before the batch. The block includes the L1 messages of the batch whose
/// queue index falls in its window, followed by its L2 transactions. Fails if an L1 message of
/// the batch is left out of the blocks.
pub fn flatten_batch(commit: CommitBatch) -> Result<Vec<DerivedBlock>, DerivationPipelineError> {
    let batch_index = commit.batch_index;
    let mut cursor = commit.total_l1_message_popped_before();
    let mut l1_messages = commit.l1_messages.into_iter().peekable();
    let mut blocks = Vec::new();

    for chunk in &commit.chunks {
        let l2_blocks = chunk
            .l2_blocks()
            .map_err(|source| DerivationPipelineError::MalformedChunk { batch_index, source })?;
        for (context, l2_transactions) in l2_blocks {
            let end = cursor + context.num_l1_messages as u64;
            let mut transactions = Vec::with_capacity(context.num_transactions as usize);
            while let Some(message) = l1_messages.next_if(|message| message.queue_index < end) {
                transactions.push(L2Transaction::from(message));
            }
            cursor = end;
            transactions.extend(l2_transactions.iter().cloned().map(L2Transaction::Raw));

            blocks.push(DerivedBlock {
                number: context.number,
                timestamp: context.timestamp,
                gas_limit: context.gas_limit,
                base_fee: context.base_fee,
                transactions,
            });
        }
    }

    let count = l1_messages.count();
    if count > 0 {
        return Err(DerivationPipelineError::UnconsumedL1Messages { batch_index, count })
    }

    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{test_utils::*, DaQueue, DataSourceConfig, DataSourceFactory, ErrorKind};
    use std::sync::Arc;

    use alloy_primitives::Bytes;
    use rollup_node_providers::test_utils::{MockL1Client, MockL1Provider};
    use scroll_codec::{BatchHeader, Chunk, ChunkTransactions, CodecVersion};

    fn commit(before: u64, chunks: Vec<Chunk>, l1_messages: Vec<u64>) -> CommitBatch {
        CommitBatch {
            version: CodecVersion::V0,
            batch_index: 1,
            parent_batch_header: Some(BatchHeader {
                total_l1_message_popped: before,
                ..Default::default()
            }),
            skipped_l1_message_bitmap: vec![0; 32],
            chunks,
            l1_messages: l1_messages.into_iter().map(l1_message).collect(),
            blob_versioned_hash: None,
            blob: None,
            l1_block_number: 10,
        }
    }

    #[test]
    fn test_should_interleave_l1_messages_by_count() -> eyre::Result<()> {
        let chunks = vec![
            Chunk {
                blocks: vec![context(1, 3, 2)],
                transactions: ChunkTransactions::Flat(vec![Bytes::from_static(&[0x01])]),
            },
            Chunk {
                blocks: vec![context(2, 1, 0)],
                transactions: ChunkTransactions::Flat(vec![Bytes::from_static(&[0x02])]),
            },
        ];

        let blocks = flatten_batch(commit(0, chunks, vec![0, 1]))?;

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].number, 1);
        assert_eq!(
            blocks[0].transactions,
            vec![
                l1_message(0).into(),
                l1_message(1).into(),
                L2Transaction::Raw(Bytes::from_static(&[0x01]))
            ]
        );
        assert_eq!(blocks[1].transactions, vec![L2Transaction::Raw(Bytes::from_static(&[0x02]))]);
        assert_eq!(blocks[0].gas_limit, 10_000_000);
        assert_eq!(blocks[0].timestamp, 1_700_000_001);

        Ok(())
    }

    #[test]
    fn test_should_leave_skipped_queue_indices_out_of_blocks() -> eyre::Result<()> {
        // queue indices 4 to 7 are popped: 5 is skipped in block 1, 7 is skipped in block 2.
        let chunks = vec![Chunk {
            blocks: vec![context(1, 3, 2), context(2, 3, 2)],
            transactions: ChunkTransactions::PerBlock(vec![
                vec![Bytes::from_static(&[0x01])],
                vec![Bytes::from_static(&[0x02]), Bytes::from_static(&[0x03])],
            ]),
        }];

        let blocks = flatten_batch(commit(4, chunks, vec![4, 6]))?;

        assert_eq!(blocks[0].l1_message_queue_indices().collect::<Vec<_>>(), vec![4]);
        assert_eq!(blocks[0].transactions.len(), 2);
        assert_eq!(blocks[1].l1_message_queue_indices().collect::<Vec<_>>(), vec![6]);
        assert_eq!(blocks[1].transactions.len(), 3);

        Ok(())
    }

    #[test]
    fn test_should_fail_on_l1_messages_outside_blocks() {
        // block 1 pops queue indices 0 and 1, message 2 belongs to no block.
        let chunks = vec![Chunk {
            blocks: vec![context(1, 2, 2)],
            transactions: ChunkTransactions::Flat(vec![]),
        }];

        let result = flatten_batch(commit(0, chunks, vec![0, 1, 2]));
        assert!(matches!(
            result,
            Err(DerivationPipelineError::UnconsumedL1Messages { batch_index: 1, count: 1 })
        ));
        assert_eq!(result.map_err(|err| err.kind()).err(), Some(ErrorKind::Integrity));
    }

    #[test]
    fn test_should_fail_on_malformed_chunk() {
        let chunks = vec![Chunk {
            blocks: vec![context(1, 2, 0)],
            transactions: ChunkTransactions::Flat(vec![Bytes::from_static(&[0x01])]),
        }];

        assert!(matches!(
            flatten_batch(commit(0, chunks, vec![])),
            Err(DerivationPipelineError::MalformedChunk { batch_index: 1, .. })
        ));
    }

    #[tokio::test]
    async fn test_should_serve_blocks_with_batch_checkpoint() -> eyre::Result<()> {
        let client = Arc::new(MockL1Client::new(1, 100));
        add_two_batches(&client);
        let config = DataSourceConfig {
            scroll_chain_address: SCROLL_CHAIN_ADDRESS,
            blob_activation_height: 1_000,
            fetch_range: 100,
        };
        let messages = Arc::new(MockL1Provider::new([l1_message(0), l1_message(1)]));
        let factory = DataSourceFactory::new(client, messages, config);
        let mut queue = BlockQueue::new(BatchQueue::new(DaQueue::new(factory, 0), None));

        let first = queue.next_block().await?.expect("first block");
        assert_eq!(first.block.number, 1);
        assert_eq!(first.block.transactions.len(), 3);
        assert_eq!(first.checkpoint, None);

        let second = queue.next_block().await?.expect("second block");
        assert_eq!(second.block.number, 2);
        assert_eq!(second.checkpoint, Some(BatchCheckpoint { batch_index: 1, safe_l1_block: 12 }));

        assert!(queue.next_block().await?.is_none());

        Ok(())
    }
}
