use crate::{
    bitmap::{bitmap_len, set_l1_message_skipped},
    decoding::constants::SKIPPED_L1_MESSAGE_BITMAP_ITEM_BYTES_SIZE,
    error::{CodecError, DecodingError, InvalidChunksError},
    from_be_bytes_slice_and_advance_buf, from_slice_and_advance_buf, BatchChunk, CodecVersion,
};

use alloy_primitives::{bytes::BufMut, keccak256, B256};
use std::vec::Vec;

/// The batch header, as committed on L1.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchHeader {
    /// The batch version.
    pub version: u8,
    /// The index of the batch.
    pub batch_index: u64,
    /// Number of L1 messages popped in the batch.
    pub l1_message_popped: u64,
    /// Number of total L1 messages popped after the batch.
    pub total_l1_message_popped: u64,
    /// The data hash of the batch.
    pub data_hash: B256,
    /// The parent batch hash.
    pub parent_batch_hash: B256,
    /// A bitmap to indicate which L1 messages are skipped in the batch.
    pub skipped_l1_message_bitmap: Vec<u8>,
}

impl BatchHeader {
    /// The length of the header without the skipped L1 message bitmap.
    pub const BYTES_LENGTH: usize = 89;

    /// Builds the header of a batch from its chunks.
    ///
    /// The L1 messages included in the chunks must have strictly increasing queue indices
    /// starting at or after `total_l1_message_popped_before`. Every queue index between two
    /// included messages is marked as skipped in the bitmap.
    pub fn new(
        version: u8,
        batch_index: u64,
        total_l1_message_popped_before: u64,
        parent_batch_hash: B256,
        chunks: &[BatchChunk],
    ) -> Result<Self, CodecError> {
        let codec_version = CodecVersion::try_from(version)?;

        let mut included = Vec::new();
        let mut next_queue_index = total_l1_message_popped_before;
        for chunk in chunks {
            let mut previous_number: Option<u64> = None;
            for block in &chunk.blocks {
                let number = block.context.number;
                if let Some(previous) = previous_number.filter(|previous| number <= *previous) {
                    return Err(InvalidChunksError::NonMonotonicBlockNumber {
                        previous,
                        current: number,
                    }
                    .into())
                }
                previous_number = Some(number);

                for tx in block.l1_messages() {
                    if tx.queue_index < next_queue_index {
                        return Err(InvalidChunksError::UnexpectedQueueIndex {
                            expected: next_queue_index,
                            got: tx.queue_index,
                        }
                        .into())
                    }
                    included.push(tx.queue_index - total_l1_message_popped_before);
                    next_queue_index = tx.queue_index + 1;
                }
            }
        }

        let l1_message_popped = next_queue_index - total_l1_message_popped_before;
        let mut skipped_l1_message_bitmap = vec![0u8; bitmap_len(l1_message_popped)];
        let mut cursor = 0;
        for index in included {
            for skipped in cursor..index {
                set_l1_message_skipped(&mut skipped_l1_message_bitmap, skipped)?;
            }
            cursor = index + 1;
        }

        let mut chunk_hashes = Vec::with_capacity(chunks.len() * 32);
        for chunk in chunks {
            chunk_hashes.put_slice(chunk.data_hash(codec_version).as_slice());
        }

        Ok(Self {
            version,
            batch_index,
            l1_message_popped,
            total_l1_message_popped: total_l1_message_popped_before + l1_message_popped,
            data_hash: keccak256(chunk_hashes),
            parent_batch_hash,
            skipped_l1_message_bitmap,
        })
    }

    /// Returns the number of L1 messages popped before the batch.
    pub const fn total_l1_message_popped_before(&self) -> u64 {
        self.total_l1_message_popped.saturating_sub(self.l1_message_popped)
    }

    /// Decodes the header from its encoding.
    /// Returns [`DecodingError::MalformedBatchHeader`] if the input is shorter than
    /// [`BatchHeader::BYTES_LENGTH`] or the bitmap is not made of 32-byte words.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodingError> {
        let length = bytes.len();
        if length < Self::BYTES_LENGTH ||
            (length - Self::BYTES_LENGTH) % SKIPPED_L1_MESSAGE_BITMAP_ITEM_BYTES_SIZE != 0
        {
            return Err(DecodingError::MalformedBatchHeader(length))
        }

        let buf = &mut &*bytes;
        let version = from_be_bytes_slice_and_advance_buf!(u8, buf);
        let batch_index = from_be_bytes_slice_and_advance_buf!(u64, buf);

        let l1_message_popped = from_be_bytes_slice_and_advance_buf!(u64, buf);
        let total_l1_message_popped = from_be_bytes_slice_and_advance_buf!(u64, buf);

        let data_hash = from_slice_and_advance_buf!(B256, buf);
        let parent_batch_hash = from_slice_and_advance_buf!(B256, buf);

        Ok(Self {
            version,
            batch_index,
            l1_message_popped,
            total_l1_message_popped,
            data_hash,
            parent_batch_hash,
            skipped_l1_message_bitmap: buf.to_vec(),
        })
    }

    /// Encodes the header.
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes =
            Vec::<u8>::with_capacity(Self::BYTES_LENGTH + self.skipped_l1_message_bitmap.len());
        bytes.put_u8(self.version);
        bytes.put_u64(self.batch_index);
        bytes.put_u64(self.l1_message_popped);
        bytes.put_u64(self.total_l1_message_popped);
        bytes.put_slice(&self.data_hash.0);
        bytes.put_slice(&self.parent_batch_hash.0);
        bytes.put_slice(&self.skipped_l1_message_bitmap);
        bytes
    }

    /// Computes the hash for the header.
    pub fn hash(&self) -> B256 {
        keccak256(self.encode())
    }
}
