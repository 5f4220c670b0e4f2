/// An error occurring during the codec process.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// An error occurring at the decoding state.
    #[error(transparent)]
    Decoding(#[from] DecodingError),
    /// The chunks provided to build a batch are inconsistent.
    #[error("invalid chunks: {0}")]
    InvalidChunks(#[from] InvalidChunksError),
    /// The index is not covered by the skipped L1 message bitmap.
    #[error("L1 message index {index} is out of the bitmap range of {bits} bits")]
    BitmapIndexOutOfRange {
        /// The requested index, relative to the first message of the batch.
        index: u64,
        /// The amount of bits in the bitmap.
        bits: u64,
    },
}

/// An error occurring during the decoding.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodingError {
    /// The codec version is not supported.
    #[error("unsupported codec version {0}")]
    UnsupportedCodecVersion(u8),
    /// The batch header length is invalid.
    #[error("malformed batch header of length {0}")]
    MalformedBatchHeader(usize),
    /// The chunk declares zero blocks.
    #[error("chunk contains no blocks")]
    EmptyChunk,
    /// A declared length would read past the end of the chunk.
    #[error("truncated chunk: expected {expected} bytes, {remaining} remaining")]
    TruncatedChunk {
        /// The amount of bytes the decoder expected to read.
        expected: usize,
        /// The amount of bytes left in the buffer.
        remaining: usize,
    },
    /// The block context declares less transactions than L1 messages.
    #[error("block {number} declares {num_transactions} transactions and {num_l1_messages} L1 messages")]
    InvalidBlockContext {
        /// The block number.
        number: u64,
        /// The declared transaction count.
        num_transactions: u16,
        /// The declared L1 message count.
        num_l1_messages: u16,
    },
    /// The amount of L2 transactions in the chunk does not match the block contexts.
    #[error("expected {expected} L2 transactions in chunk, got {got}")]
    TransactionCountMismatch {
        /// The count declared by the block contexts.
        expected: usize,
        /// The decoded count.
        got: usize,
    },
    /// Bytes are left in the chunk after the last declared transaction.
    #[error("{0} trailing bytes in chunk")]
    TrailingBytes(usize),
    /// The skipped L1 message bitmap has an invalid length.
    #[error("invalid skipped L1 message bitmap of length {length} for {popped} popped messages")]
    InvalidBitmapLength {
        /// The length of the bitmap in bytes.
        length: usize,
        /// The amount of popped L1 messages the bitmap must cover.
        popped: u64,
    },
}

/// The chunks of a batch are inconsistent.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InvalidChunksError {
    /// The block numbers inside a chunk are not strictly increasing.
    #[error("block {current} follows block {previous}")]
    NonMonotonicBlockNumber {
        /// The previous block number.
        previous: u64,
        /// The current block number.
        current: u64,
    },
    /// An L1 message is included out of queue order.
    #[error("expected L1 message with queue index >= {expected}, got {got}")]
    UnexpectedQueueIndex {
        /// The smallest acceptable queue index.
        expected: u64,
        /// The queue index found in the block.
        got: u64,
    },
    /// The transaction count of a block does not fit in the block context.
    #[error("block {0} contains too many transactions")]
    TooManyTransactions(u64),
}
