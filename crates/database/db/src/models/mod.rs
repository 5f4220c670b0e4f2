/// This module contains the batch chunk range database model.
pub mod batch_chunk_range;

/// This module contains the finalized batch database model.
pub mod finalized_batch;

/// This module contains the L1 message database model.
pub mod l1_message;

/// This module contains the metadata model.
pub mod metadata;
