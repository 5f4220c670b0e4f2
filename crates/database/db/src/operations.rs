use super::{models, DatabaseError};
use crate::DatabaseConnectionProvider;

use rollup_node_primitives::{ChunkBlockRange, FinalizedBatchMeta, L1MessageEnvelope};
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
};

/// The keys of the numeric checkpoints stored in the metadata table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataKey {
    /// The last L1 block fully processed by the derivation pipeline.
    DaSyncedL1Block,
    /// The index of the last batch fully derived by the derivation pipeline.
    DaDerivedBatchIndex,
    /// The last L1 block fully processed by the rollup sync service.
    RollupSyncL1Block,
    /// The last L2 block of the last validated finalized batch.
    FinalizedL2Block,
}

impl MetadataKey {
    /// Returns the key as stored in the database.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DaSyncedL1Block => "da_synced_l1_block",
            Self::DaDerivedBatchIndex => "da_derived_batch_index",
            Self::RollupSyncL1Block => "rollup_sync_l1_block",
            Self::FinalizedL2Block => "finalized_l2_block",
        }
    }
}

/// The [`DatabaseOperations`] trait provides methods for interacting with the database.
#[async_trait::async_trait]
pub trait DatabaseOperations: DatabaseConnectionProvider + Sync {
    /// Insert an [`L1MessageEnvelope`] into the database.
    async fn insert_l1_message(&self, l1_message: L1MessageEnvelope) -> Result<(), DatabaseError> {
        tracing::trace!(target: "scroll::db", queue_index = l1_message.transaction.queue_index, "Inserting L1 message into database.");
        let l1_message: models::l1_message::ActiveModel = l1_message.into();
        l1_message.insert(self.get_connection()).await?;
        Ok(())
    }

    /// Get a [`L1MessageEnvelope`] from the database by its message queue index.
    async fn get_l1_message(
        &self,
        queue_index: u64,
    ) -> Result<Option<L1MessageEnvelope>, DatabaseError> {
        let queue_index =
            i64::try_from(queue_index).map_err(|_| DatabaseError::Overflow(queue_index))?;
        models::l1_message::Entity::find_by_id(queue_index)
            .one(self.get_connection())
            .await?
            .map(TryInto::try_into)
            .transpose()
    }

    /// Sets the value of the metadata key, overwriting any previous value.
    async fn set_metadata(&self, key: MetadataKey, value: u64) -> Result<(), DatabaseError> {
        tracing::trace!(target: "scroll::db", key = key.as_str(), value, "Setting metadata.");
        let model = models::metadata::ActiveModel::new(key.as_str(), value);
        models::metadata::Entity::insert(model)
            .on_conflict(
                OnConflict::column(models::metadata::Column::Key)
                    .update_column(models::metadata::Column::Value)
                    .to_owned(),
            )
            .exec(self.get_connection())
            .await?;
        Ok(())
    }

    /// Returns the value of the metadata key if set.
    async fn get_metadata(&self, key: MetadataKey) -> Result<Option<u64>, DatabaseError> {
        models::metadata::Entity::find_by_id(key.as_str().to_owned())
            .one(self.get_connection())
            .await?
            .map(|model| {
                model.value.parse().map_err(|_| DatabaseError::InvalidValue {
                    field: key.as_str(),
                    value: model.value,
                })
            })
            .transpose()
    }

    /// Inserts the [`FinalizedBatchMeta`] of a validated batch along the last L2 block of the
    /// batch.
    async fn insert_finalized_batch(
        &self,
        meta: FinalizedBatchMeta,
        last_block_number: u64,
    ) -> Result<(), DatabaseError> {
        tracing::trace!(target: "scroll::db", batch_index = meta.batch_index, batch_hash = ?meta.batch_hash, last_block_number, "Inserting finalized batch into database.");
        let model: models::finalized_batch::ActiveModel = (meta, last_block_number).into();
        models::finalized_batch::Entity::insert(model)
            .on_conflict(
                OnConflict::column(models::finalized_batch::Column::BatchIndex)
                    .update_columns([
                        models::finalized_batch::Column::BatchHash,
                        models::finalized_batch::Column::TotalL1MessagePopped,
                        models::finalized_batch::Column::StateRoot,
                        models::finalized_batch::Column::WithdrawRoot,
                        models::finalized_batch::Column::LastBlockNumber,
                    ])
                    .to_owned(),
            )
            .exec(self.get_connection())
            .await?;
        Ok(())
    }

    /// Returns the [`FinalizedBatchMeta`] for the batch index.
    async fn get_finalized_batch(
        &self,
        batch_index: u64,
    ) -> Result<Option<FinalizedBatchMeta>, DatabaseError> {
        Ok(models::finalized_batch::Entity::find_by_id(batch_index as i64)
            .one(self.get_connection())
            .await?
            .map(Into::into))
    }

    /// Returns the [`FinalizedBatchMeta`] with the highest batch index.
    async fn get_latest_finalized_batch(
        &self,
    ) -> Result<Option<FinalizedBatchMeta>, DatabaseError> {
        Ok(models::finalized_batch::Entity::find()
            .order_by_desc(models::finalized_batch::Column::BatchIndex)
            .one(self.get_connection())
            .await?
            .map(Into::into))
    }

    /// Inserts the chunk block ranges of a committed batch, replacing the ranges of a previous
    /// commit of the same index.
    async fn insert_batch_chunk_ranges(
        &self,
        batch_index: u64,
        version: u8,
        ranges: Vec<ChunkBlockRange>,
    ) -> Result<(), DatabaseError> {
        tracing::trace!(target: "scroll::db", batch_index, version, chunks = ranges.len(), "Inserting batch chunk ranges into database.");
        self.delete_batch_chunk_ranges(batch_index).await?;
        if ranges.is_empty() {
            return Ok(())
        }

        let models = ranges.into_iter().enumerate().map(|(chunk_index, range)| {
            models::batch_chunk_range::ActiveModel::new(batch_index, chunk_index, version, range)
        });
        models::batch_chunk_range::Entity::insert_many(models).exec(self.get_connection()).await?;
        Ok(())
    }

    /// Returns the codec version and the ordered chunk block ranges of a committed batch.
    async fn get_batch_chunk_ranges(
        &self,
        batch_index: u64,
    ) -> Result<Option<(u8, Vec<ChunkBlockRange>)>, DatabaseError> {
        let models = models::batch_chunk_range::Entity::find()
            .filter(models::batch_chunk_range::Column::BatchIndex.eq(batch_index as i64))
            .order_by_asc(models::batch_chunk_range::Column::ChunkIndex)
            .all(self.get_connection())
            .await?;

        let Some(version) = models.first().map(|model| model.version as u8) else {
            return Ok(None)
        };
        Ok(Some((version, models.into_iter().map(Into::into).collect())))
    }

    /// Deletes the chunk block ranges of a batch.
    async fn delete_batch_chunk_ranges(&self, batch_index: u64) -> Result<(), DatabaseError> {
        tracing::trace!(target: "scroll::db", batch_index, "Deleting batch chunk ranges.");
        models::batch_chunk_range::Entity::delete_many()
            .filter(models::batch_chunk_range::Column::BatchIndex.eq(batch_index as i64))
            .exec(self.get_connection())
            .await?;
        Ok(())
    }
}

impl<T> DatabaseOperations for T where T: DatabaseConnectionProvider + Sync {}
