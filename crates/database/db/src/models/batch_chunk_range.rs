use rollup_node_primitives::ChunkBlockRange;
use sea_orm::{entity::prelude::*, ActiveValue};

/// A database model that represents the block range of a chunk of a committed batch.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "batch_chunk_range")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    batch_index: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    chunk_index: i32,
    /// The codec version of the batch.
    pub version: i16,
    start_block_number: i64,
    end_block_number: i64,
}

/// The relation for the batch chunk range model.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

/// The active model behavior for the batch chunk range model.
impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    /// Returns a new [`ActiveModel`] for the chunk at `chunk_index` in the batch.
    pub fn new(batch_index: u64, chunk_index: usize, version: u8, range: ChunkBlockRange) -> Self {
        Self {
            batch_index: ActiveValue::Set(batch_index as i64),
            chunk_index: ActiveValue::Set(chunk_index as i32),
            version: ActiveValue::Set(version as i16),
            start_block_number: ActiveValue::Set(range.start_block_number as i64),
            end_block_number: ActiveValue::Set(range.end_block_number as i64),
        }
    }
}

impl From<Model> for ChunkBlockRange {
    fn from(value: Model) -> Self {
        Self::new(value.start_block_number as u64, value.end_block_number as u64)
    }
}
