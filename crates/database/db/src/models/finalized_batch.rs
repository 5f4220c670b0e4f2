use alloy_primitives::B256;
use rollup_node_primitives::FinalizedBatchMeta;
use sea_orm::{entity::prelude::*, ActiveValue};

/// A database model that represents a finalized and validated batch.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "finalized_batch")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    batch_index: i64,
    batch_hash: Vec<u8>,
    total_l1_message_popped: i64,
    state_root: Vec<u8>,
    withdraw_root: Vec<u8>,
    /// The last L2 block of the batch.
    pub last_block_number: i64,
}

/// The relation for the finalized batch model.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

/// The active model behavior for the finalized batch model.
impl ActiveModelBehavior for ActiveModel {}

impl From<(FinalizedBatchMeta, u64)> for ActiveModel {
    fn from((meta, last_block_number): (FinalizedBatchMeta, u64)) -> Self {
        Self {
            batch_index: ActiveValue::Set(meta.batch_index as i64),
            batch_hash: ActiveValue::Set(meta.batch_hash.to_vec()),
            total_l1_message_popped: ActiveValue::Set(meta.total_l1_message_popped as i64),
            state_root: ActiveValue::Set(meta.state_root.to_vec()),
            withdraw_root: ActiveValue::Set(meta.withdraw_root.to_vec()),
            last_block_number: ActiveValue::Set(last_block_number as i64),
        }
    }
}

impl From<Model> for FinalizedBatchMeta {
    fn from(value: Model) -> Self {
        Self {
            batch_index: value.batch_index as u64,
            batch_hash: B256::from_slice(&value.batch_hash),
            total_l1_message_popped: value.total_l1_message_popped as u64,
            state_root: B256::from_slice(&value.state_root),
            withdraw_root: B256::from_slice(&value.withdraw_root),
        }
    }
}
