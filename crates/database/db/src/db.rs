use super::{transaction::DatabaseTransaction, DatabaseConnectionProvider};
use crate::error::DatabaseError;

use sea_orm::{Database as SeaOrmDatabase, DatabaseConnection, TransactionTrait};

/// The [`Database`] struct is responsible for interacting with the database.
///
/// The [`Database`] type wraps a [`sea_orm::DatabaseConnection`]. We implement
/// [`DatabaseConnectionProvider`] for [`Database`] such that it can be used to perform the
/// operations defined in [`crate::DatabaseOperations`]. Atomic operations can be performed using
/// the [`Database::tx`] method which returns a [`DatabaseTransaction`] that also implements the
/// [`DatabaseConnectionProvider`] trait and also the [`crate::DatabaseOperations`] trait.
#[derive(Debug)]
pub struct Database {
    /// The underlying database connection.
    connection: DatabaseConnection,
}

impl Database {
    /// Creates a new [`Database`] instance associated with the provided database URL.
    pub async fn new(database_url: &str) -> Result<Self, DatabaseError> {
        tracing::info!(target: "scroll::db", database_url, "connecting to database");
        let connection = SeaOrmDatabase::connect(database_url).await?;
        Ok(Self { connection })
    }

    /// Creates a new [`DatabaseTransaction`] which can be used for atomic operations.
    pub async fn tx(&self) -> Result<DatabaseTransaction, DatabaseError> {
        Ok(DatabaseTransaction::new(self.connection.begin().await?))
    }
}

impl DatabaseConnectionProvider for Database {
    type Connection = DatabaseConnection;

    fn get_connection(&self) -> &Self::Connection {
        &self.connection
    }
}

impl From<DatabaseConnection> for Database {
    fn from(connection: DatabaseConnection) -> Self {
        Self { connection }
    }
}

#[cfg(test)]
mod test {
    use crate::{test_utils::setup_test_db, DatabaseOperations, MetadataKey};

    use alloy_primitives::B256;
    use arbitrary::{Arbitrary, Unstructured};
    use rand::Rng;
    use rollup_node_primitives::{ChunkBlockRange, FinalizedBatchMeta, L1MessageEnvelope};

    #[tokio::test]
    async fn test_database_round_trip_l1_message() -> eyre::Result<()> {
        // Set up the test database.
        let db = setup_test_db().await;

        // Generate unstructured bytes.
        let mut bytes = [0u8; 1024];
        rand::rng().fill(bytes.as_mut_slice());
        let mut u = Unstructured::new(&bytes);

        // Generate a random L1Message.
        let l1_message = L1MessageEnvelope::arbitrary(&mut u)?;

        // Round trip the L1Message through the database.
        db.insert_l1_message(l1_message.clone()).await?;
        let l1_message_from_db = db.get_l1_message(l1_message.transaction.queue_index).await?;
        assert_eq!(l1_message_from_db, Some(l1_message));

        // Missing messages are reported as none.
        let missing = db.get_l1_message(u32::MAX as u64 + 1).await?;
        assert_eq!(missing, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_database_tx() -> eyre::Result<()> {
        // Setup the test database.
        let db = setup_test_db().await;

        // Write checkpoints in a transaction.
        let tx = db.tx().await?;
        tx.set_metadata(MetadataKey::DaSyncedL1Block, 100).await?;
        tx.set_metadata(MetadataKey::DaDerivedBatchIndex, 5).await?;
        tx.commit().await?;

        assert_eq!(db.get_metadata(MetadataKey::DaSyncedL1Block).await?, Some(100));
        assert_eq!(db.get_metadata(MetadataKey::DaDerivedBatchIndex).await?, Some(5));

        // Roll back a transaction.
        let tx = db.tx().await?;
        tx.set_metadata(MetadataKey::DaSyncedL1Block, 200).await?;
        tx.rollback().await?;

        assert_eq!(db.get_metadata(MetadataKey::DaSyncedL1Block).await?, Some(100));

        Ok(())
    }

    #[tokio::test]
    async fn test_database_overwrites_metadata() -> eyre::Result<()> {
        let db = setup_test_db().await;

        assert_eq!(db.get_metadata(MetadataKey::RollupSyncL1Block).await?, None);
        db.set_metadata(MetadataKey::RollupSyncL1Block, 1).await?;
        db.set_metadata(MetadataKey::RollupSyncL1Block, 2).await?;
        assert_eq!(db.get_metadata(MetadataKey::RollupSyncL1Block).await?, Some(2));
        assert_eq!(db.get_metadata(MetadataKey::FinalizedL2Block).await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_database_finalized_batches() -> eyre::Result<()> {
        let db = setup_test_db().await;
        assert_eq!(db.get_latest_finalized_batch().await?, None);

        let meta = |batch_index: u64| FinalizedBatchMeta {
            batch_index,
            batch_hash: B256::repeat_byte(batch_index as u8),
            total_l1_message_popped: batch_index * 10,
            state_root: B256::repeat_byte(0xaa),
            withdraw_root: B256::repeat_byte(0xbb),
        };

        db.insert_finalized_batch(meta(1), 10).await?;
        db.insert_finalized_batch(meta(2), 20).await?;

        assert_eq!(db.get_finalized_batch(1).await?, Some(meta(1)));
        assert_eq!(db.get_latest_finalized_batch().await?, Some(meta(2)));
        assert_eq!(db.get_finalized_batch(3).await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_database_batch_chunk_ranges() -> eyre::Result<()> {
        let db = setup_test_db().await;
        let ranges = vec![ChunkBlockRange::new(1, 5), ChunkBlockRange::new(6, 6)];

        db.insert_batch_chunk_ranges(3, 1, ranges.clone()).await?;
        assert_eq!(db.get_batch_chunk_ranges(3).await?, Some((1, ranges.clone())));

        // a recommitted batch replaces its ranges.
        let replaced = vec![ChunkBlockRange::new(1, 7)];
        db.insert_batch_chunk_ranges(3, 0, replaced.clone()).await?;
        assert_eq!(db.get_batch_chunk_ranges(3).await?, Some((0, replaced)));

        db.delete_batch_chunk_ranges(3).await?;
        assert_eq!(db.get_batch_chunk_ranges(3).await?, None);

        Ok(())
    }
}
