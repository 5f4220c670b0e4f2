use super::{DatabaseConnectionProvider, DatabaseError};

/// A type that represents a database transaction.
///
/// This type is used to perform atomic operations on the database.
#[derive(Debug)]
pub struct DatabaseTransaction {
    /// The underlying database transaction.
    tx: sea_orm::DatabaseTransaction,
}

impl DatabaseTransaction {
    /// Creates a new [`DatabaseTransaction`] instance associated with the provided
    /// [`sea_orm::DatabaseTransaction`].
    pub const fn new(tx: sea_orm::DatabaseTransaction) -> Self {
        Self { tx }
    }

    /// Commits the transaction.
    pub async fn commit(self) -> Result<(), DatabaseError> {
        tracing::trace!(target: "scroll::db", "Committing transaction");
        self.tx.commit().await?;
        Ok(())
    }

    /// Rolls back the transaction.
    pub async fn rollback(self) -> Result<(), DatabaseError> {
        tracing::trace!(target: "scroll::db", "Rolling back transaction");
        self.tx.rollback().await?;
        Ok(())
    }
}

impl DatabaseConnectionProvider for DatabaseTransaction {
    type Connection = sea_orm::DatabaseTransaction;

    fn get_connection(&self) -> &Self::Connection {
        &self.tx
    }
}
