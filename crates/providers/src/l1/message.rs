use super::L1ProviderError;

use rollup_node_primitives::TxL1Message;
use scroll_db::{DatabaseConnectionProvider, DatabaseOperations};

/// An instance of the trait can provide L1 messages by queue index.
#[async_trait::async_trait]
#[auto_impl::auto_impl(&, Arc)]
pub trait L1MessageProvider: Send + Sync {
    /// Returns the L1 message at the queue index, if known.
    async fn get_l1_message(&self, queue_index: u64)
        -> Result<Option<TxL1Message>, L1ProviderError>;
}

/// Implements [`L1MessageProvider`] via a database connection.
#[derive(Debug, Clone)]
pub struct DatabaseL1MessageProvider<DB> {
    /// A connection to the database.
    database_connection: DB,
}

impl<DB> DatabaseL1MessageProvider<DB> {
    /// Returns a new instance of the [`DatabaseL1MessageProvider`].
    pub const fn new(db: DB) -> Self {
        Self { database_connection: db }
    }
}

#[async_trait::async_trait]
impl<DB> L1MessageProvider for DatabaseL1MessageProvider<DB>
where
    DB: DatabaseConnectionProvider + Send + Sync,
{
    async fn get_l1_message(
        &self,
        queue_index: u64,
    ) -> Result<Option<TxL1Message>, L1ProviderError> {
        let message = self.database_connection.get_l1_message(queue_index).await?;
        Ok(message.map(|message| message.transaction))
    }
}
