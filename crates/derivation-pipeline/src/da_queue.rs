use crate::{DaEntry, DataSourceError, DataSourceFactory, L1EventSource};
use std::collections::VecDeque;

use rollup_node_providers::{L1Client, L1Provider};

/// A flat, ordered queue of [`DaEntry`]s, rotating across the data sources as they exhaust.
#[derive(Debug)]
pub struct DaQueue<C, M> {
    /// The factory for the data sources.
    factory: DataSourceFactory<C, M>,
    /// The next L1 height to open a source at.
    l1_height: u64,
    /// The active source.
    source: Option<L1EventSource<C, M>>,
    /// The entries fetched but not yet consumed.
    entries: VecDeque<DaEntry>,
}

impl<C, M> DaQueue<C, M>
where
    C: L1Client + Clone,
    M: L1Provider + Clone,
{
    /// Returns a new queue reading from the L1 height.
    pub fn new(factory: DataSourceFactory<C, M>, l1_height: u64) -> Self {
        Self { factory, l1_height, source: None, entries: VecDeque::new() }
    }

    /// Returns the next entry, or `None` when the queue is caught up with the L1.
    ///
    /// When the active source is exhausted, a new source is opened at its height. A freshly
    /// opened source that is immediately exhausted means no more data is available yet.
    pub async fn next_da(&mut self) -> Result<Option<DaEntry>, DataSourceError> {
        loop {
            if let Some(entry) = self.entries.pop_front() {
                return Ok(Some(entry))
            }

            let fresh = self.source.is_none();
            let (factory, l1_height) = (&self.factory, self.l1_height);
            let source = self.source.get_or_insert_with(|| factory.open(l1_height));

            match source.next_data().await {
                Ok(entries) => self.entries.extend(entries),
                Err(DataSourceError::Exhausted) => {
                    self.l1_height = source.l1_height();
                    self.source = None;
                    if fresh {
                        tracing::trace!(target: "scroll::derivation_pipeline", l1_height = self.l1_height, "caught up with L1");
                        return Ok(None)
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Returns the next L1 height the queue will read.
    pub fn l1_height(&self) -> u64 {
        self.source.as_ref().map(L1EventSource::l1_height).unwrap_or(self.l1_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{test_utils::*, DataSourceConfig};
    use std::sync::Arc;

    use alloy_primitives::Bytes;
    use rollup_node_providers::test_utils::{MockL1Client, MockL1Provider};

    fn queue(
        client: Arc<MockL1Client>,
        l1_height: u64,
    ) -> DaQueue<Arc<MockL1Client>, Arc<MockL1Provider>> {
        let config = DataSourceConfig {
            scroll_chain_address: SCROLL_CHAIN_ADDRESS,
            blob_activation_height: 20,
            fetch_range: 10,
        };
        let factory =
            DataSourceFactory::new(client, Arc::new(MockL1Provider::default()), config);
        DaQueue::new(factory, l1_height)
    }

    #[tokio::test]
    async fn test_should_rotate_sources_transparently() -> eyre::Result<()> {
        let client = Arc::new(MockL1Client::new(1, 40));
        client.add_log(revert_log(1, 3, 0), Bytes::new());
        client.add_log(revert_log(2, 19, 0), Bytes::new());
        client.add_log(revert_log(3, 20, 0), Bytes::new());
        client.add_log(revert_log(4, 38, 1), Bytes::new());
        let mut queue = queue(client.clone(), 0);

        let mut indices = vec![];
        while let Some(entry) = queue.next_da().await? {
            indices.push(entry.batch_index());
        }
        assert_eq!(indices, vec![1, 2, 3, 4]);
        assert_eq!(queue.l1_height(), 41);

        // nothing new, the queue stays caught up.
        assert!(queue.next_da().await?.is_none());

        client.add_log(revert_log(5, 45, 0), Bytes::new());
        client.set_finalized_block_number(50);
        assert_eq!(queue.next_da().await?.map(|e| e.batch_index()), Some(5));

        Ok(())
    }

    #[tokio::test]
    async fn test_should_keep_state_on_transport_error() -> eyre::Result<()> {
        let client = Arc::new(MockL1Client::new(1, 40));
        client.add_log(revert_log(1, 3, 0), Bytes::new());
        client.fail_next_filter_calls(1);
        let mut queue = queue(client.clone(), 0);

        assert!(matches!(queue.next_da().await, Err(DataSourceError::L1Provider(_))));
        assert_eq!(queue.l1_height(), 0);
        assert_eq!(queue.next_da().await?.map(|e| e.batch_index()), Some(1));

        Ok(())
    }
}
