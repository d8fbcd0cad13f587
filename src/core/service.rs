//! Ingest coordination: decode a batch, then commit what was accepted

use crate::core::batch::{BatchProcessor, IngestResult};
use crate::core::error::ServiceResult;
use crate::core::order::Order;
use crate::core::query::OrderFilter;
use crate::core::store::OrderStore;
use std::sync::Arc;

/// Runs a batch through the [`BatchProcessor`] and commits the accepted
/// orders to an [`OrderStore`] in one upsert
///
/// Cheap to clone; clones share the same store.
#[derive(Clone)]
pub struct IngestCoordinator {
    processor: BatchProcessor,
    store: Arc<dyn OrderStore>,
}

impl IngestCoordinator {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self {
            processor: BatchProcessor::default(),
            store,
        }
    }

    /// Decode `lines` and upsert every accepted order
    ///
    /// Rejected lines are reported in the returned result and never stop the
    /// batch. A storage failure during the commit is returned as an error:
    /// in that case none of the accepted orders can be assumed durable.
    pub async fn ingest<I, S>(&self, lines: I) -> ServiceResult<IngestResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let result = self.processor.process(lines);

        if !result.accepted.is_empty() {
            let summary = self
                .store
                .upsert_all(result.accepted.clone())
                .await
                .inspect_err(|e| tracing::error!(error = %e, "failed to commit accepted orders"))?;

            tracing::info!(
                inserted = summary.inserted,
                replaced = summary.replaced,
                "orders committed"
            );
        }

        Ok(result)
    }

    /// Fetch stored orders matching `filter`
    ///
    /// An empty result is a normal outcome here.
    pub async fn query(&self, filter: &OrderFilter) -> ServiceResult<Vec<Order>> {
        let orders = self.store.find(filter).await?;
        tracing::debug!(?filter, found = orders.len(), "orders queried");
        Ok(orders)
    }
}
