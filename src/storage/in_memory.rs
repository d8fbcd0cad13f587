//! In-memory implementation of OrderStore for testing and development

use crate::core::error::StorageError;
use crate::core::order::Order;
use crate::core::query::OrderFilter;
use crate::core::store::{OrderStore, UpsertSummary};
use crate::storage::{OrderSnapshot, merge_orders};
use async_trait::async_trait;
use std::sync::{Arc, PoisonError, RwLock};

/// In-memory order store
///
/// Useful for testing and development; nothing survives the process. Uses
/// RwLock for thread-safe access, so a batch is applied under a single write
/// lock and readers only ever see whole batches.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<OrderSnapshot>>,
}

impl InMemoryOrderStore {
    /// Create a new, empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct orders held
    ///
    /// A poisoned lock is read through rather than reported, so after a
    /// panicking writer this counts whatever that writer left behind.
    /// `upsert_all` and `find` report the same condition as
    /// [`StorageError::LockPoisoned`].
    pub fn len(&self) -> usize {
        self.orders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<E: std::fmt::Display>(err: E) -> StorageError {
    StorageError::LockPoisoned {
        message: err.to_string(),
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn upsert_all(&self, orders: Vec<Order>) -> Result<UpsertSummary, StorageError> {
        if orders.is_empty() {
            return Ok(UpsertSummary::default());
        }

        let mut snapshot = self.orders.write().map_err(poisoned)?;
        let summary = merge_orders(&mut snapshot, orders);

        tracing::debug!(
            inserted = summary.inserted,
            replaced = summary.replaced,
            total = snapshot.len(),
            "in-memory snapshot updated"
        );

        Ok(summary)
    }

    async fn find(&self, filter: &OrderFilter) -> Result<Vec<Order>, StorageError> {
        let snapshot = self.orders.read().map_err(poisoned)?;
        Ok(filter.apply(snapshot.values()))
    }
}
