//! Store trait for upserting and filtering orders

use crate::core::error::StorageError;
use crate::core::order::Order;
use crate::core::query::OrderFilter;
use async_trait::async_trait;

/// Counts reported by a successful upsert
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertSummary {
    /// Orders whose id was new to the store
    pub inserted: usize,

    /// Orders that replaced an existing record with the same id
    pub replaced: usize,
}

/// Durable collection of orders keyed by `order_id`
///
/// Implementations keep a stable ordering: new ids are appended, replaced
/// ids keep the position of the record they replace.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Insert or replace every order of the batch
    ///
    /// The batch is applied atomically: a concurrent or later reader sees
    /// either none or all of it. An empty batch performs no write.
    async fn upsert_all(&self, orders: Vec<Order>) -> Result<UpsertSummary, StorageError>;

    /// Return the stored orders matching `filter`, in stored order
    async fn find(&self, filter: &OrderFilter) -> Result<Vec<Order>, StorageError>;
}
