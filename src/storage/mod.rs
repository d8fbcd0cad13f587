//! Storage implementations for different backends
//!
//! Every backend shares the same merge rule through [`merge_orders`]: the
//! whole prior state is held in an insertion-ordered map keyed by order id,
//! the batch is applied to it in memory, and the result becomes the new state.

pub mod in_memory;
pub mod json_file;

pub use in_memory::InMemoryOrderStore;
pub use json_file::JsonFileOrderStore;

use crate::core::order::Order;
use crate::core::store::UpsertSummary;
use indexmap::IndexMap;

/// Complete store state: order id → order, in stored order
pub type OrderSnapshot = IndexMap<String, Order>;

/// Apply a batch of orders to a snapshot
///
/// An existing id is replaced wholesale and keeps its position; a new id is
/// appended. Later orders in the same batch win over earlier ones.
pub fn merge_orders(snapshot: &mut OrderSnapshot, orders: Vec<Order>) -> UpsertSummary {
    let mut summary = UpsertSummary::default();

    for order in orders {
        let order_id = order.order_id().to_string();
        match snapshot.insert(order_id, order) {
            Some(_) => summary.replaced += 1,
            None => summary.inserted += 1,
        }
    }

    summary
}

/// Build a snapshot from a stored sequence of orders
pub fn snapshot_from(orders: Vec<Order>) -> OrderSnapshot {
    let mut snapshot = OrderSnapshot::with_capacity(orders.len());
    merge_orders(&mut snapshot, orders);
    snapshot
}
