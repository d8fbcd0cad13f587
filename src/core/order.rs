//! The normalized order entity

use serde::{Deserialize, Serialize};

/// A validated, normalized customer order
///
/// Orders are produced by [`RecordDecoder`](crate::core::decoder::RecordDecoder)
/// from a fixed-width source line, or restored from a stored snapshot. They
/// expose no mutators: a newer order sharing the same `order_id` supersedes
/// the old one in the store instead.
///
/// Serialized with camelCase field names. `productId` also accepts the legacy
/// `prodId` name when reading older snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    user_id: String,
    user_name: String,
    order_id: String,
    #[serde(alias = "prodId")]
    product_id: u64,
    value: f64,
    date: String,
}

impl Order {
    pub(crate) fn new(
        user_id: String,
        user_name: String,
        order_id: String,
        product_id: u64,
        value: f64,
        date: String,
    ) -> Self {
        Self {
            user_id,
            user_name,
            order_id,
            product_id,
            value,
            date,
        }
    }

    /// Customer identifier, leading zeros stripped
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    /// Order identifier, the store's unique key
    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn product_id(&self) -> u64 {
        self.product_id
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// ISO 8601 calendar date (`YYYY-MM-DD`)
    pub fn date(&self) -> &str {
        &self.date
    }
}
