//! Order filtering

use crate::core::order::Order;
use serde::{Deserialize, Serialize};

/// Conjunction of optional predicates over stored orders
///
/// Extracted directly from URL query strings:
///
/// ```text
/// GET /orders/list?orderId=791
/// GET /orders/list?startDate=2021-01-01&endDate=2021-06-30
/// ```
///
/// Date bounds are inclusive and compared as ISO strings, which orders them
/// chronologically. An omitted (or empty) predicate always matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderFilter {
    pub order_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl OrderFilter {
    /// A filter with no predicates
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_order_id(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }

    pub fn from_date(mut self, start_date: impl Into<String>) -> Self {
        self.start_date = Some(start_date.into());
        self
    }

    pub fn until_date(mut self, end_date: impl Into<String>) -> Self {
        self.end_date = Some(end_date.into());
        self
    }

    /// Drop predicates whose value is an empty string
    pub fn normalized(self) -> Self {
        let keep = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Self {
            order_id: keep(self.order_id),
            start_date: keep(self.start_date),
            end_date: keep(self.end_date),
        }
    }

    pub fn is_empty(&self) -> bool {
        predicate(&self.order_id).is_none()
            && predicate(&self.start_date).is_none()
            && predicate(&self.end_date).is_none()
    }

    /// Blank values count as absent predicates
    pub fn matches(&self, order: &Order) -> bool {
        predicate(&self.order_id).is_none_or(|id| order.order_id() == id)
            && predicate(&self.start_date).is_none_or(|start| order.date() >= start)
            && predicate(&self.end_date).is_none_or(|end| order.date() <= end)
    }

    /// Keep the matching orders, preserving their order
    pub fn apply<'a, I>(&self, orders: I) -> Vec<Order>
    where
        I: IntoIterator<Item = &'a Order>,
    {
        orders
            .into_iter()
            .filter(|order| self.matches(order))
            .cloned()
            .collect()
    }
}

fn predicate(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}
