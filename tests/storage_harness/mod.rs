//! Shared test harness for order store testing
//!
//! Orders can only be built by decoding a source line, so the harness builds
//! well-formed fixed-width lines and decodes them.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod order_store_tests;

use order_ingest::core::{Order, RecordDecoder};

/// The six sample records shipped with the upload endpoint's documentation
pub const SAMPLE_FILE: &str = include_str!("../fixtures/orders.txt");

/// Build one fixed-width line from field values
///
/// Numeric ids are zero-padded, the name and value are right-aligned with
/// spaces, exactly like the files produced upstream.
pub fn fixture_line(
    user_id: u64,
    user_name: &str,
    order_id: u64,
    product_id: u64,
    value: &str,
    date: &str,
) -> String {
    format!("{user_id:010}{user_name:>45}{order_id:010}{product_id:010}{value:>12}{date:>8}")
}

/// Decode a line that is known to be valid
pub fn decode(line: &str) -> Order {
    RecordDecoder::new()
        .decode(line)
        .unwrap_or_else(|reason| panic!("fixture line should decode ({reason}): {line:?}"))
}

/// An order with the given id, value and `YYYYMMDD` date
pub fn order(order_id: u64, value: &str, date: &str) -> Order {
    decode(&fixture_line(83, "Frances Satterfield", order_id, 6, value, date))
}

pub fn ids(orders: &[Order]) -> Vec<String> {
    orders.iter().map(|o| o.order_id().to_string()).collect()
}
