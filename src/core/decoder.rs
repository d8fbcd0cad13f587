//! Fixed-width record decoding
//!
//! Each source line carries six fields at fixed column offsets with no
//! delimiter between them:
//!
//! ```text
//! 0         10                                           55        65        75          87      95
//! |user_id  |user_name (right aligned)                   |order_id |prod_id  |value      |date    |
//! 0000000083                          Frances Satterfield00000007910000000006      224.7520211122
//! ```
//!
//! Offsets are counted in characters, after the whole line has been trimmed.
//! A line shorter than the layout yields short or empty trailing fields,
//! which are then rejected by the empty-field check.

use crate::core::order::Order;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::ops::Range;
use std::sync::LazyLock;

/// Why a single line could not be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RejectionReason {
    /// A field is empty after normalization, the product id is all zeros,
    /// or a numeric field does not parse
    #[error("invalid line format")]
    InvalidLineFormat,

    /// The date field is not exactly eight characters long
    #[error("invalid date format")]
    InvalidDateFormat,
}

impl Serialize for RejectionReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Column ranges of the fixed-width layout
pub mod layout {
    use std::ops::Range;

    pub const USER_ID: Range<usize> = 0..10;
    pub const USER_NAME: Range<usize> = 10..55;
    pub const ORDER_ID: Range<usize> = 55..65;
    pub const PRODUCT_ID: Range<usize> = 65..75;
    pub const VALUE: Range<usize> = 75..87;
    pub const DATE: Range<usize> = 87..95;

    /// Total width of a complete record
    pub const RECORD_WIDTH: usize = DATE.end;
}

const DATE_WIDTH: usize = 8;

static ALL_ZEROS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0{10}$").expect("valid product id pattern"));

/// Decodes fixed-width order lines into [`Order`] values
///
/// Decoding is pure: the same line always yields the same result and
/// nothing outside the returned value is touched.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordDecoder;

impl RecordDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Decode one line into an [`Order`]
    ///
    /// Checks run in a fixed order: every field must be non-empty (and the
    /// product id not all zeros), then the numeric fields must parse, and
    /// only then is the date width checked.
    pub fn decode(&self, line: &str) -> Result<Order, RejectionReason> {
        let line = line.trim();

        let user_id = strip_leading_zeros(field(line, layout::USER_ID));
        let user_name = field(line, layout::USER_NAME).trim();
        let order_id = strip_leading_zeros(field(line, layout::ORDER_ID));
        let raw_product_id = field(line, layout::PRODUCT_ID);
        let product_id = strip_leading_zeros(raw_product_id);
        let value = field(line, layout::VALUE).trim();
        let date = field(line, layout::DATE).trim();

        let any_empty = [user_id, user_name, order_id, product_id, value, date]
            .iter()
            .any(|f| f.is_empty());

        if any_empty || ALL_ZEROS.is_match(raw_product_id.trim()) {
            tracing::debug!(
                user_id,
                user_name,
                order_id,
                product_id,
                value,
                date,
                "rejecting line with empty or zero field"
            );
            return Err(RejectionReason::InvalidLineFormat);
        }

        let product_id = match product_id.parse::<u64>() {
            Ok(id) if id > 0 => id,
            _ => {
                tracing::debug!(product_id, "product id is not a positive integer");
                return Err(RejectionReason::InvalidLineFormat);
            }
        };

        let value = parse_decimal(value).ok_or_else(|| {
            tracing::debug!(value, "value is not a finite decimal");
            RejectionReason::InvalidLineFormat
        })?;

        let date = format_date(date)?;

        Ok(Order::new(
            user_id.to_string(),
            user_name.to_string(),
            order_id.to_string(),
            product_id,
            value,
            date,
        ))
    }
}

/// Slice `line` by character offsets, clamping both ends to the line length
fn field(line: &str, range: Range<usize>) -> &str {
    let byte_at = |n: usize| line.char_indices().nth(n).map_or(line.len(), |(i, _)| i);
    &line[byte_at(range.start)..byte_at(range.end)]
}

fn strip_leading_zeros(raw: &str) -> &str {
    raw.trim_start_matches('0').trim()
}

fn parse_decimal(raw: &str) -> Option<f64> {
    raw.replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn format_date(raw: &str) -> Result<String, RejectionReason> {
    if raw.chars().count() != DATE_WIDTH {
        tracing::debug!(date = raw, "date field is not eight characters");
        return Err(RejectionReason::InvalidDateFormat);
    }

    Ok(format!(
        "{}-{}-{}",
        field(raw, 0..4),
        field(raw, 4..6),
        field(raw, 6..8)
    ))
}
