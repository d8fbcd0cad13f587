//! Batch decoding with per-line error accumulation

use crate::core::decoder::{RecordDecoder, RejectionReason};
use crate::core::order::Order;
use serde::Serialize;
use std::fmt;

/// A line that failed to decode, with its 1-based position in the batch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineError {
    pub line_number: usize,

    /// The line exactly as submitted (untrimmed)
    pub raw_line: String,

    pub reason: RejectionReason,
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Line {}: \"{}\" - Error: {}",
            self.line_number, self.raw_line, self.reason
        )
    }
}

/// Outcome of decoding one batch
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestResult {
    /// Decoded orders, in input order
    pub accepted: Vec<Order>,

    /// Rejected lines, in input order
    pub errors: Vec<LineError>,
}

impl IngestResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Total number of lines seen
    pub fn line_count(&self) -> usize {
        self.accepted.len() + self.errors.len()
    }
}

/// Runs the [`RecordDecoder`] over every line of a batch
///
/// A rejected line never stops the batch: every line is decoded and every
/// failure is recorded. Blank lines are expected to be removed beforehand.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchProcessor {
    decoder: RecordDecoder,
}

impl BatchProcessor {
    pub fn process<I, S>(&self, lines: I) -> IngestResult
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut result = IngestResult::default();

        for (index, line) in lines.into_iter().enumerate() {
            let line = line.as_ref();
            let line_number = index + 1;

            match self.decoder.decode(line) {
                Ok(order) => {
                    tracing::debug!(line = line_number, order_id = order.order_id(), "line decoded");
                    result.accepted.push(order);
                }
                Err(reason) => {
                    tracing::warn!(line = line_number, %reason, "line rejected");
                    result.errors.push(LineError {
                        line_number,
                        raw_line: line.to_string(),
                        reason,
                    });
                }
            }
        }

        tracing::info!(
            accepted = result.accepted.len(),
            rejected = result.errors.len(),
            "batch decoded"
        );

        result
    }
}
