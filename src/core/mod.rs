//! Core module: order decoding, batch processing, storage contract and coordination

pub mod batch;
pub mod decoder;
pub mod error;
pub mod order;
pub mod query;
pub mod service;
pub mod store;

pub use batch::{BatchProcessor, IngestResult, LineError};
pub use decoder::{RecordDecoder, RejectionReason};
pub use error::{ServiceError, ServiceResult, StorageError};
pub use order::Order;
pub use query::OrderFilter;
pub use service::IngestCoordinator;
pub use store::{OrderStore, UpsertSummary};
