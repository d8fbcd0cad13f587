//! # Order Ingest
//!
//! Ingestion of fixed-width customer order records with upsert-by-id storage
//! and filtered queries.
//!
//! ## Features
//!
//! - **Fixed-width decoding**: Six positional fields per line, normalized into an [`Order`](core::Order)
//! - **Error accumulation**: Every rejected line is reported; one bad line never stops a batch
//! - **Upsert by order id**: Replacements keep their position, new ids are appended
//! - **Atomic snapshots**: The JSON file store rewrites its snapshot via temp file and rename
//! - **Filtered queries**: By order id and inclusive date range
//! - **REST exposure**: Multipart upload and listing routes on axum
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use order_ingest::prelude::*;
//! use std::sync::Arc;
//!
//! let coordinator = IngestCoordinator::new(Arc::new(JsonFileOrderStore::new("data/orders.json")));
//!
//! let result = coordinator.ingest(lines).await?;
//! for error in &result.errors {
//!     eprintln!("{}", error);
//! }
//!
//! let orders = coordinator
//!     .query(&OrderFilter::all().from_date("2021-01-01"))
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        BatchProcessor, IngestCoordinator, IngestResult, LineError, Order, OrderFilter,
        OrderStore, RecordDecoder, RejectionReason, ServiceError, ServiceResult, StorageError,
        UpsertSummary,
    };

    // === Storage ===
    pub use crate::storage::{InMemoryOrderStore, JsonFileOrderStore};

    // === Config ===
    pub use crate::config::{AppConfig, StorageBackend};

    // === Server ===
    pub use crate::server::ServerBuilder;
}
