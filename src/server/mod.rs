//! HTTP exposure for order ingestion
//!
//! This module provides a `ServerBuilder` that registers:
//! - Order upload and filtered listing routes
//! - Health check routes
//!
//! The transport is a thin adapter over the
//! [`IngestCoordinator`](crate::core::service::IngestCoordinator).

pub mod builder;
pub mod handlers;
pub mod router;

pub use builder::ServerBuilder;
pub use handlers::AppState;
