//! ServerBuilder for fluent API to build the HTTP server

use super::handlers::AppState;
use super::router::{build_order_routes, health_routes};
use crate::config::AppConfig;
use crate::core::service::IngestCoordinator;
use crate::core::store::OrderStore;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Builder for the order ingest HTTP server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_store(JsonFileOrderStore::new("data/orders.json"))
///     .build()?;
/// ```
pub struct ServerBuilder {
    store: Option<Arc<dyn OrderStore>>,
    max_upload_bytes: usize,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            store: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Create a builder with the store and limits described by `config`
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new()
            .with_shared_store(config.build_store())
            .with_max_upload_bytes(config.server.max_upload_bytes)
    }

    /// Set the order store (required)
    pub fn with_store(self, store: impl OrderStore + 'static) -> Self {
        self.with_shared_store(Arc::new(store))
    }

    /// Set an already shared order store
    pub fn with_shared_store(mut self, store: Arc<dyn OrderStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    /// Build the coordinator the routes will share
    pub fn build_coordinator(&self) -> Result<IngestCoordinator> {
        let store = self
            .store
            .clone()
            .ok_or_else(|| anyhow::anyhow!("OrderStore is required. Call .with_store()"))?;
        Ok(IngestCoordinator::new(store))
    }

    /// Build the final router
    ///
    /// Health check routes plus the order upload and listing routes, behind
    /// request tracing and permissive CORS.
    pub fn build(self) -> Result<Router> {
        let state = AppState {
            coordinator: self.build_coordinator()?,
        };

        let app = health_routes().merge(build_order_routes(state, self.max_upload_bytes));

        Ok(app.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        ))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve on SIGTERM or Ctrl+C
///
/// In-flight uploads finish before `serve` returns; a commit already inside
/// the store's writer lock always completes its rename.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let received = tokio::select! {
        _ = ctrl_c => "SIGINT",
        _ = terminate => "SIGTERM",
    };
    tracing::info!(signal = received, "stopping order ingest server, draining requests");
}
