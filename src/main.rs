//! Order ingest server
//!
//! Usage: `order-ingest [config.yaml]`
//!
//! The configuration path may also come from `ORDER_INGEST_CONFIG`. Without
//! either, defaults are used (JSON snapshot at `data/orders.json`, port 3000).

use anyhow::Result;
use order_ingest::prelude::*;
use tracing_subscriber::EnvFilter;

const CONFIG_ENV: &str = "ORDER_INGEST_CONFIG";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_ENV).ok());

    let config = match config_path {
        Some(path) => {
            tracing::info!(%path, "loading configuration");
            AppConfig::from_yaml_file(&path)?
        }
        None => AppConfig::default_config(),
    };

    tracing::info!(
        backend = ?config.storage.backend,
        path = %config.storage.path.display(),
        "order store configured"
    );

    ServerBuilder::from_config(&config)
        .serve(&config.bind_address())
        .await
}
