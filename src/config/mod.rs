//! Configuration loading and management

use crate::core::error::ConfigError;
use crate::core::store::OrderStore;
use crate::storage::{InMemoryOrderStore, JsonFileOrderStore};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    /// Largest accepted upload body, in bytes
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Which [`OrderStore`] implementation to run with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    JsonFile,
    InMemory,
}

/// Persistence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    /// Snapshot file, used by the `json_file` backend
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::JsonFile,
            path: PathBuf::from("data/orders.json"),
        }
    }
}

/// Complete service configuration
///
/// ```yaml
/// server:
///   host: 0.0.0.0
///   port: 8080
/// storage:
///   backend: json_file
///   path: /var/lib/orders/orders.json
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.to_string(),
            },
            _ => ConfigError::IoError {
                message: e.to_string(),
            },
        })?;

        Self::from_yaml_str(&content).map_err(|e| match e {
            ConfigError::ParseError { file: None, message } => ConfigError::ParseError {
                file: Some(path.to_string()),
                message,
            },
            other => other,
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Default configuration: JSON snapshot under `data/`, port 3000
    pub fn default_config() -> Self {
        Self::default()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.max_upload_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.max_upload_bytes".to_string(),
                value: "0".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        if self.storage.backend == StorageBackend::JsonFile
            && self.storage.path.as_os_str().is_empty()
        {
            return Err(ConfigError::InvalidValue {
                field: "storage.path".to_string(),
                value: String::new(),
                message: "json_file backend needs a snapshot path".to_string(),
            });
        }

        Ok(())
    }

    /// `host:port` for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Instantiate the configured store
    pub fn build_store(&self) -> Arc<dyn OrderStore> {
        match self.storage.backend {
            StorageBackend::JsonFile => Arc::new(JsonFileOrderStore::new(&self.storage.path)),
            StorageBackend::InMemory => Arc::new(InMemoryOrderStore::new()),
        }
    }
}
