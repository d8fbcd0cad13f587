//! Typed error handling for order ingestion
//!
//! Per-line decode failures are not errors at this level: they are recorded
//! in the batch's [`IngestResult`](crate::core::batch::IngestResult) as
//! [`RejectionReason`](crate::core::decoder::RejectionReason)s and the batch
//! carries on. Everything here aborts the current operation.
//!
//! # Error Categories
//!
//! - [`StorageError`]: the persistence medium could not be read or written
//! - [`ConfigError`]: configuration parsing and validation
//! - [`RequestError`]: malformed upload requests
//!
//! # Example
//!
//! ```rust,ignore
//! match coordinator.ingest(lines).await {
//!     Ok(result) => println!("{} accepted", result.accepted.len()),
//!     Err(err) if err.is_retryable() => retry_later(),
//!     Err(err) => eprintln!("ingest failed: {}", err),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// The main error type for the service
#[derive(Debug)]
pub enum ServiceError {
    /// Storage backend errors
    Storage(StorageError),

    /// Configuration errors
    Config(ConfigError),

    /// HTTP/Request errors
    Request(RequestError),

    /// A query matched nothing and the caller treats that as missing
    NotFound { message: String },
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Storage(e) => write!(f, "{}", e),
            ServiceError::Config(e) => write!(f, "{}", e),
            ServiceError::Request(e) => write!(f, "{}", e),
            ServiceError::NotFound { message } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::Storage(e) => Some(e),
            ServiceError::Config(e) => Some(e),
            ServiceError::Request(e) => Some(e),
            ServiceError::NotFound { .. } => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ServiceError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Request(e) => e.status_code(),
            ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::Storage(_) => "STORAGE_ERROR",
            ServiceError::Config(_) => "CONFIG_ERROR",
            ServiceError::Request(e) => e.error_code(),
            ServiceError::NotFound { .. } => "ORDERS_NOT_FOUND",
        }
    }

    /// Whether repeating the same call unchanged may succeed
    ///
    /// Only storage failures qualify, and not a corrupted snapshot: that one
    /// fails again until the file is repaired.
    pub fn is_retryable(&self) -> bool {
        match self {
            ServiceError::Storage(e) => e.is_transient(),
            _ => false,
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ServiceError::Storage(StorageError::Io { path, .. })
            | ServiceError::Storage(StorageError::Corrupted { path, .. }) => {
                Some(serde_json::json!({ "path": path }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
#[derive(Debug)]
pub enum StorageError {
    /// Reading or writing the snapshot failed
    Io { path: String, message: String },

    /// Orders could not be encoded
    Serialization { message: String },

    /// The stored snapshot exists but cannot be decoded
    Corrupted { path: String, message: String },

    /// A lock guarding the store was poisoned by a panicking writer
    LockPoisoned { message: String },

    /// A blocking storage task did not complete
    TaskFailed { message: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io { path, message } => {
                write!(f, "Storage I/O error on '{}': {}", path, message)
            }
            StorageError::Serialization { message } => {
                write!(f, "Failed to serialize orders: {}", message)
            }
            StorageError::Corrupted { path, message } => {
                write!(f, "Stored orders in '{}' are corrupted: {}", path, message)
            }
            StorageError::LockPoisoned { message } => {
                write!(f, "Store lock poisoned: {}", message)
            }
            StorageError::TaskFailed { message } => {
                write!(f, "Storage task failed: {}", message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl StorageError {
    /// Whether the failure depends on conditions that can clear on their own
    pub fn is_transient(&self) -> bool {
        !matches!(self, StorageError::Corrupted { .. })
    }
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        ServiceError::Storage(err)
    }
}

impl From<tokio::task::JoinError> for StorageError {
    fn from(err: tokio::task::JoinError) -> Self {
        StorageError::TaskFailed {
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration file
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// Configuration file not found
    FileNotFound { path: String },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
            ConfigError::FileNotFound { path } => {
                write!(f, "Configuration file not found: {}", path)
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for ServiceError {
    fn from(err: ConfigError) -> Self {
        ServiceError::Config(err)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to HTTP requests
#[derive(Debug)]
pub enum RequestError {
    /// The multipart form has no `file` field
    MissingFile,

    /// The upload body could not be read
    InvalidUpload { message: String },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::MissingFile => write!(f, "No file was uploaded"),
            RequestError::InvalidUpload { message } => {
                write!(f, "Invalid upload: {}", message)
            }
        }
    }
}

impl std::error::Error for RequestError {}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::MissingFile => StatusCode::BAD_REQUEST,
            RequestError::InvalidUpload { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::MissingFile => "MISSING_FILE",
            RequestError::InvalidUpload { .. } => "INVALID_UPLOAD",
        }
    }
}

impl From<RequestError> for ServiceError {
    fn from(err: RequestError) -> Self {
        ServiceError::Request(err)
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

// =============================================================================
// Tests
// =============================================================================
