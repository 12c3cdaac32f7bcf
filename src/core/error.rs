use thiserror::Error;

use crate::config::BackendKind;

/// Main error type for cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Invalid cache name: {0}")]
    InvalidCacheName(String),

    #[error("Invalid cache key: {0}")]
    InvalidKey(String),

    #[error("Invalid TTL: {0}")]
    InvalidTtl(String),

    #[error("Backend '{kind}' is not available: {reason}")]
    BackendUnavailable { kind: BackendKind, reason: String },

    #[error("Failed to construct provider for cache '{name}': {reason}")]
    ProviderConstruction { name: String, reason: String },

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Statistics are not enabled")]
    StatisticsDisabled,

    #[error("Compression error: {0}")]
    Compression(#[from] std::io::Error),
}

/// Result type alias for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;
