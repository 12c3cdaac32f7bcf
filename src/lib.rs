pub mod compression;
pub mod config;
pub mod core;
pub mod key;
pub mod manager;

// Re-export commonly used types
pub use compression::{CompressionAlgorithm, CompressionConfig, Compressor};
pub use config::{BackendKind, CacheConfig};
pub use core::{
    CacheEntry, CacheError, CacheProvider, CacheStatistics, MemoryProvider, Result, StatsSnapshot,
};
pub use manager::{CacheManager, ProviderFactory};
