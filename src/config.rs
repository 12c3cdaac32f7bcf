use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::compression::CompressionConfig;

/// Closed set of cache backend kinds.
///
/// Only `Memory` ships with a built-in constructor; the others name external
/// adapters that must be registered on the manager before first use. An
/// unregistered kind is a configuration error surfaced at first use, never a
/// silent fallback to another backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// In-process reference provider
    #[default]
    Memory,
    /// Redis adapter (external, registered by the embedding application)
    Redis,
    /// Hazelcast adapter (external, registered by the embedding application)
    Hazelcast,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::Redis => write!(f, "redis"),
            Self::Hazelcast => write!(f, "hazelcast"),
        }
    }
}

/// Cache manager configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Backend kind used for every cache created by the manager
    pub backend: BackendKind,
    /// TTL applied when a put does not specify one, in seconds
    pub default_ttl_secs: u64,
    /// Maximum entry count per cache before capacity eviction kicks in
    pub max_entries: usize,
    /// Period of the expiration sweep, in seconds. Drives both the manager's
    /// background timer and the opportunistic sweep inside `put`.
    pub cleanup_interval_secs: u64,
    /// Value compression settings
    pub compression: CompressionConfig,
    /// Enable per-cache hit/miss statistics
    pub enable_statistics: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Memory,
            default_ttl_secs: 3600,
            max_entries: 10_000,
            cleanup_interval_secs: 300,
            compression: CompressionConfig::default(),
            enable_statistics: true,
        }
    }
}

impl CacheConfig {
    /// Load configuration from YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: CacheConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.backend, BackendKind::Memory);
        assert_eq!(config.default_ttl_secs, 3600);
        assert_eq!(config.max_entries, 10_000);
        assert_eq!(config.cleanup_interval_secs, 300);
        assert!(!config.compression.enabled);
        assert!(config.enable_statistics);
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "backend: memory\n\
             default_ttl_secs: 60\n\
             max_entries: 128\n\
             compression:\n\
             \x20 enabled: true\n\
             \x20 min_size: 512\n\
             \x20 algorithm: zstd\n\
             \x20 zstd_level: 5\n"
        )
        .unwrap();

        let config = CacheConfig::from_file(file.path()).unwrap();
        assert_eq!(config.default_ttl_secs, 60);
        assert_eq!(config.max_entries, 128);
        assert!(config.compression.enabled);
        assert_eq!(config.compression.min_size, 512);
        // Fields absent from the file keep their defaults
        assert_eq!(config.cleanup_interval_secs, 300);
        assert!(config.enable_statistics);
    }

    #[test]
    fn test_backend_kind_display() {
        assert_eq!(BackendKind::Memory.to_string(), "memory");
        assert_eq!(BackendKind::Redis.to_string(), "redis");
        assert_eq!(BackendKind::Hazelcast.to_string(), "hazelcast");
    }
}
