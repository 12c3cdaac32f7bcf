use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info};

use super::entry::{CacheEntry, epoch_millis};
use super::error::{CacheError, Result};
use super::provider::CacheProvider;
use super::stats::CacheStatistics;
use crate::compression::Compressor;
use crate::config::CacheConfig;

/// What a keyed lookup found, resolved while the map reference is held
enum Lookup {
    Absent,
    Expired,
    Live(Vec<u8>, bool),
}

/// In-process reference provider.
///
/// Entries live in a concurrent map; expiration is lazy on `get`, amortized
/// through an opportunistic sweep on `put`, and forced by `remove_expired`.
/// Capacity eviction scans for the least-recently-accessed entry, an O(n)
/// policy that tolerates the map mutating underneath it.
pub struct MemoryProvider {
    entries: DashMap<String, CacheEntry>,
    max_entries: usize,
    cleanup_interval_ms: u64,
    statistics: Option<Arc<CacheStatistics>>,
    compressor: Option<Compressor>,
    last_sweep_ms: AtomicU64,
}

impl MemoryProvider {
    /// Create a provider from the shared cache configuration
    pub fn new(config: &CacheConfig) -> Self {
        info!(
            "Initializing memory provider: max_entries={}, compression={}, statistics={}",
            config.max_entries, config.compression.enabled, config.enable_statistics
        );

        Self {
            entries: DashMap::new(),
            max_entries: config.max_entries,
            cleanup_interval_ms: config.cleanup_interval_secs * 1_000,
            statistics: config
                .enable_statistics
                .then(|| Arc::new(CacheStatistics::new())),
            compressor: config
                .compression
                .enabled
                .then(|| Compressor::new(config.compression.clone())),
            last_sweep_ms: AtomicU64::new(epoch_millis()),
        }
    }

    /// Current number of entries, including not-yet-swept expired ones
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn validate(&self, key: &str, ttl: Duration) -> Result<()> {
        if key.is_empty() {
            return Err(CacheError::InvalidKey("key cannot be empty".to_string()));
        }
        if ttl.is_zero() {
            return Err(CacheError::InvalidTtl("TTL must be positive".to_string()));
        }
        Ok(())
    }

    /// Evict the entry with the oldest last-access time. Full scan over a
    /// live map; under concurrent access the victim may be near-oldest
    /// rather than exactly oldest, which is acceptable.
    fn evict_oldest(&self) {
        let mut oldest: Option<(String, u64)> = None;
        for entry in self.entries.iter() {
            let accessed = entry.value().last_access_ms();
            match &oldest {
                Some((_, best)) if accessed >= *best => {}
                _ => oldest = Some((entry.key().clone(), accessed)),
            }
        }

        if let Some((key, _)) = oldest {
            if self.entries.remove(&key).is_some() {
                debug!("Capacity eviction: {}", key);
                if let Some(stats) = &self.statistics {
                    stats.record_eviction();
                }
            }
        }
    }

    fn due_for_sweep(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_sweep_ms.load(Ordering::Relaxed)) > self.cleanup_interval_ms
    }

    fn update_size(&self) {
        if let Some(stats) = &self.statistics {
            stats.set_size(self.entries.len() as u64);
        }
    }
}

impl CacheProvider for MemoryProvider {
    fn put(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        self.validate(key, ttl)?;

        if self.entries.len() >= self.max_entries {
            self.evict_oldest();
        }

        let now = epoch_millis();
        if self.due_for_sweep(now) {
            self.remove_expired()?;
        }

        let (stored, compressed) = match &self.compressor {
            Some(c) if c.should_compress(&value) => (c.compress(&value)?, true),
            _ => (value, false),
        };

        let expires_at = now + ttl.as_millis() as u64;
        debug!(
            "PUT key={}, size={}, compressed={}, expires_at={}",
            key,
            stored.len(),
            compressed,
            expires_at
        );
        self.entries
            .insert(key.to_string(), CacheEntry::new(stored, expires_at, compressed));

        if let Some(stats) = &self.statistics {
            stats.record_put();
        }
        self.update_size();
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let now = epoch_millis();

        let lookup = match self.entries.get(key) {
            None => Lookup::Absent,
            Some(entry) if entry.is_expired(now) => Lookup::Expired,
            Some(entry) => {
                entry.record_access(now);
                Lookup::Live(entry.value().value().to_vec(), entry.is_compressed())
            }
        };

        match lookup {
            Lookup::Absent => {
                debug!("GET key={} MISS", key);
                if let Some(stats) = &self.statistics {
                    stats.record_miss();
                }
                Ok(None)
            }
            Lookup::Expired => {
                debug!("GET key={} expired", key);
                // Guarded removal: a concurrent re-put must not be destroyed
                let removed = self
                    .entries
                    .remove_if(key, |_, e| e.is_expired(now))
                    .is_some();
                if let Some(stats) = &self.statistics {
                    stats.record_miss();
                    if removed {
                        stats.record_eviction();
                    }
                }
                self.update_size();
                Ok(None)
            }
            Lookup::Live(value, compressed) => {
                debug!("GET key={} HIT", key);
                if let Some(stats) = &self.statistics {
                    stats.record_hit();
                }
                match (&self.compressor, compressed) {
                    (Some(c), true) => Ok(Some(c.decompress(&value)?)),
                    _ => Ok(Some(value)),
                }
            }
        }
    }

    fn evict(&self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            debug!("EVICT key={}", key);
            if let Some(stats) = &self.statistics {
                stats.record_eviction();
            }
            self.update_size();
        }
        Ok(())
    }

    fn clear(&self) -> Result<usize> {
        let removed = self.entries.len();
        self.entries.clear();

        if removed > 0 {
            debug!("CLEAR removed {} entries", removed);
            if let Some(stats) = &self.statistics {
                stats.record_clear(removed as u64);
            }
        }
        self.update_size();
        Ok(removed)
    }

    fn remove_expired(&self) -> Result<usize> {
        let now = epoch_millis();
        let mut removed = 0usize;
        self.entries.retain(|_, entry| {
            if entry.is_expired(now) {
                removed += 1;
                false
            } else {
                true
            }
        });

        if removed > 0 {
            debug!("Expiration sweep removed {} entries", removed);
            if let Some(stats) = &self.statistics {
                stats.record_bulk_eviction(removed as u64);
            }
        }
        self.update_size();
        self.last_sweep_ms.store(now, Ordering::Relaxed);
        Ok(removed)
    }

    fn statistics(&self) -> Option<Arc<CacheStatistics>> {
        self.statistics.clone()
    }

    fn provider_name(&self) -> &str {
        "memory"
    }

    fn close(&self) -> Result<()> {
        self.clear()?;
        Ok(())
    }
}
