use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// One stored value with expiration and access metadata.
///
/// Immutable once inserted, except for the two access fields, which any
/// concurrent reader updates atomically without external locking. A `put`
/// over an existing key installs a fresh entry rather than mutating this one.
#[derive(Debug)]
pub struct CacheEntry {
    value: Vec<u8>,
    expires_at_ms: u64,
    last_access_ms: AtomicU64,
    access_count: AtomicU32,
    compressed: bool,
}

impl CacheEntry {
    /// Create a new entry expiring at the given absolute epoch-millis timestamp
    pub fn new(value: Vec<u8>, expires_at_ms: u64, compressed: bool) -> Self {
        Self {
            value,
            expires_at_ms,
            last_access_ms: AtomicU64::new(epoch_millis()),
            access_count: AtomicU32::new(0),
            compressed,
        }
    }

    /// Check whether the entry's expiration lies strictly before `now_ms`
    pub fn is_expired(&self, now_ms: u64) -> bool {
        self.expires_at_ms < now_ms
    }

    /// Stamp the last-access time and bump the access counter
    pub fn record_access(&self, now_ms: u64) {
        self.last_access_ms.store(now_ms, Ordering::Relaxed);
        self.access_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Raw stored bytes (possibly compressed)
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn expires_at_ms(&self) -> u64 {
        self.expires_at_ms
    }

    /// Last access time, used by the capacity-eviction scan
    pub fn last_access_ms(&self) -> u64 {
        self.last_access_ms.load(Ordering::Relaxed)
    }

    pub fn access_count(&self) -> u32 {
        self.access_count.load(Ordering::Relaxed)
    }

    pub fn is_compressed(&self) -> bool {
        self.compressed
    }
}

/// Current wall-clock time as epoch milliseconds
pub fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
