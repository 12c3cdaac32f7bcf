use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::error::Result;
use super::stats::CacheStatistics;

/// Contract implemented by every cache backend.
///
/// All operations are keyed by a non-empty string. Values cross this boundary
/// as opaque byte sequences; the provider never interprets them beyond the
/// optional compression transform. Implementations must be safe to share
/// across threads without external locking.
pub trait CacheProvider: Send + Sync {
    /// Store `value` under `key` with absolute expiration `now + ttl`.
    /// A zero TTL or empty key is a contract error, never silently corrected.
    fn put(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()>;

    /// Look up `key`. Absence is not an error; a stored-compressed value is
    /// transparently decompressed. Records a hit or miss when statistics are
    /// enabled.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Remove `key` if present; removing an absent key is a no-op.
    fn evict(&self, key: &str) -> Result<()>;

    /// Remove every entry, returning the number removed. Idempotent.
    fn clear(&self) -> Result<usize>;

    /// Remove all entries whose expiration lies strictly before now and
    /// return the count. Backends with native TTL support may make this a
    /// no-op.
    fn remove_expired(&self) -> Result<usize>;

    /// Live view of this provider's counters, `None` when statistics are
    /// disabled. The returned handle reflects ongoing activity; it is not a
    /// snapshot.
    fn statistics(&self) -> Option<Arc<CacheStatistics>>;

    /// Stable identifying string for diagnostics
    fn provider_name(&self) -> &str;

    /// Release held resources. Operations after close are undefined.
    fn close(&self) -> Result<()>;

    /// Whether `key` currently resolves to a live value
    fn contains_key(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Insert only if `key` is absent; returns whether an insert happened
    fn put_if_absent(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<bool> {
        if self.contains_key(key)? {
            return Ok(false);
        }
        self.put(key, value, ttl)?;
        Ok(true)
    }

    /// Look up each key independently, collecting the present ones.
    /// Duplicate keys coalesce to a single map entry.
    fn get_bulk(&self, keys: &[String]) -> Result<HashMap<String, Vec<u8>>> {
        let mut found = HashMap::with_capacity(keys.len());
        for key in keys {
            if let Some(value) = self.get(key)? {
                found.insert(key.clone(), value);
            }
        }
        Ok(found)
    }
}
