use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free per-cache counters, incremented from arbitrary threads.
///
/// All counters are monotonic except `size`, which is a gauge tracking the
/// current entry count. A `clear` folds the cleared count into evictions.
#[derive(Debug, Default)]
pub struct CacheStatistics {
    hits: AtomicU64,
    misses: AtomicU64,
    puts: AtomicU64,
    evictions: AtomicU64,
    clears: AtomicU64,
    size: AtomicU64,
}

impl CacheStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_put(&self) {
        self.puts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a full clear of `n` entries: one clear, `n` evictions
    pub fn record_clear(&self, n: u64) {
        self.clears.fetch_add(1, Ordering::Relaxed);
        self.evictions.fetch_add(n, Ordering::Relaxed);
    }

    /// Record `n` entries removed by an expiration sweep
    pub fn record_bulk_eviction(&self, n: u64) {
        self.evictions.fetch_add(n, Ordering::Relaxed);
    }

    pub fn set_size(&self, n: u64) {
        self.size.store(n, Ordering::Relaxed);
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn puts(&self) -> u64 {
        self.puts.load(Ordering::Relaxed)
    }

    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    pub fn clears(&self) -> u64 {
        self.clears.load(Ordering::Relaxed)
    }

    pub fn size(&self) -> u64 {
        self.size.load(Ordering::Relaxed)
    }

    /// Hit ratio computed on demand; exactly 0.0 before any request
    pub fn hit_ratio(&self) -> f64 {
        let hits = self.hits();
        let total = hits + self.misses();
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    /// Point-in-time copy of all counters for observability surfaces
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits(),
            misses: self.misses(),
            puts: self.puts(),
            evictions: self.evictions(),
            clears: self.clears(),
            size: self.size(),
            hit_ratio: self.hit_ratio(),
        }
    }
}

/// Serializable point-in-time view of one cache's counters
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub puts: u64,
    pub evictions: u64,
    pub clears: u64,
    pub size: u64,
    pub hit_ratio: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_ratio_zero_without_requests() {
        let stats = CacheStatistics::new();
        assert_eq!(stats.hit_ratio(), 0.0);
    }

    #[test]
    fn test_hit_ratio() {
        let stats = CacheStatistics::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();

        assert!((stats.hit_ratio() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clear_folds_into_evictions() {
        let stats = CacheStatistics::new();
        stats.record_eviction();
        stats.record_clear(5);

        assert_eq!(stats.clears(), 1);
        assert_eq!(stats.evictions(), 6);
    }

    #[test]
    fn test_bulk_eviction() {
        let stats = CacheStatistics::new();
        stats.record_bulk_eviction(3);

        assert_eq!(stats.evictions(), 3);
        assert_eq!(stats.clears(), 0);
    }

    #[test]
    fn test_snapshot() {
        let stats = CacheStatistics::new();
        stats.record_put();
        stats.record_hit();
        stats.record_miss();
        stats.set_size(1);

        let snap = stats.snapshot();
        assert_eq!(snap.puts, 1);
        assert_eq!(snap.hits, 1);
        assert_eq!(snap.misses, 1);
        assert_eq!(snap.size, 1);
        assert!((snap.hit_ratio - 0.5).abs() < f64::EPSILON);
    }
}
