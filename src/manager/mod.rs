use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::{BackendKind, CacheConfig};
use crate::core::{CacheError, CacheProvider, CacheStatistics, MemoryProvider, Result};

/// Constructor registered for one backend kind
pub type ProviderFactory =
    Arc<dyn Fn(&CacheConfig) -> Result<Arc<dyn CacheProvider>> + Send + Sync>;

/// How long shutdown waits for an in-flight sweep before aborting it
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Registry and lifecycle manager for named caches.
///
/// Owns one provider per cache name, created lazily on first write access.
/// A single background task periodically asks every live provider to purge
/// expired entries. Must be constructed inside a Tokio runtime.
///
/// Backend adapters beyond the built-in memory provider are installed with
/// [`CacheManager::register_backend`]; adapters receive their connection
/// objects through the registered closure rather than any global state.
pub struct CacheManager {
    providers: Arc<DashMap<String, Arc<dyn CacheProvider>>>,
    factories: RwLock<HashMap<BackendKind, ProviderFactory>>,
    config: CacheConfig,
    sweeper: Mutex<Option<JoinHandle<()>>>,
    shutdown_tx: watch::Sender<bool>,
}

impl CacheManager {
    /// Create a manager and start its background expiration sweep
    pub fn new(config: CacheConfig) -> Self {
        info!(
            "Initializing cache manager: backend={}, sweep_interval={}s",
            config.backend, config.cleanup_interval_secs
        );

        let mut factories: HashMap<BackendKind, ProviderFactory> = HashMap::new();
        factories.insert(
            BackendKind::Memory,
            Arc::new(|config: &CacheConfig| {
                Ok(Arc::new(MemoryProvider::new(config)) as Arc<dyn CacheProvider>)
            }),
        );

        let providers: Arc<DashMap<String, Arc<dyn CacheProvider>>> = Arc::new(DashMap::new());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let sweeper = Self::spawn_sweeper(providers.clone(), config.cleanup_interval(), shutdown_rx);

        Self {
            providers,
            factories: RwLock::new(factories),
            config,
            sweeper: Mutex::new(Some(sweeper)),
            shutdown_tx,
        }
    }

    /// Install a constructor for an external backend kind. Replaces any
    /// previously registered constructor for that kind.
    pub fn register_backend(&self, kind: BackendKind, factory: ProviderFactory) {
        info!("Registered backend constructor for kind '{}'", kind);
        self.factories.write().insert(kind, factory);
    }

    /// Store `value` in the named cache. A `None` TTL falls back to the
    /// configured default. Creates the provider on first use.
    pub fn put(&self, cache: &str, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        validate_name(cache)?;
        validate_key(key)?;

        let effective_ttl = ttl.unwrap_or_else(|| self.config.default_ttl());
        self.provider(cache)?.put(key, value, effective_ttl)?;
        debug!("Put key '{}' in cache '{}'", key, cache);
        Ok(())
    }

    /// Look up `key` in the named cache. A never-seen cache name yields
    /// `Ok(None)` without creating a provider.
    pub fn get(&self, cache: &str, key: &str) -> Result<Option<Vec<u8>>> {
        validate_name(cache)?;
        validate_key(key)?;

        match self.providers.get(cache) {
            Some(provider) => provider.get(key),
            None => {
                debug!("Cache not found: {}", cache);
                Ok(None)
            }
        }
    }

    /// Remove `key` from the named cache. Creates the provider on first use;
    /// removing an absent key is a no-op.
    pub fn evict(&self, cache: &str, key: &str) -> Result<()> {
        validate_name(cache)?;
        validate_key(key)?;

        self.provider(cache)?.evict(key)?;
        debug!("Evicted key '{}' from cache '{}'", key, cache);
        Ok(())
    }

    /// Clear the named cache and drop its provider entirely. The next
    /// operation on this name gets a brand-new provider with fresh
    /// statistics.
    pub fn evict_all(&self, cache: &str) -> Result<()> {
        validate_name(cache)?;

        if let Some((_, provider)) = self.providers.remove(cache) {
            provider.clear()?;
            if let Err(e) = provider.close() {
                warn!("Error closing provider for cache '{}': {}", cache, e);
            }
            info!("Evicted all entries from cache '{}'", cache);
        }
        Ok(())
    }

    /// Live statistics view for the named cache. Fails when statistics are
    /// globally disabled; a never-seen cache name yields `Ok(None)`.
    pub fn statistics(&self, cache: &str) -> Result<Option<Arc<CacheStatistics>>> {
        validate_name(cache)?;

        if !self.config.enable_statistics {
            return Err(CacheError::StatisticsDisabled);
        }
        match self.providers.get(cache) {
            Some(provider) => Ok(provider.statistics()),
            None => Ok(None),
        }
    }

    /// Whether `key` resolves to a live value in the named cache. Pure read;
    /// does not create a provider.
    pub fn contains_key(&self, cache: &str, key: &str) -> Result<bool> {
        validate_name(cache)?;
        validate_key(key)?;

        match self.providers.get(cache) {
            Some(provider) => provider.contains_key(key),
            None => Ok(false),
        }
    }

    /// Insert only if `key` is absent; returns whether an insert happened
    pub fn put_if_absent(
        &self,
        cache: &str,
        key: &str,
        value: Vec<u8>,
        ttl: Option<Duration>,
    ) -> Result<bool> {
        validate_name(cache)?;
        validate_key(key)?;

        let effective_ttl = ttl.unwrap_or_else(|| self.config.default_ttl());
        self.provider(cache)?.put_if_absent(key, value, effective_ttl)
    }

    /// Look up several keys at once. Pure read; a never-seen cache name
    /// yields an empty map.
    pub fn get_bulk(&self, cache: &str, keys: &[String]) -> Result<HashMap<String, Vec<u8>>> {
        validate_name(cache)?;

        match self.providers.get(cache) {
            Some(provider) => provider.get_bulk(keys),
            None => Ok(HashMap::new()),
        }
    }

    /// Names of the caches currently holding a live provider
    pub fn cache_names(&self) -> Vec<String> {
        self.providers.iter().map(|e| e.key().clone()).collect()
    }

    /// Stop the background sweep and close every provider.
    ///
    /// Waits up to a bounded grace period for an in-flight sweep, then aborts
    /// it. Individual provider close failures are logged, never propagated.
    /// Operations after close are undefined.
    pub async fn close(&self) {
        info!("Shutting down cache manager");
        let _ = self.shutdown_tx.send(true);

        let handle = self.sweeper.lock().take();
        if let Some(mut handle) = handle {
            if tokio::time::timeout(SHUTDOWN_GRACE, &mut handle).await.is_err() {
                warn!("Sweep task did not stop within grace period, aborting");
                handle.abort();
            }
        }

        for entry in self.providers.iter() {
            if let Err(e) = entry.value().close() {
                warn!("Error closing provider for cache '{}': {}", entry.key(), e);
            }
        }
        self.providers.clear();
    }

    /// Resolve the provider for `cache`, constructing it exactly once under
    /// concurrent first access.
    fn provider(&self, cache: &str) -> Result<Arc<dyn CacheProvider>> {
        if let Some(provider) = self.providers.get(cache) {
            return Ok(provider.value().clone());
        }

        match self.providers.entry(cache.to_string()) {
            Entry::Occupied(occupied) => Ok(occupied.get().clone()),
            Entry::Vacant(vacant) => {
                let provider = self.construct_provider(cache)?;
                info!(
                    "Created '{}' provider for cache '{}'",
                    provider.provider_name(),
                    cache
                );
                vacant.insert(provider.clone());
                Ok(provider)
            }
        }
    }

    fn construct_provider(&self, cache: &str) -> Result<Arc<dyn CacheProvider>> {
        let kind = self.config.backend;
        let factory = self.factories.read().get(&kind).cloned().ok_or_else(|| {
            CacheError::BackendUnavailable {
                kind,
                reason: "no constructor registered for this backend kind".to_string(),
            }
        })?;

        factory(&self.config).map_err(|e| match e {
            err @ CacheError::BackendUnavailable { .. } => err,
            err => CacheError::ProviderConstruction {
                name: cache.to_string(),
                reason: err.to_string(),
            },
        })
    }

    fn spawn_sweeper(
        providers: Arc<DashMap<String, Arc<dyn CacheProvider>>>,
        period: Duration,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        // tokio panics on a zero interval
        let period = if period.is_zero() {
            Duration::from_millis(100)
        } else {
            period
        };
        info!("Starting expiration sweep task (period={:?})", period);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                tokio::select! {
                    _ = ticker.tick() => Self::sweep(&providers),
                    _ = shutdown_rx.changed() => break,
                }
            }
            debug!("Expiration sweep task stopped");
        })
    }

    /// One sweep tick: purge expired entries in every registered provider,
    /// containing per-provider failures so one broken backend cannot stall
    /// cleanup for the rest.
    fn sweep(providers: &DashMap<String, Arc<dyn CacheProvider>>) {
        debug!("Sweeping {} caches for expired entries", providers.len());
        for entry in providers.iter() {
            match entry.value().remove_expired() {
                Ok(removed) if removed > 0 => {
                    debug!("Swept {} expired entries from cache '{}'", removed, entry.key());
                }
                Ok(_) => {}
                Err(e) => error!("Expiration sweep failed for cache '{}': {}", entry.key(), e),
            }
        }
    }
}

fn validate_name(cache: &str) -> Result<()> {
    if cache.is_empty() {
        return Err(CacheError::InvalidCacheName(
            "cache name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidKey("key cannot be empty".to_string()));
    }
    Ok(())
}
