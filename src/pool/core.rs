use crate::errors::PoolError;
use crate::pool::config::PoolConfig;
use crate::pool::metrics::{PoolMetrics, PoolMetricsSnapshot};
use crate::pool::sweeper::{self, Lifecycle};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// TTLs are capped so the expiry-instant arithmetic cannot overflow.
const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// A stored value plus the absolute instant after which it is eligible for
/// removal by the sweeper.
#[derive(Debug, Clone)]
pub(crate) struct Entry<V> {
    pub value: V,
    pub expires_at: Instant,
}

impl<V> Entry<V> {
    fn new(value: V, ttl: Duration) -> Self {
        Self { value, expires_at: Instant::now() + ttl.min(MAX_TTL) }
    }
}

/// Insertion-ordered key-value storage. The deque mirrors the map's key set
/// and holds first-insert order; overwriting a live key does not move it.
pub(crate) struct Storage<K, V> {
    entries: HashMap<K, Entry<V>>,
    order: VecDeque<K>,
}

impl<K, V> Storage<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn new() -> Self {
        Self { entries: HashMap::new(), order: VecDeque::new() }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    fn get(&self, key: &K) -> Option<&Entry<V>> {
        self.entries.get(key)
    }

    fn insert(&mut self, key: K, entry: Entry<V>) {
        if self.entries.insert(key.clone(), entry).is_none() {
            self.order.push_back(key);
        }
    }

    fn remove(&mut self, key: &K) -> Option<Entry<V>> {
        let removed = self.entries.remove(key)?;
        self.order.retain(|k| k != key);
        Some(removed)
    }

    fn pop_last(&mut self) -> Option<(K, Entry<V>)> {
        let key = self.order.pop_back()?;
        let entry = self.entries.remove(&key)?;
        Some((key, entry))
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    fn keys(&self) -> Vec<K> {
        self.order.iter().cloned().collect()
    }

    fn pairs(&self) -> Vec<(K, V)> {
        self.order
            .iter()
            .filter_map(|k| self.entries.get(k).map(|e| (k.clone(), e.value.clone())))
            .collect()
    }

    /// Deletes every entry whose expiry is strictly earlier than `now`.
    /// Returns the number deleted.
    pub(crate) fn sweep(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at >= now);
        if self.entries.len() != before {
            self.order.retain(|k| self.entries.contains_key(k));
        }
        before - self.entries.len()
    }
}

/// State shared between every pool handle and the sweeper worker.
pub(crate) struct PoolInner<K, V> {
    storage: Mutex<Storage<K, V>>,
    max_size: usize,
    default_ttl: Duration,
    sweep_interval: Duration,
    metrics: PoolMetrics,
    lifecycle: Arc<Lifecycle>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl<K, V> PoolInner<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// One sweep pass: remove expired entries under the lock, account for
    /// them after it is released.
    pub(crate) fn sweep_once(&self) -> usize {
        let removed = self.storage.lock().sweep(Instant::now());
        self.metrics.sweep_ticks.fetch_add(1, Ordering::Relaxed);
        if removed > 0 {
            self.metrics.swept.fetch_add(removed as u64, Ordering::Relaxed);
            log::debug!("entries expired: {removed}");
        }
        removed
    }
}

impl<K, V> Drop for PoolInner<K, V> {
    fn drop(&mut self) {
        // Last handle gone: wake the worker so it can observe the dead Weak
        // and exit. The worker is not joined here; it may be the thread
        // running this drop.
        self.lifecycle.stop();
    }
}

/// A thread-safe map with a maximum size whose entries are deleted after a
/// delay.
///
/// The pool behaves like an insertion-ordered dictionary with two extra
/// contracts: inserting a *new* key into a pool already holding `max_size`
/// entries fails with [`PoolError::Full`], and every entry carries a TTL
/// after which a background sweeper physically deletes it. Lookups do not
/// consult the TTL, so an expired entry stays visible until the next sweep.
///
/// Handles are cheap to clone and share one underlying pool. The sweeper is
/// owned by the pool: it starts at construction and exits when [`stop`] is
/// called or every handle is dropped.
///
/// ```
/// use timedpool::TimedPool;
///
/// let pool: TimedPool<String, i32> = TimedPool::new();
/// pool.set("answer".into(), 42)?;
/// assert_eq!(pool.get(&"answer".into())?, 42);
/// pool.stop();
/// # Ok::<(), timedpool::PoolError>(())
/// ```
///
/// [`stop`]: TimedPool::stop
pub struct TimedPool<K, V> {
    inner: Arc<PoolInner<K, V>>,
}

impl<K, V> Clone for TimedPool<K, V> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<K, V> TimedPool<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    /// Creates a pool with the default configuration and starts its sweeper.
    pub fn new() -> Self {
        Self::with_config(PoolConfig::default())
    }

    /// Creates a pool with the provided configuration and starts its sweeper.
    pub fn with_config(config: PoolConfig) -> Self {
        let inner = Arc::new(PoolInner {
            storage: Mutex::new(Storage::new()),
            max_size: config.max_size,
            default_ttl: config.default_ttl,
            sweep_interval: config.sweep_interval,
            metrics: PoolMetrics::default(),
            lifecycle: Arc::new(Lifecycle::new()),
            worker: Mutex::new(None),
        });
        let worker = sweeper::spawn(
            Arc::downgrade(&inner),
            Arc::clone(&inner.lifecycle),
            config.sweep_interval,
        );
        *inner.worker.lock() = Some(worker);
        Self { inner }
    }

    /// Creates a pool and populates it from `initial` in iteration order,
    /// using the default TTL. Pairs rejected for capacity are silently
    /// dropped.
    pub fn with_initial<I>(config: PoolConfig, initial: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let pool = Self::with_config(config);
        for (key, value) in initial {
            let _ = pool.set(key, value);
        }
        pool
    }

    /// Creates a pool holding every key from `keys` mapped to a clone of
    /// `value`, with the default TTL. Unlike [`with_initial`], capacity
    /// overflow propagates.
    ///
    /// [`with_initial`]: TimedPool::with_initial
    pub fn from_keys<I>(config: PoolConfig, keys: I, value: V) -> Result<Self, PoolError>
    where
        I: IntoIterator<Item = K>,
    {
        let pool = Self::with_config(config);
        for key in keys {
            pool.set(key, value.clone())?;
        }
        Ok(pool)
    }

    /// Inserts or overwrites a key-value pair with the default TTL.
    pub fn set(&self, key: K, value: V) -> Result<(), PoolError> {
        self.set_with_ttl(key, value, self.inner.default_ttl)
    }

    /// Inserts or overwrites a key-value pair with an explicit TTL.
    ///
    /// A new key is admitted only while the pool holds fewer than `max_size`
    /// entries; otherwise nothing is mutated and [`PoolError::Full`] is
    /// returned. Overwriting a live key always succeeds and resets both the
    /// value and the expiry; its position in iteration order is kept.
    pub fn set_with_ttl(&self, key: K, value: V, ttl: Duration) -> Result<(), PoolError> {
        {
            let mut storage = self.inner.storage.lock();
            if !storage.contains(&key) && storage.len() >= self.inner.max_size {
                return Err(PoolError::Full { max_size: self.inner.max_size });
            }
            storage.insert(key, Entry::new(value, ttl));
        }
        self.inner.metrics.inserts.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Returns a clone of the value stored under `key`.
    ///
    /// Expiry is not consulted: an expired entry that the sweeper has not
    /// yet deleted is still returned.
    pub fn get(&self, key: &K) -> Result<V, PoolError> {
        let value = self.inner.storage.lock().get(key).map(|e| e.value.clone());
        match value {
            Some(value) => {
                self.inner.metrics.hits.fetch_add(1, Ordering::Relaxed);
                Ok(value)
            }
            None => {
                self.inner.metrics.misses.fetch_add(1, Ordering::Relaxed);
                Err(PoolError::NotFound)
            }
        }
    }

    /// Returns the value stored under `key`, or `default` if absent.
    pub fn get_or(&self, key: &K, default: V) -> V {
        self.get(key).unwrap_or(default)
    }

    /// Membership test against current map contents, independent of expiry
    /// state.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.storage.lock().contains(key)
    }

    /// Removes the entry under `key` and returns its value.
    pub fn remove(&self, key: &K) -> Result<V, PoolError> {
        let removed = self.inner.storage.lock().remove(key);
        match removed {
            Some(entry) => {
                self.inner.metrics.removes.fetch_add(1, Ordering::Relaxed);
                Ok(entry.value)
            }
            None => Err(PoolError::NotFound),
        }
    }

    /// Removes and returns the value under `key`; alias of [`remove`] with
    /// dictionary naming.
    ///
    /// [`remove`]: TimedPool::remove
    pub fn pop(&self, key: &K) -> Result<V, PoolError> {
        self.remove(key)
    }

    /// Removes and returns the value under `key`, or `default` if absent.
    pub fn pop_or(&self, key: &K, default: V) -> V {
        self.remove(key).unwrap_or(default)
    }

    /// Removes and returns the most recently inserted entry, or `None` when
    /// the pool is empty.
    pub fn pop_last(&self) -> Option<(K, V)> {
        let popped = self.inner.storage.lock().pop_last();
        popped.map(|(key, entry)| {
            self.inner.metrics.removes.fetch_add(1, Ordering::Relaxed);
            (key, entry.value)
        })
    }

    /// Number of entries currently in the map, including expired entries the
    /// sweeper has not yet deleted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.storage.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes all entries unconditionally.
    pub fn clear(&self) {
        self.inner.storage.lock().clear();
    }

    /// Snapshot of keys in insertion order. The returned `Vec` iterates both
    /// ways for reverse traversal.
    #[must_use]
    pub fn keys(&self) -> Vec<K> {
        self.inner.storage.lock().keys()
    }

    /// Snapshot of key-value pairs in insertion order.
    #[must_use]
    pub fn entries(&self) -> Vec<(K, V)> {
        self.inner.storage.lock().pairs()
    }

    /// Runs one sweep on the calling thread. Returns the number of entries
    /// deleted.
    pub fn sweep_now(&self) -> usize {
        self.inner.sweep_once()
    }

    /// Stops the background sweeper and waits for it to exit.
    ///
    /// After this returns no further sweeps occur; the map is left as-is and
    /// the pool stays usable. Calling `stop` again is a no-op.
    pub fn stop(&self) {
        self.inner.lifecycle.stop();
        let worker = self.inner.worker.lock().take();
        if let Some(handle) = worker {
            let _ = handle.join();
        }
    }

    /// Capacity ceiling this pool was built with.
    #[must_use]
    pub fn max_size(&self) -> usize {
        self.inner.max_size
    }

    /// TTL applied by inserts that do not carry their own.
    #[must_use]
    pub fn default_ttl(&self) -> Duration {
        self.inner.default_ttl
    }

    /// Pause between background sweeps.
    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        self.inner.sweep_interval
    }

    /// Get a snapshot of metrics.
    pub fn metrics_snapshot(&self) -> PoolMetricsSnapshot {
        self.inner.metrics.snapshot()
    }
}

impl<K, V> Default for TimedPool<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
