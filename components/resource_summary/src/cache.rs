//! Computed artifact caching
//!
//! Bounded map from canonical input keys to computed values with:
//! - LRU (Least Recently Used) eviction policy
//! - Hit/miss/eviction statistics
//! - Thread-safe access

use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Default maximum number of cached artifacts
pub const DEFAULT_CACHE_CAPACITY: usize = 64;

/// Statistics about cache usage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of entries evicted
    pub evictions: u64,
    /// Current cache size
    pub size: usize,
}

impl CacheStats {
    /// Calculate hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

#[derive(Debug)]
struct CacheState<V> {
    entries: HashMap<String, V>,
    /// Most recent at back
    lru_order: VecDeque<String>,
}

/// LRU cache of computed artifacts keyed by canonical input
#[derive(Debug)]
pub struct ArtifactCache<V> {
    state: RwLock<CacheState<V>>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl<V: Clone> ArtifactCache<V> {
    /// Create a cache with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Create a cache holding at most `capacity` entries (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: RwLock::new(CacheState {
                entries: HashMap::new(),
                lru_order: VecDeque::new(),
            }),
            capacity: capacity.max(1),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Look up a key, marking it most recently used
    pub fn get(&self, key: &str) -> Option<V> {
        let mut state = self.state.write();
        match state.entries.get(key).cloned() {
            Some(value) => {
                touch(&mut state.lru_order, key);
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(value)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Insert or replace a value, evicting the least recently used entry when full
    pub fn insert(&self, key: String, value: V) {
        let mut state = self.state.write();
        self.insert_locked(&mut state, key, value);
    }

    /// Return the cached value for `key`, inserting `make()` on a miss
    ///
    /// `make` runs under the cache lock and must not call back into the cache.
    pub fn get_or_insert_with(&self, key: &str, make: impl FnOnce() -> V) -> V {
        let (value, existed) = self.slot(key, make);
        if existed {
            self.record_hit();
        } else {
            self.record_miss();
        }
        value
    }

    /// Like [`ArtifactCache::get_or_insert_with`] but leaves the statistics
    /// alone; the second element tells whether the entry already existed.
    ///
    /// For values that are placeholders for a result computed later, the
    /// caller records the hit or miss once it knows whether the result was
    /// ready.
    pub fn slot(&self, key: &str, make: impl FnOnce() -> V) -> (V, bool) {
        let mut state = self.state.write();
        if let Some(value) = state.entries.get(key).cloned() {
            touch(&mut state.lru_order, key);
            return (value, true);
        }
        let value = make();
        self.insert_locked(&mut state, key.to_string(), value.clone());
        (value, false)
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    fn insert_locked(&self, state: &mut CacheState<V>, key: String, value: V) {
        if !state.entries.contains_key(&key) && state.entries.len() >= self.capacity {
            if let Some(oldest) = state.lru_order.pop_front() {
                debug!("Evicting LRU artifact: {}", abbreviate(&oldest));
                state.entries.remove(&oldest);
                self.evictions.fetch_add(1, Ordering::Relaxed);
            }
        }
        touch(&mut state.lru_order, &key);
        state.entries.insert(key, value);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.state.read().entries.contains_key(key)
    }

    pub fn remove(&self, key: &str) -> Option<V> {
        let mut state = self.state.write();
        let removed = state.entries.remove(key);
        if removed.is_some() {
            state.lru_order.retain(|k| k != key);
        }
        removed
    }

    /// Clear the entire cache
    pub fn clear(&self) {
        debug!("Clearing artifact cache");
        let mut state = self.state.write();
        state.entries.clear();
        state.lru_order.clear();
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            size: self.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().entries.is_empty()
    }
}

impl<V: Clone> Default for ArtifactCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

fn touch(lru_order: &mut VecDeque<String>, key: &str) {
    lru_order.retain(|k| k != key);
    lru_order.push_back(key.to_string());
}

/// Keys are serialized inputs and can be large
fn abbreviate(key: &str) -> &str {
    match key.char_indices().nth(64) {
        Some((end, _)) => &key[..end],
        None => key,
    }
}
