//! Bounded associative cache with least-recently-used eviction.
//!
//! [`LruCache`] memoizes expensive computations — in Trellis, per-cell
//! formatting in the data grid — under a fixed capacity. Eviction is
//! deterministic: the least recently *used* entry goes first, and a lookup
//! counts as a use, so recency ties can only arise from insertion order.
//!
//! # Example
//!
//! ```
//! use trellis_core::LruCache;
//!
//! let mut cache = LruCache::new(2);
//! cache.put("a", 1);
//! cache.put("b", 2);
//! cache.put("c", 3); // evicts "a"
//!
//! assert_eq!(cache.get(&"a"), None);
//! assert_eq!(cache.get(&"b"), Some(&2));
//! ```

use std::collections::HashMap;
use std::hash::Hash;

use tracing::error;

/// Default capacity for caches created with [`LruCache::default_capacity`].
///
/// Sized for a formatted-cell cache: a few screens' worth of rows across a
/// typical column count.
pub const DEFAULT_CAPACITY: usize = 4096;

/// A bounded key-value store with least-recently-used eviction.
///
/// `get` refreshes an entry's recency; `put` beyond capacity evicts the least
/// recently used entry. The structure is used only from the UI-thread render
/// path, so it takes `&mut self` and carries no internal locking.
pub struct LruCache<K, V> {
    map: HashMap<K, V>,
    /// Keys ordered least-recently-used first.
    order: Vec<K>,
    capacity: usize,
}

impl<K: Eq + Hash + Clone, V> LruCache<K, V> {
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// A capacity of zero is clamped to one so `put` always retains the entry
    /// it just inserted.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            map: HashMap::with_capacity(capacity),
            order: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Creates a cache with [`DEFAULT_CAPACITY`].
    pub fn default_capacity() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    /// Returns the configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Looks up a value, refreshing the entry's recency on a hit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        if !self.map.contains_key(key) {
            return None;
        }
        self.touch(key);
        self.map.get(key)
    }

    /// Looks up a value without refreshing recency.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.map.get(key)
    }

    /// Inserts a value, evicting the least-recently-used entry if the cache
    /// is at capacity. Re-inserting an existing key replaces its value and
    /// refreshes its recency.
    pub fn put(&mut self, key: K, value: V) {
        if self.map.insert(key.clone(), value).is_some() {
            self.touch(&key);
            return;
        }

        if self.map.len() > self.capacity {
            if let Some(oldest) = self.order.first().cloned() {
                self.order.remove(0);
                self.map.remove(&oldest);
            }
        }
        self.order.push(key);

        self.check_coherence();
    }

    /// Removes every entry whose key matches `predicate`.
    ///
    /// Used when a formatter changes or a row is updated, so stale formatted
    /// values are never served.
    pub fn invalidate<F>(&mut self, predicate: F)
    where
        F: Fn(&K) -> bool,
    {
        self.map.retain(|k, _| !predicate(k));
        self.order.retain(|k| !predicate(k));
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.map.clear();
        self.order.clear();
    }

    /// Moves `key` to the most-recently-used position.
    fn touch(&mut self, key: &K) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            let k = self.order.remove(pos);
            self.order.push(k);
        }
    }

    /// Detects divergence between the map and the recency list.
    ///
    /// This is an internal invariant violation that should never occur under
    /// correct use. Rather than serving wrong entries or propagating an error
    /// into the render path, the cache logs the corruption and rebuilds
    /// itself empty.
    fn check_coherence(&mut self) {
        if self.map.len() != self.order.len() {
            error!(
                target: "trellis_core::cache",
                map_len = self.map.len(),
                order_len = self.order.len(),
                "cache corruption detected; clearing and rebuilding"
            );
            self.clear();
        }
    }
}
