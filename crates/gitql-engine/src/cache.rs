//! Bounded least-recently-used cache.
//!
//! Used to remember resolved owners and repositories across queries so the
//! same `FROM` target is looked up once per session.

use std::collections::HashMap;
use std::hash::Hash;

/// Default number of entries kept by a resolution cache.
pub const DEFAULT_CAPACITY: usize = 128;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    last_access: u64,
}

/// A fixed-capacity map that evicts the least recently used entry when full.
///
/// Recency is tracked with a monotonically increasing access counter; eviction
/// scans for the smallest counter, which is fine for the small capacities used
/// here.
#[derive(Debug, Clone)]
pub struct LruCache<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    capacity: usize,
    access_counter: u64,
    hits: u64,
    misses: u64,
}

impl<K: Eq + Hash + Clone, V> LruCache<K, V> {
    /// Creates a cache holding at most `capacity` entries (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
            access_counter: 0,
            hits: 0,
            misses: 0,
        }
    }

    /// Looks up `key`, marking it as most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.access_counter += 1;
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.last_access = self.access_counter;
                self.hits += 1;
                Some(&entry.value)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Inserts or replaces `key`. Evicts the least recently used entry when a
    /// new key would exceed the capacity.
    pub fn insert(&mut self, key: K, value: V) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict_lru();
        }

        self.access_counter += 1;
        self.entries.insert(
            key,
            CacheEntry {
                value,
                last_access: self.access_counter,
            },
        );
    }

    fn evict_lru(&mut self) {
        let lru_key = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_access)
            .map(|(key, _)| key.clone());

        if let Some(key) = lru_key {
            self.entries.remove(&key);
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `(hits, misses)` since creation or the last [`clear`](Self::clear).
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

impl<K: Eq + Hash + Clone, V> Default for LruCache<K, V> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
