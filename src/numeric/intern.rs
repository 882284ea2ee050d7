// ============================================================================
// Intern Cache
// Bounded, process-wide sharing of frequently constructed values
// ============================================================================
//
// The cache only saves allocations. It promises no identity: two threads
// missing at the same time may both build a value, and once the cache is
// full new values are simply allocated without being remembered. Nothing is
// ever evicted, so the capacity bounds memory use.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Default number of entries kept by an intern cache.
pub const DEFAULT_INTERN_CAPACITY: usize = 1024;

/// Bounded map from canonical text to a shared value.
pub struct InternCache<V> {
    entries: RwLock<HashMap<String, V>>,
    capacity: AtomicUsize,
}

impl<V: Clone> InternCache<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            capacity: AtomicUsize::new(capacity),
        }
    }

    /// Return the cached value for `key`, or build it with `make`.
    ///
    /// Build failures are returned as-is and never cached.
    pub fn get_or_try_insert<E>(
        &self,
        key: &str,
        make: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        if let Some(value) = self.entries.read().get(key) {
            return Ok(value.clone());
        }

        let value = make()?;
        let mut entries = self.entries.write();
        if entries.len() < self.capacity() {
            entries
                .entry(key.to_string())
                .or_insert_with(|| value.clone());
        } else if entries.len() == self.capacity() && !entries.contains_key(key) {
            tracing::debug!(capacity = self.capacity(), "intern cache is full");
        }
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity.load(Ordering::Relaxed)
    }

    /// Change the bound. Entries above a lowered bound are dropped.
    pub fn set_capacity(&self, capacity: usize) {
        self.capacity.store(capacity, Ordering::Relaxed);
        let mut entries = self.entries.write();
        if entries.len() > capacity {
            entries.clear();
        }
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl<V: Clone> Default for InternCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_INTERN_CAPACITY)
    }
}
