use std::{collections::HashMap, future::Future, hash::Hash, sync::RwLock};

/// An in-memory cache of query results keyed by query parameters.
///
/// Only successful results are stored. The lock is never held across an
/// `.await`, so two concurrent misses for the same key may both run the query.
#[derive(Debug)]
pub struct QueryCache<K, V> {
    entries: RwLock<HashMap<K, V>>,
}

impl<K, V> Default for QueryCache<K, V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash, V: Clone> QueryCache<K, V> {
    /// Create a cache pre-populated with `entries`.
    pub fn with_entries(entries: impl IntoIterator<Item = (K, V)>) -> Self {
        Self {
            entries: RwLock::new(entries.into_iter().collect()),
        }
    }

    /// Get a cached value.
    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.read().ok()?.get(key).cloned()
    }

    /// Insert a value.
    pub fn insert(&self, key: K, value: V) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key, value);
        }
    }

    /// Get the cached value for `key`, or run `query` and cache its result.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: K, query: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }
        let value = query().await?;
        self.insert(key, value.clone());
        Ok(value)
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Returns whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every entry.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }
}
