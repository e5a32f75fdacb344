use std::collections::HashMap;

/// A plain memo of computed results keyed by string.
///
/// Once a key is present its value is returned as is, even if whatever it was
/// computed from has changed since. Nothing evicts entries automatically;
/// callers drop them with [`QueryCache::invalidate`] or [`QueryCache::clear`].
///
/// # Issues
/// - Results are kept for the lifetime of the cache, so memory grows with every
/// distinct key ever requested.
#[derive(Debug)]
pub struct QueryCache<V> {
    entries: HashMap<String, V>,
}

impl<V: Clone> QueryCache<V> {
    pub fn new() -> QueryCache<V> {
        QueryCache {
            entries: HashMap::new(),
        }
    }

    pub fn get<F>(&mut self, key: &str, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        //! Return the value stored under `key`, computing and storing it first
        //! if the key is unknown.

        if let Some(value) = self.entries.get(key) {
            log::debug!("cache hit for {}", key);
            return value.clone();
        }

        log::debug!("cache miss for {}", key);
        let value = compute();
        self.entries.insert(key.to_string(), value.clone());
        value
    }

    pub fn invalidate(&mut self, key: &str) -> Option<V> {
        self.entries.remove(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone> Default for QueryCache<V> {
    fn default() -> Self {
        QueryCache::new()
    }
}
