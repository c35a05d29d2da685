use std::{
    collections::HashMap,
    fmt,
    sync::RwLock,
    time::{Duration, Instant},
};

/// Key/value store with optional expiry.
pub trait Cache<T: Clone>: fmt::Debug + Send + Sync {
    fn get(&self, key: &str) -> Option<T>;

    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Store `value`; `ttl` of `None` never expires.
    fn set(&self, key: &str, value: T, ttl: Option<Duration>);

    fn forget(&self, key: &str);

    fn flush(&self);
}

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    expires: Option<Instant>,
}

impl<T> Entry<T> {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires.is_some_and(|at| at <= now)
    }
}

/// In-process cache. Expired entries are dropped on access.
#[derive(Debug)]
pub struct MemoryCache<T> {
    store: RwLock<HashMap<String, Entry<T>>>,
}

impl<T> Default for MemoryCache<T> {
    fn default() -> Self {
        MemoryCache {
            store: RwLock::new(HashMap::new()),
        }
    }
}

impl<T> MemoryCache<T> {
    pub fn new() -> Self {
        MemoryCache::default()
    }

    pub fn len(&self) -> usize {
        self.store.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + fmt::Debug + Send + Sync> Cache<T> for MemoryCache<T> {
    fn get(&self, key: &str) -> Option<T> {
        let now = Instant::now();
        {
            let store = self.store.read().ok()?;
            match store.get(key) {
                None => return None,
                Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
                Some(_) => {}
            }
        }
        self.forget(key);
        None
    }

    fn set(&self, key: &str, value: T, ttl: Option<Duration>) {
        if let Ok(mut store) = self.store.write() {
            let expires = ttl.map(|ttl| Instant::now() + ttl);
            store.insert(key.to_string(), Entry { value, expires });
        }
    }

    fn forget(&self, key: &str) {
        if let Ok(mut store) = self.store.write() {
            store.remove(key);
        }
    }

    fn flush(&self) {
        if let Ok(mut store) = self.store.write() {
            store.clear();
        }
    }
}

/// Cache that stores nothing; used when caching is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCache;

impl<T: Clone> Cache<T> for NullCache {
    fn get(&self, _key: &str) -> Option<T> {
        None
    }

    fn set(&self, _key: &str, _value: T, _ttl: Option<Duration>) {}

    fn forget(&self, _key: &str) {}

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_expire() {
        let cache = MemoryCache::new();
        cache.set("kept", 1, None);
        cache.set("gone", 2, Some(Duration::ZERO));

        assert_eq!(cache.get("kept"), Some(1));
        assert_eq!(cache.get("gone"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn forget_and_flush() {
        let cache = MemoryCache::new();
        cache.set("a", "x".to_string(), None);
        cache.set("b", "y".to_string(), None);

        cache.forget("a");
        assert!(!cache.has("a"));
        assert!(cache.has("b"));

        cache.flush();
        assert!(cache.is_empty());
    }

    #[test]
    fn null_cache_stores_nothing() {
        let cache = NullCache;
        Cache::<i32>::set(&cache, "a", 1, None);
        assert_eq!(Cache::<i32>::get(&cache, "a"), None);
    }
}
