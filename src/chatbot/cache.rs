use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};

/// LRU cache with a per-entry TTL, keyed by a digest of the normalized input.
pub struct MatchCache<T> {
    cache: Mutex<LruCache<String, (T, Instant)>>,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

#[derive(Debug, Default, Clone)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
    pub hit_rate: f64,
}

impl<T> MatchCache<T> {
    pub fn new(capacity: usize, ttl_secs: u64) -> Self {
        Self {
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN),
            )),
            ttl: Duration::from_secs(ttl_secs),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn get(&self, key: &str) -> Option<T>
    where
        T: Clone,
    {
        let mut cache = self.cache.lock();
        if let Some((value, stored_at)) = cache.get(key) {
            if stored_at.elapsed() < self.ttl {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(value.clone());
            }
            cache.pop(key);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    pub fn set(&self, key: &str, value: T) {
        let mut cache = self.cache.lock();
        cache.put(key.to_string(), (value, Instant::now()));
    }

    pub fn make_key(normalized_input: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(normalized_input.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 { hits as f64 / total as f64 } else { 0.0 };

        CacheStats {
            hits,
            misses,
            size: self.cache.lock().len(),
            hit_rate,
        }
    }

    pub fn clear(&self) {
        self.cache.lock().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_and_miss_counting() {
        let cache: MatchCache<Option<String>> = MatchCache::new(4, 60);
        let key = MatchCache::<Option<String>>::make_key("hostel facilities");

        assert!(cache.get(&key).is_none());
        cache.set(&key, Some("facilities".to_string()));
        assert_eq!(cache.get(&key), Some(Some("facilities".to_string())));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 1);
        assert!((stats.hit_rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_expired_entries_miss() {
        let cache: MatchCache<u32> = MatchCache::new(4, 0);
        cache.set("k", 1);
        assert!(cache.get("k").is_none());
        assert_eq!(cache.stats().size, 0);
    }

    #[test]
    fn test_capacity_evicts_least_recent() {
        let cache: MatchCache<u32> = MatchCache::new(2, 60);
        cache.set("a", 1);
        cache.set("b", 2);
        cache.set("c", 3);
        assert!(cache.get("a").is_none());
        assert_eq!(cache.get("c"), Some(3));
    }

    #[test]
    fn test_zero_capacity_still_usable() {
        let cache: MatchCache<u32> = MatchCache::new(0, 60);
        cache.set("a", 1);
        assert_eq!(cache.get("a"), Some(1));
    }

    #[test]
    fn test_key_is_stable_digest() {
        let a = MatchCache::<u32>::make_key("library timings");
        assert_eq!(a, MatchCache::<u32>::make_key("library timings"));
        assert_ne!(a, MatchCache::<u32>::make_key("library timing"));
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_clear() {
        let cache: MatchCache<u32> = MatchCache::new(2, 60);
        cache.set("a", 1);
        cache.get("a");
        cache.clear();
        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.size), (0, 0, 0));
    }
}
