//! Time-bounded result cache owned by a single searcher.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Map whose entries expire `ttl` after insertion.
///
/// Not shared and not synchronized: the owner mutates it through `&mut`.
/// Expired entries are evicted when looked up. A zero TTL caches nothing.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: HashMap<K, (Instant, V)>,
}

impl<K: Eq + Hash, V> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Live entry for `key`, evicting it if expired.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let expired = match self.entries.get(key) {
            Some((inserted, _)) => inserted.elapsed() >= self.ttl,
            None => return None,
        };
        if expired {
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key).map(|(_, value)| value)
    }

    pub fn insert(&mut self, key: K, value: V) {
        if self.ttl.is_zero() {
            return;
        }
        self.entries.insert(key, (Instant::now(), value));
    }

    /// Drop every expired entry.
    pub fn purge_expired(&mut self) {
        let ttl = self.ttl;
        self.entries.retain(|_, (inserted, _)| inserted.elapsed() < ttl);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_hit_within_ttl() {
        let mut cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("gdp", 3);
        assert_eq!(cache.get(&"gdp"), Some(&3));
        assert_eq!(cache.get(&"cpi"), None);
    }

    #[test]
    fn test_expired_entry_evicted() {
        let mut cache = TtlCache::new(Duration::from_millis(10));
        cache.insert("gdp", 3);
        thread::sleep(Duration::from_millis(30));
        assert_eq!(cache.get(&"gdp"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_ttl_caches_nothing() {
        let mut cache = TtlCache::new(Duration::ZERO);
        cache.insert("gdp", 3);
        assert!(cache.is_empty());
        assert_eq!(cache.get(&"gdp"), None);
    }
}
