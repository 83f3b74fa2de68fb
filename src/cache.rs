//! In-memory response cache with pluggable expiry and time source.
//!
//! Entries are never purged proactively: a stale entry stays in the map
//! until the next miss on its key overwrites it.

use parking_lot::RwLock;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
#[cfg(test)]
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset: parking_lot::Mutex<Duration>,
}

#[cfg(test)]
impl ManualClock {
    pub fn new() -> Self {
        Self { origin: Instant::now(), offset: parking_lot::Mutex::new(Duration::ZERO) }
    }

    pub fn advance(&self, by: Duration) {
        *self.offset.lock() += by;
    }
}

#[cfg(test)]
impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + *self.offset.lock()
    }
}

/// Decides whether an entry of a given age may still be served.
pub trait ExpiryPolicy: Send + Sync {
    fn is_fresh(&self, age: Duration) -> bool;
}

#[derive(Debug, Clone, Copy)]
pub struct FixedTtl(pub Duration);

impl Default for FixedTtl {
    fn default() -> Self {
        FixedTtl(DEFAULT_TTL)
    }
}

impl ExpiryPolicy for FixedTtl {
    fn is_fresh(&self, age: Duration) -> bool {
        age < self.0
    }
}

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    written_at: Instant,
}

pub struct TtlCache<K, V> {
    entries: RwLock<HashMap<K, Entry<V>>>,
    policy: Arc<dyn ExpiryPolicy>,
    clock: Arc<dyn Clock>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(policy: Arc<dyn ExpiryPolicy>, clock: Arc<dyn Clock>) -> Self {
        Self { entries: RwLock::new(HashMap::new()), policy, clock }
    }

    /// Returns the cached value if it is still fresh.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        let entries = self.entries.read();
        entries
            .get(key)
            .filter(|e| self.policy.is_fresh(now.saturating_duration_since(e.written_at)))
            .map(|e| e.value.clone())
    }

    pub fn put(&self, key: K, value: V) {
        let written_at = self.clock.now();
        self.entries.write().insert(key, Entry { value, written_at });
    }

    /// Serves a fresh hit, otherwise computes, stores and returns a new value.
    pub fn get_or_insert_with(&self, key: K, compute: impl FnOnce() -> V) -> V {
        if let Some(hit) = self.get(&key) {
            return hit;
        }
        let value = compute();
        self.put(key, value.clone());
        value
    }

    /// Number of stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl<K, V> std::fmt::Debug for TtlCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache").field("entries", &self.entries.read().len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn cache_with_clock() -> (TtlCache<String, f64>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let cache = TtlCache::new(Arc::new(FixedTtl::default()), clock.clone());
        (cache, clock)
    }

    #[test]
    fn fresh_until_ttl_then_recomputed() {
        let (cache, clock) = cache_with_clock();
        let calls = AtomicUsize::new(0);
        let compute = || {
            calls.fetch_add(1, Ordering::SeqCst);
            225.0
        };

        assert_eq!(cache.get_or_insert_with("51.5,-0.1".into(), compute), 225.0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        clock.advance(Duration::from_secs(299));
        assert_eq!(cache.get("51.5,-0.1"), Some(225.0));
        cache.get_or_insert_with("51.5,-0.1".into(), compute);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        clock.advance(Duration::from_secs(2));
        assert_eq!(cache.get("51.5,-0.1"), None);
        cache.get_or_insert_with("51.5,-0.1".into(), compute);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn stale_exactly_at_ttl() {
        let (cache, clock) = cache_with_clock();
        cache.put("k".into(), 1.0);
        clock.advance(DEFAULT_TTL);
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn stale_entries_are_kept_until_overwritten() {
        let (cache, clock) = cache_with_clock();
        cache.put("a".into(), 1.0);
        clock.advance(Duration::from_secs(600));
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.len(), 1);

        cache.put("a".into(), 2.0);
        assert_eq!(cache.get("a"), Some(2.0));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn keys_are_independent() {
        let (cache, clock) = cache_with_clock();
        cache.put("a".into(), 1.0);
        clock.advance(Duration::from_secs(200));
        cache.put("b".into(), 2.0);
        clock.advance(Duration::from_secs(200));
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2.0));
    }

    struct NeverFresh;

    impl ExpiryPolicy for NeverFresh {
        fn is_fresh(&self, _age: Duration) -> bool {
            false
        }
    }

    #[test]
    fn policy_is_pluggable() {
        let cache: TtlCache<&str, u8> = TtlCache::new(Arc::new(NeverFresh), Arc::new(SystemClock));
        cache.put("x", 7);
        assert_eq!(cache.get("x"), None);
    }
}
