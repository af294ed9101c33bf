//! In-process cache backend.

use std::{
    num::NonZeroUsize,
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use lru::LruCache;
use tracing::debug;

use super::{
    CacheBackend,
    clock::{Clock, SystemClock},
};
use crate::error::Result;

/// Default number of entries kept before least-recently-used eviction.
pub const DEFAULT_CAPACITY: usize = 1024;

#[derive(Debug, Clone)]
struct CacheEntry {
    payload: Vec<u8>,
    tags: Vec<String>,
    expires_at: Duration,
}

impl CacheEntry {
    fn is_fresh(&self, now: Duration) -> bool {
        now < self.expires_at
    }
}

/// Bounded in-memory [`CacheBackend`].
///
/// Expiry is lazy: an entry past its TTL is dropped the next time it is
/// tested or loaded. There is no background sweep.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use bluepayment_client::cache::{CacheBackend, MemoryCache};
///
/// let cache = MemoryCache::new(16);
/// cache.save(b"payload", "agreements_100_1_pl_PL", &["agreements"], Duration::from_secs(900)).unwrap();
///
/// assert!(cache.test("agreements_100_1_pl_PL"));
/// assert_eq!(cache.load("agreements_100_1_pl_PL").as_deref(), Some(&b"payload"[..]));
/// ```
#[derive(Debug)]
pub struct MemoryCache<C = SystemClock> {
    entries: Mutex<LruCache<String, CacheEntry>>,
    clock: C,
}

impl MemoryCache {
    /// Creates a cache holding at most `capacity` entries, on the system clock.
    ///
    /// A zero capacity falls back to [`DEFAULT_CAPACITY`].
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::with_clock(capacity, SystemClock)
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<C: Clock> MemoryCache<C> {
    /// Creates a cache that reads time from `clock`.
    #[must_use]
    pub fn with_clock(capacity: usize, clock: C) -> Self {
        let cap = NonZeroUsize::new(capacity)
            .or_else(|| NonZeroUsize::new(DEFAULT_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);
        Self { entries: Mutex::new(LruCache::new(cap)), clock }
    }

    /// Number of stored entries, including ones that expired but were not touched since.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, CacheEntry>> {
        // Entries are plain data, a panic mid-update cannot leave them half-written.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the entry for `key` if fresh, evicting it if expired.
    fn fresh_entry<'a>(
        &self,
        entries: &'a mut LruCache<String, CacheEntry>,
        key: &str,
    ) -> Option<&'a CacheEntry> {
        let now = self.clock.now();
        let expired = match entries.peek(key) {
            None => return None,
            Some(entry) => !entry.is_fresh(now),
        };

        if expired {
            debug!(key, "Evicting expired cache entry");
            entries.pop(key);
            return None;
        }

        entries.get(key)
    }
}

impl<C: Clock> CacheBackend for MemoryCache<C> {
    fn test(&self, key: &str) -> bool {
        let mut entries = self.lock();
        self.fresh_entry(&mut entries, key).is_some()
    }

    fn load(&self, key: &str) -> Option<Vec<u8>> {
        let mut entries = self.lock();
        self.fresh_entry(&mut entries, key).map(|entry| entry.payload.clone())
    }

    fn save(&self, payload: &[u8], key: &str, tags: &[&str], ttl: Duration) -> Result<()> {
        let mut entries = self.lock();
        if ttl.is_zero() {
            entries.pop(key);
            return Ok(());
        }

        let entry = CacheEntry {
            payload: payload.to_vec(),
            tags: tags.iter().map(|t| (*t).to_owned()).collect(),
            expires_at: self.clock.now().saturating_add(ttl),
        };
        entries.put(key.to_owned(), entry);
        Ok(())
    }

    fn remove(&self, key: &str) -> bool {
        self.lock().pop(key).is_some()
    }

    fn clean_tag(&self, tag: &str) -> usize {
        let mut entries = self.lock();
        let tagged: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| entry.tags.iter().any(|t| t == tag))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &tagged {
            entries.pop(key);
        }
        debug!(tag, removed = tagged.len(), "Cleaned cache tag");
        tagged.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cache::ManualClock;

    const TTL: Duration = Duration::from_secs(900);

    fn cache() -> (MemoryCache<Arc<ManualClock>>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Duration::from_secs(1_000)));
        (MemoryCache::with_clock(8, Arc::clone(&clock)), clock)
    }

    #[test]
    fn test_save_then_load() {
        let (cache, _) = cache();
        cache.save(b"{\"a\":1}", "k", &["agreements"], TTL).unwrap();

        assert!(cache.test("k"));
        assert_eq!(cache.load("k").unwrap(), b"{\"a\":1}");
    }

    #[test]
    fn test_missing_key() {
        let (cache, _) = cache();
        assert!(!cache.test("absent"));
        assert!(cache.load("absent").is_none());
    }

    #[test]
    fn test_entry_expires_at_ttl() {
        let (cache, clock) = cache();
        cache.save(b"x", "k", &[], TTL).unwrap();

        clock.advance(TTL - Duration::from_millis(1));
        assert!(cache.test("k"));

        clock.advance(Duration::from_millis(1));
        assert!(!cache.test("k"));
        assert!(cache.load("k").is_none());
    }

    #[test]
    fn test_expired_entry_is_evicted_on_access() {
        let (cache, clock) = cache();
        cache.save(b"x", "k", &[], TTL).unwrap();
        assert_eq!(cache.len(), 1);

        clock.advance(TTL);
        assert!(cache.load("k").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_ttl_is_not_stored() {
        let (cache, _) = cache();
        cache.save(b"x", "k", &[], Duration::ZERO).unwrap();
        assert!(!cache.test("k"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_save_overwrites_and_resets_ttl() {
        let (cache, clock) = cache();
        cache.save(b"old", "k", &[], TTL).unwrap();
        clock.advance(Duration::from_secs(600));
        cache.save(b"new", "k", &[], TTL).unwrap();
        clock.advance(Duration::from_secs(600));

        assert_eq!(cache.load("k").unwrap(), b"new");
    }

    #[test]
    fn test_remove() {
        let (cache, _) = cache();
        cache.save(b"x", "k", &[], TTL).unwrap();
        assert!(cache.remove("k"));
        assert!(!cache.remove("k"));
        assert!(!cache.test("k"));
    }

    #[test]
    fn test_clean_tag_only_removes_tagged() {
        let (cache, _) = cache();
        cache.save(b"1", "a", &["agreements"], TTL).unwrap();
        cache.save(b"2", "b", &["agreements", "other"], TTL).unwrap();
        cache.save(b"3", "c", &["other"], TTL).unwrap();

        assert_eq!(cache.clean_tag("agreements"), 2);
        assert!(!cache.test("a"));
        assert!(!cache.test("b"));
        assert!(cache.test("c"));
    }

    #[test]
    fn test_lru_eviction_at_capacity() {
        let cache = MemoryCache::new(2);
        cache.save(b"1", "a", &[], TTL).unwrap();
        cache.save(b"2", "b", &[], TTL).unwrap();
        assert!(cache.test("a"));
        cache.save(b"3", "c", &[], TTL).unwrap();

        assert!(cache.test("a"));
        assert!(!cache.test("b"));
        assert!(cache.test("c"));
    }

    #[test]
    fn test_zero_capacity_uses_default() {
        let cache = MemoryCache::new(0);
        cache.save(b"1", "a", &[], TTL).unwrap();
        assert!(cache.test("a"));
    }
}
