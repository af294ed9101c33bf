//! Time-bounded memoization of gateway responses.
//!
//! Slow-changing remote data (agreement texts) is stored in a
//! [`CacheBackend`] under a composite key built by [`cache_key`].
//! [`ResponseCache::get_or_fetch`] serves fresh entries and falls through to
//! the remote call on a miss.
//!
//! Concurrent callers racing on the same cold key may both reach the
//! gateway; the fetch is idempotent and no lock is taken around it.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//!
//! use bluepayment_client::cache::{AGREEMENTS_CACHE_TAG, CacheBackend, MemoryCache, cache_key};
//!
//! let key = cache_key(AGREEMENTS_CACHE_TAG, "100", "1500", "pl_PL").unwrap();
//! assert_eq!(key, "agreements_100_1500_pl_PL");
//!
//! let cache = MemoryCache::default();
//! cache.save(b"[]", &key, &[AGREEMENTS_CACHE_TAG], Duration::from_secs(900)).unwrap();
//! assert!(cache.test(&key));
//! ```

mod clock;
mod memory;
mod response;

use std::{sync::Arc, time::Duration};

pub use clock::{Clock, ManualClock, SystemClock};
pub use memory::{DEFAULT_CAPACITY, MemoryCache};
pub use response::{AGREEMENTS_CACHE_TAG, AGREEMENTS_TTL, FailurePolicy, ResponseCache};

use crate::error::{GatewayError, Result};

/// Generic key-value store with per-entry TTL and tags.
///
/// Implementations must never report an entry as present once its TTL has
/// elapsed.
pub trait CacheBackend: Send + Sync {
    /// Returns true if `key` exists and has not expired.
    fn test(&self, key: &str) -> bool;

    /// Returns the payload stored under `key` if it has not expired.
    fn load(&self, key: &str) -> Option<Vec<u8>>;

    /// Stores `payload` under `key` for `ttl`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Cache`] if the backend cannot store the entry.
    fn save(&self, payload: &[u8], key: &str, tags: &[&str], ttl: Duration) -> Result<()>;

    /// Removes `key`, returning true if it was present.
    fn remove(&self, key: &str) -> bool;

    /// Removes every entry carrying `tag`, returning how many were removed.
    fn clean_tag(&self, tag: &str) -> usize;
}

impl<T: CacheBackend + ?Sized> CacheBackend for Arc<T> {
    fn test(&self, key: &str) -> bool {
        (**self).test(key)
    }

    fn load(&self, key: &str) -> Option<Vec<u8>> {
        (**self).load(key)
    }

    fn save(&self, payload: &[u8], key: &str, tags: &[&str], ttl: Duration) -> Result<()> {
        (**self).save(payload, key, tags, ttl)
    }

    fn remove(&self, key: &str) -> bool {
        (**self).remove(key)
    }

    fn clean_tag(&self, tag: &str) -> usize {
        (**self).clean_tag(tag)
    }
}

/// Builds `<namespace>_<service_id>_<gateway_id>_<locale>`.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidInput`] if any segment is blank.
pub fn cache_key(namespace: &str, service_id: &str, gateway_id: &str, locale: &str) -> Result<String> {
    let segments = [
        ("namespace", namespace),
        ("service_id", service_id),
        ("gateway_id", gateway_id),
        ("locale", locale),
    ];

    if let Some((name, _)) = segments.iter().find(|(_, value)| value.trim().is_empty()) {
        return Err(GatewayError::InvalidInput(format!("cache key segment {name} is empty")));
    }

    Ok(segments.map(|(_, value)| value).join("_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_composition() {
        assert_eq!(cache_key("agreements", "100", "1500", "en_US").unwrap(), "agreements_100_1500_en_US");
    }

    #[test]
    fn test_cache_key_rejects_empty_segments() {
        assert!(matches!(
            cache_key("agreements", "", "1500", "pl_PL"),
            Err(GatewayError::InvalidInput(ref msg)) if msg.contains("service_id")
        ));
        assert!(cache_key("agreements", "100", " ", "pl_PL").is_err());
        assert!(cache_key("agreements", "100", "1500", "").is_err());
        assert!(cache_key("", "100", "1500", "pl_PL").is_err());
    }

    #[test]
    fn test_arc_backend_shares_entries() {
        let cache = Arc::new(MemoryCache::default());
        let dyn_cache: Arc<dyn CacheBackend> = cache.clone();

        dyn_cache.save(b"x", "k", &[], Duration::from_secs(60)).unwrap();
        assert!(cache.test("k"));
        assert!(dyn_cache.remove("k"));
        assert!(!cache.test("k"));
    }
}
