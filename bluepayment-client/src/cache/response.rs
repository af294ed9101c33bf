//! Read-through caching of remote call outcomes.

use std::time::Duration;

use tracing::{debug, instrument, warn};

use super::CacheBackend;
use crate::{client::CallOutcome, error::Result};

/// Namespace and tag for cached agreement texts.
pub const AGREEMENTS_CACHE_TAG: &str = "agreements";

/// How long agreement texts are served from cache.
pub const AGREEMENTS_TTL: Duration = Duration::from_secs(15 * 60);

/// Whether [`CallOutcome::Unavailable`] results are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Store failures like any other result, so a gateway outage is
    /// remembered for the full TTL.
    #[default]
    Cache,
    /// Only store successful outcomes; the next call retries the gateway.
    Skip,
}

/// Read-through cache in front of a [`CacheBackend`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use bluepayment_client::{
///     cache::{MemoryCache, ResponseCache},
///     client::CallOutcome,
/// };
///
/// # async fn example() -> bluepayment_client::Result<()> {
/// let cache = ResponseCache::new(MemoryCache::default());
///
/// let outcome = cache
///     .get_or_fetch("agreements_100_1500_pl_PL", Duration::from_secs(900), &["agreements"], || async {
///         Ok(CallOutcome::Unavailable)
///     })
///     .await?;
/// assert!(!outcome.is_success());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ResponseCache<B> {
    backend: B,
    failure_policy: FailurePolicy,
}

impl<B: CacheBackend> ResponseCache<B> {
    /// Wraps `backend` with the default [`FailurePolicy::Cache`].
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self { backend, failure_policy: FailurePolicy::default() }
    }

    /// Sets the failure policy.
    #[must_use]
    pub const fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    /// Returns the configured failure policy.
    #[must_use]
    pub const fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    /// Returns the backend.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the cached outcome for `key` or runs `fetch` and stores its result.
    ///
    /// A stored payload that no longer deserializes counts as a miss. Failing
    /// to store the fresh result is logged and does not affect the returned
    /// value.
    ///
    /// # Errors
    ///
    /// Returns whatever error `fetch` returns; errors are never cached.
    #[instrument(skip(self, tags, fetch), fields(ttl_secs = ttl.as_secs()))]
    pub async fn get_or_fetch<F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        tags: &[&str],
        fetch: F,
    ) -> Result<CallOutcome>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<CallOutcome>>,
    {
        if self.backend.test(key)
            && let Some(payload) = self.backend.load(key)
        {
            match serde_json::from_slice::<CallOutcome>(&payload) {
                Ok(outcome) => {
                    debug!(key, "Cache hit");
                    return Ok(outcome);
                }
                Err(e) => warn!(key, error = %e, "Discarding unreadable cache entry"),
            }
        }

        debug!(key, "Cache miss");
        let outcome = fetch().await?;

        if !outcome.is_success() && self.failure_policy == FailurePolicy::Skip {
            debug!(key, "Not caching unavailable outcome");
            return Ok(outcome);
        }

        match serde_json::to_vec(&outcome) {
            Ok(payload) => {
                if let Err(e) = self.backend.save(&payload, key, tags, ttl) {
                    warn!(key, error = %e, "Failed to store cache entry");
                }
            }
            Err(e) => warn!(key, error = %e, "Failed to serialize cache entry"),
        }

        Ok(outcome)
    }
}
