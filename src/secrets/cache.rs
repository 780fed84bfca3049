//! TTL-bounded, coalescing secret cache.
//!
//! [`SecretCache`] fronts a [`SecretStoreBackend`] so repeated lookups of one
//! name do not each cost a network round trip, while never serving a value
//! older than the configured TTL (unless [`StalePolicy::FailOpen`] is chosen).
//!
//! # Behavior
//!
//! - A fresh entry (`age <= ttl`) is returned without touching the backend.
//! - A missing or expired entry triggers one backend fetch. Concurrent callers
//!   for the same name join that fetch instead of starting their own; callers
//!   for different names proceed in parallel.
//! - A successful fetch replaces the entry and resets its timestamp.
//! - `NotFound` is never cached. Any stale entry for the name is evicted.
//! - `Unavailable` with a stale entry present is resolved by [`StalePolicy`].
//!   The default, `FailClosed`, propagates the failure.
//!
//! Expiry is checked lazily on access. There is no background refresh task.
//!
//! # Example
//!
//! ```rust,ignore
//! use platformx::secrets::{SecretCache, backends::InMemorySecretBackend};
//! use std::{sync::Arc, time::Duration};
//!
//! let backend = Arc::new(InMemorySecretBackend::new().with_secret("db-pw", "v1"));
//! let cache = SecretCache::new(backend, Duration::from_secs(300));
//!
//! let value = cache.get("db-pw").await?;        // backend call
//! let again = cache.get("db-pw").await?;        // served from memory
//! ```

use futures::future::{BoxFuture, FutureExt, Shared};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn, Instrument};

use super::backend::SecretStoreBackend;
use super::error::{BackendError, BackendResult};
use super::types::SecretString;
use crate::observability::metrics;

/// Default time-to-live for cached secrets (5 minutes).
pub const DEFAULT_SECRET_TTL: Duration = Duration::from_secs(300);

/// What to do when an expired entry cannot be refreshed because the backend
/// is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StalePolicy {
    /// Propagate the failure. A stale credential may be wrong, not merely old.
    #[default]
    FailClosed,
    /// Serve the stale value and retry the backend on the next access.
    FailOpen,
}

impl StalePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FailClosed => "fail_closed",
            Self::FailOpen => "fail_open",
        }
    }
}

impl FromStr for StalePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "fail_closed" | "closed" => Ok(Self::FailClosed),
            "fail_open" | "open" => Ok(Self::FailOpen),
            other => Err(format!("Unknown stale policy: {}", other)),
        }
    }
}

impl fmt::Display for StalePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Construction-time cache settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub ttl: Duration,
    pub stale_policy: StalePolicy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl: DEFAULT_SECRET_TTL, stale_policy: StalePolicy::default() }
    }
}

/// Point-in-time copy of the cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from a fresh entry
    pub hits: u64,
    /// Lookups that found no fresh entry
    pub misses: u64,
    /// Backend fetches actually started
    pub fetches: u64,
    /// Misses that joined a fetch already in flight
    pub coalesced: u64,
    /// Stale values served under [`StalePolicy::FailOpen`]
    pub stale_served: u64,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    fetches: AtomicU64,
    coalesced: AtomicU64,
    stale_served: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            fetches: self.fetches.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
            stale_served: self.stale_served.load(Ordering::Relaxed),
        }
    }
}

/// Cached secret value with the instant it was fetched.
#[derive(Clone)]
struct CacheEntry {
    value: SecretString,
    fetched_at: Instant,
}

impl CacheEntry {
    fn new(value: SecretString) -> Self {
        Self { value, fetched_at: Instant::now() }
    }

    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() <= ttl
    }
}

type InFlightFetch = Shared<BoxFuture<'static, BackendResult<SecretString>>>;

/// Entries and pending fetches share one lock so a fetch result and the
/// removal of its in-flight marker are observed together.
#[derive(Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    in_flight: HashMap<String, InFlightFetch>,
}

struct Inner {
    backend: Arc<dyn SecretStoreBackend>,
    config: CacheConfig,
    state: Mutex<CacheState>,
    counters: Counters,
}

/// Bounded-staleness secret cache with per-name request coalescing.
///
/// Cloning is cheap and shares the same entries, so one instance can be built
/// at startup and handed to every component that needs secrets.
#[derive(Clone)]
pub struct SecretCache {
    inner: Arc<Inner>,
}

impl fmt::Debug for SecretCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretCache")
            .field("backend", &self.inner.backend.kind())
            .field("ttl", &self.inner.config.ttl)
            .field("stale_policy", &self.inner.config.stale_policy)
            .finish()
    }
}

impl SecretCache {
    /// Create a fail-closed cache with the given TTL.
    pub fn new(backend: Arc<dyn SecretStoreBackend>, ttl: Duration) -> Self {
        Self::with_config(backend, CacheConfig { ttl, ..CacheConfig::default() })
    }

    pub fn with_config(backend: Arc<dyn SecretStoreBackend>, config: CacheConfig) -> Self {
        debug!(
            backend = %backend.kind(),
            ttl_secs = config.ttl.as_secs(),
            stale_policy = %config.stale_policy,
            "Creating secret cache"
        );
        Self {
            inner: Arc::new(Inner {
                backend,
                config,
                state: Mutex::new(CacheState::default()),
                counters: Counters::default(),
            }),
        }
    }

    /// Return the value for `name`, fetching from the backend when no fresh
    /// entry exists.
    ///
    /// # Errors
    ///
    /// - [`BackendError::NotFound`] when the backend has no such secret
    /// - [`BackendError::Unavailable`] when the backend failed and no value may be served
    pub async fn get(&self, name: &str) -> BackendResult<SecretString> {
        let (fetch, stale) = {
            let mut state = self.inner.state.lock().await;

            let stale = match state.entries.get(name) {
                Some(entry) if entry.is_fresh(self.inner.config.ttl) => {
                    Counters::bump(&self.inner.counters.hits);
                    metrics::record_secret_cache_hit();
                    debug!(secret = %name, "Cache hit for secret");
                    return Ok(entry.value.clone());
                }
                Some(entry) => {
                    debug!(secret = %name, "Cached secret expired");
                    Some(entry.value.clone())
                }
                None => None,
            };

            Counters::bump(&self.inner.counters.misses);
            metrics::record_secret_cache_miss();

            let fetch = match state.in_flight.get(name) {
                Some(pending) => {
                    Counters::bump(&self.inner.counters.coalesced);
                    metrics::record_secret_fetch_coalesced();
                    debug!(secret = %name, "Joining in-flight fetch");
                    pending.clone()
                }
                None => {
                    let pending = self.start_fetch(name);
                    state.in_flight.insert(name.to_string(), pending.clone());
                    pending
                }
            };

            (fetch, stale)
        };

        match fetch.await {
            Err(BackendError::Unavailable { message })
                if self.inner.config.stale_policy == StalePolicy::FailOpen =>
            {
                match stale {
                    Some(value) => {
                        Counters::bump(&self.inner.counters.stale_served);
                        metrics::record_stale_secret_served();
                        warn!(
                            secret = %name,
                            error = %message,
                            "StaleValueServed: secret store unavailable, serving expired value"
                        );
                        Ok(value)
                    }
                    None => Err(BackendError::Unavailable { message }),
                }
            }
            result => result,
        }
    }

    /// Spawn the backend call for `name` and wrap it so every caller can
    /// await the same outcome.
    ///
    /// The work runs on its own task, so it finishes and updates the cache even
    /// if the caller that started it is dropped. It runs inside the starting
    /// caller's span so its events keep the service fields.
    fn start_fetch(&self, name: &str) -> InFlightFetch {
        Counters::bump(&self.inner.counters.fetches);

        let inner = Arc::clone(&self.inner);
        let owned_name = name.to_string();
        let fetch = async move {
            let started = Instant::now();
            debug!(secret = %owned_name, backend = %inner.backend.kind(), "Fetching secret from backend");

            let result = inner.backend.fetch(&owned_name).await.map(SecretString::new);

            {
                let mut state = inner.state.lock().await;
                state.in_flight.remove(&owned_name);
                match &result {
                    Ok(value) => {
                        state.entries.insert(owned_name.clone(), CacheEntry::new(value.clone()));
                    }
                    Err(BackendError::NotFound { .. }) => {
                        state.entries.remove(&owned_name);
                    }
                    Err(BackendError::Unavailable { .. }) => {}
                }
            }

            let outcome = match &result {
                Ok(_) => "success",
                Err(e) => e.kind(),
            };
            metrics::record_secret_fetch(
                inner.backend.name(),
                outcome,
                started.elapsed().as_secs_f64(),
            );
            if let Err(e) = &result {
                debug!(secret = %owned_name, error = %e, "Secret fetch failed");
            }

            result
        };
        let task = tokio::spawn(fetch.in_current_span());

        let inner = Arc::clone(&self.inner);
        let owned_name = name.to_string();
        async move {
            match task.await {
                Ok(result) => result,
                Err(join_error) => {
                    inner.state.lock().await.in_flight.remove(&owned_name);
                    Err(BackendError::unavailable(format!(
                        "fetch task for '{}' did not complete: {}",
                        owned_name, join_error
                    )))
                }
            }
        }
        .boxed()
        .shared()
    }

    /// Drop the entry for `name`; the next `get` goes to the backend.
    pub async fn invalidate(&self, name: &str) {
        let mut state = self.inner.state.lock().await;
        if state.entries.remove(name).is_some() {
            debug!(secret = %name, "Invalidated cached secret");
        }
    }

    /// Drop every entry. Fetches already in flight still store their result.
    pub async fn clear(&self) {
        let mut state = self.inner.state.lock().await;
        let count = state.entries.len();
        state.entries.clear();
        debug!(count, "Cleared secret cache");
    }

    /// Evict entries older than the TTL and return how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let ttl = self.inner.config.ttl;
        let mut state = self.inner.state.lock().await;
        let before = state.entries.len();
        state.entries.retain(|_, entry| entry.is_fresh(ttl));
        let removed = before - state.entries.len();
        if removed > 0 {
            debug!(removed, "Purged expired secrets");
        }
        removed
    }

    /// Whether any entry, fresh or stale, is held for `name`.
    pub async fn contains(&self, name: &str) -> bool {
        self.inner.state.lock().await.entries.contains_key(name)
    }

    pub async fn len(&self) -> usize {
        self.inner.state.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.state.lock().await.entries.is_empty()
    }

    pub fn ttl(&self) -> Duration {
        self.inner.config.ttl
    }

    pub fn stale_policy(&self) -> StalePolicy {
        self.inner.config.stale_policy
    }

    pub fn backend(&self) -> &Arc<dyn SecretStoreBackend> {
        &self.inner.backend
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.counters.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::backends::InMemorySecretBackend;
    use tracing_test::traced_test;

    fn cache_with(backend: &Arc<InMemorySecretBackend>, ttl: Duration) -> SecretCache {
        SecretCache::new(backend.clone(), ttl)
    }

    #[tokio::test(start_paused = true)]
    async fn test_hit_within_ttl_calls_backend_once() {
        let backend = Arc::new(InMemorySecretBackend::new().with_secret("db-pw", "v1"));
        let cache = cache_with(&backend, Duration::from_secs(60));

        for _ in 0..5 {
            assert_eq!(cache.get("db-pw").await.unwrap(), "v1");
            tokio::time::advance(Duration::from_secs(10)).await;
        }

        assert_eq!(backend.fetch_count(), 1);
        let stats = cache.stats();
        assert_eq!(stats.hits, 4);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.fetches, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_triggers_exactly_one_refetch() {
        let backend = Arc::new(InMemorySecretBackend::new().with_secret("db-pw", "v1"));
        let cache = cache_with(&backend, Duration::from_secs(2));

        assert_eq!(cache.get("db-pw").await.unwrap(), "v1");

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(cache.get("db-pw").await.unwrap(), "v1");
        assert_eq!(backend.fetch_count(), 1);

        tokio::time::advance(Duration::from_secs(1)).await;
        backend.insert("db-pw", "v2");

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(cache.get("db-pw").await.unwrap(), "v2");
        assert_eq!(backend.fetch_count(), 2);

        assert_eq!(cache.get("db-pw").await.unwrap(), "v2");
        assert_eq!(backend.fetch_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_misses_are_coalesced() {
        let backend = Arc::new(
            InMemorySecretBackend::new()
                .with_secret("api-key", "k1")
                .with_latency(Duration::from_millis(100)),
        );
        let cache = cache_with(&backend, Duration::from_secs(60));

        let results =
            futures::future::join_all((0..16).map(|_| cache.get("api-key"))).await;

        assert_eq!(backend.fetch_count(), 1);
        assert!(results.iter().all(|r| r.as_ref().map(|v| v == &"k1").unwrap_or(false)));
        let stats = cache.stats();
        assert_eq!(stats.fetches, 1);
        assert_eq!(stats.coalesced, 15);
    }

    #[tokio::test(start_paused = true)]
    async fn test_coalesced_failure_is_shared_by_all_waiters() {
        let backend = Arc::new(
            InMemorySecretBackend::new()
                .with_secret("api-key", "k1")
                .with_latency(Duration::from_millis(100)),
        );
        backend.set_available(false);
        let cache = cache_with(&backend, Duration::from_secs(60));

        let results = futures::future::join_all((0..8).map(|_| cache.get("api-key"))).await;

        assert_eq!(backend.fetch_count(), 1);
        assert!(results.iter().all(|r| matches!(r, Err(BackendError::Unavailable { .. }))));
        assert!(!cache.contains("api-key").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_different_names_fetch_independently() {
        let backend = Arc::new(
            InMemorySecretBackend::new()
                .with_secret("a", "1")
                .with_secret("b", "2")
                .with_latency(Duration::from_millis(100)),
        );
        let cache = cache_with(&backend, Duration::from_secs(60));

        let started = Instant::now();
        let (a, b) = tokio::join!(cache.get("a"), cache.get("b"));

        assert_eq!(a.unwrap(), "1");
        assert_eq!(b.unwrap(), "2");
        assert_eq!(backend.fetch_count(), 2);
        // Both fetches ran in parallel rather than back to back.
        assert!(started.elapsed() < Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_arrival_after_failure_starts_fresh_fetch() {
        let backend = Arc::new(InMemorySecretBackend::new().with_secret("db-pw", "v1"));
        backend.set_available(false);
        let cache = cache_with(&backend, Duration::from_secs(60));

        assert!(cache.get("db-pw").await.is_err());
        backend.set_available(true);
        assert_eq!(cache.get("db-pw").await.unwrap(), "v1");
        assert_eq!(backend.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_not_found_is_not_cached() {
        let backend = Arc::new(InMemorySecretBackend::new());
        let cache = cache_with(&backend, Duration::from_secs(60));

        let err = cache.get("missing").await.unwrap_err();
        assert_eq!(err, BackendError::not_found("missing"));
        assert!(cache.is_empty().await);

        let _ = cache.get("missing").await;
        assert_eq!(backend.fetch_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_evicts_stale_entry() {
        let backend = Arc::new(InMemorySecretBackend::new().with_secret("old", "v1"));
        let cache = cache_with(&backend, Duration::from_secs(1));

        cache.get("old").await.unwrap();
        backend.remove("old");
        tokio::time::advance(Duration::from_secs(2)).await;

        assert!(matches!(cache.get("old").await, Err(BackendError::NotFound { .. })));
        assert!(!cache.contains("old").await);
    }

    #[tokio::test]
    async fn test_unavailable_without_entry_creates_nothing() {
        let backend = Arc::new(InMemorySecretBackend::new().with_secret("db-pw", "v1"));
        backend.set_available(false);
        let cache = cache_with(&backend, Duration::from_secs(60));

        assert!(matches!(cache.get("db-pw").await, Err(BackendError::Unavailable { .. })));
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fail_closed_does_not_serve_stale_value() {
        let backend = Arc::new(InMemorySecretBackend::new().with_secret("db-pw", "v1"));
        let cache = cache_with(&backend, Duration::from_secs(2));
        assert_eq!(cache.stale_policy(), StalePolicy::FailClosed);

        cache.get("db-pw").await.unwrap();
        tokio::time::advance(Duration::from_secs(3)).await;
        backend.set_available(false);

        assert!(matches!(cache.get("db-pw").await, Err(BackendError::Unavailable { .. })));
        assert_eq!(cache.stats().stale_served, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fail_open_serves_stale_value_and_retries_next_time() {
        let backend = Arc::new(InMemorySecretBackend::new().with_secret("db-pw", "v1"));
        let cache = SecretCache::with_config(
            backend.clone(),
            CacheConfig { ttl: Duration::from_secs(2), stale_policy: StalePolicy::FailOpen },
        );

        cache.get("db-pw").await.unwrap();
        tokio::time::advance(Duration::from_secs(3)).await;
        backend.set_available(false);

        assert_eq!(cache.get("db-pw").await.unwrap(), "v1");
        assert_eq!(cache.stats().stale_served, 1);
        assert_eq!(backend.fetch_count(), 2);

        backend.set_available(true);
        backend.insert("db-pw", "v2");
        assert_eq!(cache.get("db-pw").await.unwrap(), "v2");
        assert_eq!(backend.fetch_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    #[traced_test]
    async fn test_fail_open_logs_warning_without_value() {
        let backend = Arc::new(InMemorySecretBackend::new().with_secret("db-pw", "hunter2"));
        let cache = SecretCache::with_config(
            backend.clone(),
            CacheConfig { ttl: Duration::from_secs(1), stale_policy: StalePolicy::FailOpen },
        );

        cache.get("db-pw").await.unwrap();
        tokio::time::advance(Duration::from_secs(2)).await;
        backend.set_available(false);
        cache.get("db-pw").await.unwrap();

        assert!(logs_contain("StaleValueServed"));
        assert!(!logs_contain("hunter2"));
    }

    #[tokio::test]
    async fn test_fail_open_without_entry_still_fails() {
        let backend = Arc::new(InMemorySecretBackend::new().with_secret("db-pw", "v1"));
        backend.set_available(false);
        let cache = SecretCache::with_config(
            backend.clone(),
            CacheConfig { stale_policy: StalePolicy::FailOpen, ..CacheConfig::default() },
        );

        assert!(matches!(cache.get("db-pw").await, Err(BackendError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn test_names_are_case_sensitive() {
        let backend = Arc::new(InMemorySecretBackend::new().with_secret("Token", "upper"));
        let cache = cache_with(&backend, Duration::from_secs(60));

        assert_eq!(cache.get("Token").await.unwrap(), "upper");
        assert!(matches!(cache.get("token").await, Err(BackendError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_invalidate_and_clear() {
        let backend =
            Arc::new(InMemorySecretBackend::new().with_secret("a", "1").with_secret("b", "2"));
        let cache = cache_with(&backend, Duration::from_secs(60));

        cache.get("a").await.unwrap();
        cache.get("b").await.unwrap();
        assert_eq!(cache.len().await, 2);

        cache.invalidate("a").await;
        assert!(!cache.contains("a").await);
        cache.get("a").await.unwrap();
        assert_eq!(backend.fetch_count(), 3);

        cache.clear().await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_fetch_events_keep_enclosing_span_fields() {
        let backend = Arc::new(InMemorySecretBackend::new());
        let cache = cache_with(&backend, Duration::from_secs(60));

        let span = tracing::info_span!("service", environment_name = "Staging");
        let _ = cache.get("missing").instrument(span).await;

        logs_assert(|lines: &[&str]| {
            let fetch_lines: Vec<&&str> =
                lines.iter().filter(|line| line.contains("Fetching secret from backend")).collect();
            if fetch_lines.is_empty() {
                return Err("no fetch event logged".to_string());
            }
            if fetch_lines.iter().all(|line| line.contains("environment_name")) {
                Ok(())
            } else {
                Err("fetch event is missing environment_name".to_string())
            }
        });
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_completes_when_starting_caller_is_aborted() {
        let backend = Arc::new(
            InMemorySecretBackend::new()
                .with_secret("db-pw", "v1")
                .with_latency(Duration::from_millis(200)),
        );
        let cache = cache_with(&backend, Duration::from_secs(60));

        let leader = tokio::spawn({
            let cache = cache.clone();
            async move { cache.get("db-pw").await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        let follower = tokio::spawn({
            let cache = cache.clone();
            async move { cache.get("db-pw").await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;

        leader.abort();
        assert!(leader.await.unwrap_err().is_cancelled());

        assert_eq!(follower.await.unwrap().unwrap(), "v1");
        assert_eq!(backend.fetch_count(), 1);
        assert_eq!(cache.stats().coalesced, 1);
        assert!(cache.contains("db-pw").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        let backend =
            Arc::new(InMemorySecretBackend::new().with_secret("a", "1").with_secret("b", "2"));
        let cache = cache_with(&backend, Duration::from_secs(5));

        cache.get("a").await.unwrap();
        tokio::time::advance(Duration::from_secs(4)).await;
        cache.get("b").await.unwrap();
        tokio::time::advance(Duration::from_secs(2)).await;

        assert_eq!(cache.purge_expired().await, 1);
        assert!(!cache.contains("a").await);
        assert!(cache.contains("b").await);
    }

    #[test]
    fn test_stale_policy_parse() {
        assert_eq!("fail_closed".parse::<StalePolicy>().unwrap(), StalePolicy::FailClosed);
        assert_eq!("FAIL-OPEN".parse::<StalePolicy>().unwrap(), StalePolicy::FailOpen);
        assert!("sometimes".parse::<StalePolicy>().is_err());
        assert_eq!(StalePolicy::default(), StalePolicy::FailClosed);
    }

    #[test]
    fn test_default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(300));
        assert_eq!(config.stale_policy, StalePolicy::FailClosed);
    }
}
