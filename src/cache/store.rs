//! TTL value cache with in-flight request de-duplication

use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::config::CacheConfig;

/// Error surfaced to every caller that awaited a failed request
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("request failed: {0}")]
    Request(Arc<anyhow::Error>),
}

/// Statistics about cache usage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from a fresh cached value
    pub hits: usize,
    /// Lookups that started a new request
    pub misses: usize,
    /// Lookups that joined a request already in flight
    pub deduplicated: usize,
    /// Values dropped to stay within `max_entries`
    pub evictions: usize,
    /// Current number of cached values
    pub entries: usize,
}

impl CacheStats {
    /// Calculate hit rate as a percentage, counting joined requests as hits
    pub fn hit_rate(&self) -> f32 {
        let total = self.hits + self.deduplicated + self.misses;
        if total == 0 {
            0.0
        } else {
            ((self.hits + self.deduplicated) as f32 / total as f32) * 100.0
        }
    }
}

type SharedRequest<T> = Shared<BoxFuture<'static, Result<T, CacheError>>>;

struct CacheEntry<T> {
    value: T,
    timestamp: Instant,
}

struct PendingRequest<T> {
    /// Distinguishes this request from a later one registered under the same key
    id: u64,
    request: SharedRequest<T>,
    timestamp: Instant,
}

struct CacheState<T> {
    entries: HashMap<String, CacheEntry<T>>,
    pending: HashMap<String, PendingRequest<T>>,
    next_request_id: u64,
    stats: CacheStats,
}

impl<T: Clone> CacheState<T> {
    /// Return a fresh value, evicting it if it has outlived the TTL
    fn lookup(&mut self, key: &str, now: Instant, ttl: Duration) -> Option<T> {
        let fresh = match self.entries.get(key) {
            Some(entry) => now.duration_since(entry.timestamp) <= ttl,
            None => return None,
        };

        if fresh {
            self.entries.get(key).map(|entry| entry.value.clone())
        } else {
            self.entries.remove(key);
            self.stats.entries = self.entries.len();
            None
        }
    }

    fn insert(&mut self, key: String, value: T, now: Instant, max_entries: usize) {
        if max_entries == 0 {
            return;
        }

        if !self.entries.contains_key(&key) && self.entries.len() >= max_entries {
            let oldest_key = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.timestamp)
                .map(|(k, _)| k.clone());

            if let Some(oldest_key) = oldest_key {
                self.entries.remove(&oldest_key);
                self.stats.evictions += 1;
            }
        }

        self.entries.insert(key, CacheEntry { value, timestamp: now });
        self.stats.entries = self.entries.len();
    }
}

/// Async memoization keyed by an application-chosen string
///
/// Cached values and in-flight requests share one TTL. At most one request
/// per key runs at a time: callers arriving while it is pending await the
/// same shared future and receive the same value or the same error.
pub struct RequestCache<T> {
    state: Arc<RwLock<CacheState<T>>>,
    ttl: Duration,
    max_entries: usize,
}

impl<T> RequestCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            state: Arc::new(RwLock::new(CacheState {
                entries: HashMap::new(),
                pending: HashMap::new(),
                next_request_id: 0,
                stats: CacheStats::default(),
            })),
            ttl,
            max_entries,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.ttl(), config.max_entries)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Return the cached value for `key`, or run `request_fn` to produce it
    ///
    /// `request_fn` is only invoked when there is neither a fresh value nor
    /// an unexpired request in flight for `key`.
    pub async fn fetch_with_cache<F, Fut>(&self, key: &str, request_fn: F) -> Result<T, CacheError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let request = {
            let mut state = self.state.write().await;
            let now = Instant::now();

            if let Some(value) = state.lookup(key, now, self.ttl) {
                state.stats.hits += 1;
                tracing::debug!(key, "cache hit");
                return Ok(value);
            }

            let in_flight = state
                .pending
                .get(key)
                .filter(|pending| now.duration_since(pending.timestamp) <= self.ttl)
                .map(|pending| pending.request.clone());

            match in_flight {
                Some(request) => {
                    state.stats.deduplicated += 1;
                    tracing::debug!(key, "joining in-flight request");
                    request
                }
                None => {
                    state.stats.misses += 1;
                    let id = state.next_request_id;
                    state.next_request_id += 1;

                    tracing::debug!(key, "cache miss, starting request");
                    let request = self.start_request(key, id, request_fn());
                    state.pending.insert(
                        key.to_string(),
                        PendingRequest {
                            id,
                            request: request.clone(),
                            timestamp: now,
                        },
                    );
                    request
                }
            }
        };

        request.await
    }

    fn start_request<Fut>(&self, key: &str, id: u64, request: Fut) -> SharedRequest<T>
    where
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let state = Arc::clone(&self.state);
        let key = key.to_string();
        let max_entries = self.max_entries;

        async move {
            let result = request.await.map_err(|e| CacheError::Request(Arc::new(e)));

            let mut state = state.write().await;
            if state.pending.get(&key).map(|pending| pending.id) == Some(id) {
                state.pending.remove(&key);
            }

            match &result {
                Ok(value) => state.insert(key, value.clone(), Instant::now(), max_entries),
                Err(err) => tracing::debug!(key = %key, error = %err, "cached request failed"),
            }

            result
        }
        .boxed()
        .shared()
    }

    /// Look up a fresh value without starting a request
    pub async fn get(&self, key: &str) -> Option<T> {
        let mut state = self.state.write().await;
        state.lookup(key, Instant::now(), self.ttl)
    }

    /// Store a value directly, applying the capacity policy
    pub async fn set(&self, key: &str, value: T) {
        let mut state = self.state.write().await;
        state.insert(key.to_string(), value, Instant::now(), self.max_entries);
    }

    pub async fn invalidate(&self, key: &str) {
        let mut state = self.state.write().await;
        state.entries.remove(key);
        state.stats.entries = state.entries.len();
    }

    /// Drop every cached value and forget in-flight requests
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.entries.clear();
        state.pending.clear();
        state.stats.entries = 0;
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn pending_len(&self) -> usize {
        self.state.read().await.pending.len()
    }

    pub async fn stats(&self) -> CacheStats {
        self.state.read().await.stats.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::{advance, sleep};

    const TTL: Duration = Duration::from_secs(60);

    fn counted_request(
        calls: &Arc<AtomicUsize>,
        value: u32,
        delay: Duration,
    ) -> impl FnOnce() -> BoxFuture<'static, anyhow::Result<u32>> {
        let calls = Arc::clone(calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                sleep(delay).await;
                Ok(value)
            }
            .boxed()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_requests_share_one_execution() {
        let cache = RequestCache::new(TTL, 10);
        let calls = Arc::new(AtomicUsize::new(0));

        let (a, b) = tokio::join!(
            cache.fetch_with_cache("k", counted_request(&calls, 7, Duration::from_millis(50))),
            cache.fetch_with_cache("k", counted_request(&calls, 8, Duration::from_millis(50))),
        );

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(a.unwrap(), 7);
        assert_eq!(b.unwrap(), 7);
        assert_eq!(cache.pending_len().await, 0);

        let stats = cache.stats().await;
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.deduplicated, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_value_skips_request() {
        let cache = RequestCache::new(TTL, 10);
        let calls = Arc::new(AtomicUsize::new(0));

        cache
            .fetch_with_cache("k", counted_request(&calls, 1, Duration::ZERO))
            .await
            .unwrap();
        advance(TTL).await;
        let value = cache
            .fetch_with_cache("k", counted_request(&calls, 2, Duration::ZERO))
            .await
            .unwrap();

        assert_eq!(value, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats().await.hits, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_value_is_refetched() {
        let cache = RequestCache::new(TTL, 10);
        let calls = Arc::new(AtomicUsize::new(0));

        cache
            .fetch_with_cache("k", counted_request(&calls, 1, Duration::ZERO))
            .await
            .unwrap();
        advance(TTL + Duration::from_millis(1)).await;

        assert!(cache.get("k").await.is_none());
        let value = cache
            .fetch_with_cache("k", counted_request(&calls, 2, Duration::ZERO))
            .await
            .unwrap();

        assert_eq!(value, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_capacity_evicts_single_oldest() {
        let cache = RequestCache::new(TTL, 3);

        for key in ["a", "b", "c"] {
            cache.set(key, 0u32).await;
            advance(Duration::from_millis(1)).await;
        }
        cache.set("d", 0).await;

        assert_eq!(cache.len().await, 3);
        assert!(cache.get("a").await.is_none());
        for key in ["b", "c", "d"] {
            assert!(cache.get(key).await.is_some(), "{} should survive", key);
        }
        assert_eq!(cache.stats().await.evictions, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overwrite_does_not_evict() {
        let cache = RequestCache::new(TTL, 2);

        cache.set("a", 1u32).await;
        advance(Duration::from_millis(1)).await;
        cache.set("b", 2).await;
        cache.set("a", 3).await;

        assert_eq!(cache.get("a").await, Some(3));
        assert_eq!(cache.get("b").await, Some(2));
        assert_eq!(cache.stats().await.evictions, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_reaches_every_awaiter() {
        let cache: RequestCache<u32> = RequestCache::new(TTL, 10);
        let calls = Arc::new(AtomicUsize::new(0));

        let failing = |calls: &Arc<AtomicUsize>| {
            let calls = Arc::clone(calls);
            move || {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    sleep(Duration::from_millis(10)).await;
                    Err::<u32, _>(anyhow::anyhow!("upstream down"))
                }
                .boxed()
            }
        };

        let (a, b) = tokio::join!(
            cache.fetch_with_cache("k", failing(&calls)),
            cache.fetch_with_cache("k", failing(&calls)),
        );

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(a.unwrap_err().to_string().contains("upstream down"));
        assert!(b.unwrap_err().to_string().contains("upstream down"));
        assert_eq!(cache.pending_len().await, 0);
        assert!(cache.is_empty().await);

        // A failed request is not cached, so the next call retries
        let value = cache
            .fetch_with_cache("k", counted_request(&calls, 5, Duration::ZERO))
            .await
            .unwrap();
        assert_eq!(value, 5);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_pending_request_is_replaced() {
        let cache = RequestCache::new(TTL, 10);
        let calls = Arc::new(AtomicUsize::new(0));

        let mut hung = Box::pin(cache.fetch_with_cache(
            "k",
            counted_request(&calls, 1, Duration::from_secs(24 * 60 * 60)),
        ));
        assert!(futures::poll!(&mut hung).is_pending());

        advance(TTL + Duration::from_secs(1)).await;

        let value = cache
            .fetch_with_cache("k", counted_request(&calls, 2, Duration::ZERO))
            .await
            .unwrap();
        assert_eq!(value, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_hit_rate() {
        let stats = CacheStats {
            hits: 2,
            misses: 1,
            deduplicated: 1,
            ..Default::default()
        };
        assert_eq!(stats.hit_rate(), 75.0);
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }
}
