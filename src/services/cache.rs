// src/services/cache.rs
// DOCUMENTATION: In-memory two-tier cache for Google API responses
// PURPOSE: Reduce API calls by caching geocoding and nearby search results

use crate::config::Config;
use crate::errors::SearchError;
use crate::models::{GeocodedAddress, PlaceResult};
use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Cache entry with its insertion time
#[derive(Clone, Debug)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

impl<V> CacheEntry<V> {
    fn new(value: V) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
        }
    }
}

/// Thread-safe LRU cache with optional TTL.
///
/// Without a TTL, entries live until capacity eviction (addresses are immutable
/// facts). With a TTL, expired entries are treated as absent and lazily purged
/// on lookup (places can open, close, or move).
pub struct LruTtlCache<V: Clone> {
    store: Mutex<LruCache<String, CacheEntry<V>>>,
    ttl: Option<Duration>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V: Clone> LruTtlCache<V> {
    /// Create a cache holding up to `capacity` entries
    pub fn new(capacity: usize, ttl: Option<Duration>) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            store: Mutex::new(LruCache::new(capacity)),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    fn is_expired(&self, entry: &CacheEntry<V>) -> bool {
        match self.ttl {
            Some(ttl) => entry.inserted_at.elapsed() > ttl,
            None => false,
        }
    }

    /// Get a cached value, refreshing its LRU position.
    /// An expired entry is purged and reported as a miss.
    pub async fn get(&self, key: &str) -> Option<V> {
        let mut store = self.store.lock().await;

        let expired = match store.get(key) {
            Some(entry) => {
                if !self.is_expired(entry) {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    log::debug!("Cache HIT for key: {}", key);
                    return Some(entry.value.clone());
                }
                true
            }
            None => false,
        };

        if expired {
            store.pop(key);
            log::debug!("Cache EXPIRED for key: {}", key);
        } else {
            log::debug!("Cache MISS for key: {}", key);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Insert or overwrite a value, evicting the least-recently-used entry
    /// when the cache is at capacity
    pub async fn put(&self, key: String, value: V) {
        let mut store = self.store.lock().await;
        store.put(key, CacheEntry::new(value));
    }

    /// Return a cached value, or compute and store it on a miss.
    ///
    /// The lock is not held across `compute`, so concurrent misses on the same
    /// key may each trigger an upstream call (no single-flight). The rate
    /// limiter bounds total concurrency regardless, and the cache prevents
    /// future duplication.
    pub async fn get_or_populate<F, Fut>(&self, key: String, compute: F) -> Result<V, SearchError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, SearchError>>,
    {
        if let Some(value) = self.get(&key).await {
            return Ok(value);
        }

        let value = compute().await?;
        self.put(key, value.clone()).await;
        Ok(value)
    }

    pub async fn len(&self) -> usize {
        self.store.lock().await.len()
    }

    /// Clear all entries and reset counters
    pub async fn clear(&self) {
        let mut store = self.store.lock().await;
        let count = store.len();
        store.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        log::info!("Cache cleared: {} entries removed", count);
    }

    /// Get hit/miss statistics for this tier
    pub async fn stats(&self) -> CacheTierStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;

        CacheTierStats {
            hits,
            misses,
            hit_rate: if total > 0 {
                hits as f64 / total as f64
            } else {
                0.0
            },
            cache_size: self.len().await,
        }
    }
}

/// Statistics for one cache tier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheTierStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub cache_size: usize,
}

/// Combined statistics for both tiers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub geocoding: CacheTierStats,
    pub places: CacheTierStats,
}

/// The two cache tiers shared across all requests for the process lifetime
pub struct SearchCaches {
    /// Address -> coordinates. LRU only; geocoding results never go stale.
    pub geocoding: LruTtlCache<GeocodedAddress>,
    /// (coordinate, type, radius) -> full result page. LRU + TTL.
    pub places: LruTtlCache<Vec<PlaceResult>>,
}

impl SearchCaches {
    pub fn new(config: &Config) -> Self {
        Self {
            geocoding: LruTtlCache::new(config.geocoding_cache_size, None),
            places: LruTtlCache::new(
                config.places_cache_size,
                Some(Duration::from_secs(config.places_cache_ttl)),
            ),
        }
    }

    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            geocoding: self.geocoding.stats().await,
            places: self.places.stats().await,
        }
    }

    pub async fn clear(&self) {
        self.geocoding.clear().await;
        self.places.clear().await;
    }
}

/// Cache key for a forward geocoding lookup: the normalized address
pub fn geocoding_key(address: &str) -> String {
    format!("geocode:{}", address.trim().to_lowercase())
}

/// Cache key for a reverse geocoding lookup
pub fn reverse_geocoding_key(lat: f64, lng: f64) -> String {
    format!(
        "reverse_geocode:{}:{}",
        (lat * 10000.0).round() as i64,
        (lng * 10000.0).round() as i64
    )
}

/// Cache key for a nearby search.
///
/// Coordinates are rounded to 4 decimals (~11m) so that a location given as an
/// address and the coordinate-equivalent location canonicalize to the same key.
/// The per-request result cap is deliberately excluded: the full provider page
/// is cached and truncated afterwards.
pub fn places_key(lat: f64, lng: f64, place_type: &str, radius_meters: u32) -> String {
    format!(
        "places:{}:{}:{}:{}",
        (lat * 10000.0).round() as i64,
        (lng * 10000.0).round() as i64,
        place_type,
        radius_meters
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test]
    async fn test_cache_put_get() {
        let cache: LruTtlCache<String> = LruTtlCache::new(10, None);

        cache.put("k".to_string(), "v".to_string()).await;
        assert_eq!(cache.get("k").await, Some("v".to_string()));
        assert_eq!(cache.get("missing").await, None);
    }

    #[tokio::test]
    async fn test_cache_expiration() {
        let cache: LruTtlCache<String> = LruTtlCache::new(10, Some(Duration::from_secs(1)));

        cache.put("k".to_string(), "v".to_string()).await;
        assert!(cache.get("k").await.is_some());

        tokio::time::sleep(Duration::from_secs(2)).await;

        // Expired entry reads as absent and is purged
        assert!(cache.get("k").await.is_none());
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_no_ttl_never_expires() {
        let cache: LruTtlCache<String> = LruTtlCache::new(10, None);

        cache.put("k".to_string(), "v".to_string()).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(cache.get("k").await.is_some());
    }

    #[tokio::test]
    async fn test_lru_eviction_at_capacity() {
        let cache: LruTtlCache<i32> = LruTtlCache::new(2, None);

        cache.put("a".to_string(), 1).await;
        cache.put("b".to_string(), 2).await;

        // Touch "a" so "b" becomes least recently used
        assert_eq!(cache.get("a").await, Some(1));

        cache.put("c".to_string(), 3).await;

        assert_eq!(cache.get("a").await, Some(1));
        assert_eq!(cache.get("b").await, None);
        assert_eq!(cache.get("c").await, Some(3));
    }

    #[tokio::test]
    async fn test_get_or_populate_computes_once() {
        let cache: LruTtlCache<i32> = LruTtlCache::new(10, None);
        let calls = AtomicUsize::new(0);

        let first = cache
            .get_or_populate("k".to_string(), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(42)
            })
            .await
            .unwrap();

        let second = cache
            .get_or_populate("k".to_string(), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(99)
            })
            .await
            .unwrap();

        assert_eq!(first, 42);
        assert_eq!(second, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_or_populate_failure_not_cached() {
        let cache: LruTtlCache<i32> = LruTtlCache::new(10, None);

        let result = cache
            .get_or_populate("k".to_string(), || async {
                Err(SearchError::ExternalApiError("boom".to_string()))
            })
            .await;
        assert!(result.is_err());

        // A later compute can still succeed
        let value = cache
            .get_or_populate("k".to_string(), || async { Ok(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_stats_track_hits_and_misses() {
        let cache: LruTtlCache<i32> = LruTtlCache::new(10, None);

        cache.put("k".to_string(), 1).await;
        cache.get("k").await;
        cache.get("k").await;
        cache.get("missing").await;

        let stats = cache.stats().await;
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(stats.cache_size, 1);
    }

    #[test]
    fn test_places_key_rounding_equivalence() {
        // Differences below ~11m round to the same key
        let key1 = places_key(40.41684, -3.70379, "park", 1000);
        let key2 = places_key(40.41680, -3.70381, "park", 1000);
        let key3 = places_key(40.41800, -3.70379, "park", 1000);

        assert_eq!(key1, key2);
        assert_ne!(key1, key3);
    }

    #[test]
    fn test_places_key_includes_type_and_radius() {
        let base = places_key(40.4168, -3.7038, "park", 1000);
        assert_ne!(base, places_key(40.4168, -3.7038, "cafe", 1000));
        assert_ne!(base, places_key(40.4168, -3.7038, "park", 2000));
    }

    #[test]
    fn test_geocoding_key_normalization() {
        assert_eq!(
            geocoding_key("  Calle Mayor 1, Madrid "),
            geocoding_key("calle mayor 1, madrid")
        );
    }
}
