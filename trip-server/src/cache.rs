//! Caching layer for directions provider responses.
//!
//! A single planning request asks for walking directions from the origin to
//! up to K stops per route, then asks again for the winning legs. Route
//! geometry never changes while the process runs. Both are cached here so
//! repeated questions cost one round trip.
//!
//! Walking directions are keyed by endpoints quantised to 1e-6 degrees
//! (about 10 cm), so float noise in the caller does not defeat the cache.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::directions::{DirectionsProvider, ProviderError, WalkDirections};
use crate::domain::{Coordinate, LngLat, RouteId};

/// Cache key for walking directions: quantised (from lat, from lon, to lat, to lon).
type WalkKey = (i64, i64, i64, i64);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached walking directions.
    pub walk_ttl: Duration,

    /// TTL for cached route geometry.
    pub route_ttl: Duration,

    /// Maximum number of cached walking-direction entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            walk_ttl: Duration::from_secs(120),
            route_ttl: Duration::from_secs(24 * 60 * 60),
            max_capacity: 10_000,
        }
    }
}

fn quantise(degrees: f64) -> i64 {
    (degrees * 1e6).round() as i64
}

fn walk_key(from: Coordinate, to: Coordinate) -> WalkKey {
    (
        quantise(from.lat),
        quantise(from.lon),
        quantise(to.lat),
        quantise(to.lon),
    )
}

/// Cache storage for provider responses.
pub struct DirectionsCache {
    walks: MokaCache<WalkKey, Arc<WalkDirections>>,
    routes: MokaCache<RouteId, Arc<Vec<LngLat>>>,
}

impl DirectionsCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let walks = MokaCache::builder()
            .time_to_live(config.walk_ttl)
            .max_capacity(config.max_capacity)
            .build();

        let routes = MokaCache::builder().time_to_live(config.route_ttl).build();

        Self { walks, routes }
    }

    /// Number of cached walks and route geometries (for monitoring).
    pub async fn entry_count(&self) -> u64 {
        self.walks.run_pending_tasks().await;
        self.routes.run_pending_tasks().await;
        self.walks.entry_count() + self.routes.entry_count()
    }
}

/// Directions provider with caching.
///
/// Wraps any `DirectionsProvider`; failures pass through uncached.
pub struct CachedDirections<P> {
    inner: P,
    cache: DirectionsCache,
}

impl<P: DirectionsProvider> CachedDirections<P> {
    /// Create a new cached provider.
    pub fn new(inner: P, config: &CacheConfig) -> Self {
        Self {
            inner,
            cache: DirectionsCache::new(config),
        }
    }

    /// Access the underlying provider for operations that bypass cache.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Get cache statistics.
    pub async fn cache_entry_count(&self) -> u64 {
        self.cache.entry_count().await
    }
}

impl<P: DirectionsProvider> DirectionsProvider for CachedDirections<P> {
    async fn walk_directions(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<WalkDirections, ProviderError> {
        let key = walk_key(from, to);

        if let Some(cached) = self.cache.walks.get(&key).await {
            return Ok(cached.as_ref().clone());
        }

        let walk = self.inner.walk_directions(from, to).await?;
        self.cache.walks.insert(key, Arc::new(walk.clone())).await;

        Ok(walk)
    }

    async fn route_geometry(&self, route_id: &RouteId) -> Result<Vec<LngLat>, ProviderError> {
        if let Some(cached) = self.cache.routes.get(route_id).await {
            return Ok(cached.as_ref().clone());
        }

        let coords = self.inner.route_geometry(route_id).await?;
        self.cache
            .routes
            .insert(route_id.clone(), Arc::new(coords.clone()))
            .await;

        Ok(coords)
    }
}
