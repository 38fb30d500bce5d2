//! Process-wide cache of route interpolators.
//!
//! Building a cumulative distance table is `O(n)` in the vertex count; the
//! route set is small and fixed, so each polyline is measured once and the
//! result is shared across planning requests.
//!
//! Entries are keyed by a structural fingerprint (vertex count plus first and
//! last vertex). Two different polylines with the same length and endpoints
//! collide, and the first one cached wins. That is acceptable for a handful
//! of configured routes; a larger route set should key by route id instead.

use std::sync::Arc;

use moka::sync::Cache as MokaCache;

use crate::domain::LngLat;

use super::polyline::{RouteInterpolator, RoutePolyline};

/// Default maximum number of cached polylines.
const DEFAULT_MAX_CAPACITY: u64 = 64;

/// Fingerprint of a polyline: vertex count and endpoint bit patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PolylineKey {
    vertex_count: usize,
    first: (u64, u64),
    last: (u64, u64),
}

impl PolylineKey {
    pub fn of(polyline: &RoutePolyline) -> Self {
        fn bits(p: LngLat) -> (u64, u64) {
            (p.lon().to_bits(), p.lat().to_bits())
        }
        Self {
            vertex_count: polyline.len(),
            first: bits(polyline.first()),
            last: bits(polyline.last()),
        }
    }
}

/// Insert-if-absent cache of [`RouteInterpolator`]s.
///
/// Safe to share between tasks; concurrent misses on one key build once.
#[derive(Clone)]
pub struct PolylineCache {
    entries: MokaCache<PolylineKey, Arc<RouteInterpolator>>,
}

impl PolylineCache {
    pub fn new(max_capacity: u64) -> Self {
        Self {
            entries: MokaCache::builder().max_capacity(max_capacity).build(),
        }
    }

    /// Return the cached interpolator for this polyline's key, building and
    /// inserting it on a miss.
    pub fn get_or_build(&self, polyline: RoutePolyline) -> Arc<RouteInterpolator> {
        let key = PolylineKey::of(&polyline);
        self.entries
            .get_with(key, || Arc::new(RouteInterpolator::new(polyline)))
    }

    /// Number of cached polylines (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }
}

impl Default for PolylineCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CAPACITY)
    }
}
