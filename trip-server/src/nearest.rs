//! Nearest-stop search.
//!
//! Routes have tens of stops, so a full scan plus sort is all that is
//! needed; there is no spatial index.

use crate::domain::{Coordinate, LngLat, RouteStopConfig};
use crate::geometry::distance;

/// A stop and its straight-line distance from the query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyStop<'a> {
    pub stop: &'a RouteStopConfig,
    pub distance_meters: f64,
}

/// Return the `k` stops closest to `point` by great-circle distance,
/// nearest first.
///
/// Equal distances keep their input order.
pub fn find_k_nearest_stops(
    point: Coordinate,
    stops: &[RouteStopConfig],
    k: usize,
) -> Vec<NearbyStop<'_>> {
    let origin = LngLat::from(point);

    let mut nearby: Vec<NearbyStop<'_>> = stops
        .iter()
        .map(|stop| NearbyStop {
            stop,
            distance_meters: distance(origin, stop.coord),
        })
        .collect();

    nearby.sort_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters));
    nearby.truncate(k);
    nearby
}
