//! Great-circle math on a spherical Earth.

use crate::domain::LngLat;

/// Mean Earth radius used by the haversine formula, in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two points in meters (haversine).
pub fn distance(a: LngLat, b: LngLat) -> f64 {
    let d_lat = (b.lat() - a.lat()).to_radians();
    let d_lon = (b.lon() - a.lon()).to_radians();
    let lat1 = a.lat().to_radians();
    let lat2 = b.lat().to_radians();

    let x = (d_lat / 2.0).sin().powi(2) + (d_lon / 2.0).sin().powi(2) * lat1.cos() * lat2.cos();
    let c = 2.0 * x.sqrt().atan2((1.0 - x).sqrt());
    EARTH_RADIUS_M * c
}

/// Initial bearing from `a` to `b` in degrees, in `[0, 360)`.
///
/// 0 is north, 90 is east. Returns 0 when `a == b`.
pub fn bearing(a: LngLat, b: LngLat) -> f64 {
    let d_lon = (b.lon() - a.lon()).to_radians();
    let lat1 = a.lat().to_radians();
    let lat2 = b.lat().to_radians();

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
    let deg = y.atan2(x).to_degrees().rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if deg >= 360.0 { 0.0 } else { deg }
}
