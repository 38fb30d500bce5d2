//! Coordinate types.
//!
//! Two point conventions coexist in this crate and must never be silently
//! swapped:
//!
//! - [`Coordinate`] is `{lat, lon}`, used for arbitrary points such as the
//!   rider's origin and destination.
//! - [`LngLat`] is `(lon, lat)`, used for all route polyline arithmetic and
//!   serialised as a `[lon, lat]` pair the way map renderers expect.
//!
//! Conversions between them go through `From` impls, never by reaching into
//! tuple fields at call sites.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A WGS84 point in degrees, latitude first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Creates a coordinate from latitude and longitude in degrees.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Returns true if both components are finite and inside WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// A point expressed as `(longitude, latitude)` in degrees.
///
/// Serialises as a two-element array `[lon, lat]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat(pub f64, pub f64);

impl LngLat {
    /// Creates a point from longitude and latitude, in that order.
    pub fn new(lon: f64, lat: f64) -> Self {
        Self(lon, lat)
    }

    pub fn lon(&self) -> f64 {
        self.0
    }

    pub fn lat(&self) -> f64 {
        self.1
    }
}

impl From<Coordinate> for LngLat {
    fn from(c: Coordinate) -> Self {
        LngLat(c.lon, c.lat)
    }
}

impl From<LngLat> for Coordinate {
    fn from(p: LngLat) -> Self {
        Coordinate {
            lat: p.1,
            lon: p.0,
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Converting to LngLat and back is lossless.
        #[test]
        fn roundtrip(lat in -90.0f64..=90.0, lon in -180.0f64..=180.0) {
            let c = Coordinate::new(lat, lon);
            prop_assert_eq!(Coordinate::from(LngLat::from(c)), c);
        }
    }
}
