//! Geometry kernel.
//!
//! Great-circle distance and bearing, plus distance-parameterized queries
//! over fixed route polylines: point-at-distance, bearing-at-distance,
//! nearest-point projection and arc slicing. Everything here is pure math
//! except [`PolylineCache`], which memoizes per-polyline distance tables.

mod cache;
mod polyline;
mod sphere;

pub use cache::{PolylineCache, PolylineKey};
pub use polyline::{
    CumulativeDistanceTable, DEFAULT_SLICE_STEP_M, GeometryError, Projection, RouteInterpolator,
    RoutePolyline,
};
pub use sphere::{EARTH_RADIUS_M, bearing, distance};
