//! Distance-parameterized queries over a route polyline.
//!
//! All positions along a route are expressed as "distance along": meters of
//! great-circle path length from the first vertex. Interpolation *between*
//! vertices is linear in lon/lat space, and nearest-point projection is
//! planar. Both are deliberate approximations that hold for the short edges
//! of a bus route; long-edge polylines would need geodesic versions, which
//! change numeric outputs.

use std::sync::Arc;

use crate::domain::LngLat;

use super::sphere::{bearing, distance};

/// Default resampling step for [`RouteInterpolator::slice`], in meters.
pub const DEFAULT_SLICE_STEP_M: f64 = 20.0;

/// Error constructing a polyline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("polyline needs at least 2 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("polyline vertex {0} is not finite")]
    NonFiniteVertex(usize),
}

/// An immutable route path with at least two vertices.
///
/// Cloning is cheap; vertices are shared.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePolyline {
    vertices: Arc<[LngLat]>,
}

impl RoutePolyline {
    pub fn new(vertices: Vec<LngLat>) -> Result<Self, GeometryError> {
        if vertices.len() < 2 {
            return Err(GeometryError::TooFewVertices(vertices.len()));
        }
        if let Some(i) = vertices
            .iter()
            .position(|v| !v.lon().is_finite() || !v.lat().is_finite())
        {
            return Err(GeometryError::NonFiniteVertex(i));
        }
        Ok(Self {
            vertices: vertices.into(),
        })
    }

    pub fn vertices(&self) -> &[LngLat] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always false; a polyline has at least two vertices.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn first(&self) -> LngLat {
        self.vertices[0]
    }

    pub fn last(&self) -> LngLat {
        self.vertices[self.vertices.len() - 1]
    }
}

/// Running great-circle distance from vertex 0 to each vertex.
///
/// # Invariants
///
/// - Same length as the polyline
/// - `table[0] == 0`
/// - Non-decreasing
/// - Last entry is the total route length
#[derive(Debug, Clone, PartialEq)]
pub struct CumulativeDistanceTable(Vec<f64>);

impl CumulativeDistanceTable {
    /// One `distance()` call per edge.
    pub fn build(polyline: &RoutePolyline) -> Self {
        let mut table = Vec::with_capacity(polyline.len());
        let mut running = 0.0;
        table.push(running);
        for edge in polyline.vertices().windows(2) {
            running += distance(edge[0], edge[1]);
            table.push(running);
        }
        Self(table)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn total_length(&self) -> f64 {
        self.0.last().copied().unwrap_or(0.0)
    }
}

/// Result of projecting a point onto a route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Distance along the route of the nearest point, in `[0, total]`.
    pub distance_along: f64,
    pub nearest_point: LngLat,
}

/// Where a distance falls on the route after wrapping.
enum Position {
    Start,
    End,
    /// Strictly inside edge `index` (from vertex `index` to `index + 1`).
    Edge { index: usize, distance: f64 },
}

/// A polyline paired with its cumulative distance table.
#[derive(Debug, Clone)]
pub struct RouteInterpolator {
    polyline: RoutePolyline,
    table: CumulativeDistanceTable,
}

impl RouteInterpolator {
    pub fn new(polyline: RoutePolyline) -> Self {
        let table = CumulativeDistanceTable::build(&polyline);
        Self { polyline, table }
    }

    pub fn polyline(&self) -> &RoutePolyline {
        &self.polyline
    }

    pub fn table(&self) -> &CumulativeDistanceTable {
        &self.table
    }

    pub fn total_length(&self) -> f64 {
        self.table.total_length()
    }

    /// Wrap a distance onto the route.
    ///
    /// Distances are circular: negatives count back from the end. An exact
    /// positive multiple of the total length lands on the end rather than
    /// wrapping to the start.
    fn locate(&self, distance: f64) -> Position {
        let total = self.total_length();
        if !(total > 0.0) || !distance.is_finite() {
            return Position::Start;
        }

        let mut d = distance.rem_euclid(total);
        if d == 0.0 && distance > 0.0 {
            d = total;
        }

        if d <= 0.0 {
            Position::Start
        } else if d >= total {
            Position::End
        } else {
            // table[0] == 0 < d < total == table[last], so 1 <= j <= last
            let j = self.table.as_slice().partition_point(|&c| c < d);
            Position::Edge {
                index: j - 1,
                distance: d,
            }
        }
    }

    /// The point at `distance` meters along the route.
    pub fn point_at(&self, distance: f64) -> LngLat {
        match self.locate(distance) {
            Position::Start => self.polyline.first(),
            Position::End => self.polyline.last(),
            Position::Edge { index, distance } => {
                let table = self.table.as_slice();
                let v = self.polyline.vertices();
                let (a, b) = (v[index], v[index + 1]);
                let t = (distance - table[index]) / (table[index + 1] - table[index]);
                LngLat::new(
                    a.lon() + t * (b.lon() - a.lon()),
                    a.lat() + t * (b.lat() - a.lat()),
                )
            }
        }
    }

    /// Heading in degrees of the edge under `distance`.
    ///
    /// At or beyond the end this is the final edge's bearing: you keep
    /// facing the way you were travelling rather than snapping to the
    /// first edge.
    pub fn bearing_at(&self, distance: f64) -> f64 {
        let v = self.polyline.vertices();
        match self.locate(distance) {
            Position::Start => bearing(v[0], v[1]),
            Position::End => bearing(v[v.len() - 2], v[v.len() - 1]),
            Position::Edge { index, .. } => bearing(v[index], v[index + 1]),
        }
    }

    /// Project a point onto the nearest location on the route.
    ///
    /// Uses planar nearest-point math per edge and keeps the global minimum;
    /// ties go to the lowest edge index.
    pub fn project(&self, point: LngLat) -> Projection {
        let v = self.polyline.vertices();
        let table = self.table.as_slice();

        let mut best_dist_sq = f64::INFINITY;
        let mut best_edge = 0;
        let mut best_t = 0.0;

        for (i, edge) in v.windows(2).enumerate() {
            let (a, b) = (edge[0], edge[1]);
            let ax = a.lon() - point.lon();
            let ay = a.lat() - point.lat();
            let bx = b.lon() - a.lon();
            let by = b.lat() - a.lat();
            let len_sq = bx * bx + by * by;
            let denom = if len_sq == 0.0 { 1.0 } else { len_sq };
            let t = (-(ax * bx + ay * by) / denom).clamp(0.0, 1.0);

            let px = a.lon() + t * bx;
            let py = a.lat() + t * by;
            let dist_sq = (point.lon() - px).powi(2) + (point.lat() - py).powi(2);

            if dist_sq < best_dist_sq {
                best_dist_sq = dist_sq;
                best_edge = i;
                best_t = t;
            }
        }

        let (a, b) = (v[best_edge], v[best_edge + 1]);
        let along = table[best_edge] + best_t * (table[best_edge + 1] - table[best_edge]);

        Projection {
            distance_along: along.clamp(0.0, self.total_length()),
            nearest_point: LngLat::new(
                a.lon() + best_t * (b.lon() - a.lon()),
                a.lat() + best_t * (b.lat() - a.lat()),
            ),
        }
    }

    /// Resampled path from `d_start` to `d_end` every ~20 m.
    pub fn slice(&self, d_start: f64, d_end: f64) -> Vec<LngLat> {
        self.slice_with_step(d_start, d_end, DEFAULT_SLICE_STEP_M)
    }

    /// Resampled path from `d_start` to `d_end`, travelling forward.
    ///
    /// When `d_end` is behind `d_start` (after wrapping both onto the route)
    /// the path runs on through the last vertex and back in from the first,
    /// as a bus on a loop does. Each run has at least 2 intervals. Equal
    /// endpoints give exactly two identical points. A zero-length route gives
    /// an empty slice.
    pub fn slice_with_step(&self, d_start: f64, d_end: f64, step_meters: f64) -> Vec<LngLat> {
        let total = self.total_length();
        if !(total > 0.0) || !d_start.is_finite() || !d_end.is_finite() {
            return Vec::new();
        }
        let step = if step_meters > 0.0 {
            step_meters
        } else {
            DEFAULT_SLICE_STEP_M
        };

        let start = d_start.rem_euclid(total);
        let end = d_end.rem_euclid(total);

        if start == end {
            let p = self.point_at(start);
            return vec![p, p];
        }

        let mut out = Vec::new();
        if end > start {
            self.sample_into(&mut out, start, end, step, true);
        } else {
            self.sample_into(&mut out, start, total, step, true);
            let first = self.polyline.first();
            if out.last() != Some(&first) {
                out.push(first);
            }
            if end > 0.0 {
                self.sample_into(&mut out, 0.0, end, step, false);
            }
        }
        out
    }

    fn sample_into(&self, out: &mut Vec<LngLat>, from: f64, to: f64, step: f64, include_start: bool) {
        let n = ((to - from) / step).ceil().max(2.0) as usize;
        let first = if include_start { 0 } else { 1 };
        for i in first..=n {
            // Pin the last sample so rounding can't wrap `to == total` back to the start.
            let d = if i == n {
                to
            } else {
                from + (i as f64 / n as f64) * (to - from)
            };
            out.push(self.point_at(d));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// An L-shaped route heading east then north, four edges of about 100 m.
    fn l_route() -> RouteInterpolator {
        RouteInterpolator::new(
            RoutePolyline::new(vec![
                LngLat::new(-79.0500, 35.9000),
                LngLat::new(-79.0489, 35.9000),
                LngLat::new(-79.0478, 35.9000),
                LngLat::new(-79.0478, 35.9009),
                LngLat::new(-79.0478, 35.9018),
            ])
            .unwrap(),
        )
    }

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    fn close_pt(a: LngLat, b: LngLat) -> bool {
        close(a.lon(), b.lon(), 1e-9) && close(a.lat(), b.lat(), 1e-9)
    }

    #[test]
    fn rejects_short_polyline() {
        assert_eq!(
            RoutePolyline::new(vec![LngLat::new(0.0, 0.0)]),
            Err(GeometryError::TooFewVertices(1))
        );
        assert_eq!(
            RoutePolyline::new(vec![LngLat::new(0.0, 0.0), LngLat::new(f64::NAN, 0.0)]),
            Err(GeometryError::NonFiniteVertex(1))
        );
    }

    #[test]
    fn cumulative_table_invariants() {
        let route = l_route();
        let table = route.table().as_slice();
        assert_eq!(table.len(), route.polyline().len());
        assert_eq!(table[0], 0.0);
        assert!(table.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(table[table.len() - 1], route.total_length());
    }

    #[test]
    fn endpoints_are_exact() {
        let route = l_route();
        let total = route.total_length();
        assert_eq!(route.point_at(0.0), route.polyline().first());
        assert_eq!(route.point_at(total), route.polyline().last());
        assert!(close_pt(route.point_at(total + 50.0), route.point_at(50.0)));
    }

    #[test]
    fn point_at_vertex_distances() {
        let route = l_route();
        let table = route.table().as_slice().to_vec();
        for (i, d) in table.iter().enumerate() {
            assert!(close_pt(route.point_at(*d), route.polyline().vertices()[i]));
        }
    }

    #[test]
    fn negative_distance_counts_back_from_end() {
        let route = l_route();
        let total = route.total_length();
        assert!(close_pt(route.point_at(-10.0), route.point_at(total - 10.0)));
    }

    #[test]
    fn bearing_at_end_uses_final_edge() {
        let route = l_route();
        let total = route.total_length();

        // First edge heads east, final edge heads north.
        assert!(close(route.bearing_at(0.0), 90.0, 0.01));
        assert!(close(route.bearing_at(total), 0.0, 0.01));
        // point_at wraps beyond the end, but the exact end is not the start.
        assert_ne!(route.point_at(total), route.point_at(0.0));
        assert!(close(route.bearing_at(total - 1.0), 0.0, 0.01));
    }

    #[test]
    fn project_onto_vertices() {
        let route = l_route();
        let table = route.table().as_slice().to_vec();
        for (i, vertex) in route.polyline().vertices().iter().enumerate() {
            let p = route.project(*vertex);
            assert!(close(p.distance_along, table[i], 1e-6));
            assert!(close_pt(p.nearest_point, *vertex));
        }
    }

    #[test]
    fn project_off_route_point() {
        let route = l_route();
        // A little south of the middle of the first edge
        let p = route.project(LngLat::new(-79.04945, 35.8998));
        assert!(close(p.nearest_point.lat(), 35.9000, 1e-12));
        assert!(close(p.nearest_point.lon(), -79.04945, 1e-12));
        let half_first_edge = route.table().as_slice()[1] / 2.0;
        assert!(close(p.distance_along, half_first_edge, 0.5));
    }

    #[test]
    fn slice_same_distance_is_degenerate() {
        let route = l_route();
        let s = route.slice(120.0, 120.0);
        assert_eq!(s.len(), 2);
        assert_eq!(s[0], s[1]);
    }

    #[test]
    fn slice_forward_spacing() {
        let route = l_route();
        let s = route.slice(0.0, 200.0);
        // 200 m / 20 m = 10 intervals
        assert_eq!(s.len(), 11);
        assert_eq!(s[0], route.polyline().first());
        assert!(close_pt(s[10], route.point_at(200.0)));
    }

    #[test]
    fn slice_short_span_has_at_least_two_intervals() {
        let route = l_route();
        let s = route.slice(10.0, 15.0);
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn slice_wraps_through_end_and_start() {
        let route = l_route();
        let total = route.total_length();
        let s = route.slice(total - 30.0, 30.0);

        let last = route.polyline().last();
        let first = route.polyline().first();
        let last_idx = s.iter().position(|p| *p == last).expect("passes last vertex");
        let first_idx = s.iter().position(|p| *p == first).expect("passes first vertex");
        assert_eq!(first_idx, last_idx + 1);
        assert!(close_pt(s[0], route.point_at(total - 30.0)));
        assert!(close_pt(*s.last().unwrap(), route.point_at(30.0)));
    }

    #[test]
    fn zero_length_route() {
        let p = LngLat::new(-79.0, 35.9);
        let route = RouteInterpolator::new(RoutePolyline::new(vec![p, p]).unwrap());
        assert_eq!(route.total_length(), 0.0);
        assert_eq!(route.point_at(10.0), p);
        assert_eq!(route.bearing_at(10.0), 0.0);
        assert!(route.slice(0.0, 10.0).is_empty());
    }
}
