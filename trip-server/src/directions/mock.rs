//! Offline directions provider.
//!
//! Serves straight-line walking estimates and the route geometries embedded
//! in the route configuration. Useful for development and demos without a
//! directions proxy.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{Coordinate, LngLat, RouteCatalog, RouteId, WalkingStep};
use crate::geometry::distance;

use super::error::ProviderError;
use super::types::WalkDirections;

/// Average walking speed, meters per second.
const WALKING_SPEED_MPS: f64 = 1.35;

/// Street paths are longer than the straight line between two points.
const DETOUR_FACTOR: f64 = 1.25;

/// Directions provider that needs no network.
#[derive(Debug, Clone, Default)]
pub struct StraightLineDirections {
    geometries: Arc<HashMap<RouteId, Vec<LngLat>>>,
}

impl StraightLineDirections {
    /// Build from the geometries embedded in a route catalog.
    ///
    /// Routes without embedded geometry answer `UnknownRoute`.
    pub fn from_catalog(catalog: &RouteCatalog) -> Self {
        let geometries = catalog
            .routes()
            .iter()
            .filter_map(|r| r.geometry.clone().map(|g| (r.route_id.clone(), g)))
            .collect();

        Self {
            geometries: Arc::new(geometries),
        }
    }

    /// Number of routes with geometry.
    pub fn route_count(&self) -> usize {
        self.geometries.len()
    }

    pub async fn walk_directions(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<WalkDirections, ProviderError> {
        let (a, b) = (LngLat::from(from), LngLat::from(to));
        let distance_meters = distance(a, b) * DETOUR_FACTOR;
        let duration_sec = distance_meters / WALKING_SPEED_MPS;

        Ok(WalkDirections {
            duration_sec,
            distance_meters,
            geometry: vec![a, b],
            steps: vec![WalkingStep {
                instruction: "Walk to destination".to_string(),
                distance_meters,
                duration_sec,
            }],
        })
    }

    pub async fn route_geometry(&self, route_id: &RouteId) -> Result<Vec<LngLat>, ProviderError> {
        match self.geometries.get(route_id) {
            Some(coords) if coords.len() >= 2 => Ok(coords.clone()),
            _ => Err(ProviderError::UnknownRoute(route_id.clone())),
        }
    }
}
