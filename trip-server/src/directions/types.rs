//! Directions payloads: the provider-neutral result type and the JSON
//! shapes returned by the directions proxy.

use serde::Deserialize;

use crate::domain::{LngLat, WalkingStep};

use super::error::ProviderError;

/// Walking directions between two points.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkDirections {
    pub duration_sec: f64,
    pub distance_meters: f64,
    /// Path geometry, `[lon, lat]` vertices.
    pub geometry: Vec<LngLat>,
    pub steps: Vec<WalkingStep>,
}

impl WalkDirections {
    /// Reject negative or non-finite durations and distances.
    pub fn validate(self) -> Result<Self, ProviderError> {
        if !(self.duration_sec.is_finite() && self.duration_sec >= 0.0) {
            return Err(ProviderError::InvalidDirections(format!(
                "duration {} s",
                self.duration_sec
            )));
        }
        if !(self.distance_meters.is_finite() && self.distance_meters >= 0.0) {
            return Err(ProviderError::InvalidDirections(format!(
                "distance {} m",
                self.distance_meters
            )));
        }
        Ok(self)
    }
}

/// GeoJSON-ish geometry wrapper as sent by the proxy.
#[derive(Debug, Deserialize)]
pub(crate) struct GeometryDto {
    pub coordinates: Option<Vec<LngLat>>,
}

/// Body of `GET /api/mapbox/directions/walk`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WalkDirectionsResponse {
    pub duration_sec: Option<f64>,
    pub distance_meters: Option<f64>,
    pub geometry: Option<GeometryDto>,
    #[serde(default)]
    pub steps: Vec<WalkingStep>,
}

/// Body of `GET /api/mapbox/route`.
#[derive(Debug, Deserialize)]
pub(crate) struct RouteGeometryResponse {
    pub geometry: Option<GeometryDto>,
}

/// Parse a walking-directions body. A body without geometry means no route.
pub(crate) fn parse_walk_directions(body: &str) -> Result<WalkDirections, ProviderError> {
    let response: WalkDirectionsResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Json {
            message: e.to_string(),
        })?;

    let geometry = response
        .geometry
        .and_then(|g| g.coordinates)
        .ok_or(ProviderError::NoRoute)?;

    WalkDirections {
        duration_sec: response.duration_sec.unwrap_or(0.0),
        distance_meters: response.distance_meters.unwrap_or(0.0),
        geometry,
        steps: response.steps,
    }
    .validate()
}

/// Parse a route-geometry body. Fewer than two coordinates means no route.
pub(crate) fn parse_route_geometry(body: &str) -> Result<Vec<LngLat>, ProviderError> {
    let response: RouteGeometryResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Json {
            message: e.to_string(),
        })?;

    match response.geometry.and_then(|g| g.coordinates) {
        Some(coords) if coords.len() >= 2 => Ok(coords),
        _ => Err(ProviderError::NoRoute),
    }
}
