//! Static transit route configuration.
//!
//! Routes are supplied once at startup and are immutable afterwards. Each
//! route carries its ordered stop sequence; the polyline geometry is fetched
//! separately through a [`DirectionsProvider`](crate::directions::DirectionsProvider).

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ConfigError, Coordinate, LngLat};

/// Identifier of a configured transit route (e.g. `P2P_EXPRESS`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteId(String);

impl RouteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identifier used by rendering clients: lower-cased, with the first
    /// underscore replaced by a hyphen.
    ///
    /// ```
    /// use trip_server::domain::RouteId;
    ///
    /// assert_eq!(RouteId::new("P2P_EXPRESS").slug(), "p2p-express");
    /// assert_eq!(RouteId::new("BAITY_HILL").slug(), "baity-hill");
    /// ```
    pub fn slug(&self) -> String {
        self.0.to_lowercase().replacen('_', "-", 1)
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stop bound to one route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStopConfig {
    pub id: String,
    pub name: String,
    /// Stop position, `[lon, lat]`.
    pub coord: LngLat,
    /// Ordinal position in the route's stop sequence (0-based).
    pub index: usize,
}

impl RouteStopConfig {
    /// The stop position in `{lat, lon}` form.
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::from(self.coord)
    }
}

/// A configured transit route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteConfig {
    pub route_id: RouteId,
    pub route_name: String,
    #[serde(default)]
    pub route_color: Option<String>,
    pub stops: Vec<RouteStopConfig>,
    /// Optional fixed geometry, served by the offline directions provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Vec<LngLat>>,
}

impl RouteConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.stops.is_empty() {
            return Err(ConfigError::EmptyRoute(self.route_id.clone()));
        }

        let mut seen = HashSet::new();
        for (position, stop) in self.stops.iter().enumerate() {
            if !seen.insert(stop.id.as_str()) {
                return Err(ConfigError::DuplicateStop {
                    route: self.route_id.clone(),
                    stop: stop.id.clone(),
                });
            }
            // The optimizer walks the sequence by index, so it must be positional.
            if stop.index != position {
                return Err(ConfigError::StopIndexMismatch {
                    route: self.route_id.clone(),
                    stop: stop.id.clone(),
                    index: stop.index,
                    position,
                });
            }
            if !stop.coordinate().is_valid() {
                return Err(ConfigError::InvalidStopCoordinate {
                    route: self.route_id.clone(),
                    stop: stop.id.clone(),
                });
            }
        }

        Ok(())
    }
}

/// The validated, immutable set of configured routes.
#[derive(Debug, Clone, Default)]
pub struct RouteCatalog {
    routes: Vec<RouteConfig>,
}

impl RouteCatalog {
    /// Validate and wrap a list of routes.
    pub fn new(routes: Vec<RouteConfig>) -> Result<Self, ConfigError> {
        let mut ids = HashSet::new();
        for route in &routes {
            if !ids.insert(route.route_id.clone()) {
                return Err(ConfigError::DuplicateRoute(route.route_id.clone()));
            }
            route.validate()?;
        }
        Ok(Self { routes })
    }

    /// Parse and validate a JSON array of routes.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let routes: Vec<RouteConfig> =
            serde_json::from_str(json).map_err(|e| ConfigError::Json {
                message: e.to_string(),
            })?;
        Self::new(routes)
    }

    /// Load and validate a JSON route file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn routes(&self) -> &[RouteConfig] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn stop(id: &str, index: usize, lon: f64, lat: f64) -> RouteStopConfig {
        RouteStopConfig {
            id: id.to_string(),
            name: format!("Stop {id}"),
            coord: LngLat(lon, lat),
            index,
        }
    }

    fn route(id: &str, stops: Vec<RouteStopConfig>) -> RouteConfig {
        RouteConfig {
            route_id: RouteId::new(id),
            route_name: id.to_string(),
            route_color: None,
            stops,
            geometry: None,
        }
    }

    #[test]
    fn valid_catalog() {
        let catalog = RouteCatalog::new(vec![route(
            "A",
            vec![stop("a0", 0, -79.05, 35.91), stop("a1", 1, -79.04, 35.91)],
        )])
        .unwrap();

        assert_eq!(catalog.len(), 1);
        assert!(!catalog.is_empty());
        assert_eq!(catalog.routes()[0].stops[1].index, 1);
    }

    #[test]
    fn rejects_duplicate_route() {
        let r = route("A", vec![stop("a0", 0, -79.05, 35.91)]);
        let err = RouteCatalog::new(vec![r.clone(), r]).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateRoute(_)));
    }

    #[test]
    fn rejects_empty_route() {
        let err = RouteCatalog::new(vec![route("A", vec![])]).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyRoute(_)));
    }

    #[test]
    fn rejects_non_positional_index() {
        let err = RouteCatalog::new(vec![route(
            "A",
            vec![stop("a0", 0, -79.05, 35.91), stop("a1", 2, -79.04, 35.91)],
        )])
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::StopIndexMismatch {
                index: 2,
                position: 1,
                ..
            }
        ));
    }

    #[test]
    fn rejects_duplicate_stop() {
        let err = RouteCatalog::new(vec![route(
            "A",
            vec![stop("a0", 0, -79.05, 35.91), stop("a0", 1, -79.04, 35.91)],
        )])
        .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateStop { .. }));
    }

    #[test]
    fn rejects_swapped_coordinates() {
        // lat/lon swapped puts latitude out of range
        let err = RouteCatalog::new(vec![route("A", vec![stop("a0", 0, 35.91, -179.0)])])
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidStopCoordinate { .. }));
    }

    #[test]
    fn parses_json() {
        let json = r##"[
            {
                "routeId": "P2P_EXPRESS",
                "routeName": "P2P Express",
                "routeColor": "#418FC5",
                "stops": [
                    {"id": "p0", "name": "Union", "coord": [-79.0469, 35.9105], "index": 0},
                    {"id": "p1", "name": "Franklin", "coord": [-79.0560, 35.9130], "index": 1}
                ]
            }
        ]"##;

        let catalog = RouteCatalog::from_json(json).unwrap();
        let route = &catalog.routes()[0];
        assert_eq!(route.route_name, "P2P Express");
        assert_eq!(route.route_color.as_deref(), Some("#418FC5"));
        assert_eq!(route.stops[1].coord, LngLat(-79.0560, 35.9130));
        assert_eq!(route.stops[1].coordinate().lat, 35.9130);
        assert!(route.geometry.is_none());
    }

    #[test]
    fn rejects_malformed_json() {
        let err = RouteCatalog::from_json("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"routeId": "A", "routeName": "A", "stops": [{{"id": "a0", "name": "A0", "coord": [-79.0, 35.9], "index": 0}}]}}]"#
        )
        .unwrap();

        let catalog = RouteCatalog::from_json_file(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn bundled_routes_are_valid() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/routes.json");
        let catalog = RouteCatalog::from_json_file(path).unwrap();

        assert_eq!(catalog.len(), 2);
        let ids: Vec<_> = catalog.routes().iter().map(|r| r.route_id.as_str()).collect();
        assert_eq!(ids, ["P2P_EXPRESS", "BAITY_HILL"]);
        let p2p = &catalog.routes()[0];
        assert_eq!(p2p.route_color.as_deref(), Some("#418FC5"));
        assert!(catalog
            .routes()
            .iter()
            .all(|r| r.geometry.as_ref().is_some_and(|g| g.len() >= 2)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = RouteCatalog::from_json_file(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
