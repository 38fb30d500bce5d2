//! Domain types for the trip planner.
//!
//! This module contains the core domain model: the two coordinate
//! conventions, static route configuration, and the planned journey
//! returned to clients. Route configuration enforces its invariants at
//! construction time, so code holding a `RouteCatalog` can trust it.

mod coordinate;
mod error;
mod journey;
mod route;

pub use coordinate::{Coordinate, LngLat};
pub use error::{ConfigError, DomainError};
pub use journey::{
    BusSegment, Destination, Journey, JourneySegment, LineString, WalkSegment, WalkingStep,
};
pub use route::{RouteCatalog, RouteConfig, RouteId, RouteStopConfig};
