//! Domain error types.
//!
//! Route configuration is validated once at startup. Any problem found here
//! is a programmer or deployment error, so the binary refuses to start
//! rather than planning against a broken catalog.

use super::{Coordinate, RouteId};

/// Domain-level errors for journey consistency.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Journey has no segments
    #[error("journey must have at least one segment")]
    EmptyJourney,

    /// Segment `index` does not start where the previous one ended
    #[error("segment {index} starts at {start} but the previous segment ends at {end}")]
    Discontinuous {
        index: usize,
        start: Coordinate,
        end: Coordinate,
    },

    /// Total duration is negative, not finite, or past the end of the calendar
    #[error("journey duration {0} s is out of range")]
    DurationOutOfRange(f64),
}

/// Errors raised while loading or validating route configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The route file could not be read
    #[error("failed to read route file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The route file is not valid JSON for a route list
    #[error("failed to parse route file: {message}")]
    Json { message: String },

    /// Two routes share an id
    #[error("duplicate route id {0}")]
    DuplicateRoute(RouteId),

    /// A route has no stops
    #[error("route {0} has no stops")]
    EmptyRoute(RouteId),

    /// Two stops on one route share an id
    #[error("route {route} has duplicate stop id {stop}")]
    DuplicateStop { route: RouteId, stop: String },

    /// A stop's `index` does not match its position in the stop sequence
    #[error("route {route}: stop {stop} has index {index} but sits at position {position}")]
    StopIndexMismatch {
        route: RouteId,
        stop: String,
        index: usize,
        position: usize,
    },

    /// A stop coordinate is out of range or not finite
    #[error("route {route}: stop {stop} has an invalid coordinate")]
    InvalidStopCoordinate { route: RouteId, stop: String },
}
