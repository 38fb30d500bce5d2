//! Directions provider error types.

use crate::domain::RouteId;

/// Errors from a walking-directions or route-geometry provider.
///
/// The planner treats every variant the same way: the candidate or route
/// that needed the answer is skipped. None of these reach the rider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body could not be parsed
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Provider answered but has no route between the points
    #[error("no route found")]
    NoRoute,

    /// The planning deadline passed before the provider answered
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// Provider answered with a duration or distance no walk can have
    #[error("invalid directions: {0}")]
    InvalidDirections(String),

    /// Provider has no geometry for this route id
    #[error("no geometry for route {0}")]
    UnknownRoute(RouteId),
}
