//! Walking-directions and route-geometry gateway.
//!
//! The planner consumes two external capabilities through
//! [`DirectionsProvider`]:
//! - walking directions between two coordinates (duration, distance,
//!   geometry and turn-by-turn steps)
//! - the fixed polyline of a named transit route
//!
//! A failed call is never fatal to planning; the planner drops whatever
//! candidate or route depended on it.

mod client;
mod error;
mod mock;
mod types;

use std::future::Future;
use std::sync::Arc;

use crate::domain::{Coordinate, LngLat, RouteId};

pub use client::{DirectionsClient, DirectionsConfig};
pub use error::ProviderError;
pub use mock::StraightLineDirections;
pub use types::WalkDirections;

/// Source of walking directions and route geometry.
///
/// This abstraction allows the planner to be tested with scripted data.
pub trait DirectionsProvider: Send + Sync {
    /// Walking directions from `from` to `to`.
    fn walk_directions(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> impl Future<Output = Result<WalkDirections, ProviderError>> + Send;

    /// The polyline of a transit route, at least two vertices.
    fn route_geometry(
        &self,
        route_id: &RouteId,
    ) -> impl Future<Output = Result<Vec<LngLat>, ProviderError>> + Send;
}

impl DirectionsProvider for DirectionsClient {
    async fn walk_directions(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<WalkDirections, ProviderError> {
        DirectionsClient::walk_directions(self, from, to).await
    }

    async fn route_geometry(&self, route_id: &RouteId) -> Result<Vec<LngLat>, ProviderError> {
        DirectionsClient::route_geometry(self, route_id).await
    }
}

impl DirectionsProvider for StraightLineDirections {
    async fn walk_directions(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<WalkDirections, ProviderError> {
        StraightLineDirections::walk_directions(self, from, to).await
    }

    async fn route_geometry(&self, route_id: &RouteId) -> Result<Vec<LngLat>, ProviderError> {
        StraightLineDirections::route_geometry(self, route_id).await
    }
}

impl<P: DirectionsProvider> DirectionsProvider for Arc<P> {
    fn walk_directions(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> impl Future<Output = Result<WalkDirections, ProviderError>> + Send {
        (**self).walk_directions(from, to)
    }

    fn route_geometry(
        &self,
        route_id: &RouteId,
    ) -> impl Future<Output = Result<Vec<LngLat>, ProviderError>> + Send {
        (**self).route_geometry(route_id)
    }
}

/// The provider chosen at startup: the live proxy or the offline fallback.
#[derive(Debug, Clone)]
pub enum AnyDirections {
    Http(DirectionsClient),
    Offline(StraightLineDirections),
}

impl DirectionsProvider for AnyDirections {
    async fn walk_directions(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<WalkDirections, ProviderError> {
        match self {
            AnyDirections::Http(c) => c.walk_directions(from, to).await,
            AnyDirections::Offline(s) => s.walk_directions(from, to).await,
        }
    }

    async fn route_geometry(&self, route_id: &RouteId) -> Result<Vec<LngLat>, ProviderError> {
        match self {
            AnyDirections::Http(c) => c.route_geometry(route_id).await,
            AnyDirections::Offline(s) => s.route_geometry(route_id).await,
        }
    }
}
