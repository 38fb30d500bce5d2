//! Journey optimizer.
//!
//! Finds the fastest way from the rider's position to a destination using
//! walking plus at most one bus ride. The search runs in phases:
//!
//! 1. Walk-only baseline and every route's geometry, fetched concurrently.
//! 2. Per route, walking directions to the nearest stops at each end.
//! 3. Every (board, alight) pair is costed without I/O.
//! 4. Candidates are tried fastest first; the first whose legs re-fetch
//!    and whose geometry slices cleanly wins.
//!
//! Walk-only is kept unless the bus saves more than a small margin.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, info, warn};

use crate::directions::{DirectionsProvider, ProviderError, WalkDirections};
use crate::domain::{
    Coordinate, Destination, DomainError, Journey, RouteCatalog, RouteConfig, RouteStopConfig,
};
use crate::geometry::{PolylineCache, RouteInterpolator, RoutePolyline};
use crate::nearest::find_k_nearest_stops;

use super::assemble::{MultimodalPlan, assemble, multimodal_segments, walk_only_segments};
use super::bus::{BusLeg, estimate_bus_leg};
use super::config::PlannerConfig;

/// Error from journey planning.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PlanError {
    /// Neither walking nor any bus combination reaches the destination
    #[error("could not plan a route")]
    NoRouteFound,

    /// Invalid plan request
    #[error("invalid plan request: {0}")]
    InvalidRequest(String),

    /// Assembled segments did not form a valid journey
    #[error("journey assembly failed: {0}")]
    Assembly(#[from] DomainError),
}

/// Request for journey planning.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    /// Where the rider is now.
    pub origin: Coordinate,

    /// Where the rider wants to go.
    pub destination: Destination,
}

impl PlanRequest {
    /// Create a new plan request.
    pub fn new(origin: Coordinate, destination: Destination) -> Self {
        Self {
            origin,
            destination,
        }
    }

    /// Validate the plan request.
    pub fn validate(&self) -> Result<(), PlanError> {
        if !self.origin.is_valid() {
            return Err(PlanError::InvalidRequest(format!(
                "origin {} is not a valid coordinate",
                self.origin
            )));
        }

        let destination = self.destination.coordinate();
        if !destination.is_valid() {
            return Err(PlanError::InvalidRequest(format!(
                "destination {destination} is not a valid coordinate"
            )));
        }

        Ok(())
    }
}

/// Run a provider call, giving up at `deadline`.
async fn within<T>(
    deadline: Instant,
    call: impl Future<Output = Result<T, ProviderError>>,
) -> Result<T, ProviderError> {
    timeout_at(deadline, call)
        .await
        .unwrap_or(Err(ProviderError::DeadlineExceeded))
}

/// A configured route whose geometry resolved.
struct ResolvedRoute<'a> {
    config: &'a RouteConfig,
    interpolator: Arc<RouteInterpolator>,
}

/// A stop reachable on foot within the limits.
#[derive(Debug, Clone, Copy)]
struct StopWalk<'a> {
    stop: &'a RouteStopConfig,
    duration_sec: f64,
}

/// A costed (board, alight) pair, not yet re-fetched.
struct Candidate<'a> {
    route: &'a RouteConfig,
    interpolator: Arc<RouteInterpolator>,
    board: &'a RouteStopConfig,
    alight: &'a RouteStopConfig,
    bus: BusLeg<'a>,
    total_sec: f64,
}

/// Walking leg to request: the stop it serves, then from and to.
type WalkLeg<'a> = (&'a RouteStopConfig, Coordinate, Coordinate);

enum Choice<'a> {
    WalkOnly(WalkDirections),
    Multimodal(MultimodalPlan<'a>),
}

/// Pick between the walk-only baseline and the best bus journey.
///
/// Walk-only wins ties and anything within `margin_secs` of the bus.
fn choose<'a>(
    walk_only: Option<WalkDirections>,
    best: Option<MultimodalPlan<'a>>,
    margin_secs: f64,
) -> Option<Choice<'a>> {
    match (walk_only, best) {
        (Some(walk), Some(plan)) if walk.duration_sec > plan.total_sec + margin_secs => {
            Some(Choice::Multimodal(plan))
        }
        (Some(walk), _) => Some(Choice::WalkOnly(walk)),
        (None, Some(plan)) => Some(Choice::Multimodal(plan)),
        (None, None) => None,
    }
}

/// Journey planner over a fixed route catalog.
pub struct Planner<'a, P: DirectionsProvider> {
    provider: &'a P,
    catalog: &'a RouteCatalog,
    polylines: &'a PolylineCache,
    config: &'a PlannerConfig,
}

impl<'a, P: DirectionsProvider> Planner<'a, P> {
    /// Create a new planner.
    pub fn new(
        provider: &'a P,
        catalog: &'a RouteCatalog,
        polylines: &'a PolylineCache,
        config: &'a PlannerConfig,
    ) -> Self {
        Self {
            provider,
            catalog,
            polylines,
            config,
        }
    }

    /// Plan a journey starting now.
    pub async fn plan(&self, request: &PlanRequest) -> Result<Journey, PlanError> {
        self.plan_at(request, Utc::now()).await
    }

    /// Plan a journey starting at `now`.
    pub async fn plan_at(
        &self,
        request: &PlanRequest,
        now: DateTime<Utc>,
    ) -> Result<Journey, PlanError> {
        request.validate()?;

        let deadline = Instant::now() + self.config.request_deadline();
        let origin = request.origin;
        let dest = request.destination.coordinate();

        debug!(%origin, destination = %request.destination.name, "planning journey");

        let (walk_only, routes) = tokio::join!(
            self.walk(origin, dest, deadline),
            self.resolve_routes(deadline),
        );

        let walk_only = match walk_only {
            Ok(walk) => Some(walk),
            Err(e) => {
                debug!(error = %e, "walk-only directions unavailable");
                None
            }
        };
        let baseline = walk_only
            .as_ref()
            .map_or(f64::INFINITY, |w| w.duration_sec);

        let mut candidates = Vec::new();
        for route in &routes {
            candidates.extend(
                self.route_candidates(route, origin, dest, baseline, deadline)
                    .await,
            );
        }

        // Stable sort: equal totals keep enumeration order
        candidates.sort_by(|a, b| a.total_sec.total_cmp(&b.total_sec));
        debug!(
            routes = routes.len(),
            candidates = candidates.len(),
            "candidates beating walk-only"
        );

        let mut best = None;
        for candidate in candidates {
            if let Some(plan) = self.realise(candidate, origin, dest, deadline).await {
                best = Some(plan);
                break;
            }
        }

        let (segments, total_sec) =
            match choose(walk_only, best, self.config.walk_only_margin_secs) {
                Some(Choice::WalkOnly(walk)) => {
                    let total = walk.duration_sec;
                    info!(duration_sec = total, "walk-only journey chosen");
                    (walk_only_segments(origin, &request.destination, walk), total)
                }
                Some(Choice::Multimodal(plan)) => {
                    let total = plan.total_sec;
                    info!(
                        route = %plan.route.route_id,
                        board = %plan.board.id,
                        alight = %plan.alight.id,
                        duration_sec = total,
                        "multimodal journey chosen"
                    );
                    (multimodal_segments(origin, &request.destination, plan), total)
                }
                None => {
                    info!(%origin, destination = %request.destination.name, "no route found");
                    return Err(PlanError::NoRouteFound);
                }
            };

        Ok(assemble(&request.destination, segments, total_sec, now)?)
    }

    /// Walking directions, bounded by `deadline` and checked for sane values.
    async fn walk(
        &self,
        from: Coordinate,
        to: Coordinate,
        deadline: Instant,
    ) -> Result<WalkDirections, ProviderError> {
        within(deadline, self.provider.walk_directions(from, to))
            .await
            .and_then(WalkDirections::validate)
    }

    fn batch_size(&self) -> usize {
        self.config.max_concurrent_requests.max(1)
    }

    /// Fetch every route's geometry; routes that fail are skipped.
    async fn resolve_routes(&self, deadline: Instant) -> Vec<ResolvedRoute<'a>> {
        let mut resolved = Vec::new();

        for batch in self.catalog.routes().chunks(self.batch_size()) {
            let futures: Vec<_> = batch
                .iter()
                .map(|route| async move {
                    let result = within(deadline, self.provider.route_geometry(&route.route_id)).await;
                    (route, result)
                })
                .collect();

            for (route, result) in join_all(futures).await {
                let coords = match result {
                    Ok(coords) => coords,
                    Err(e) => {
                        warn!(
                            route = %route.route_id,
                            error = %e,
                            "route geometry unavailable, skipping route"
                        );
                        continue;
                    }
                };

                match RoutePolyline::new(coords) {
                    Ok(polyline) => resolved.push(ResolvedRoute {
                        config: route,
                        interpolator: self.polylines.get_or_build(polyline),
                    }),
                    Err(e) => warn!(
                        route = %route.route_id,
                        error = %e,
                        "unusable route geometry, skipping route"
                    ),
                }
            }
        }

        resolved
    }

    /// The `k` nearest stops to `point` within straight-line walking range.
    fn stops_near(&self, point: Coordinate, route: &'a RouteConfig) -> Vec<&'a RouteStopConfig> {
        find_k_nearest_stops(point, &route.stops, self.config.k_nearest)
            .into_iter()
            .filter(|near| near.distance_meters <= self.config.max_walk_meters)
            .map(|near| near.stop)
            .collect()
    }

    /// Fetch walking directions for each leg and keep the stops within the
    /// walking time limit.
    async fn walk_phase(
        &self,
        route: &RouteConfig,
        legs: &[WalkLeg<'a>],
        deadline: Instant,
    ) -> Vec<StopWalk<'a>> {
        let mut admitted = Vec::new();

        for batch in legs.chunks(self.batch_size()) {
            let futures: Vec<_> = batch
                .iter()
                .map(|&(stop, from, to)| async move {
                    let result = self.walk(from, to, deadline).await;
                    (stop, result)
                })
                .collect();

            for (stop, result) in join_all(futures).await {
                match result {
                    Ok(walk) if walk.duration_sec <= self.config.max_walk_duration_secs => {
                        admitted.push(StopWalk {
                            stop,
                            duration_sec: walk.duration_sec,
                        });
                    }
                    Ok(walk) => debug!(
                        route = %route.route_id,
                        stop = %stop.id,
                        duration_sec = walk.duration_sec,
                        "walk too long, skipping stop"
                    ),
                    Err(e) => debug!(
                        route = %route.route_id,
                        stop = %stop.id,
                        error = %e,
                        "walking directions unavailable, skipping stop"
                    ),
                }
            }
        }

        admitted
    }

    /// Cost every (board, alight) pair on one route, keeping those faster
    /// than `baseline` seconds.
    async fn route_candidates(
        &self,
        route: &ResolvedRoute<'a>,
        origin: Coordinate,
        dest: Coordinate,
        baseline: f64,
        deadline: Instant,
    ) -> Vec<Candidate<'a>> {
        let config: &'a RouteConfig = route.config;

        let board_legs: Vec<WalkLeg<'a>> = self
            .stops_near(origin, config)
            .into_iter()
            .map(|stop| (stop, origin, stop.coordinate()))
            .collect();
        let alight_legs: Vec<WalkLeg<'a>> = self
            .stops_near(dest, config)
            .into_iter()
            .map(|stop| (stop, stop.coordinate(), dest))
            .collect();

        let (boards, alights) = tokio::join!(
            self.walk_phase(config, &board_legs, deadline),
            self.walk_phase(config, &alight_legs, deadline),
        );

        debug!(
            route = %config.route_id,
            boards = boards.len(),
            alights = alights.len(),
            "stops within walking range"
        );

        let mut candidates = Vec::new();
        for board in &boards {
            for alight in &alights {
                if board.stop.id == alight.stop.id {
                    continue;
                }

                let bus = estimate_bus_leg(
                    &route.interpolator,
                    &config.stops,
                    board.stop,
                    alight.stop,
                    self.config,
                );
                let total_sec = board.duration_sec + bus.duration_sec + alight.duration_sec;

                if total_sec < baseline {
                    candidates.push(Candidate {
                        route: config,
                        interpolator: Arc::clone(&route.interpolator),
                        board: board.stop,
                        alight: alight.stop,
                        bus,
                        total_sec,
                    });
                }
            }
        }

        candidates
    }

    /// Re-fetch the winning legs and slice the bus geometry.
    ///
    /// Returns `None` if either walk is unavailable or the slice degenerates.
    async fn realise(
        &self,
        candidate: Candidate<'a>,
        origin: Coordinate,
        dest: Coordinate,
        deadline: Instant,
    ) -> Option<MultimodalPlan<'a>> {
        let Candidate {
            route,
            interpolator,
            board,
            alight,
            bus,
            total_sec,
        } = candidate;

        let (to_board, from_alight) = tokio::join!(
            self.walk(origin, board.coordinate(), deadline),
            self.walk(alight.coordinate(), dest, deadline),
        );

        let (walk_to_board, walk_from_alight) = match (to_board, from_alight) {
            (Ok(to_board), Ok(from_alight)) => (to_board, from_alight),
            (Err(e), _) | (_, Err(e)) => {
                debug!(
                    route = %route.route_id,
                    board = %board.id,
                    alight = %alight.id,
                    error = %e,
                    "walk re-fetch failed, skipping candidate"
                );
                return None;
            }
        };

        let bus_geometry = interpolator.slice_with_step(
            bus.board_along,
            bus.alight_along,
            self.config.slice_step_meters,
        );
        if bus_geometry.len() < 2 {
            debug!(
                route = %route.route_id,
                board = %board.id,
                alight = %alight.id,
                "degenerate bus geometry, skipping candidate"
            );
            return None;
        }

        Some(MultimodalPlan {
            route,
            board,
            alight,
            walk_to_board,
            walk_from_alight,
            bus,
            bus_geometry,
            total_sec,
        })
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
