//! Bus-leg estimation.
//!
//! A bus only travels forward along its route. When the alight stop comes
//! before the board stop in route order the ride wraps through the end of
//! the loop.

use crate::domain::RouteStopConfig;
use crate::geometry::RouteInterpolator;

use super::config::PlannerConfig;

/// Stops visited from `board_index` to `alight_index`, both included,
/// travelling forward and wrapping past the last stop if needed.
///
/// Indices are positions in `stops`. Out-of-range indices yield nothing.
pub fn ordered_stops_between(
    stops: &[RouteStopConfig],
    board_index: usize,
    alight_index: usize,
) -> Vec<&RouteStopConfig> {
    let n = stops.len();
    if board_index >= n || alight_index >= n {
        return Vec::new();
    }

    let hops = (alight_index + n - board_index) % n;
    (0..=hops).map(|i| &stops[(board_index + i) % n]).collect()
}

/// Forward arc length from `from` to `to` on a loop of length `total`.
pub fn forward_arc(from: f64, to: f64, total: f64) -> f64 {
    if to >= from {
        to - from
    } else {
        (total - from) + to
    }
}

/// Estimated bus ride between two stops.
#[derive(Debug, Clone, PartialEq)]
pub struct BusLeg<'a> {
    /// Board stop, intermediates, alight stop.
    pub stops: Vec<&'a RouteStopConfig>,
    /// Board stop's distance along the route.
    pub board_along: f64,
    /// Alight stop's distance along the route.
    pub alight_along: f64,
    /// Forward arc length travelled.
    pub distance_meters: f64,
    /// Ride time in whole seconds.
    pub duration_sec: f64,
}

impl BusLeg<'_> {
    /// Number of stops between board and alight, exclusive.
    pub fn intermediate_stops(&self) -> usize {
        self.stops.len().saturating_sub(2)
    }

    pub fn stop_ids(&self) -> Vec<String> {
        self.stops.iter().map(|s| s.id.clone()).collect()
    }
}

/// Estimate the ride from `board` to `alight` on one route.
///
/// Both stops are projected onto the route; the forward arc between them is
/// covered at the configured bus speed, plus a dwell penalty for each
/// intermediate stop. The result is rounded up to a whole second.
pub fn estimate_bus_leg<'a>(
    route: &RouteInterpolator,
    stops: &'a [RouteStopConfig],
    board: &'a RouteStopConfig,
    alight: &'a RouteStopConfig,
    config: &PlannerConfig,
) -> BusLeg<'a> {
    let ordered = ordered_stops_between(stops, board.index, alight.index);
    let board_along = route.project(board.coord).distance_along;
    let alight_along = route.project(alight.coord).distance_along;
    let total = route.total_length();

    let (distance_meters, duration_sec) = if total > 0.0 {
        let arc = forward_arc(board_along, alight_along, total);
        let dwell = ordered.len().saturating_sub(2) as f64 * config.dwell_secs_per_stop;
        (arc, (arc / config.bus_speed_mps + dwell).ceil())
    } else {
        (0.0, 0.0)
    };

    BusLeg {
        stops: ordered,
        board_along,
        alight_along,
        distance_meters,
        duration_sec,
    }
}
