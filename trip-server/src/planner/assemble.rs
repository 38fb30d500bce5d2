//! Journey assembly.
//!
//! Turns the optimizer's winner into the segment list a map client renders.
//! No I/O happens here.

use chrono::{DateTime, Utc};

use crate::directions::WalkDirections;
use crate::domain::{
    BusSegment, Coordinate, Destination, DomainError, Journey, JourneySegment, LineString, LngLat,
    RouteConfig, RouteStopConfig, WalkSegment,
};

use super::bus::BusLeg;

/// Display name of the rider's starting point.
pub const CURRENT_LOCATION: &str = "Current Location";

/// Whole minutes, rounded up.
pub fn minutes_ceil(seconds: f64) -> i64 {
    (seconds / 60.0).ceil() as i64
}

fn walk_segment(
    from_name: &str,
    from: Coordinate,
    to_name: &str,
    to: Coordinate,
    walk: WalkDirections,
) -> JourneySegment {
    JourneySegment::Walk(WalkSegment {
        from_name: from_name.to_string(),
        to_name: to_name.to_string(),
        from_coords: from,
        to_coords: to,
        distance_meters: walk.distance_meters,
        duration_min: minutes_ceil(walk.duration_sec),
        instruction: format!("Walk to {to_name}"),
        geometry: LineString::new(walk.geometry),
        steps: walk.steps,
    })
}

/// The single segment of a walk-only journey.
pub fn walk_only_segments(
    origin: Coordinate,
    destination: &Destination,
    walk: WalkDirections,
) -> Vec<JourneySegment> {
    vec![walk_segment(
        CURRENT_LOCATION,
        origin,
        &destination.name,
        destination.coordinate(),
        walk,
    )]
}

/// Everything needed to render a walk, bus, walk journey.
#[derive(Debug, Clone)]
pub struct MultimodalPlan<'a> {
    pub route: &'a RouteConfig,
    pub board: &'a RouteStopConfig,
    pub alight: &'a RouteStopConfig,
    pub walk_to_board: WalkDirections,
    pub walk_from_alight: WalkDirections,
    pub bus: BusLeg<'a>,
    /// Resampled route geometry from board to alight.
    pub bus_geometry: Vec<LngLat>,
    /// Walk + bus + walk, in seconds.
    pub total_sec: f64,
}

/// The three segments of a multimodal journey: walk, bus, walk.
pub fn multimodal_segments(
    origin: Coordinate,
    destination: &Destination,
    plan: MultimodalPlan<'_>,
) -> Vec<JourneySegment> {
    let board_at = plan.board.coordinate();
    let alight_at = plan.alight.coordinate();
    let stop_ids = plan.bus.stop_ids();

    let bus = JourneySegment::Bus(BusSegment {
        from_name: plan.board.name.clone(),
        to_name: plan.alight.name.clone(),
        from_coords: board_at,
        to_coords: alight_at,
        distance_meters: plan.bus.distance_meters,
        duration_min: minutes_ceil(plan.bus.duration_sec),
        instruction: format!("Ride {}", plan.route.route_name),
        route_id: plan.route.route_id.slug(),
        route_name: plan.route.route_name.clone(),
        stops_count: stop_ids.len(),
        wait_time_min: 0,
        bus_segment_geometry: LineString::new(plan.bus_geometry),
        bus_ordered_stop_ids: stop_ids,
    });

    vec![
        walk_segment(
            CURRENT_LOCATION,
            origin,
            &plan.board.name,
            board_at,
            plan.walk_to_board,
        ),
        bus,
        walk_segment(
            &plan.alight.name,
            alight_at,
            &destination.name,
            destination.coordinate(),
            plan.walk_from_alight,
        ),
    ]
}

/// Wrap segments in the journey envelope, starting at `now`.
pub fn assemble(
    destination: &Destination,
    segments: Vec<JourneySegment>,
    total_sec: f64,
    now: DateTime<Utc>,
) -> Result<Journey, DomainError> {
    Journey::new(destination.clone(), segments, total_sec, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RouteId, WalkingStep};
    use chrono::TimeZone;

    fn destination() -> Destination {
        Destination {
            id: "davis".into(),
            name: "Davis Library".into(),
            lat: 35.9107,
            lon: -79.0480,
            address: None,
        }
    }

    fn walk(seconds: f64, from: Coordinate, to: Coordinate) -> WalkDirections {
        WalkDirections {
            duration_sec: seconds,
            distance_meters: seconds * 1.3,
            geometry: vec![from.into(), to.into()],
            steps: vec![WalkingStep {
                instruction: "Head north".into(),
                distance_meters: seconds * 1.3,
                duration_sec: seconds,
            }],
        }
    }

    fn stop(id: &str, name: &str, lon: f64, index: usize) -> RouteStopConfig {
        RouteStopConfig {
            id: id.into(),
            name: name.into(),
            coord: LngLat::new(lon, 35.90),
            index,
        }
    }

    fn route(stops: Vec<RouteStopConfig>) -> RouteConfig {
        RouteConfig {
            route_id: RouteId::new("P2P_EXPRESS"),
            route_name: "P2P Express".into(),
            route_color: Some("#418FC5".into()),
            stops,
            geometry: None,
        }
    }

    #[test]
    fn rounds_minutes_up() {
        assert_eq!(minutes_ceil(0.0), 0);
        assert_eq!(minutes_ceil(1.0), 1);
        assert_eq!(minutes_ceil(60.0), 1);
        assert_eq!(minutes_ceil(61.0), 2);
    }

    #[test]
    fn walk_only_journey() {
        let dest = destination();
        let origin = Coordinate::new(35.90, -79.05);
        let segments = walk_only_segments(origin, &dest, walk(605.0, origin, dest.coordinate()));

        assert_eq!(segments.len(), 1);
        let JourneySegment::Walk(w) = &segments[0] else {
            panic!("expected walk");
        };
        assert_eq!(w.from_name, "Current Location");
        assert_eq!(w.to_name, "Davis Library");
        assert_eq!(w.instruction, "Walk to Davis Library");
        assert_eq!(w.duration_min, 11);
        assert_eq!(w.steps.len(), 1);
    }

    #[test]
    fn multimodal_journey() {
        let dest = destination();
        let origin = Coordinate::new(35.895, -79.06);
        let route = route(vec![
            stop("a", "Alpha", -79.06, 0),
            stop("b", "Bravo", -79.055, 1),
            stop("c", "Charlie", -79.05, 2),
        ]);
        let (board, alight) = (&route.stops[0], &route.stops[2]);

        let plan = MultimodalPlan {
            route: &route,
            board,
            alight,
            walk_to_board: walk(120.0, origin, board.coordinate()),
            walk_from_alight: walk(200.0, alight.coordinate(), dest.coordinate()),
            bus: BusLeg {
                stops: route.stops.iter().collect(),
                board_along: 0.0,
                alight_along: 900.0,
                distance_meters: 900.0,
                duration_sec: 170.0,
            },
            bus_geometry: vec![board.coord, alight.coord],
            total_sec: 490.0,
        };

        let segments = multimodal_segments(origin, &dest, plan);
        assert_eq!(segments.len(), 3);
        assert!(segments[0].is_walk() && segments[1].is_bus() && segments[2].is_walk());

        let JourneySegment::Bus(bus) = &segments[1] else {
            panic!("expected bus");
        };
        assert_eq!(bus.route_id, "p2p-express");
        assert_eq!(bus.instruction, "Ride P2P Express");
        assert_eq!(bus.bus_ordered_stop_ids, ["a", "b", "c"]);
        assert_eq!(bus.stops_count, 3);
        assert_eq!(bus.wait_time_min, 0);
        assert_eq!(bus.duration_min, 3);
        assert_eq!(bus.distance_meters, 900.0);

        assert_eq!(segments[0].from_name(), "Current Location");
        assert_eq!(segments[0].instruction(), "Walk to Alpha");
        assert_eq!(segments[2].from_name(), "Charlie");
        assert_eq!(segments[2].instruction(), "Walk to Davis Library");

        let now = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let journey = assemble(&dest, segments, 490.0, now).unwrap();
        assert_eq!(journey.total_duration_min, 9);
        assert_eq!(journey.origin(), origin);
        assert_eq!(journey.arrival_time, now + chrono::Duration::seconds(490));
    }
}
