//! Data transfer objects for web requests and responses.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::domain::{Coordinate, Destination, Journey, JourneySegment, RouteConfig, RouteStopConfig};
use crate::format::{format_arrival, format_distance_imperial, format_duration};

/// Request to plan a journey.
#[derive(Debug, Deserialize)]
pub struct PlanJourneyRequest {
    /// Rider's current position
    pub origin: Coordinate,

    /// Where the rider wants to go
    pub destination: Destination,
}

/// Display text for one journey segment.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentSummary {
    /// `walk` or `bus`
    #[serde(rename = "type")]
    pub kind: &'static str,

    /// What the rider does on this segment
    pub instruction: String,

    /// Distance in feet or miles
    pub distance_text: String,

    /// Duration, e.g. "12 min"
    pub duration_text: String,
}

impl SegmentSummary {
    /// Create from a journey segment.
    pub fn from_segment(segment: &JourneySegment) -> Self {
        Self {
            kind: match segment {
                JourneySegment::Walk(_) => "walk",
                JourneySegment::Bus(_) => "bus",
            },
            instruction: segment.instruction().to_string(),
            distance_text: format_distance_imperial(segment.distance_meters()),
            duration_text: format_duration(segment.duration_min() as f64 * 60.0),
        }
    }
}

/// Response for journey planning.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanJourneyResponse {
    /// The planned journey
    pub journey: Journey,

    /// Total duration, e.g. "1 hr 05 min"
    pub total_duration_text: String,

    /// Arrival clock time, e.g. "08:51"
    pub arrival_text: String,

    /// Display text per segment, same order as `journey.segments`
    pub segments: Vec<SegmentSummary>,
}

impl PlanJourneyResponse {
    /// Create from a planned journey, showing clock times in `tz`.
    pub fn from_journey<Tz: TimeZone>(journey: Journey, tz: &Tz) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let start: DateTime<Tz> = journey.start_time.with_timezone(tz);
        let arrival: DateTime<Tz> = journey.arrival_time.with_timezone(tz);

        Self {
            total_duration_text: format_duration(journey.total_duration_sec),
            arrival_text: format_arrival(&arrival, &start),
            segments: journey.segments.iter().map(SegmentSummary::from_segment).collect(),
            journey,
        }
    }
}

/// A configured route, as listed to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    /// Configured identifier, e.g. "P2P_EXPRESS"
    pub route_id: String,

    /// Client-facing identifier, e.g. "p2p-express"
    pub slug: String,

    pub route_name: String,

    pub route_color: Option<String>,

    /// Stops in route order
    pub stops: Vec<RouteStopConfig>,
}

impl RouteSummary {
    /// Create from a route configuration.
    pub fn from_route(route: &RouteConfig) -> Self {
        Self {
            route_id: route.route_id.to_string(),
            slug: route.route_id.slug(),
            route_name: route.route_name.clone(),
            route_color: route.route_color.clone(),
            stops: route.stops.clone(),
        }
    }
}

/// Response listing configured routes.
#[derive(Debug, Serialize)]
pub struct RoutesResponse {
    pub routes: Vec<RouteSummary>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LineString, LngLat, RouteId, WalkSegment};
    use chrono::Utc;

    fn destination() -> Destination {
        Destination {
            id: "davis".into(),
            name: "Davis Library".into(),
            lat: 35.9107,
            lon: -79.0480,
            address: Some("208 Raleigh St".into()),
        }
    }

    fn walk_journey(seconds: f64) -> Journey {
        let dest = destination();
        let origin = Coordinate::new(35.90, -79.05);
        let segment = JourneySegment::Walk(WalkSegment {
            from_name: "Current Location".into(),
            to_name: dest.name.clone(),
            from_coords: origin,
            to_coords: dest.coordinate(),
            distance_meters: 1609.344 * 2.5,
            duration_min: (seconds / 60.0).ceil() as i64,
            instruction: "Walk to Davis Library".into(),
            geometry: LineString::new(vec![origin.into(), dest.coordinate().into()]),
            steps: vec![],
        });
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 8, 30, 0).unwrap();
        Journey::new(dest, vec![segment], seconds, start).unwrap()
    }

    #[test]
    fn parse_plan_request() {
        let json = r#"{
            "origin": {"lat": 35.9049, "lon": -79.0469},
            "destination": {"id": "davis", "name": "Davis Library", "lat": 35.9107, "lon": -79.048}
        }"#;
        let req: PlanJourneyRequest = serde_json::from_str(json).unwrap();

        assert_eq!(req.origin, Coordinate::new(35.9049, -79.0469));
        assert_eq!(req.destination.name, "Davis Library");
        assert_eq!(req.destination.address, None);
    }

    #[test]
    fn plan_request_missing_origin_fails() {
        let json = r#"{"destination": {"id": "d", "name": "D", "lat": 35.9, "lon": -79.0}}"#;
        assert!(serde_json::from_str::<PlanJourneyRequest>(json).is_err());
    }

    #[test]
    fn response_from_journey() {
        let response = PlanJourneyResponse::from_journey(walk_journey(3900.0), &Utc);

        assert_eq!(response.total_duration_text, "1 hr 05 min");
        assert_eq!(response.arrival_text, "09:35");
        assert_eq!(response.segments.len(), 1);
        assert_eq!(response.segments[0].kind, "walk");
        assert_eq!(response.segments[0].distance_text, "2.5 mi");
        assert_eq!(response.segments[0].duration_text, "1 hr 05 min");
    }

    #[test]
    fn response_json_shape() {
        let response = PlanJourneyResponse::from_journey(walk_journey(720.0), &Utc);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["totalDurationText"], "12 min");
        assert_eq!(json["arrivalText"], "08:42");
        assert_eq!(json["segments"][0]["type"], "walk");
        assert_eq!(json["journey"]["totalDurationMin"], 12);
        assert_eq!(json["journey"]["segments"][0]["type"], "walk");
        assert_eq!(json["journey"]["segments"][0]["geometry"]["type"], "LineString");
        assert_eq!(
            json["journey"]["segments"][0]["geometry"]["coordinates"][0],
            serde_json::json!([-79.05, 35.90])
        );
    }

    #[test]
    fn route_summary_from_route() {
        let route = RouteConfig {
            route_id: RouteId::new("BAITY_HILL"),
            route_name: "Baity Hill".into(),
            route_color: Some("#C33934".into()),
            stops: vec![RouteStopConfig {
                id: "bh-1".into(),
                name: "Baity Hill Dr".into(),
                coord: LngLat::new(-79.0655, 35.8998),
                index: 0,
            }],
            geometry: None,
        };
        let summary = RouteSummary::from_route(&route);

        assert_eq!(summary.route_id, "BAITY_HILL");
        assert_eq!(summary.slug, "baity-hill");
        assert_eq!(summary.route_color.as_deref(), Some("#C33934"));
        assert_eq!(summary.stops.len(), 1);
    }

    #[test]
    fn error_response_json() {
        let json = serde_json::to_string(&ErrorResponse {
            error: "could not plan a route".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"error":"could not plan a route"}"#);
    }
}
