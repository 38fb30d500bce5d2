//! Journey types.
//!
//! A `Journey` is the complete answer to a planning request: an ordered list
//! of walk and bus segments from the rider's origin to the destination,
//! ready to serialise for a map client.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{Coordinate, DomainError, LngLat};

/// Where the rider wants to go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Destination {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

/// One maneuver from walking directions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalkingStep {
    pub instruction: String,
    pub distance_meters: f64,
    pub duration_sec: f64,
}

/// A GeoJSON-style LineString.
///
/// Serialises as `{"type": "LineString", "coordinates": [[lon, lat], ...]}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct LineString {
    pub coordinates: Vec<LngLat>,
}

impl LineString {
    pub fn new(coordinates: Vec<LngLat>) -> Self {
        Self { coordinates }
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
}

/// A walking leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalkSegment {
    pub from_name: String,
    pub to_name: String,
    pub from_coords: Coordinate,
    pub to_coords: Coordinate,
    pub distance_meters: f64,
    pub duration_min: i64,
    pub instruction: String,
    pub geometry: LineString,
    pub steps: Vec<WalkingStep>,
}

/// A bus leg between a board and an alight stop on one route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusSegment {
    pub from_name: String,
    pub to_name: String,
    pub from_coords: Coordinate,
    pub to_coords: Coordinate,
    pub distance_meters: f64,
    pub duration_min: i64,
    pub instruction: String,
    /// Client-facing route slug, see [`RouteId::slug`](super::RouteId::slug).
    pub route_id: String,
    pub route_name: String,
    pub stops_count: usize,
    pub wait_time_min: i64,
    pub bus_segment_geometry: LineString,
    /// Stop ids from board to alight, both included.
    pub bus_ordered_stop_ids: Vec<String>,
}

/// A segment of a journey: either a walk or a bus ride.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JourneySegment {
    Walk(WalkSegment),
    Bus(BusSegment),
}

impl JourneySegment {
    pub fn from_coords(&self) -> Coordinate {
        match self {
            JourneySegment::Walk(w) => w.from_coords,
            JourneySegment::Bus(b) => b.from_coords,
        }
    }

    pub fn to_coords(&self) -> Coordinate {
        match self {
            JourneySegment::Walk(w) => w.to_coords,
            JourneySegment::Bus(b) => b.to_coords,
        }
    }

    pub fn from_name(&self) -> &str {
        match self {
            JourneySegment::Walk(w) => &w.from_name,
            JourneySegment::Bus(b) => &b.from_name,
        }
    }

    pub fn to_name(&self) -> &str {
        match self {
            JourneySegment::Walk(w) => &w.to_name,
            JourneySegment::Bus(b) => &b.to_name,
        }
    }

    pub fn duration_min(&self) -> i64 {
        match self {
            JourneySegment::Walk(w) => w.duration_min,
            JourneySegment::Bus(b) => b.duration_min,
        }
    }

    pub fn distance_meters(&self) -> f64 {
        match self {
            JourneySegment::Walk(w) => w.distance_meters,
            JourneySegment::Bus(b) => b.distance_meters,
        }
    }

    pub fn instruction(&self) -> &str {
        match self {
            JourneySegment::Walk(w) => &w.instruction,
            JourneySegment::Bus(b) => &b.instruction,
        }
    }

    pub fn is_walk(&self) -> bool {
        matches!(self, JourneySegment::Walk(_))
    }

    pub fn is_bus(&self) -> bool {
        matches!(self, JourneySegment::Bus(_))
    }
}

/// A complete planned journey.
///
/// # Invariants
///
/// - At least one segment
/// - Each segment starts where the previous one ended
/// - `total_duration_sec` is finite and non-negative
/// - `arrival_time == start_time + total_duration_sec`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Journey {
    pub id: String,
    pub destination: Destination,
    pub total_duration_min: i64,
    pub total_duration_sec: f64,
    pub segments: Vec<JourneySegment>,
    pub start_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
}

impl Journey {
    /// Build a journey, validating segment contiguity.
    ///
    /// `total_duration_min` is the ceiling of `total_duration_sec / 60`.
    pub fn new(
        destination: Destination,
        segments: Vec<JourneySegment>,
        total_duration_sec: f64,
        start_time: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if segments.is_empty() {
            return Err(DomainError::EmptyJourney);
        }

        for (index, pair) in segments.windows(2).enumerate() {
            let end = pair[0].to_coords();
            let start = pair[1].from_coords();
            if end != start {
                return Err(DomainError::Discontinuous {
                    index: index + 1,
                    start,
                    end,
                });
            }
        }

        if !total_duration_sec.is_finite() || total_duration_sec < 0.0 {
            return Err(DomainError::DurationOutOfRange(total_duration_sec));
        }
        let arrival_time = Duration::try_milliseconds((total_duration_sec * 1000.0).round() as i64)
            .and_then(|d| start_time.checked_add_signed(d))
            .ok_or(DomainError::DurationOutOfRange(total_duration_sec))?;

        Ok(Self {
            id: format!("journey-{}", start_time.timestamp_millis()),
            destination,
            total_duration_min: (total_duration_sec / 60.0).ceil() as i64,
            total_duration_sec,
            segments,
            start_time,
            arrival_time,
        })
    }

    /// Where the journey starts.
    pub fn origin(&self) -> Coordinate {
        // Non-empty by construction
        self.segments[0].from_coords()
    }

    /// True if the journey has no bus leg.
    pub fn is_walk_only(&self) -> bool {
        self.segments.iter().all(JourneySegment::is_walk)
    }

    /// The bus leg, if any.
    pub fn bus_segment(&self) -> Option<&BusSegment> {
        self.segments.iter().find_map(|s| match s {
            JourneySegment::Bus(b) => Some(b),
            JourneySegment::Walk(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn destination() -> Destination {
        Destination {
            id: "dest-1".into(),
            name: "Davis Library".into(),
            lat: 35.9107,
            lon: -79.0480,
            address: None,
        }
    }

    fn walk(from: Coordinate, to: Coordinate) -> JourneySegment {
        JourneySegment::Walk(WalkSegment {
            from_name: "A".into(),
            to_name: "B".into(),
            from_coords: from,
            to_coords: to,
            distance_meters: 100.0,
            duration_min: 2,
            instruction: "Walk to B".into(),
            geometry: LineString::new(vec![from.into(), to.into()]),
            steps: vec![],
        })
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 3, 10, 0, 0).unwrap()
    }

    #[test]
    fn rejects_empty_journey() {
        let err = Journey::new(destination(), vec![], 0.0, now()).unwrap_err();
        assert_eq!(err, DomainError::EmptyJourney);
    }

    #[test]
    fn rejects_discontinuous_segments() {
        let a = Coordinate::new(35.90, -79.05);
        let b = Coordinate::new(35.91, -79.05);
        let c = Coordinate::new(35.92, -79.05);
        let err = Journey::new(destination(), vec![walk(a, b), walk(c, a)], 60.0, now())
            .unwrap_err();
        assert!(matches!(err, DomainError::Discontinuous { index: 1, .. }));
    }

    #[test]
    fn rejects_unrepresentable_durations() {
        let a = Coordinate::new(35.90, -79.05);
        let b = Coordinate::new(35.91, -79.05);

        for seconds in [-60.0, f64::NAN, f64::INFINITY, 1e15, 1e300] {
            let err = Journey::new(destination(), vec![walk(a, b)], seconds, now()).unwrap_err();
            assert!(matches!(err, DomainError::DurationOutOfRange(_)), "{seconds}");
        }
    }

    #[test]
    fn arrival_and_rounding() {
        let a = Coordinate::new(35.90, -79.05);
        let b = Coordinate::new(35.91, -79.05);
        let journey = Journey::new(destination(), vec![walk(a, b)], 601.0, now()).unwrap();

        assert_eq!(journey.total_duration_min, 11);
        assert_eq!(journey.arrival_time, now() + Duration::seconds(601));
        assert_eq!(journey.id, format!("journey-{}", now().timestamp_millis()));
        assert_eq!(journey.origin(), a);
        assert!(journey.is_walk_only());
        assert!(journey.bus_segment().is_none());
    }

    #[test]
    fn serialises_with_type_tags() {
        let a = Coordinate::new(35.90, -79.05);
        let b = Coordinate::new(35.91, -79.05);
        let journey = Journey::new(destination(), vec![walk(a, b)], 120.0, now()).unwrap();
        let json = serde_json::to_value(&journey).unwrap();

        assert_eq!(json["totalDurationMin"], 2);
        assert_eq!(json["segments"][0]["type"], "walk");
        assert_eq!(json["segments"][0]["geometry"]["type"], "LineString");
        assert_eq!(json["segments"][0]["geometry"]["coordinates"][0][0], -79.05);
        assert_eq!(json["segments"][0]["fromCoords"]["lat"], 35.90);
        assert_eq!(json["startTime"], "2024-09-03T10:00:00Z");
    }
}
