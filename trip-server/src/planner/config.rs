//! Optimizer configuration for the journey planner.

use std::time::Duration;

/// Configuration parameters for journey planning.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Candidate stops considered per route at each end of the journey.
    pub k_nearest: usize,

    /// Maximum straight-line distance to a candidate stop (meters).
    /// Stops further away are not walked to.
    pub max_walk_meters: f64,

    /// Maximum walking time to a candidate stop (seconds).
    pub max_walk_duration_secs: f64,

    /// Walk-only is preferred unless the bus saves more than this (seconds).
    pub walk_only_margin_secs: f64,

    /// Assumed bus speed along the route (meters per second).
    pub bus_speed_mps: f64,

    /// Time added per intermediate stop on the bus leg (seconds).
    pub dwell_secs_per_stop: f64,

    /// Resampling step for bus-leg geometry (meters).
    pub slice_step_meters: f64,

    /// Maximum in-flight provider requests per fan-out phase.
    pub max_concurrent_requests: usize,

    /// Budget for all provider calls in one planning request (seconds).
    pub request_deadline_secs: u64,
}

impl PlannerConfig {
    /// Returns the planning deadline as a Duration.
    pub fn request_deadline(&self) -> Duration {
        Duration::from_secs(self.request_deadline_secs)
    }

    /// Set the planning deadline.
    pub fn with_request_deadline(mut self, secs: u64) -> Self {
        self.request_deadline_secs = secs;
        self
    }

    /// Set the fan-out concurrency cap.
    pub fn with_max_concurrent_requests(mut self, n: usize) -> Self {
        self.max_concurrent_requests = n;
        self
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            k_nearest: 6,
            max_walk_meters: 1200.0,
            max_walk_duration_secs: 900.0, // 15 minutes
            walk_only_margin_secs: 90.0,
            bus_speed_mps: 6.0,
            dwell_secs_per_stop: 20.0,
            slice_step_meters: 20.0,
            max_concurrent_requests: 8,
            request_deadline_secs: 20,
        }
    }
}
