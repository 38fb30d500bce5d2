//! Multimodal journey planner.
//!
//! This module answers: "I'm here and want to go there - should I walk, or
//! walk to a bus stop, ride, and walk the rest?"
//!
//! The optimizer costs every feasible board/alight pair across all
//! configured routes against the walk-only baseline; the assembler turns
//! the winner into renderable segments.

mod assemble;
mod bus;
mod config;
mod search;

pub use assemble::{CURRENT_LOCATION, MultimodalPlan, minutes_ceil};
pub use bus::{BusLeg, estimate_bus_leg, forward_arc, ordered_stops_between};
pub use config::PlannerConfig;
pub use search::{PlanError, PlanRequest, Planner};
