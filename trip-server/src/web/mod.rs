//! Web layer for the trip planner.
//!
//! Provides HTTP endpoints for listing routes and planning journeys.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
