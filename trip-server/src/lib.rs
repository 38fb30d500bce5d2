//! Multimodal trip planner server.
//!
//! A web application that answers: "I'm here and want to go there - is it
//! faster to walk, or to walk to a bus, ride, and walk the rest?"

pub mod cache;
pub mod directions;
pub mod domain;
pub mod format;
pub mod geometry;
pub mod nearest;
pub mod planner;
pub mod web;
