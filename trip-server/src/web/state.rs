//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedDirections;
use crate::directions::AnyDirections;
use crate::domain::RouteCatalog;
use crate::geometry::PolylineCache;
use crate::planner::PlannerConfig;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Cached directions provider
    pub directions: Arc<CachedDirections<AnyDirections>>,

    /// Configured transit routes
    pub catalog: Arc<RouteCatalog>,

    /// Route interpolators, shared across requests
    pub polylines: PolylineCache,

    /// Journey planner configuration
    pub config: Arc<PlannerConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        directions: CachedDirections<AnyDirections>,
        catalog: RouteCatalog,
        config: PlannerConfig,
    ) -> Self {
        Self {
            directions: Arc::new(directions),
            catalog: Arc::new(catalog),
            polylines: PolylineCache::default(),
            config: Arc::new(config),
        }
    }
}
