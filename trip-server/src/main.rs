use std::net::SocketAddr;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use trip_server::cache::{CacheConfig, CachedDirections};
use trip_server::directions::{
    AnyDirections, DirectionsClient, DirectionsConfig, StraightLineDirections,
};
use trip_server::domain::RouteCatalog;
use trip_server::planner::PlannerConfig;
use trip_server::web::{AppState, create_router};

const DEFAULT_ROUTES_FILE: &str = "data/routes.json";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_LOG_FILTER: &str = "trip_server=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG overrides the default filter
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Load route configuration (fail fast if invalid)
    let routes_file =
        std::env::var("TRIP_ROUTES_FILE").unwrap_or_else(|_| DEFAULT_ROUTES_FILE.to_string());
    let catalog = RouteCatalog::from_json_file(&routes_file)?;
    info!(path = %routes_file, routes = catalog.len(), "loaded route configuration");

    // Pick a directions provider
    let directions = match std::env::var("TRIP_DIRECTIONS_URL") {
        Ok(url) => {
            info!(%url, "using directions proxy");
            AnyDirections::Http(DirectionsClient::new(DirectionsConfig::new(url))?)
        }
        Err(_) => {
            let offline = StraightLineDirections::from_catalog(&catalog);
            warn!(
                routes_with_geometry = offline.route_count(),
                "TRIP_DIRECTIONS_URL not set, using offline straight-line directions"
            );
            AnyDirections::Offline(offline)
        }
    };
    let cached = CachedDirections::new(directions, &CacheConfig::default());

    // Build app state
    let state = AppState::new(cached, catalog, PlannerConfig::default());
    let app = create_router(state);

    // Bind and serve
    let addr: SocketAddr = std::env::var("TRIP_BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(%addr, "trip planner listening");
    info!("  GET  /health        - Health check");
    info!("  GET  /routes        - Configured routes and stops");
    info!("  POST /journey/plan  - Plan a journey");

    axum::serve(listener, app).await?;
    Ok(())
}
