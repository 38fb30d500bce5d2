//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Local;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

use crate::planner::{PlanError, PlanRequest, Planner};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/routes", get(list_routes))
        .route("/journey/plan", post(plan_journey))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// List configured routes and their stops.
async fn list_routes(State(state): State<AppState>) -> Json<RoutesResponse> {
    let routes = state
        .catalog
        .routes()
        .iter()
        .map(RouteSummary::from_route)
        .collect();

    Json(RoutesResponse { routes })
}

/// Plan a journey from the rider's position to a destination.
async fn plan_journey(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PlanJourneyResponse>, AppError> {
    // Parse JSON manually so we can log the body on failure
    let req: PlanJourneyRequest = serde_json::from_slice(&body).map_err(|e| {
        debug!(
            error = %e,
            body = %String::from_utf8_lossy(&body),
            "invalid plan request body"
        );
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;

    let request = PlanRequest::new(req.origin, req.destination);
    let planner = Planner::new(
        &*state.directions,
        &state.catalog,
        &state.polylines,
        &state.config,
    );
    let journey = planner.plan(&request).await?;
    let cached_directions = state.directions.cache_entry_count().await;
    debug!(
        cached_directions,
        cached_polylines = state.polylines.entry_count(),
        "journey planned"
    );

    Ok(Json(PlanJourneyResponse::from_journey(journey, &Local)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::NoRouteFound => AppError::NotFound {
                message: e.to_string(),
            },
            PlanError::InvalidRequest(message) => AppError::BadRequest { message },
            PlanError::Assembly(_) => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
