//! Axum Handlers for the REST API
//!
//! Read-only access to the scenario catalog, a health probe, and the single
//! page that hosts the coaching UI. `utoipa` doc comments generate the
//! OpenAPI documentation.

use axum::{
    extract::Path,
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
};
use commai_core::scenario;
use tracing::warn;

use crate::models::{ErrorResponse, HealthResponse, ScenarioSummary};

const INDEX_HTML: &str = include_str!("../static/index.html");

/// Errors returned by the REST handlers.
pub enum ApiError {
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(message) => {
                warn!(%message, "Resource not found");
                (StatusCode::NOT_FOUND, Json(ErrorResponse { message })).into_response()
            }
        }
    }
}

/// Serves the single-page coaching UI.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// List every roleplay scenario in display order.
#[utoipa::path(
    get,
    path = "/api/scenarios",
    responses(
        (status = 200, description = "The scenario catalog", body = [ScenarioSummary])
    )
)]
pub async fn list_scenarios() -> Json<Vec<ScenarioSummary>> {
    Json(scenario::all().iter().map(ScenarioSummary::from).collect())
}

/// Get a single scenario by its identifier.
#[utoipa::path(
    get,
    path = "/api/scenarios/{id}",
    responses(
        (status = 200, description = "Scenario details", body = ScenarioSummary),
        (status = 404, description = "Scenario not found", body = ErrorResponse)
    ),
    params(
        ("id" = String, Path, description = "Scenario identifier")
    )
)]
pub async fn get_scenario(Path(id): Path<String>) -> Result<Json<ScenarioSummary>, ApiError> {
    let scenario = scenario::find(&id)
        .ok_or_else(|| ApiError::NotFound(format!("Scenario with id '{}' not found", id)))?;
    Ok(Json(ScenarioSummary::from(scenario)))
}
