//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the page, the REST catalog, the WebSocket session endpoint,
//! and OpenAPI documentation.

use crate::{
    handlers,
    models::{ErrorResponse, HealthResponse, ScenarioSummary},
    state::AppState,
    ws::ws_handler,
};

use axum::{Router, routing::get};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::list_scenarios,
        handlers::get_scenario,
    ),
    components(
        schemas(ScenarioSummary, HealthResponse, ErrorResponse)
    ),
    tags(
        (name = "CommAI API", description = "Scenario catalog for the communication coaching tool")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Only the WebSocket endpoint needs the shared state.
    let session_router = Router::new()
        .route("/ws", get(ws_handler))
        .with_state(app_state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/api/scenarios", get(handlers::list_scenarios))
        .route("/api/scenarios/{id}", get(handlers::get_scenario))
        .merge(session_router)
}
