//! API Models
//!
//! Response bodies for the REST endpoints, annotated for OpenAPI generation
//! with `utoipa`.

use commai_core::scenario::Scenario;
use serde::Serialize;
use utoipa::ToSchema;

/// The public face of a scenario. The counterpart's hidden instruction is
/// intentionally absent.
#[derive(Serialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSummary {
    #[schema(example = "interview")]
    pub id: String,
    #[schema(example = "採用面接")]
    pub title: String,
    pub description: String,
    #[schema(example = "面接官")]
    pub partner_role: String,
    #[schema(example = "💼")]
    pub icon: String,
}

impl From<&Scenario> for ScenarioSummary {
    fn from(scenario: &Scenario) -> Self {
        Self {
            id: scenario.id.to_string(),
            title: scenario.title.to_string(),
            description: scenario.description.to_string(),
            partner_role: scenario.partner_role.to_string(),
            icon: scenario.icon.to_string(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}
