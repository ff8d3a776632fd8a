use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tourhub_core::tour::TourError;
use tourhub_workflow::{FinalizationResult, WorkflowName};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/tours/{id}/finalize", post(finalize_tour))
        .route("/v1/tours/{id}/guide", get(preview_guide))
}

#[derive(Debug, Deserialize)]
pub struct FinalizeTourRequest {
    pub workflows: Vec<String>,
}

/// Finalize a tour: run the selected workflows and return the result.
/// Unrecognized workflow names in the request are dropped, not rejected.
async fn finalize_tour(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<FinalizeTourRequest>,
) -> Result<Json<FinalizationResult>, AppError> {
    let selected: Vec<WorkflowName> = request
        .workflows
        .iter()
        .filter_map(|name| WorkflowName::parse(name))
        .collect();

    if selected.is_empty() {
        return Err(AppError::ValidationError(
            "no recognized workflows selected".to_string(),
        ));
    }

    tracing::info!(tour_id = %id, workflows = selected.len(), "Finalizing tour");
    let result = state.orchestrator.finalize(id, &selected).await;
    Ok(Json(result))
}

/// Preview the instruction guide without finalizing. A missing tour (or
/// warehouse/host row) is a 404; anything else is a server error.
async fn preview_guide(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<String, AppError> {
    state.orchestrator.render_guide(id).await.map_err(|e| {
        if matches!(e.downcast_ref::<TourError>(), Some(TourError::NotFound(_))) {
            AppError::NotFoundError(e.to_string())
        } else {
            AppError::InternalServerError(e.to_string())
        }
    })
}
