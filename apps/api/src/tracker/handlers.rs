//! Axum route handlers for the application tracker.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;
use crate::tracker::{ApplicationEntry, StatusUpdate};

/// GET /applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
) -> Result<Json<Vec<ApplicationEntry>>, AppError> {
    Ok(Json(state.applications.list().await?))
}

/// POST /applications
pub async fn handle_add_application(
    State(state): State<AppState>,
    Json(entry): Json<ApplicationEntry>,
) -> Result<Json<ApplicationEntry>, AppError> {
    let created = state.applications.insert(entry).await?;
    info!(
        "Tracked application {} at {}",
        created.id.as_deref().unwrap_or_default(),
        created.company_name
    );
    Ok(Json(created))
}

/// PATCH /applications/:id
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<ApplicationEntry>, AppError> {
    let updated = state
        .applications
        .update_status(&id, &update.status)
        .await?;
    Ok(Json(updated))
}

/// DELETE /applications/:id
pub async fn handle_delete_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    state.applications.delete(&id).await?;
    Ok(Json(json!({ "status": "deleted" })))
}
