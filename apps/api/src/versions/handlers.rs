//! Axum route handlers for résumé versions.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SaveVersionRequest {
    pub name: String,
    pub yaml_content: String,
}

#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub name: String,
    pub yaml_content: String,
}

/// GET /versions
pub async fn handle_list_versions(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.versions.list().await?))
}

/// GET /versions/:name
pub async fn handle_get_version(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<VersionResponse>, AppError> {
    let (name, yaml_content) = state.versions.get(&name).await?;
    Ok(Json(VersionResponse { name, yaml_content }))
}

/// POST /versions
pub async fn handle_save_version(
    State(state): State<AppState>,
    Json(request): Json<SaveVersionRequest>,
) -> Result<Json<Value>, AppError> {
    let name = state
        .versions
        .save(&request.name, &request.yaml_content)
        .await?;
    Ok(Json(json!({ "message": "Version saved", "name": name })))
}

/// DELETE /versions/:name
pub async fn handle_delete_version(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, AppError> {
    state.versions.delete(&name).await?;
    Ok(Json(json!({ "message": "Version deleted" })))
}
