use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use uuid::Uuid;

use super::auth::AuthUser;
use super::{ApiJson, ApiPath};
use crate::error::ApiError;
use crate::models::{ContentView, CreateContentRequest};
use crate::state::AppState;

/// POST /api/content - create the record, respond, then enrich in the background.
pub async fn create_content(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateContentRequest>,
) -> Result<(StatusCode, Json<ContentView>), ApiError> {
    if req.storage_path.trim().is_empty() {
        return Err(ApiError::Validation("storage_path is required".into()));
    }

    let item = state.records.create(user_id, req, Utc::now())?;
    tracing::info!("Created content {} for user {user_id}", item.id);

    let ingestor = state.ingestor.clone();
    let pending = item.clone();
    tokio::spawn(async move {
        ingestor.enrich(&pending).await;
    });

    Ok((StatusCode::CREATED, Json(item.view())))
}

/// GET /api/content/{id}
pub async fn get_content(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ContentView>, ApiError> {
    state
        .records
        .get(user_id, id)
        .map(|item| Json(item.view()))
        .ok_or_else(|| ApiError::NotFound(format!("content {id} not found")))
}

/// DELETE /api/content/{id} - removes the record and its index entries.
pub async fn delete_content(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    match state.ingestor.remove(user_id, id).await? {
        Some(_) => {
            tracing::info!("Deleted content {id}");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(ApiError::NotFound(format!("content {id} not found"))),
    }
}
