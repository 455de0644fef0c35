use axum::extract::State;
use axum::Json;

use super::auth::AuthUser;
use super::ApiJson;
use crate::content::Enrichment;
use crate::error::ApiError;
use crate::models::{EmbeddingRequest, EmbeddingResponse};
use crate::state::AppState;

/// POST /api/embedding - embed text and optionally attach the vector to one
/// of the caller's items.
pub async fn generate_embedding(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<EmbeddingRequest>,
) -> Result<Json<EmbeddingResponse>, ApiError> {
    let text = req.text.trim();
    if text.is_empty() {
        return Err(ApiError::Validation("text is required".into()));
    }

    // Resolve ownership before spending a provider call.
    let item = match req.content_id {
        Some(id) => Some(
            state
                .records
                .get(user_id, id)
                .ok_or_else(|| ApiError::NotFound(format!("content {id} not found")))?,
        ),
        None => None,
    };

    let embedding = state.embedder.embed(text).await?;

    if let Some(item) = item {
        match state.ingestor.store_embedding(&item, embedding.clone()).await? {
            Enrichment::Written => tracing::info!("Stored embedding for content {}", item.id),
            Enrichment::AlreadySet => {
                return Err(ApiError::Conflict(format!(
                    "content {} already has an embedding",
                    item.id
                )))
            }
            Enrichment::Missing => {
                return Err(ApiError::NotFound(format!("content {} not found", item.id)))
            }
        }
    }

    Ok(Json(EmbeddingResponse {
        embedding,
        success: true,
    }))
}
