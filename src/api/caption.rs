use axum::extract::State;
use axum::Json;

use super::auth::AuthUser;
use super::ApiJson;
use crate::error::ApiError;
use crate::models::{CaptionRequest, CaptionResponse};
use crate::state::AppState;

/// POST /api/caption - compose-screen caption suggestions.
pub async fn generate_caption(
    AuthUser(_user_id): AuthUser,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CaptionRequest>,
) -> Result<Json<CaptionResponse>, ApiError> {
    let context = req.context.trim();
    if context.is_empty() {
        return Err(ApiError::Validation("context is required".into()));
    }
    let max_length = match req.max_length {
        Some(0) => {
            return Err(ApiError::Validation(
                "max_length must be at least 1".into(),
            ))
        }
        Some(n) => n,
        None => state.config.search.default_caption_length,
    };

    let caption = state
        .captions
        .generate(context, req.style, max_length)
        .await?;
    Ok(Json(caption))
}
