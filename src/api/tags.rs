use axum::extract::State;
use axum::Json;

use super::auth::AuthUser;
use super::ApiJson;
use crate::error::ApiError;
use crate::models::{TagRequest, TagResponse};
use crate::state::AppState;
use crate::tagging::TagContext;

/// POST /api/tags - suggest tags for a description, personalised with the
/// caller's interests and recent tags. Falls back to the keyword heuristic
/// instead of failing when the model is unavailable.
pub async fn generate_tags(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<TagRequest>,
) -> Result<Json<TagResponse>, ApiError> {
    let context = req.context.trim();
    if context.is_empty() {
        return Err(ApiError::Validation("context is required".into()));
    }

    let cfg = &state.config.search;
    let max_tags = match req.max_tags {
        Some(0) => return Err(ApiError::Validation("max_tags must be at least 1".into())),
        Some(n) => n.min(cfg.max_tags_cap),
        None => cfg.default_max_tags,
    };

    let ctx = TagContext {
        context: context.to_string(),
        file_type: req.file_type,
        max_tags,
        interests: state.records.interests(user_id),
        prior_tags: state.records.recent_tags(user_id, cfg.prior_tag_sample),
    };
    let suggestion = state.tagger.extract(&ctx).await;
    tracing::debug!("Tags via {:?}: {:?}", suggestion.source, suggestion.tags);

    Ok(Json(TagResponse {
        tags: suggestion.tags,
        confidence: suggestion.confidence,
    }))
}
