use axum::extract::State;
use axum::Json;

use super::auth::AuthUser;
use super::ApiJson;
use crate::error::ApiError;
use crate::models::{RagResponse, SearchQuery, SearchRequest};
use crate::state::AppState;

/// POST /api/search - hybrid retrieval with an optional grounded answer.
///
/// Provider failures degrade to partial (possibly empty) results and still
/// return 200.
pub async fn search(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SearchRequest>,
) -> Result<Json<RagResponse>, ApiError> {
    let cfg = &state.config.search;
    let max_results = match req.max_results {
        Some(0) => {
            return Err(ApiError::Validation(
                "max_results must be at least 1".into(),
            ))
        }
        Some(n) => n.min(cfg.max_results_cap),
        None => cfg.default_max_results,
    };

    let query = SearchQuery {
        query_text: req.query,
        search_type: req.search_type,
        max_results,
        generate_response: req.generate_response,
    };

    let response = state.searcher.search(user_id, &query).await?;
    tracing::info!(
        "Search for user {user_id}: {} results, answer: {}",
        response.results.len(),
        response.generated_response.is_some()
    );
    Ok(Json(response))
}
