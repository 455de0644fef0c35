use axum::extract::State;
use axum::http::StatusCode;

use super::auth::AuthUser;
use super::ApiJson;
use crate::error::ApiError;
use crate::models::InterestsRequest;
use crate::state::AppState;

const MAX_INTERESTS: usize = 50;

/// PUT /api/profile/interests - replace the caller's declared interests.
pub async fn set_interests(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<InterestsRequest>,
) -> Result<StatusCode, ApiError> {
    let mut interests: Vec<String> = Vec::new();
    for raw in req.interests {
        let interest = raw.trim().to_lowercase();
        if !interest.is_empty() && !interests.contains(&interest) {
            interests.push(interest);
        }
    }
    if interests.len() > MAX_INTERESTS {
        return Err(ApiError::Validation(format!(
            "at most {MAX_INTERESTS} interests are allowed"
        )));
    }

    state.records.set_interests(user_id, interests)?;
    Ok(StatusCode::NO_CONTENT)
}
