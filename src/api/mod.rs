//! Axum HTTP surface consumed by the mobile client.

pub mod auth;
pub mod caption;
pub mod content;
pub mod embedding;
pub mod profile;
pub mod search;
pub mod tags;

use axum::extract::{FromRequest, FromRequestParts};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

/// JSON body extractor whose rejections become 400 `{"error": ...}` responses.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path extractor with the same `{"error": ...}` rejection body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/search", post(search::search))
        .route("/api/tags", post(tags::generate_tags))
        .route("/api/caption", post(caption::generate_caption))
        .route("/api/embedding", post(embedding::generate_embedding))
        .route("/api/content", post(content::create_content))
        .route(
            "/api/content/{id}",
            get(content::get_content).delete(content::delete_content),
        )
        .route("/api/profile/interests", put(profile::set_interests))
        .with_state(state)
}

/// GET /api/health
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
