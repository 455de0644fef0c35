//! Error taxonomy for providers, indexes, retrieval and the HTTP surface.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Failure of an upstream embedding or language-model call.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    #[error("provider returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("provider response missing {0}")]
    MissingField(&'static str),

    #[error("provider output could not be parsed: {0}")]
    Malformed(String),

    #[error("unknown LLM provider: {0}")]
    UnknownProvider(String),

    #[error("embedding has {actual} dimensions, expected {expected}")]
    Dimension { expected: usize, actual: usize },

    #[error("cannot embed empty text")]
    EmptyInput,
}

/// Failure inside a vector or tag index.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("vector has {actual} dimensions, index expects {expected}")]
    Dimension { expected: usize, actual: usize },

    #[error("index persistence failed: {0}")]
    Persist(#[from] std::io::Error),

    #[error("index serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failure of the retrieval orchestrator as a whole.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Caption synthesis failure. Best-effort for every caller except the caption endpoint.
#[derive(Debug, Error)]
#[error("caption generation failed: {0}")]
pub struct GenerationError(#[from] pub ProviderError);

/// Errors surfaced to HTTP clients as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Index(#[from] IndexError),
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Validation(msg) => ApiError::Validation(msg),
            SearchError::Index(e) => ApiError::Index(e),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Provider(_) | ApiError::Generation(_) => StatusCode::BAD_GATEWAY,
            ApiError::Index(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("request failed: {self}");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
