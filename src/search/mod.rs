//! Owner-scoped retrieval: the two index seams plus the hybrid orchestrator.

pub mod hybrid;
pub mod tags;
pub mod vector;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::IndexError;
use crate::models::SearchResult;

/// Nearest-neighbour lookup over content embeddings.
///
/// `owner_id` is applied inside the index and cannot be bypassed: a query
/// never yields another user's content.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn upsert(&self, id: Uuid, owner_id: Uuid, embedding: Vec<f32>) -> Result<(), IndexError>;

    /// Hits with similarity ≥ `threshold`, descending, at most `limit`.
    async fn query_similar(
        &self,
        embedding: &[f32],
        owner_id: Uuid,
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<SearchResult>, IndexError>;

    async fn remove(&self, id: Uuid) -> Result<bool, IndexError>;
}

/// Exact tag-intersection lookup.
#[async_trait]
pub trait TagIndex: Send + Sync {
    async fn upsert(
        &self,
        id: Uuid,
        owner_id: Uuid,
        tags: &[String],
        created_at: DateTime<Utc>,
    ) -> Result<(), IndexError>;

    /// Items sharing at least one tag with `tags`, newest first, at most `limit`.
    async fn query_by_tags(
        &self,
        tags: &[String],
        owner_id: Uuid,
        limit: usize,
    ) -> Result<Vec<SearchResult>, IndexError>;

    async fn remove(&self, id: Uuid) -> Result<bool, IndexError>;
}
