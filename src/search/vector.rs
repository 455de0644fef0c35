use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use super::VectorIndex;
use crate::content::ContentStore;
use crate::error::IndexError;
use crate::models::SearchResult;
use crate::persist::{load_json, write_json_atomic};

/// A stored vector entry
#[derive(Debug, Clone, Serialize, Deserialize)]
struct VectorEntry {
    owner_id: Uuid,
    embedding: Vec<f32>,
}

/// In-memory vector store with disk persistence and cosine similarity search.
///
/// Only ids and vectors live here; hits are projected from the record store
/// at query time so they always reflect the item's current tags and text.
pub struct VectorStore {
    entries: RwLock<HashMap<Uuid, VectorEntry>>,
    records: Arc<ContentStore>,
    dimension: usize,
    persist_path: PathBuf,
}

impl VectorStore {
    pub fn open_or_create(
        path: &Path,
        records: Arc<ContentStore>,
        dimension: usize,
    ) -> Result<Self, IndexError> {
        let mut entries: HashMap<Uuid, VectorEntry> = load_json(path)?;
        let before = entries.len();
        entries.retain(|_, e| e.embedding.len() == dimension);
        if entries.len() != before {
            tracing::warn!(
                "Dropped {} stored vectors that do not have {dimension} dimensions",
                before - entries.len()
            );
        }

        Ok(Self {
            entries: RwLock::new(entries),
            records,
            dimension,
            persist_path: path.to_path_buf(),
        })
    }

    fn check_dimension(&self, v: &[f32]) -> Result<(), IndexError> {
        if v.len() != self.dimension {
            return Err(IndexError::Dimension {
                expected: self.dimension,
                actual: v.len(),
            });
        }
        Ok(())
    }

    pub fn entry_count(&self) -> usize {
        self.entries.read().len()
    }
}

#[async_trait]
impl VectorIndex for VectorStore {
    async fn upsert(&self, id: Uuid, owner_id: Uuid, embedding: Vec<f32>) -> Result<(), IndexError> {
        self.check_dimension(&embedding)?;
        let mut entries = self.entries.write();
        let previous = entries.insert(id, VectorEntry { owner_id, embedding });
        if let Err(e) = write_json_atomic(&self.persist_path, &*entries) {
            match previous {
                Some(p) => entries.insert(id, p),
                None => entries.remove(&id),
            };
            return Err(e);
        }
        Ok(())
    }

    async fn query_similar(
        &self,
        embedding: &[f32],
        owner_id: Uuid,
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<SearchResult>, IndexError> {
        self.check_dimension(embedding)?;

        let mut scored: Vec<(f32, Uuid)> = {
            let entries = self.entries.read();
            entries
                .iter()
                .filter(|(_, e)| e.owner_id == owner_id)
                .map(|(id, e)| (cosine_similarity(embedding, &e.embedding).clamp(0.0, 1.0), *id))
                .filter(|(score, _)| *score >= threshold)
                .collect()
        };

        // Descending by score; id keeps equal scores in a stable order
        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.1.cmp(&b.1))
        });

        Ok(scored
            .into_iter()
            .filter_map(|(score, id)| {
                let item = self.records.get(owner_id, id)?;
                let mut hit = SearchResult::from_item(&item);
                hit.similarity = Some(score);
                Some(hit)
            })
            .take(limit)
            .collect())
    }

    async fn remove(&self, id: Uuid) -> Result<bool, IndexError> {
        let mut entries = self.entries.write();
        let Some(removed) = entries.remove(&id) else {
            return Ok(false);
        };
        if let Err(e) = write_json_atomic(&self.persist_path, &*entries) {
            entries.insert(id, removed);
            return Err(e);
        }
        Ok(true)
    }
}

pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (dot, norm_a, norm_b) = a
        .iter()
        .zip(b)
        .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (x, y)| {
            (dot + x * y, na + x * x, nb + y * y)
        });

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}
