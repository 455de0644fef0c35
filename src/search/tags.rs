use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use super::TagIndex;
use crate::content::ContentStore;
use crate::error::IndexError;
use crate::models::SearchResult;
use crate::persist::{load_json, write_json_atomic};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TagEntry {
    owner_id: Uuid,
    tags: Vec<String>,
    created_at: DateTime<Utc>,
}

/// Tag sets per item, matched by intersection with the query tags.
pub struct TagStore {
    entries: RwLock<HashMap<Uuid, TagEntry>>,
    records: Arc<ContentStore>,
    persist_path: PathBuf,
}

impl TagStore {
    pub fn open_or_create(path: &Path, records: Arc<ContentStore>) -> Result<Self, IndexError> {
        Ok(Self {
            entries: RwLock::new(load_json(path)?),
            records,
            persist_path: path.to_path_buf(),
        })
    }

    pub fn entry_count(&self) -> usize {
        self.entries.read().len()
    }
}

fn normalize(tag: &str) -> String {
    tag.trim().to_lowercase()
}

#[async_trait]
impl TagIndex for TagStore {
    async fn upsert(
        &self,
        id: Uuid,
        owner_id: Uuid,
        tags: &[String],
        created_at: DateTime<Utc>,
    ) -> Result<(), IndexError> {
        let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
        for t in tags.iter().map(|t| normalize(t)) {
            if !t.is_empty() && !normalized.contains(&t) {
                normalized.push(t);
            }
        }

        let mut entries = self.entries.write();
        let previous = entries.insert(
            id,
            TagEntry {
                owner_id,
                tags: normalized,
                created_at,
            },
        );
        if let Err(e) = write_json_atomic(&self.persist_path, &*entries) {
            match previous {
                Some(p) => entries.insert(id, p),
                None => entries.remove(&id),
            };
            return Err(e);
        }
        Ok(())
    }

    async fn query_by_tags(
        &self,
        tags: &[String],
        owner_id: Uuid,
        limit: usize,
    ) -> Result<Vec<SearchResult>, IndexError> {
        let wanted: Vec<String> = tags.iter().map(|t| normalize(t)).collect();
        if wanted.iter().all(String::is_empty) {
            return Ok(Vec::new());
        }

        let mut matched: Vec<(DateTime<Utc>, Uuid)> = {
            let entries = self.entries.read();
            entries
                .iter()
                .filter(|(_, e)| e.owner_id == owner_id)
                .filter(|(_, e)| e.tags.iter().any(|t| wanted.contains(t)))
                .map(|(id, e)| (e.created_at, *id))
                .collect()
        };

        // Newest first
        matched.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

        Ok(matched
            .into_iter()
            .filter_map(|(_, id)| self.records.get(owner_id, id))
            .map(|item| SearchResult::from_item(&item))
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
