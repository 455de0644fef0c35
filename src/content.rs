//! Owner-scoped content records and user profile interests.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::IndexError;
use crate::models::{ContentItem, CreateContentRequest};
use crate::persist::{load_json, write_json_atomic};

#[derive(Debug, Default, Serialize, Deserialize)]
struct ContentData {
    items: HashMap<Uuid, ContentItem>,
    interests: HashMap<Uuid, Vec<String>>,
}

/// Outcome of a write-once enrichment update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enrichment {
    Written,
    AlreadySet,
    Missing,
}

pub struct ContentStore {
    data: RwLock<ContentData>,
    persist_path: PathBuf,
}

impl ContentStore {
    pub fn open_or_create(path: &Path) -> Result<Self, IndexError> {
        Ok(Self {
            data: RwLock::new(load_json(path)?),
            persist_path: path.to_path_buf(),
        })
    }

    fn persist(&self, data: &ContentData) -> Result<(), IndexError> {
        write_json_atomic(&self.persist_path, data)
    }

    /// Create a record with no tags and no embedding.
    pub fn create(
        &self,
        owner_id: Uuid,
        req: CreateContentRequest,
        created_at: DateTime<Utc>,
    ) -> Result<ContentItem, IndexError> {
        let item = ContentItem {
            id: Uuid::new_v4(),
            owner_id,
            file_type: req.file_type,
            storage_path: req.storage_path,
            caption: req.caption.filter(|c| !c.trim().is_empty()),
            user_context: req.user_context.filter(|c| !c.trim().is_empty()),
            tags: None,
            embedding: None,
            created_at,
        };

        let mut data = self.data.write();
        data.items.insert(item.id, item.clone());
        if let Err(e) = self.persist(&data) {
            data.items.remove(&item.id);
            return Err(e);
        }
        Ok(item)
    }

    /// Fetch a record only if `owner_id` owns it.
    pub fn get(&self, owner_id: Uuid, id: Uuid) -> Option<ContentItem> {
        self.data
            .read()
            .items
            .get(&id)
            .filter(|i| i.owner_id == owner_id)
            .cloned()
    }

    pub fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<Option<ContentItem>, IndexError> {
        let mut data = self.data.write();
        let owned = data.items.get(&id).is_some_and(|i| i.owner_id == owner_id);
        if !owned {
            return Ok(None);
        }
        let Some(removed) = data.items.remove(&id) else {
            return Ok(None);
        };
        if let Err(e) = self.persist(&data) {
            data.items.insert(id, removed);
            return Err(e);
        }
        Ok(Some(removed))
    }

    pub fn set_tags(&self, id: Uuid, tags: Vec<String>) -> Result<Enrichment, IndexError> {
        let mut data = self.data.write();
        let outcome = match data.items.get_mut(&id) {
            None => Enrichment::Missing,
            Some(item) if item.tags.is_some() => Enrichment::AlreadySet,
            Some(item) => {
                item.tags = Some(tags);
                Enrichment::Written
            }
        };
        if outcome == Enrichment::Written {
            if let Err(e) = self.persist(&data) {
                if let Some(item) = data.items.get_mut(&id) {
                    item.tags = None;
                }
                return Err(e);
            }
        }
        Ok(outcome)
    }

    pub fn set_embedding(&self, id: Uuid, embedding: Vec<f32>) -> Result<Enrichment, IndexError> {
        let mut data = self.data.write();
        let outcome = match data.items.get_mut(&id) {
            None => Enrichment::Missing,
            Some(item) if item.embedding.is_some() => Enrichment::AlreadySet,
            Some(item) => {
                item.embedding = Some(embedding);
                Enrichment::Written
            }
        };
        if outcome == Enrichment::Written {
            if let Err(e) = self.persist(&data) {
                if let Some(item) = data.items.get_mut(&id) {
                    item.embedding = None;
                }
                return Err(e);
            }
        }
        Ok(outcome)
    }

    /// Distinct tags from the owner's `sample` most recent tagged items, newest first.
    pub fn recent_tags(&self, owner_id: Uuid, sample: usize) -> Vec<String> {
        let data = self.data.read();
        let mut tagged: Vec<&ContentItem> = data
            .items
            .values()
            .filter(|i| i.owner_id == owner_id && i.tags.is_some())
            .collect();
        tagged.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));

        let mut out: Vec<String> = Vec::new();
        for item in tagged.into_iter().take(sample) {
            for tag in item.tags.iter().flatten() {
                if !out.contains(tag) {
                    out.push(tag.clone());
                }
            }
        }
        out
    }

    pub fn interests(&self, owner_id: Uuid) -> Vec<String> {
        self.data
            .read()
            .interests
            .get(&owner_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_interests(&self, owner_id: Uuid, interests: Vec<String>) -> Result<(), IndexError> {
        let mut data = self.data.write();
        let previous = data.interests.insert(owner_id, interests);
        if let Err(e) = self.persist(&data) {
            match previous {
                Some(p) => data.interests.insert(owner_id, p),
                None => data.interests.remove(&owner_id),
            };
            return Err(e);
        }
        Ok(())
    }

    pub fn item_count(&self) -> usize {
        self.data.read().items.len()
    }
}
