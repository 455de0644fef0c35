//! Post-upload enrichment: tags and embedding, each best-effort and
//! independent of the other.

use std::sync::Arc;
use uuid::Uuid;

use crate::config::SearchConfig;
use crate::content::{ContentStore, Enrichment};
use crate::error::IndexError;
use crate::llm::embeddings::Embedder;
use crate::models::ContentItem;
use crate::search::{TagIndex, VectorIndex};
use crate::tagging::{TagContext, TagExtractor, TagSource};

/// What one enrichment run managed to write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    /// Set when tags were persisted.
    pub tag_source: Option<TagSource>,
    pub tag_count: usize,
    pub embedded: bool,
}

#[derive(Clone)]
pub struct Ingestor {
    tagger: TagExtractor,
    embedder: Arc<dyn Embedder>,
    records: Arc<ContentStore>,
    vectors: Arc<dyn VectorIndex>,
    tags: Arc<dyn TagIndex>,
    max_tags: usize,
    prior_tag_sample: usize,
}

impl Ingestor {
    pub fn new(
        tagger: TagExtractor,
        embedder: Arc<dyn Embedder>,
        records: Arc<ContentStore>,
        vectors: Arc<dyn VectorIndex>,
        tags: Arc<dyn TagIndex>,
        config: &SearchConfig,
    ) -> Self {
        Self {
            tagger,
            embedder,
            records,
            vectors,
            tags,
            max_tags: config.default_max_tags,
            prior_tag_sample: config.prior_tag_sample,
        }
    }

    /// Tag and embed a freshly created item. The two branches run
    /// concurrently; a failure in one never blocks the other.
    pub async fn enrich(&self, item: &ContentItem) -> IngestReport {
        let Some(context) = item
            .user_context
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
        else {
            tracing::debug!("Content {} has no user context, skipping enrichment", item.id);
            return IngestReport::default();
        };

        let (tagged, embedded) = tokio::join!(
            self.tag_branch(item, context),
            self.embedding_branch(item, context)
        );

        let report = IngestReport {
            tag_source: tagged.as_ref().map(|(source, _)| *source),
            tag_count: tagged.map(|(_, n)| n).unwrap_or(0),
            embedded,
        };
        tracing::info!(
            "Enriched content {}: {} tags ({:?}), embedded: {}",
            item.id,
            report.tag_count,
            report.tag_source,
            report.embedded
        );
        report
    }

    async fn tag_branch(&self, item: &ContentItem, context: &str) -> Option<(TagSource, usize)> {
        let ctx = TagContext {
            context: context.to_string(),
            file_type: item.file_type,
            max_tags: self.max_tags,
            interests: self.records.interests(item.owner_id),
            prior_tags: self.records.recent_tags(item.owner_id, self.prior_tag_sample),
        };
        let suggestion = self.tagger.extract(&ctx).await;
        if suggestion.tags.is_empty() {
            tracing::warn!("No tags could be derived for content {}", item.id);
            return None;
        }

        match self.records.set_tags(item.id, suggestion.tags.clone()) {
            Ok(Enrichment::Written) => {}
            Ok(other) => {
                tracing::debug!("Tags for content {} not written: {other:?}", item.id);
                return None;
            }
            Err(e) => {
                tracing::warn!("Failed to persist tags for content {}: {e}", item.id);
                return None;
            }
        }
        if let Err(e) = self
            .tags
            .upsert(item.id, item.owner_id, &suggestion.tags, item.created_at)
            .await
        {
            tracing::warn!("Failed to index tags for content {}: {e}", item.id);
        }
        if self.was_deleted(item) {
            if let Err(e) = self.tags.remove(item.id).await {
                tracing::warn!("Failed to drop tags of deleted content {}: {e}", item.id);
            }
            return None;
        }
        Some((suggestion.source, suggestion.tags.len()))
    }

    async fn embedding_branch(&self, item: &ContentItem, context: &str) -> bool {
        let embedding = match self.embedder.embed(context).await {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("Embedding failed for content {}: {e}", item.id);
                return false;
            }
        };
        match self.store_embedding(item, embedding).await {
            Ok(Enrichment::Written) => true,
            Ok(other) => {
                tracing::debug!("Embedding for content {} not written: {other:?}", item.id);
                false
            }
            Err(e) => {
                tracing::warn!("Failed to store embedding for content {}: {e}", item.id);
                false
            }
        }
    }

    /// Persist `embedding` on the record, then add it to the vector index.
    /// The index is only touched after a successful first write.
    pub async fn store_embedding(
        &self,
        item: &ContentItem,
        embedding: Vec<f32>,
    ) -> Result<Enrichment, IndexError> {
        if embedding.len() != self.embedder.dimension() {
            return Err(IndexError::Dimension {
                expected: self.embedder.dimension(),
                actual: embedding.len(),
            });
        }
        let outcome = self.records.set_embedding(item.id, embedding.clone())?;
        if outcome != Enrichment::Written {
            return Ok(outcome);
        }
        self.vectors.upsert(item.id, item.owner_id, embedding).await?;
        if self.was_deleted(item) {
            self.vectors.remove(item.id).await?;
            return Ok(Enrichment::Missing);
        }
        Ok(outcome)
    }

    /// A delete that lands between a record write and its index upsert
    /// leaves the index entry behind; callers drop it when this is true.
    fn was_deleted(&self, item: &ContentItem) -> bool {
        let gone = self.records.get(item.owner_id, item.id).is_none();
        if gone {
            tracing::debug!("Content {} was deleted during enrichment", item.id);
        }
        gone
    }

    /// Delete an owned item from both indexes and then the record store.
    ///
    /// The record goes last so a failed index removal can be retried.
    pub async fn remove(&self, owner_id: Uuid, id: Uuid) -> Result<Option<ContentItem>, IndexError> {
        if self.records.get(owner_id, id).is_none() {
            return Ok(None);
        }
        self.remove_from_indexes(id).await?;
        let removed = self.records.delete(owner_id, id)?;

        // Enrichment running concurrently may have re-added an entry
        if let Err(e) = self.remove_from_indexes(id).await {
            tracing::warn!("Failed to sweep index entries of deleted content {id}: {e}");
        }
        Ok(removed)
    }

    async fn remove_from_indexes(&self, id: Uuid) -> Result<(), IndexError> {
        let (vectors, tags) = tokio::join!(self.vectors.remove(id), self.tags.remove(id));
        vectors?;
        tags?;
        Ok(())
    }
}
