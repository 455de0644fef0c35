use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::SearchConfig;
use crate::error::{IndexError, SearchError};
use crate::llm::answer::generate_answer;
use crate::llm::chat::ChatModel;
use crate::llm::embeddings::Embedder;
use crate::models::{RagResponse, SearchQuery, SearchResult, SearchType};
use crate::search::{TagIndex, VectorIndex};
use crate::tagging::vocabulary::tags_from_query;

/// Outcome of the semantic path: the query vector, if the embedder produced
/// one, and the index result.
struct SemanticOutcome {
    embedding: Option<Vec<f32>>,
    hits: Result<Vec<SearchResult>, IndexError>,
}

/// Hybrid retrieval orchestrator.
///
/// Pipeline:
/// 1. Reject an empty query before any I/O.
/// 2. Run the semantic path (embed → vector index) and the tag path
///    (closed-vocabulary keywords → tag index) concurrently. In hybrid mode
///    each is capped at `ceil(max_results / 2)`.
/// 3. Merge by id, semantic first, then truncate to `max_results`.
/// 4. Optionally ask the chat model for an answer grounded in the results.
///
/// Provider failures degrade a single path; only an index failure in the
/// sole requested modality (or in both) fails the query.
#[derive(Clone)]
pub struct HybridSearcher {
    embedder: Arc<dyn Embedder>,
    chat: Arc<dyn ChatModel>,
    vectors: Arc<dyn VectorIndex>,
    tags: Arc<dyn TagIndex>,
    similarity_threshold: f32,
}

impl HybridSearcher {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        chat: Arc<dyn ChatModel>,
        vectors: Arc<dyn VectorIndex>,
        tags: Arc<dyn TagIndex>,
        config: &SearchConfig,
    ) -> Self {
        Self {
            embedder,
            chat,
            vectors,
            tags,
            similarity_threshold: config.similarity_threshold,
        }
    }

    pub async fn search(
        &self,
        owner_id: Uuid,
        query: &SearchQuery,
    ) -> Result<RagResponse, SearchError> {
        let text = query.query_text.trim();
        if text.is_empty() {
            return Err(SearchError::Validation("query is required".into()));
        }
        if query.max_results == 0 {
            return Err(SearchError::Validation(
                "max_results must be at least 1".into(),
            ));
        }

        let per_modality = match query.search_type {
            SearchType::Hybrid => query.max_results.div_ceil(2),
            SearchType::Semantic | SearchType::Tags => query.max_results,
        };

        let semantic = async {
            if query.search_type.uses_vectors() {
                Some(self.semantic_path(owner_id, text, per_modality).await)
            } else {
                None
            }
        };
        let tagged = async {
            if query.search_type.uses_tags() {
                Some(self.tag_path(owner_id, text, per_modality).await)
            } else {
                None
            }
        };
        let (semantic, tagged) = tokio::join!(semantic, tagged);

        let query_embedding = semantic.as_ref().and_then(|s| s.embedding.clone());
        let (semantic_hits, tag_hits) =
            resolve_paths(semantic.map(|s| s.hits), tagged)?;

        let results = merge_results(semantic_hits, tag_hits, query.max_results);
        tracing::debug!(
            "Search ({:?}) returned {} results for owner {owner_id}",
            query.search_type,
            results.len()
        );

        let generated_response = if query.generate_response && !results.is_empty() {
            match generate_answer(self.chat.as_ref(), text, &results).await {
                Ok(answer) if !answer.is_empty() => Some(answer),
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!("Answer generation failed: {e}");
                    None
                }
            }
        } else {
            None
        };

        Ok(RagResponse {
            results,
            generated_response,
            query_embedding,
            search_type: query.search_type,
        })
    }

    async fn semantic_path(&self, owner_id: Uuid, text: &str, limit: usize) -> SemanticOutcome {
        let embedding = match self.embedder.embed(text).await {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("Semantic search skipped, embedding failed: {e}");
                return SemanticOutcome {
                    embedding: None,
                    hits: Ok(Vec::new()),
                };
            }
        };

        let hits = self
            .vectors
            .query_similar(&embedding, owner_id, self.similarity_threshold, limit)
            .await;
        SemanticOutcome {
            embedding: Some(embedding),
            hits,
        }
    }

    async fn tag_path(
        &self,
        owner_id: Uuid,
        text: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>, IndexError> {
        let tags = tags_from_query(text);
        if tags.is_empty() {
            return Ok(Vec::new());
        }
        tracing::debug!("Query tags: {:?}", tags);
        self.tags.query_by_tags(&tags, owner_id, limit).await
    }
}

/// Apply the index-failure policy. `None` means the path was not requested.
fn resolve_paths(
    semantic: Option<Result<Vec<SearchResult>, IndexError>>,
    tagged: Option<Result<Vec<SearchResult>, IndexError>>,
) -> Result<(Vec<SearchResult>, Vec<SearchResult>), SearchError> {
    match (semantic, tagged) {
        (Some(Err(se)), Some(Err(te))) => {
            tracing::warn!("Tag search failed: {te}");
            Err(SearchError::Index(se))
        }
        (Some(Err(e)), Some(Ok(tags))) => {
            tracing::warn!("Vector search failed, using tag results only: {e}");
            Ok((Vec::new(), tags))
        }
        (Some(Ok(sem)), Some(Err(e))) => {
            tracing::warn!("Tag search failed, using semantic results only: {e}");
            Ok((sem, Vec::new()))
        }
        (semantic, tagged) => Ok((
            semantic.transpose()?.unwrap_or_default(),
            tagged.transpose()?.unwrap_or_default(),
        )),
    }
}

/// Union by id keeping the first-seen entry (semantic before tag), then
/// truncate to `max_results`.
pub fn merge_results(
    semantic: Vec<SearchResult>,
    tagged: Vec<SearchResult>,
    max_results: usize,
) -> Vec<SearchResult> {
    let mut seen: HashSet<Uuid> = HashSet::new();
    let mut merged: Vec<SearchResult> = Vec::with_capacity(semantic.len() + tagged.len());
    for r in semantic.into_iter().chain(tagged) {
        if seen.insert(r.id) {
            merged.push(r);
        }
    }
    merged.truncate(max_results);
    merged
}
