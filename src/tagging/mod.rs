//! Keyword tag extraction for uploaded content.
//!
//! Two strategies, tried in order:
//! - [`model`]: language-model suggestions informed by the user's interests
//!   and previously used tags
//! - [`fallback`]: deterministic keyword heuristic, taken only when the model
//!   path returns a [`ProviderError`](crate::error::ProviderError)

pub mod fallback;
pub mod model;
pub mod vocabulary;

use std::sync::Arc;

use serde::Serialize;

use crate::llm::chat::ChatModel;
use crate::models::FileType;

/// Confidence reported for heuristic tags.
pub const FALLBACK_CONFIDENCE: f32 = 0.5;

/// Input to tag extraction.
#[derive(Debug, Clone)]
pub struct TagContext {
    pub context: String,
    pub file_type: FileType,
    pub max_tags: usize,
    pub interests: Vec<String>,
    pub prior_tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TagSource {
    Model,
    Heuristic,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagSuggestion {
    pub tags: Vec<String>,
    pub confidence: f32,
    pub source: TagSource,
}

/// Two-stage tag extractor. Never fails.
#[derive(Clone)]
pub struct TagExtractor {
    model: Arc<dyn ChatModel>,
}

impl TagExtractor {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    pub async fn extract(&self, ctx: &TagContext) -> TagSuggestion {
        match model::model_tags(self.model.as_ref(), ctx).await {
            Ok((tags, confidence)) => TagSuggestion {
                tags,
                confidence,
                source: TagSource::Model,
            },
            Err(e) => {
                tracing::warn!("Tag model unavailable, using keyword heuristic: {e}");
                TagSuggestion {
                    tags: fallback::fallback_tags(&ctx.context, ctx.max_tags),
                    confidence: FALLBACK_CONFIDENCE,
                    source: TagSource::Heuristic,
                }
            }
        }
    }
}

/// Lowercase, trim, drop empties and a leading `#`, dedup, cap at `max_tags`.
pub fn normalize_tags<I, S>(tags: I, max_tags: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        if out.len() >= max_tags {
            break;
        }
        let t = tag.as_ref().trim().trim_start_matches('#').trim().to_lowercase();
        if !t.is_empty() && !out.contains(&t) {
            out.push(t);
        }
    }
    out
}
