use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of uploaded media.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    #[default]
    Image,
    Video,
}

impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Image => "image",
            FileType::Video => "video",
        }
    }
}

/// A unit of indexed content (an uploaded image or video).
///
/// `tags` and `embedding` start out empty and are written at most once by
/// the ingestion pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub file_type: FileType,
    pub storage_path: String,
    pub caption: Option<String>,
    pub user_context: Option<String>,
    pub tags: Option<Vec<String>>,
    pub embedding: Option<Vec<f32>>,
    pub created_at: DateTime<Utc>,
}

impl ContentItem {
    /// Client-facing view; the raw vector stays server side.
    pub fn view(&self) -> ContentView {
        ContentView {
            id: self.id,
            file_type: self.file_type,
            storage_path: self.storage_path.clone(),
            caption: self.caption.clone(),
            user_context: self.user_context.clone(),
            tags: self.tags.clone(),
            has_embedding: self.embedding.is_some(),
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentView {
    pub id: Uuid,
    pub file_type: FileType,
    pub storage_path: String,
    pub caption: Option<String>,
    pub user_context: Option<String>,
    pub tags: Option<Vec<String>>,
    pub has_embedding: bool,
    pub created_at: DateTime<Utc>,
}

/// Which sub-searches a query runs.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    Semantic,
    Tags,
    #[default]
    Hybrid,
}

impl SearchType {
    pub fn uses_vectors(&self) -> bool {
        matches!(self, SearchType::Semantic | SearchType::Hybrid)
    }

    pub fn uses_tags(&self) -> bool {
        matches!(self, SearchType::Tags | SearchType::Hybrid)
    }
}

/// A retrieval request after boundary validation. The requesting user is
/// passed alongside it and scopes every index lookup.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub query_text: String,
    pub search_type: SearchType,
    pub max_results: usize,
    pub generate_response: bool,
}

/// A content item projected for display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub id: Uuid,
    pub user_context: Option<String>,
    pub caption: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub file_type: FileType,
    /// Only present on hits from semantic search, in [0, 1].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f32>,
    pub created_at: DateTime<Utc>,
}

impl SearchResult {
    pub fn from_item(item: &ContentItem) -> Self {
        Self {
            id: item.id,
            user_context: item.user_context.clone(),
            caption: item.caption.clone(),
            tags: item.tags.clone().unwrap_or_default(),
            file_type: item.file_type,
            similarity: None,
            created_at: item.created_at,
        }
    }
}

/// Output of the hybrid retrieval orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagResponse {
    pub results: Vec<SearchResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_embedding: Option<Vec<f32>>,
    pub search_type: SearchType,
}

// ─── Request / response bodies ───────────────────────────

/// POST /api/search
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub search_type: SearchType,
    pub max_results: Option<usize>,
    #[serde(default = "default_true")]
    pub generate_response: bool,
}

fn default_true() -> bool {
    true
}

/// POST /api/tags
#[derive(Debug, Clone, Deserialize)]
pub struct TagRequest {
    pub context: String,
    #[serde(default)]
    pub file_type: FileType,
    pub max_tags: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagResponse {
    pub tags: Vec<String>,
    pub confidence: f32,
}

/// Tone of a generated caption.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CaptionStyle {
    #[default]
    Casual,
    Professional,
    Funny,
    Inspirational,
}

impl CaptionStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptionStyle::Casual => "casual",
            CaptionStyle::Professional => "professional",
            CaptionStyle::Funny => "funny",
            CaptionStyle::Inspirational => "inspirational",
        }
    }

    /// Tone description injected into the caption prompt.
    pub fn tone(&self) -> &'static str {
        match self {
            CaptionStyle::Casual => {
                "Friendly, relaxed, conversational tone. Use everyday language and relatable expressions."
            }
            CaptionStyle::Professional => {
                "Polished, informative, and sophisticated. Suitable for business or formal contexts."
            }
            CaptionStyle::Funny => {
                "Humorous, witty, playful. Include puns, jokes, or clever observations where appropriate."
            }
            CaptionStyle::Inspirational => {
                "Motivational, uplifting, positive. Focus on encouragement and meaningful messages."
            }
        }
    }
}

/// POST /api/caption
#[derive(Debug, Clone, Deserialize)]
pub struct CaptionRequest {
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub style: CaptionStyle,
    pub max_length: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaptionResponse {
    pub caption: String,
    pub suggestions: Vec<String>,
    pub confidence: f32,
}

/// POST /api/embedding
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingRequest {
    pub text: String,
    pub content_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    pub embedding: Vec<f32>,
    pub success: bool,
}

/// POST /api/content
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContentRequest {
    #[serde(default)]
    pub file_type: FileType,
    pub storage_path: String,
    pub caption: Option<String>,
    pub user_context: Option<String>,
}

/// PUT /api/profile/interests
#[derive(Debug, Clone, Deserialize)]
pub struct InterestsRequest {
    pub interests: Vec<String>,
}
