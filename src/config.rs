use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where content records and index data are stored
    pub data_dir: PathBuf,
    /// Server bind address
    pub bind_addr: String,
    /// LLM / embedding provider configuration
    pub llm: LlmConfig,
    /// Token verification for the mobile client
    pub auth: AuthConfig,
    /// Retrieval limits and thresholds
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "openai" or "ollama"
    pub provider: String,
    /// Base URL for the LLM API
    pub base_url: String,
    /// Model name for tags, captions and answers
    pub chat_model: String,
    /// Model name for embeddings
    pub embedding_model: String,
    /// API key (only needed for cloud providers)
    pub api_key: Option<String>,
    /// Embedding vector dimension. Every stored and queried vector must match it.
    pub embedding_dim: usize,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

/// HS256 secret used to verify bearer tokens issued by the auth provider.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// If None, every authenticated route rejects with 401.
    #[serde(skip_serializing)]
    pub jwt_secret: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Minimum cosine similarity for semantic hits
    pub similarity_threshold: f32,
    pub default_max_results: usize,
    /// Larger `max_results` requests are clamped to this
    pub max_results_cap: usize,
    pub default_max_tags: usize,
    pub max_tags_cap: usize,
    pub default_caption_length: usize,
    /// How many of the user's most recent tagged items feed the tag prompt
    pub prior_tag_sample: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            bind_addr: "127.0.0.1:9000".to_string(),
            llm: LlmConfig::default(),
            auth: AuthConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            base_url: "https://api.openai.com".to_string(),
            chat_model: "gpt-4o-mini".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            api_key: None,
            embedding_dim: 1536,
            request_timeout_secs: 60,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.7,
            default_max_results: 10,
            max_results_cap: 50,
            default_max_tags: 5,
            max_tags_cap: 20,
            default_caption_length: 100,
            prior_tag_sample: 20,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("CONTENT_SEARCH_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(addr) = std::env::var("CONTENT_SEARCH_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(provider) = std::env::var("LLM_PROVIDER") {
            config.llm.provider = provider;
        }
        if let Ok(url) = std::env::var("LLM_BASE_URL") {
            config.llm.base_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(model) = std::env::var("LLM_CHAT_MODEL") {
            config.llm.chat_model = model;
        }
        if let Ok(model) = std::env::var("LLM_EMBEDDING_MODEL") {
            config.llm.embedding_model = model;
        }
        if let Ok(key) = std::env::var("LLM_API_KEY") {
            config.llm.api_key = Some(key);
        }
        if let Ok(dim) = std::env::var("LLM_EMBEDDING_DIM") {
            if let Ok(d) = dim.parse() {
                config.llm.embedding_dim = d;
            }
        }
        if let Ok(val) = std::env::var("LLM_TIMEOUT_SECS") {
            if let Ok(v) = val.parse() {
                config.llm.request_timeout_secs = v;
            }
        }

        if let Ok(secret) = std::env::var("AUTH_JWT_SECRET") {
            if !secret.is_empty() {
                config.auth.jwt_secret = Some(secret);
            }
        }

        if let Ok(val) = std::env::var("SEARCH_SIMILARITY_THRESHOLD") {
            if let Some(v) = parse_threshold(&val) {
                config.search.similarity_threshold = v;
            }
        }
        if let Ok(val) = std::env::var("SEARCH_MAX_RESULTS_CAP") {
            if let Ok(v) = val.parse::<usize>() {
                config.search.max_results_cap = v.max(1);
            }
        }

        config
    }

    pub fn content_path(&self) -> PathBuf {
        self.data_dir.join("content.json")
    }

    pub fn vector_path(&self) -> PathBuf {
        self.data_dir.join("vectors.json")
    }

    pub fn tag_index_path(&self) -> PathBuf {
        self.data_dir.join("tags.json")
    }
}

/// A finite similarity threshold clamped to [0, 1]. `NaN` and infinities
/// are rejected.
fn parse_threshold(val: &str) -> Option<f32> {
    val.trim()
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(0.0, 1.0))
}
