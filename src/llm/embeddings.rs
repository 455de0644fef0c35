use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::error::ProviderError;

/// Maximum characters sent per text to the embedding API.
/// text-embedding-3-small accepts 8 191 tokens; user descriptions are short,
/// so anything past this is pasted noise.
const MAX_EMBED_CHARS: usize = 8_000;

/// Turns free text into a fixed-length dense vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError>;

    /// Length of every vector this embedder returns.
    fn dimension(&self) -> usize;
}

/// Truncate `text` to at most `MAX_EMBED_CHARS`, splitting on a UTF-8 char boundary.
fn truncate_for_embedding(text: &str) -> &str {
    if text.len() <= MAX_EMBED_CHARS {
        return text;
    }
    let mut end = MAX_EMBED_CHARS;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Embedding client for OpenAI-compatible and Ollama endpoints.
#[derive(Clone)]
pub struct HttpEmbedder {
    client: reqwest::Client,
    config: LlmConfig,
}

impl HttpEmbedder {
    pub fn new(client: reqwest::Client, config: LlmConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ProviderError::EmptyInput);
        }
        let text = truncate_for_embedding(text);

        let embedding = match self.config.provider.as_str() {
            "openai" => embed_openai(&self.client, &self.config, text).await?,
            "ollama" => embed_ollama(&self.client, &self.config, text).await?,
            other => return Err(ProviderError::UnknownProvider(other.to_string())),
        };

        if embedding.len() != self.config.embedding_dim {
            return Err(ProviderError::Dimension {
                expected: self.config.embedding_dim,
                actual: embedding.len(),
            });
        }
        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.config.embedding_dim
    }
}

// ─── OpenAI-compatible ───────────────────────────────────

#[derive(Serialize)]
struct OpenAiEmbedRequest<'a> {
    model: &'a str,
    input: &'a str,
    encoding_format: &'static str,
}

#[derive(Deserialize)]
struct OpenAiEmbedResponse {
    #[serde(default)]
    data: Vec<OpenAiEmbedData>,
}

#[derive(Deserialize)]
struct OpenAiEmbedData {
    embedding: Option<Vec<f32>>,
}

async fn embed_openai(
    client: &reqwest::Client,
    config: &LlmConfig,
    text: &str,
) -> Result<Vec<f32>, ProviderError> {
    let url = format!("{}/v1/embeddings", config.base_url);
    let api_key = config.api_key.as_deref().unwrap_or_default();

    let req = OpenAiEmbedRequest {
        model: &config.embedding_model,
        input: text,
        encoding_format: "float",
    };

    let resp = client
        .post(&url)
        .header("Authorization", format!("Bearer {api_key}"))
        .json(&req)
        .send()
        .await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(ProviderError::Status { status, body });
    }

    let body: OpenAiEmbedResponse = resp
        .json()
        .await
        .map_err(|e| ProviderError::Malformed(e.to_string()))?;

    body.data
        .into_iter()
        .next()
        .and_then(|d| d.embedding)
        .ok_or(ProviderError::MissingField("data[0].embedding"))
}

// ─── Ollama ──────────────────────────────────────────────

#[derive(Serialize)]
struct OllamaEmbedRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
    /// Ask Ollama to truncate inputs past the model context instead of failing.
    truncate: bool,
}

#[derive(Deserialize)]
struct OllamaEmbedResponse {
    #[serde(default)]
    embeddings: Vec<Vec<f32>>,
}

async fn embed_ollama(
    client: &reqwest::Client,
    config: &LlmConfig,
    text: &str,
) -> Result<Vec<f32>, ProviderError> {
    let url = format!("{}/api/embed", config.base_url);

    let req = OllamaEmbedRequest {
        model: &config.embedding_model,
        input: vec![text],
        truncate: true,
    };

    let resp = client.post(&url).json(&req).send().await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(ProviderError::Status { status, body });
    }

    let body: OllamaEmbedResponse = resp
        .json()
        .await
        .map_err(|e| ProviderError::Malformed(e.to_string()))?;

    body.embeddings
        .into_iter()
        .next()
        .ok_or(ProviderError::MissingField("embeddings[0]"))
}
