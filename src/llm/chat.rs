use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::error::ProviderError;

/// One non-streaming completion: a system instruction plus a single user turn.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Language-model text generation.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError>;
}

/// Chat client for OpenAI-compatible and Ollama endpoints.
#[derive(Clone)]
pub struct HttpChatModel {
    client: reqwest::Client,
    config: LlmConfig,
}

impl HttpChatModel {
    pub fn new(client: reqwest::Client, config: LlmConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl ChatModel for HttpChatModel {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        let content = match self.config.provider.as_str() {
            "openai" => call_openai(&self.client, &self.config, &request).await?,
            "ollama" => call_ollama(&self.client, &self.config, &request).await?,
            other => return Err(ProviderError::UnknownProvider(other.to_string())),
        };

        if content.trim().is_empty() {
            return Err(ProviderError::MissingField("message.content"));
        }
        Ok(content)
    }
}

#[derive(Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

fn messages(request: &CompletionRequest) -> Vec<Message> {
    vec![
        Message {
            role: "system".to_string(),
            content: request.system.clone(),
        },
        Message {
            role: "user".to_string(),
            content: request.user.clone(),
        },
    ]
}

// ─── OpenAI-compatible ───────────────────────────────────

#[derive(Serialize)]
struct OpenAiChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct OpenAiChatResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

async fn call_openai(
    client: &reqwest::Client,
    config: &LlmConfig,
    request: &CompletionRequest,
) -> Result<String, ProviderError> {
    let url = format!("{}/v1/chat/completions", config.base_url);
    let api_key = config.api_key.as_deref().unwrap_or_default();

    let req = OpenAiChatRequest {
        model: &config.chat_model,
        messages: messages(request),
        temperature: request.temperature,
        max_tokens: request.max_tokens,
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

    let body: OpenAiChatResponse = resp
        .json()
        .await
        .map_err(|e| ProviderError::Malformed(e.to_string()))?;

    body.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or(ProviderError::MissingField("choices[0].message.content"))
}

// ─── Ollama ──────────────────────────────────────────────

#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: Option<Message>,
}

async fn call_ollama(
    client: &reqwest::Client,
    config: &LlmConfig,
    request: &CompletionRequest,
) -> Result<String, ProviderError> {
    let url = format!("{}/api/chat", config.base_url);

    let req = OllamaChatRequest {
        model: &config.chat_model,
        messages: messages(request),
        stream: false,
        options: OllamaOptions {
            temperature: request.temperature,
            num_predict: request.max_tokens,
        },
    };

    let resp = client.post(&url).json(&req).send().await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(ProviderError::Status { status, body });
    }

    let body: OllamaChatResponse = resp
        .json()
        .await
        .map_err(|e| ProviderError::Malformed(e.to_string()))?;

    body.message
        .map(|m| m.content)
        .ok_or(ProviderError::MissingField("message.content"))
}
