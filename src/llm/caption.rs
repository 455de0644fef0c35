//! Caption synthesis in a selectable tone.
//!
//! Only the compose and ingestion paths call this; retrieval never waits on it.

use serde::Deserialize;
use std::sync::Arc;

use crate::error::GenerationError;
use crate::llm::chat::{ChatModel, CompletionRequest};
use crate::llm::prompt::{extract_json_object, sanitize_for_prompt, truncate_chars};
use crate::models::{CaptionResponse, CaptionStyle};

const SYSTEM_PROMPT: &str = "You are a creative social media caption writer. Generate engaging, \
     authentic captions that match the user's style and interests. Always respond with valid JSON.";

/// Confidence reported when the model answered with plain text instead of JSON.
const RAW_TEXT_CONFIDENCE: f32 = 0.7;
const DEFAULT_CONFIDENCE: f32 = 0.8;

#[derive(Clone)]
pub struct CaptionWriter {
    model: Arc<dyn ChatModel>,
}

impl CaptionWriter {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Generate a primary caption plus alternatives, each at most `max_length` characters.
    ///
    /// Callers reject empty `context` before getting here.
    pub async fn generate(
        &self,
        context: &str,
        style: CaptionStyle,
        max_length: usize,
    ) -> Result<CaptionResponse, GenerationError> {
        let request = CompletionRequest {
            system: SYSTEM_PROMPT.to_string(),
            user: build_caption_prompt(context, style, max_length),
            temperature: 0.8,
            max_tokens: 300,
        };

        let raw = self.model.complete(request).await?;
        Ok(parse_caption(&raw, max_length))
    }
}

fn build_caption_prompt(context: &str, style: CaptionStyle, max_length: usize) -> String {
    let context = sanitize_for_prompt(context);
    let style_name = style.as_str();
    let tone = style.tone();
    format!(
        "Create engaging {style_name} captions based on the user's description of their photo.\n\n\
         User's Description: \"{context}\"\n\n\
         Style Guidelines: {tone}\n\
         Max length: {max_length} characters\n\n\
         Write fresh captions that capture what they are sharing while being more engaging \
         and {style_name} than their original description.\n\n\
         Requirements:\n\
         1. Generate 1 primary caption and 2 alternative suggestions\n\
         2. Keep all captions under {max_length} characters\n\
         3. Match the {style_name} tone\n\
         4. Be creative and original - do not just rewrite their description\n\
         5. Make it social media ready\n\
         6. Use their description as inspiration for the theme\n\n\
         Format your response as JSON:\n\
         {{\n  \"caption\": \"main caption here\",\n  \"suggestions\": [\"alternative 1\", \"alternative 2\"],\n  \"confidence\": 0.85\n}}"
    )
}

#[derive(Deserialize)]
struct RawCaption {
    caption: Option<String>,
    #[serde(default)]
    suggestions: Vec<String>,
    confidence: Option<f32>,
}

/// Parse model output. Non-JSON output becomes the caption itself, cut to `max_length`.
fn parse_caption(raw: &str, max_length: usize) -> CaptionResponse {
    let parsed = extract_json_object(raw).and_then(|s| serde_json::from_str::<RawCaption>(s).ok());

    match parsed {
        Some(c) => {
            let caption = c
                .caption
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| raw.trim().to_string());
            CaptionResponse {
                caption: truncate_chars(&caption, max_length),
                suggestions: c
                    .suggestions
                    .iter()
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .map(|s| truncate_chars(s, max_length))
                    .collect(),
                confidence: c.confidence.unwrap_or(DEFAULT_CONFIDENCE).clamp(0.0, 1.0),
            }
        }
        None => {
            tracing::debug!("caption output was not JSON, using raw text");
            CaptionResponse {
                caption: truncate_chars(raw.trim(), max_length),
                suggestions: Vec::new(),
                confidence: RAW_TEXT_CONFIDENCE,
            }
        }
    }
}
