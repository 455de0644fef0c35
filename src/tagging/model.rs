//! Language-model tag suggestions.

use serde::Deserialize;

use super::{normalize_tags, TagContext};
use crate::error::ProviderError;
use crate::llm::chat::{ChatModel, CompletionRequest};
use crate::llm::prompt::{extract_json_object, sanitize_for_prompt};

const SYSTEM_PROMPT: &str = "You are an expert at generating relevant, specific tags for social \
     media content. Generate concise, searchable tags that help categorize and discover content. \
     Always respond with valid JSON.";

/// Previously used tags shown to the model for vocabulary consistency.
const PRIOR_TAGS_IN_PROMPT: usize = 10;
const DEFAULT_CONFIDENCE: f32 = 0.8;

/// Ask the model for tags. Unusable output is reported as a provider error so
/// the caller can switch to the heuristic.
pub async fn model_tags(
    model: &dyn ChatModel,
    ctx: &TagContext,
) -> Result<(Vec<String>, f32), ProviderError> {
    let request = CompletionRequest {
        system: SYSTEM_PROMPT.to_string(),
        user: build_tag_prompt(ctx),
        temperature: 0.7,
        max_tokens: 200,
    };
    let raw = model.complete(request).await?;
    parse_tag_output(&raw, ctx.max_tags)
}

pub(crate) fn build_tag_prompt(ctx: &TagContext) -> String {
    let context = sanitize_for_prompt(&ctx.context);
    let file_type = ctx.file_type.as_str();
    let max_tags = ctx.max_tags;
    let interests = if ctx.interests.is_empty() {
        "general".to_string()
    } else {
        sanitize_for_prompt(&ctx.interests.join(", "))
    };
    let prior = if ctx.prior_tags.is_empty() {
        "none".to_string()
    } else {
        let sample: Vec<&str> = ctx
            .prior_tags
            .iter()
            .take(PRIOR_TAGS_IN_PROMPT)
            .map(String::as_str)
            .collect();
        sanitize_for_prompt(&sample.join(", "))
    };

    format!(
        "Generate relevant tags for a {file_type} based on this context: \"{context}\"\n\n\
         User Profile:\n\
         - Interests: {interests}\n\
         - Previously used tags: {prior}\n\n\
         Requirements:\n\
         1. Generate {max_tags} relevant, specific tags\n\
         2. Tags should be 1-2 words each, lowercase\n\
         3. Focus on: activities, locations, objects, moods, themes\n\
         4. Consider user's interests: {interests}\n\
         5. Be consistent with previously used tags when relevant\n\
         6. Avoid generic tags like \"photo\" or \"image\"\n\n\
         Examples of good tags:\n\
         - For \"having coffee with friends\": coffee, friends, social, cafe, morning, conversation\n\
         - For \"sunset at the beach\": sunset, beach, golden-hour, ocean, peaceful, nature\n\
         - For \"working out at gym\": fitness, gym, workout, exercise, health, strength\n\n\
         Format your response as JSON:\n\
         {{\n  \"tags\": [\"tag1\", \"tag2\", \"tag3\"],\n  \"confidence\": 0.9\n}}"
    )
}

#[derive(Deserialize)]
struct RawTags {
    #[serde(default)]
    tags: Vec<String>,
    confidence: Option<f32>,
}

fn parse_tag_output(raw: &str, max_tags: usize) -> Result<(Vec<String>, f32), ProviderError> {
    let json = extract_json_object(raw)
        .ok_or_else(|| ProviderError::Malformed(format!("no JSON object in tag output: {raw}")))?;
    let parsed: RawTags =
        serde_json::from_str(json).map_err(|e| ProviderError::Malformed(e.to_string()))?;

    let tags = normalize_tags(parsed.tags, max_tags);
    if tags.is_empty() {
        return Err(ProviderError::Malformed("model returned no usable tags".into()));
    }
    let confidence = parsed.confidence.unwrap_or(DEFAULT_CONFIDENCE).clamp(0.0, 1.0);
    Ok((tags, confidence))
}
