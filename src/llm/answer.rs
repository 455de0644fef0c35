use std::fmt::Write;

use crate::error::ProviderError;
use crate::llm::chat::{ChatModel, CompletionRequest};
use crate::llm::prompt::sanitize_for_prompt;
use crate::models::SearchResult;

const SYSTEM_PROMPT: &str = "You are a helpful assistant that answers questions about a user's \
     personal content and activities. Be conversational and insightful.";

/// Answer `query` strictly from the retrieved items.
pub async fn generate_answer(
    model: &dyn ChatModel,
    query: &str,
    results: &[SearchResult],
) -> Result<String, ProviderError> {
    let request = CompletionRequest {
        system: SYSTEM_PROMPT.to_string(),
        user: build_answer_prompt(query, &build_context_block(results)),
        temperature: 0.7,
        max_tokens: 300,
    };
    let answer = model.complete(request).await?;
    Ok(answer.trim().to_string())
}

/// One numbered line per item: description (user context, then caption) plus tags.
fn build_context_block(results: &[SearchResult]) -> String {
    let mut ctx = String::new();
    for (i, r) in results.iter().enumerate() {
        let description = r
            .user_context
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| r.caption.as_deref().filter(|s| !s.trim().is_empty()))
            .unwrap_or("No description");
        let tags = if r.tags.is_empty() {
            "No tags".to_string()
        } else {
            r.tags.join(", ")
        };
        // Writing to a String cannot fail.
        let _ = writeln!(
            ctx,
            "{}. {} (Tags: {})",
            i + 1,
            sanitize_for_prompt(description),
            sanitize_for_prompt(&tags)
        );
    }
    ctx
}

fn build_answer_prompt(query: &str, context_block: &str) -> String {
    let query = sanitize_for_prompt(query);
    format!(
        "Based on the user's content below, answer their question: \"{query}\"\n\n\
         User's Content:\n{context_block}\n\
         Instructions:\n\
         - Answer based only on the provided content\n\
         - Be conversational and helpful\n\
         - If you can identify patterns or themes, mention them\n\
         - If the content doesn't contain relevant information, say so; do not speculate beyond it\n\
         - Keep the response concise but informative\n\
         - Reference specific activities or moments when relevant\n\n\
         Response:"
    )
}
