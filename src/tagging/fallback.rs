//! Deterministic keyword tagger used when the language model is unavailable.
//!
//! Three-step strategy:
//! 1. Activity keywords found anywhere in the context contribute up to two
//!    associated tags each
//! 2. Remaining meaningful words (longer than 2 chars, not stopwords) fill
//!    the list up to the budget
//! 3. Duplicates are dropped and the list is cut to `max_tags`
//!
//! Words are matched with surrounding punctuation trimmed, so `"friends!"`
//! yields `friends`. When trimming leaves nothing usable (`"the."`, `"!!!"`)
//! the untrimmed whitespace-separated words are used instead, so any context
//! holding a non-stopword token longer than 2 chars still gets a tag.
//!
//! No I/O, no randomness: the same context always yields the same tags.

use super::vocabulary::{is_stopword, tokenize, ACTIVITY_TAGS, TAGS_PER_ACTIVITY};

/// Words this short are never tags.
const MIN_WORD_CHARS: usize = 3;

/// Generate tags from `context` using only fixed tables.
pub fn fallback_tags(context: &str, max_tags: usize) -> Vec<String> {
    let lower = context.to_lowercase();
    let mut tags: Vec<String> = Vec::new();

    for (keyword, related) in ACTIVITY_TAGS {
        if lower.contains(keyword) {
            for tag in related.iter().take(TAGS_PER_ACTIVITY) {
                push_unique(&mut tags, tag);
            }
        }
    }

    for word in tokenize(&lower) {
        if tags.len() >= max_tags {
            break;
        }
        if is_meaningful(&word) {
            push_unique(&mut tags, &word);
        }
    }

    if tags.is_empty() {
        for word in lower.split_whitespace() {
            if tags.len() >= max_tags {
                break;
            }
            if is_meaningful(word) {
                push_unique(&mut tags, word);
            }
        }
    }

    tags.truncate(max_tags);
    tags
}

fn is_meaningful(word: &str) -> bool {
    word.chars().count() >= MIN_WORD_CHARS && !is_stopword(word)
}

fn push_unique(tags: &mut Vec<String>, tag: &str) {
    if !tags.iter().any(|t| t == tag) {
        tags.push(tag.to_string());
    }
}
