//! Fixed vocabularies: stopwords, activity keyword → tag table, and the
//! closed keyword set used for query-time tag inference.

/// Words never worth keeping as a tag.
pub const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
    "are", "was", "were", "am", "i", "you", "he", "she", "it", "we", "they", "my", "your", "his",
    "her", "its", "our", "their", "this", "that", "these", "those",
];

/// Activity keyword (matched as a substring of the context) and its associated tags.
/// Order matters: it fixes the order of heuristic tags.
pub const ACTIVITY_TAGS: &[(&str, &[&str])] = &[
    ("coffee", &["coffee", "cafe", "morning", "social"]),
    ("workout", &["fitness", "gym", "exercise", "health"]),
    ("beach", &["beach", "ocean", "summer", "vacation"]),
    ("sunset", &["sunset", "golden-hour", "peaceful", "nature"]),
    ("friends", &["friends", "social", "gathering", "fun"]),
    ("food", &["food", "dining", "delicious", "meal"]),
    ("travel", &["travel", "adventure", "explore", "journey"]),
    ("work", &["work", "office", "professional", "busy"]),
    ("family", &["family", "love", "together", "bonding"]),
    ("music", &["music", "concert", "performance", "entertainment"]),
    ("nature", &["nature", "outdoors", "peaceful", "fresh-air"]),
    ("party", &["party", "celebration", "fun", "social"]),
    ("shopping", &["shopping", "retail", "fashion", "style"]),
    ("study", &["study", "learning", "education", "focus"]),
];

/// How many associated tags one keyword match contributes.
pub const TAGS_PER_ACTIVITY: usize = 2;

/// Closed vocabulary for query-time tag inference: every activity keyword
/// above plus the theme words users search with.
pub const QUERY_KEYWORDS: &[&str] = &[
    "coffee", "food", "dinner", "lunch", "breakfast", "meal",
    "workout", "gym", "exercise", "fitness", "run", "sport",
    "beach", "ocean", "sea", "water", "swim", "vacation",
    "sunset", "sunrise", "morning", "evening", "night",
    "friends", "family", "social", "party", "gathering",
    "work", "office", "meeting", "business", "professional",
    "travel", "trip", "adventure", "explore", "journey",
    "music", "concert", "performance", "art", "creative",
    "nature", "outdoor", "hiking", "park", "garden",
    "shopping", "fashion", "style", "clothes", "retail",
    "study", "learning", "education", "book", "school",
];

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

/// Lowercase words with surrounding punctuation removed.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
}

/// Tags a search query names directly, matched against [`QUERY_KEYWORDS`].
///
/// Pure and offline so query-time tag inference adds no latency.
pub fn tags_from_query(query: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for word in tokenize(query) {
        if QUERY_KEYWORDS.contains(&word.as_str()) && !tags.contains(&word) {
            tags.push(word);
        }
    }
    tags
}
