pub mod answer;
pub mod caption;
pub mod chat;
pub mod embeddings;
pub mod prompt;
