//! # content-search
//!
//! Retrieval backend for a personal photo/video journal. Users describe what
//! they upload; the service tags and embeds those descriptions and answers
//! natural-language questions over them with a hybrid pipeline that combines
//! vector similarity, tag matching and a grounded LLM answer.
//!
//! ## Architecture
//!
//! ```text
//!                        ┌──────────────┐
//!                        │  User Query  │
//!                        └──────┬───────┘
//!                               │ empty → 400, no I/O
//!                  ┌────────────┴────────────┐
//!                  ▼                         ▼
//!         ┌────────────────┐       ┌──────────────────┐
//!         │ Embed query    │       │ Keyword → tags   │
//!         │ (provider)     │       │ (closed vocab)   │
//!         └───────┬────────┘       └────────┬─────────┘
//!                 ▼                         ▼
//!         ┌────────────────┐       ┌──────────────────┐
//!         │ Vector index   │       │ Tag index        │
//!         │ cos ≥ 0.7      │       │ intersection     │
//!         │ ≤ ceil(n/2)    │       │ ≤ ceil(n/2)      │
//!         └───────┬────────┘       └────────┬─────────┘
//!                 └────────────┬────────────┘
//!                              ▼
//!                 ┌────────────────────────┐
//!                 │ Merge by id            │
//!                 │ semantic first, ≤ n    │
//!                 └───────────┬────────────┘
//!                             ▼
//!                 ┌────────────────────────┐
//!                 │ Grounded answer (opt.) │
//!                 └───────────┬────────────┘
//!                             ▼
//!                 ┌────────────────────────┐
//!                 │      RagResponse       │
//!                 └────────────────────────┘
//! ```
//!
//! Each branch is best-effort: a failed embedding call empties the semantic
//! branch, a failed answer is simply omitted.
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for server, data dir, LLM, auth and search limits
//! - [`models`] - Content records, retrieval types and per-endpoint request/response bodies
//! - [`error`] - Error taxonomy and its HTTP mapping
//! - [`content`] - Owner-scoped content records and profile interests
//! - [`persist`] - Atomic JSON file persistence
//! - [`llm::embeddings`] - Embedding client for Ollama or OpenAI-compatible APIs
//! - [`llm::chat`] - Chat completion client
//! - [`llm::caption`] - Styled caption synthesis
//! - [`llm::answer`] - Answers grounded in retrieved content
//! - [`tagging`] - Model tag extraction with a deterministic keyword fallback
//! - [`search::vector`] - Cosine-similarity vector index
//! - [`search::tags`] - Tag-intersection index
//! - [`search::hybrid`] - The retrieval orchestrator
//! - [`ingest`] - Post-upload tagging and embedding
//! - [`api`] - Axum HTTP handlers with bearer-token auth
//! - [`state`] - Shared application state and provider wiring

pub mod api;
pub mod config;
pub mod content;
pub mod error;
pub mod ingest;
pub mod llm;
pub mod models;
pub mod persist;
pub mod search;
pub mod state;
pub mod tagging;
