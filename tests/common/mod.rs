//! Deterministic providers and request helpers shared by the integration tests.
#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use parking_lot::Mutex;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use content_search::config::Config;
use content_search::error::ProviderError;
use content_search::llm::chat::{ChatModel, CompletionRequest};
use content_search::llm::embeddings::Embedder;
use content_search::state::AppState;

pub const SECRET: &str = "integration-secret";

/// Axes of the toy embedding space; the last axis means "none of these".
const AXES: [&str; 3] = ["coffee", "beach", "gym"];
pub const DIM: usize = AXES.len() + 1;

/// Embeds text as a one-hot-ish vector over a few keywords.
#[derive(Default)]
pub struct KeywordEmbedder {
    pub calls: AtomicUsize,
    pub fail: AtomicBool,
}

pub fn keyword_vector(text: &str) -> Vec<f32> {
    let lower = text.to_lowercase();
    let mut v: Vec<f32> = AXES
        .iter()
        .map(|k| if lower.contains(k) { 1.0 } else { 0.0 })
        .collect();
    let none = v.iter().all(|x| *x == 0.0);
    v.push(if none { 1.0 } else { 0.0 });
    v
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(ProviderError::Status {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                body: "embedding backend down".into(),
            });
        }
        Ok(keyword_vector(text))
    }

    fn dimension(&self) -> usize {
        DIM
    }
}

/// Answers tag, caption and question prompts with fixed, prompt-derived output.
#[derive(Default)]
pub struct ScriptedChat {
    pub calls: AtomicUsize,
    pub fail: AtomicBool,
    pub prompts: Mutex<Vec<String>>,
}

pub const ANSWER: &str = "You have one coffee moment: a morning at the corner cafe.";

fn quoted_context(prompt: &str) -> &str {
    prompt
        .split("context: \"")
        .nth(1)
        .and_then(|rest| rest.split('"').next())
        .unwrap_or("")
}

#[async_trait]
impl ChatModel for ScriptedChat {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().push(request.user.clone());
        if self.fail.load(Ordering::SeqCst) {
            return Err(ProviderError::Status {
                status: reqwest::StatusCode::BAD_GATEWAY,
                body: "model overloaded".into(),
            });
        }

        if request.system.contains("tags") {
            let context = quoted_context(&request.user).to_lowercase();
            let mut tags: Vec<&str> = AXES.iter().copied().filter(|k| context.contains(k)).collect();
            if tags.is_empty() {
                tags.push("moment");
            }
            Ok(serde_json::json!({ "tags": tags, "confidence": 0.9 }).to_string())
        } else if request.system.contains("caption") {
            Ok(r#"{"caption": "Fresh brew, fresh start", "suggestions": ["Bean there", "Cup of joy"], "confidence": 0.85}"#.to_string())
        } else {
            Ok(ANSWER.to_string())
        }
    }
}

pub struct TestApp {
    pub dir: tempfile::TempDir,
    pub state: AppState,
    pub router: Router,
    pub embedder: Arc<KeywordEmbedder>,
    pub chat: Arc<ScriptedChat>,
}

pub fn test_config(dir: &Path) -> Config {
    let mut config = Config {
        data_dir: dir.to_path_buf(),
        ..Config::default()
    };
    config.llm.embedding_dim = DIM;
    config.auth.jwt_secret = Some(SECRET.to_string());
    config
}

pub fn test_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    test_app_with_config(dir, |_| {})
}

pub fn test_app_with_config(dir: tempfile::TempDir, tweak: impl FnOnce(&mut Config)) -> TestApp {
    let mut config = test_config(dir.path());
    tweak(&mut config);
    let embedder = Arc::new(KeywordEmbedder::default());
    let chat = Arc::new(ScriptedChat::default());
    let state = AppState::with_providers(config, embedder.clone(), chat.clone()).unwrap();
    let router = content_search::api::router(state.clone());
    TestApp {
        dir,
        state,
        router,
        embedder,
        chat,
    }
}

#[derive(serde::Serialize)]
struct Claims {
    sub: String,
    exp: i64,
}

pub fn token_for(user: Uuid) -> String {
    let claims = Claims {
        sub: user.to_string(),
        exp: chrono::Utc::now().timestamp() + 3600,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn json_request(method: &str, uri: &str, user: Option<Uuid>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(user) = user {
        builder = builder.header("authorization", format!("Bearer {}", token_for(user)));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: &str, uri: &str, user: Option<Uuid>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("authorization", format!("Bearer {}", token_for(user)));
    }
    builder.body(Body::empty()).unwrap()
}

/// Send one request and return the status with the body parsed as JSON
/// (`Null` when empty).
pub async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}
