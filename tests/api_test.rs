//! HTTP-level tests driving the router with `tower::ServiceExt::oneshot`.

mod common;

use std::sync::atomic::Ordering;
use std::time::Duration;

use axum::http::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use common::{empty_request, json_request, send, test_app, test_app_with_config, TestApp, ANSWER};

/// Create content over HTTP and wait for the background enrichment to land.
async fn create_enriched(app: &TestApp, user: Uuid, context: &str) -> Value {
    let body = json!({
        "file_type": "image",
        "storage_path": format!("{user}/photo.jpg"),
        "user_context": context,
    });
    let (status, created) = send(
        &app.router,
        json_request("POST", "/api/content", Some(user), &body.to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created["tags"].is_null());
    assert_eq!(created["has_embedding"], false);

    let uri = format!("/api/content/{}", created["id"].as_str().unwrap());
    for _ in 0..100 {
        let (status, item) = send(&app.router, empty_request("GET", &uri, Some(user))).await;
        assert_eq!(status, StatusCode::OK);
        if item["has_embedding"] == true && item["tags"].is_array() {
            return item;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("enrichment never completed for {uri}");
}

#[tokio::test]
async fn test_health_needs_no_auth() {
    let app = test_app();
    let (status, body) = send(&app.router, empty_request("GET", "/api/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_search_requires_auth_before_any_io() {
    let app = test_app();
    let (status, body) = send(
        &app.router,
        json_request("POST", "/api/search", None, r#"{"query": "coffee"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    // An unauthenticated malformed body is still a 401, not a 400.
    let (status, _) = send(
        &app.router,
        json_request("POST", "/api/search", None, "{nope"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.embedder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_invalid_token_is_unauthorized() {
    let app = test_app();
    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/api/search")
        .header("content-type", "application/json")
        .header("authorization", "Bearer not.a.token")
        .body(axum::body::Body::from(r#"{"query": "coffee"}"#))
        .unwrap();
    let (status, _) = send(&app.router, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_secret_fails_closed() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app_with_config(dir, |c| c.auth.jwt_secret = None);
    let (status, _) = send(
        &app.router,
        json_request("POST", "/api/search", Some(Uuid::new_v4()), r#"{"query": "coffee"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_bodies_are_bad_requests() {
    let app = test_app();
    let user = Some(Uuid::new_v4());
    for body in [
        "{not json",
        r#"{"search_type": "hybrid"}"#,
        r#"{"query": "coffee", "search_type": "fuzzy"}"#,
        r#"{"query": "coffee", "max_results": -1}"#,
    ] {
        let (status, resp) = send(&app.router, json_request("POST", "/api/search", user, body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
        assert!(resp["error"].is_string(), "body: {body}");
    }
}

#[tokio::test]
async fn test_empty_query_is_bad_request_without_provider_calls() {
    let app = test_app();
    let (status, body) = send(
        &app.router,
        json_request("POST", "/api/search", Some(Uuid::new_v4()), r#"{"query": "   "}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "query is required");
    assert_eq!(app.embedder.calls.load(Ordering::SeqCst), 0);
    assert_eq!(app.chat.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_zero_max_results_is_bad_request() {
    let app = test_app();
    let (status, _) = send(
        &app.router,
        json_request(
            "POST",
            "/api/search",
            Some(Uuid::new_v4()),
            r#"{"query": "coffee", "max_results": 0}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_semantic_outage_returns_ok_and_empty() {
    let app = test_app();
    app.embedder.fail.store(true, Ordering::SeqCst);
    let (status, body) = send(
        &app.router,
        json_request(
            "POST",
            "/api/search",
            Some(Uuid::new_v4()),
            r#"{"query": "coffee", "search_type": "semantic"}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"], json!([]));
    assert_eq!(body["search_type"], "semantic");
    assert!(body.get("query_embedding").is_none());
    assert!(body.get("generated_response").is_none());
}

#[tokio::test]
async fn test_upload_then_search_round_trip() {
    let app = test_app();
    let user = Uuid::new_v4();
    let coffee = create_enriched(&app, user, "Morning coffee at the corner cafe").await;
    create_enriched(&app, user, "Sunset walk on the beach").await;

    let (status, body) = send(
        &app.router,
        json_request(
            "POST",
            "/api/search",
            Some(user),
            r#"{"query": "Show me my coffee photos", "max_results": 10}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["search_type"], "hybrid");
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["id"], coffee["id"]);
    assert!(results[0]["similarity"].as_f64().unwrap() > 0.99);
    assert_eq!(body["generated_response"], ANSWER);

    // Another user sees nothing.
    let (status, body) = send(
        &app.router,
        json_request(
            "POST",
            "/api/search",
            Some(Uuid::new_v4()),
            r#"{"query": "Show me my coffee photos"}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"], json!([]));
}

#[tokio::test]
async fn test_content_is_owner_scoped_and_deletable() {
    let app = test_app();
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    let item = create_enriched(&app, owner, "gym with friends").await;
    let uri = format!("/api/content/{}", item["id"].as_str().unwrap());

    let (status, _) = send(&app.router, empty_request("GET", &uri, Some(stranger))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app.router, empty_request("DELETE", &uri, Some(stranger))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app.router, empty_request("DELETE", &uri, Some(owner))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = send(&app.router, empty_request("GET", &uri, Some(owner))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(
        &app.router,
        json_request("POST", "/api/search", Some(owner), r#"{"query": "gym"}"#),
    )
    .await;
    assert_eq!(body["results"], json!([]));
}

#[tokio::test]
async fn test_malformed_content_id_is_json_bad_request() {
    let app = test_app();
    let user = Uuid::new_v4();
    for method in ["GET", "DELETE"] {
        let (status, body) = send(
            &app.router,
            empty_request(method, "/api/content/not-a-uuid", Some(user)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method}");
        assert!(body["error"].is_string(), "{method}: {body}");
    }

    let (status, _) = send(&app.router, empty_request("GET", "/api/content/not-a-uuid", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_content_requires_storage_path() {
    let app = test_app();
    let (status, _) = send(
        &app.router,
        json_request(
            "POST",
            "/api/content",
            Some(Uuid::new_v4()),
            r#"{"storage_path": "  ", "user_context": "coffee"}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tags_endpoint_uses_model_then_fallback() {
    let app = test_app();
    let user = Some(Uuid::new_v4());
    let body = r#"{"context": "beach day with coffee", "max_tags": 3}"#;

    let (status, resp) = send(&app.router, json_request("POST", "/api/tags", user, body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["tags"], json!(["coffee", "beach"]));
    assert!((resp["confidence"].as_f64().unwrap() - 0.9).abs() < 1e-6);

    app.chat.fail.store(true, Ordering::SeqCst);
    let (status, resp) = send(&app.router, json_request("POST", "/api/tags", user, body)).await;
    assert_eq!(status, StatusCode::OK);
    assert!((resp["confidence"].as_f64().unwrap() - 0.5).abs() < 1e-6);
    let tags = resp["tags"].as_array().unwrap();
    assert_eq!(tags.len(), 3);
    assert!(tags.contains(&json!("coffee")));
}

#[tokio::test]
async fn test_tags_endpoint_validates_input() {
    let app = test_app();
    let user = Some(Uuid::new_v4());
    for body in [r#"{"context": ""}"#, r#"{"context": "coffee", "max_tags": 0}"#] {
        let (status, _) = send(&app.router, json_request("POST", "/api/tags", user, body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
    }
    assert_eq!(app.chat.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_caption_empty_context_never_reaches_model() {
    let app = test_app();
    let (status, body) = send(
        &app.router,
        json_request(
            "POST",
            "/api/caption",
            Some(Uuid::new_v4()),
            r#"{"context": "", "style": "funny"}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "context is required");
    assert_eq!(app.chat.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_caption_success_and_provider_failure() {
    let app = test_app();
    let user = Some(Uuid::new_v4());
    let body = r#"{"context": "first latte of the week", "style": "inspirational", "max_length": 50}"#;

    let (status, resp) = send(&app.router, json_request("POST", "/api/caption", user, body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["caption"], "Fresh brew, fresh start");
    assert_eq!(resp["suggestions"].as_array().unwrap().len(), 2);
    let prompt = app.chat.prompts.lock().last().cloned().unwrap();
    assert!(prompt.contains("Motivational, uplifting"));

    app.chat.fail.store(true, Ordering::SeqCst);
    let (status, resp) = send(&app.router, json_request("POST", "/api/caption", user, body)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(resp["error"].is_string());
}

#[tokio::test]
async fn test_caption_unknown_style_is_bad_request() {
    let app = test_app();
    let (status, _) = send(
        &app.router,
        json_request(
            "POST",
            "/api/caption",
            Some(Uuid::new_v4()),
            r#"{"context": "coffee", "style": "gothic"}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_embedding_endpoint() {
    let app = test_app();
    let user = Uuid::new_v4();

    let (status, resp) = send(
        &app.router,
        json_request("POST", "/api/embedding", Some(user), r#"{"text": "beach"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["success"], true);
    assert_eq!(resp["embedding"], json!([0.0, 1.0, 0.0, 0.0]));

    let (status, _) = send(
        &app.router,
        json_request("POST", "/api/embedding", Some(user), r#"{"text": "  "}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    app.embedder.fail.store(true, Ordering::SeqCst);
    let (status, _) = send(
        &app.router,
        json_request("POST", "/api/embedding", Some(user), r#"{"text": "beach"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_embedding_for_foreign_content_is_not_found_before_provider_call() {
    let app = test_app();
    let owner = Uuid::new_v4();
    let item = create_enriched(&app, owner, "coffee").await;
    let calls_before = app.embedder.calls.load(Ordering::SeqCst);

    let body = json!({ "text": "coffee", "content_id": item["id"] }).to_string();
    let (status, _) = send(
        &app.router,
        json_request("POST", "/api/embedding", Some(Uuid::new_v4()), &body),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.embedder.calls.load(Ordering::SeqCst), calls_before);

    // The owner's item is already embedded by ingestion; embeddings are write-once.
    let (status, _) = send(
        &app.router,
        json_request("POST", "/api/embedding", Some(owner), &body),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_embedding_attaches_to_unembedded_content() {
    let app = test_app();
    let owner = Uuid::new_v4();
    let (status, created) = send(
        &app.router,
        json_request(
            "POST",
            "/api/content",
            Some(owner),
            r#"{"storage_path": "a/b.mp4", "file_type": "video"}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["file_type"], "video");

    let body = json!({ "text": "gym", "content_id": created["id"] }).to_string();
    let (status, _) = send(
        &app.router,
        json_request("POST", "/api/embedding", Some(owner), &body),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, resp) = send(
        &app.router,
        json_request(
            "POST",
            "/api/search",
            Some(owner),
            r#"{"query": "gym", "search_type": "semantic", "generate_response": false}"#,
        ),
    )
    .await;
    let results = resp["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["id"], created["id"]);
    assert!(resp.get("generated_response").is_none());
}

#[tokio::test]
async fn test_interests_feed_tag_prompt() {
    let app = test_app();
    let user = Some(Uuid::new_v4());
    let (status, _) = send(
        &app.router,
        json_request(
            "PUT",
            "/api/profile/interests",
            user,
            r#"{"interests": ["Hiking", " hiking ", "", "Espresso"]}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app.router,
        json_request("POST", "/api/tags", user, r#"{"context": "trail run"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let prompt = app.chat.prompts.lock().last().cloned().unwrap();
    assert!(prompt.contains("Interests: hiking, espresso"));
}
