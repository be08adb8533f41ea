//! Production stack against mocked Azure OpenAI and Azure AI Search
//!
//! Unmatched requests get a 404 from the mock server, so a call to an
//! endpoint a test does not mock fails the operation.

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use httpmock::prelude::*;
use serde_json::{Value, json};
use storefront_core::{ChatMessage, RuntimeMode, ServiceCredential, StorefrontConfig};
use storefront_search::{SearchField, SearchStrategy};
use storefront_web::{AppState, ServiceStack, build_router};
use tower::ServiceExt;

const SEARCH_PATH: &str = "/indexes/products-index/docs/search";
const INDEX_PATH: &str = "/indexes/products-index/docs/index";
const EMBEDDINGS_PATH: &str = "/openai/deployments/text-embedding-ada-002/embeddings";
const CHAT_PATH: &str = "/openai/deployments/gpt-4/chat/completions";

fn production_config(server: &MockServer) -> StorefrontConfig {
    let mut config = StorefrontConfig::default();
    config.openai.endpoint = Some(server.base_url());
    config.openai.credential = Some(ServiceCredential::ApiKey("openai-key".to_string()));
    config.openai.embedding_dimension = 3;
    config.search.endpoint = Some(server.base_url());
    config.search.credential = Some(ServiceCredential::BearerToken("search-token".to_string()));
    config
}

async fn mock_embeddings(server: &MockServer) -> httpmock::Mock<'_> {
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path(EMBEDDINGS_PATH)
                .header("api-key", "openai-key");
            then.status(200)
                .json_body(json!({"data": [{"embedding": [0.6, 0.0, 0.8]}]}));
        })
        .await
}

#[tokio::test]
async fn test_hybrid_search_sends_text_and_vector() {
    let server = MockServer::start_async().await;
    let embeddings = mock_embeddings(&server).await;
    let search = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(SEARCH_PATH)
                .header("authorization", "Bearer search-token")
                .body_includes("\"search\":\"warm coat\"")
                .body_includes("\"searchFields\":\"name,description\"")
                .body_includes("\"vectorQueries\"")
                .body_includes("\"k\":5");
            then.status(200).json_body(json!({
                "value": [
                    {"@search.score": 0.03, "id": "2", "name": "Classic Wool Coat", "imageTags": null}
                ]
            }));
        })
        .await;

    let stack = ServiceStack::from_mode(&production_config(&server), RuntimeMode::Production)
        .unwrap();
    let hits = stack
        .search
        .search(
            SearchStrategy::Hybrid,
            "  warm coat ",
            &[SearchField::Name, SearchField::Description],
            None,
        )
        .await
        .unwrap();

    embeddings.assert_async().await;
    search.assert_async().await;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].product.display_name(), "Classic Wool Coat");
    assert!(hits[0].product.image_tags.is_empty());
    assert_eq!(hits[0].score_label(), "0.0300");
}

#[tokio::test]
async fn test_assistant_grounds_reply_in_top_product() {
    let server = MockServer::start_async().await;
    mock_embeddings(&server).await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(SEARCH_PATH);
            then.status(200).json_body(json!({
                "value": [
                    {"@search.score": 1.5, "id": "9", "name": "Canvas Low-Top Sneakers", "price": 59000}
                ]
            }));
        })
        .await;
    let chat = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(CHAT_PATH)
                .body_includes("[Recommended product]")
                .body_includes("- Name: Canvas Low-Top Sneakers")
                .body_includes("white sneakers");
            then.status(200).json_body(json!({
                "choices": [{"message": {"role": "assistant", "content": "The Canvas Low-Top Sneakers fit well."}}]
            }));
        })
        .await;

    let stack = ServiceStack::from_mode(&production_config(&server), RuntimeMode::Production)
        .unwrap();
    let reply = stack
        .assistant
        .respond(&[ChatMessage::user("white sneakers")])
        .await
        .unwrap();

    chat.assert_async().await;
    assert_eq!(reply.content, "The Canvas Low-Top Sneakers fit well.");
    assert_eq!(reply.product.unwrap().product.id, "9");
}

#[tokio::test]
async fn test_no_hits_skips_chat_completion() {
    let server = MockServer::start_async().await;
    mock_embeddings(&server).await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(SEARCH_PATH);
            then.status(200).json_body(json!({"value": []}));
        })
        .await;
    let stack = ServiceStack::from_mode(&production_config(&server), RuntimeMode::Production)
        .unwrap();
    let reply = stack
        .assistant
        .respond(&[ChatMessage::user("a spaceship")])
        .await
        .unwrap();

    assert!(reply.product.is_none());
    assert!(reply.content.starts_with("Sorry, I couldn't find any products"));
}

#[tokio::test]
async fn test_api_reports_index_failure_as_bad_gateway() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(SEARCH_PATH);
            then.status(503)
                .json_body(json!({"error": {"code": "ServiceUnavailable", "message": "index is warming up"}}));
        })
        .await;

    let config = production_config(&server);
    let stack = ServiceStack::from_mode(&config, RuntimeMode::Production).unwrap();
    let router = build_router(AppState::new(stack, config, RuntimeMode::Production));

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/search?q=coat&strategy=keyword")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(json["error"].as_str().unwrap().contains("index is warming up"));
}

#[tokio::test]
async fn test_partial_upload_counts_accepted_documents() {
    let server = MockServer::start_async().await;
    let index = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(INDEX_PATH)
                .body_includes("\"@search.action\":\"upload\"");
            then.status(207).json_body(json!({
                "value": [
                    {"key": "1", "status": true, "statusCode": 201, "errorMessage": null},
                    {"key": "2", "status": false, "statusCode": 400, "errorMessage": "Invalid document"}
                ]
            }));
        })
        .await;

    let config = production_config(&server);
    let stack = ServiceStack::from_mode(&config, RuntimeMode::Production).unwrap();
    let router = build_router(AppState::new(stack, config, RuntimeMode::Production));

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/products")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!([{"id": "1", "name": "Silk Scarf"}, {"id": "2"}]).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    index.assert_async().await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["uploaded"], 1);
    assert_eq!(json["total"], 2);
}
