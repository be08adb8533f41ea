//! Router tests over the development stack

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use storefront_core::{RuntimeMode, StorefrontConfig};
use storefront_web::{AppState, ServiceStack, build_router};
use tower::ServiceExt;
use uuid::Uuid;

fn dev_router() -> Router {
    let config = StorefrontConfig::default();
    let stack = ServiceStack::from_mode(&config, RuntimeMode::Development).unwrap();
    build_router(AppState::new(stack, config, RuntimeMode::Development))
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_products_page_clamps_page_number() {
    let router = dev_router();
    let (status, body) = send(&router, get("/?page=9")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<!DOCTYPE html>"));
    assert!(body.contains("12 products | page 2/2"));
    assert_eq!(body.matches("data-product-id=").count(), 3);
}

#[tokio::test]
async fn test_empty_search_warns_and_lists_catalog() {
    let router = dev_router();
    let (status, body) = send(&router, get("/htmx/products?q=&action=search")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Please enter a search query."));
    assert!(body.contains("All products"));
}

#[tokio::test]
async fn test_keyword_search_restricted_to_name() {
    let router = dev_router();
    let (status, body) = send(
        &router,
        get("/api/search?q=linen&strategy=keyword&fields=name"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["strategy"], "keyword");
    assert_eq!(json["count"], 1);
    assert_eq!(json["results"][0]["name"], "Relaxed Linen Shirt");
    assert!(json["results"][0].get("descriptionVector").is_none());
}

#[tokio::test]
async fn test_search_rejects_unknown_strategy() {
    let router = dev_router();
    let (status, body) = send(&router, get("/api/search?q=coat&strategy=fuzzy")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Invalid search strategy: fuzzy"));
}

#[tokio::test]
async fn test_chat_flow_keeps_session_history() {
    let router = dev_router();
    let session = Uuid::new_v4();

    let (status, body) = send(
        &router,
        post_form(
            "/htmx/chat/send",
            format!("session_id={session}&message=a+warm+wool+coat"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Recommended:"));
    assert!(body.contains(r#"data-role="user""#));

    let (_, page) = send(&router, get(&format!("/chat?session={session}"))).await;
    assert!(page.contains("a warm wool coat"));

    let (_, cleared) = send(
        &router,
        post_form("/htmx/chat/clear", format!("session_id={session}")),
    )
    .await;
    assert!(cleared.contains("Ask me anything"));

    let (_, page) = send(&router, get(&format!("/chat?session={session}"))).await;
    assert!(!page.contains("a warm wool coat"));
}

#[tokio::test]
async fn test_blank_chat_message_is_not_sent() {
    let router = dev_router();
    let session = Uuid::new_v4();

    let (_, body) = send(
        &router,
        post_form("/htmx/chat/send", format!("session_id={session}&message=+++")),
    )
    .await;

    assert!(body.contains("Please enter a message."));
    assert!(!body.contains(r#"data-role="user""#));
}

#[tokio::test]
async fn test_api_chat_assigns_session() {
    let router = dev_router();
    let (status, body) = send(
        &router,
        post_json("/api/chat", json!({"message": "white sneakers"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert!(json["session_id"].as_str().unwrap().parse::<Uuid>().is_ok());
    assert_eq!(json["reply"]["role"], "assistant");
    assert!(json["reply"]["product"]["name"].is_string());
}

#[tokio::test]
async fn test_upload_then_list_products() {
    let router = dev_router();
    let (status, body) = send(
        &router,
        post_json(
            "/api/products",
            json!([
                {"id": "100", "name": "Merino Beanie", "price": 25000},
                {"id": "", "name": "Nameless"}
            ]),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["uploaded"], 1);
    assert_eq!(json["total"], 2);

    let (_, body) = send(&router, get("/api/products")).await;
    let products: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(products.as_array().unwrap().len(), 13);
}

#[tokio::test]
async fn test_settings_hide_credentials() {
    let router = dev_router();
    let (status, body) = send(&router, get("/api/settings")).await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["openai"]["credential"], "none");
    assert_eq!(json["search"]["index_name"], "products-index");
    assert_eq!(json["web"]["products_per_page"], 9);
}
