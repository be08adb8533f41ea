//! HTMX + Tailwind web server for Storefront
//!
//! Provides both HTMX partial updates and JSON API endpoints.
//! All pages use server-side rendering.

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::routing::{get, post};
use storefront_core::{RuntimeMode, StorefrontConfig, StorefrontError};
use storefront_search::{ProductSearchService, ShoppingAssistant};
use tower_http::cors::CorsLayer;

use crate::handlers::{
    api_chat, api_health, api_products, api_search, api_settings, api_upload_products,
};
use crate::htmx::{clear_chat, product_listing, send_chat_message};
use crate::pages::{chat_page, products_page};
use crate::services::ServiceStack;
use crate::sessions::{ChatSessions, SessionLimits};

/// Shared state for every handler, identical in both runtime modes
#[derive(Clone)]
pub struct AppState {
    pub search: ProductSearchService,
    pub assistant: ShoppingAssistant,
    pub sessions: ChatSessions,
    pub config: Arc<StorefrontConfig>,
    pub mode: RuntimeMode,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(stack: ServiceStack, config: StorefrontConfig, mode: RuntimeMode) -> Self {
        Self {
            search: stack.search,
            assistant: stack.assistant,
            sessions: ChatSessions::with_limits(SessionLimits::from(&config.chat)),
            config: Arc::new(config),
            mode,
            started_at: Instant::now(),
        }
    }
}

/// Routes for pages, HTMX fragments and the JSON API.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Main pages (HTMX + Tailwind)
        .route("/", get(products_page))
        .route("/chat", get(chat_page))
        // HTMX partial update endpoints
        .route("/htmx/products", get(product_listing))
        .route("/htmx/chat/send", post(send_chat_message))
        .route("/htmx/chat/clear", post(clear_chat))
        // JSON API endpoints (for external clients)
        .route("/api/products", get(api_products).post(api_upload_products))
        .route("/api/search", get(api_search))
        .route("/api/chat", post(api_chat))
        .route("/api/settings", get(api_settings))
        .route("/api/health", get(api_health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Builds the services for `mode` and serves until the listener fails.
///
/// # Errors
/// - `StorefrontError::Configuration` - Production settings are incomplete
/// - `StorefrontError::WebUI` - Bind address unavailable or server failure
pub async fn run_server(config: StorefrontConfig, mode: RuntimeMode) -> Result<(), StorefrontError> {
    let stack = ServiceStack::from_mode(&config, mode)?;
    let bind_address = config.web.bind_address;
    let state = AppState::new(stack, config, mode);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .map_err(StorefrontError::from_web_ui_error)?;
    tracing::info!(
        "Storefront running on http://{} ({} mode: {})",
        bind_address,
        mode,
        mode.backends()
    );
    println!("Storefront running on http://{bind_address}");

    axum::serve(listener, app)
        .await
        .map_err(StorefrontError::from_web_ui_error)
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;

    fn dev_router() -> Router {
        let config = StorefrontConfig::default();
        let stack = ServiceStack::from_mode(&config, RuntimeMode::Development).unwrap();
        build_router(AppState::new(stack, config, RuntimeMode::Development))
    }

    async fn get_body(router: Router, uri: &str) -> (StatusCode, String) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_products_page_lists_catalog() {
        let (status, body) = get_body(dev_router(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("All products"));
        assert!(body.contains("12 products | page 1/2"));
    }

    #[tokio::test]
    async fn test_search_fragment_shows_scores() {
        let (status, body) =
            get_body(dev_router(), "/htmx/products?q=linen&strategy=keyword&action=search").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Search results for 'linen'"));
        assert!(body.contains("data-score"));
        assert!(!body.contains("<!DOCTYPE html>"));
    }

    #[tokio::test]
    async fn test_api_search_rejects_blank_query() {
        let (status, body) = get_body(dev_router(), "/api/search?q=%20").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("Search query is empty"));
    }

    #[tokio::test]
    async fn test_health_reports_mode() {
        let (status, body) = get_body(dev_router(), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["mode"], "development");
        assert_eq!(json["backends"], RuntimeMode::Development.backends());
        assert_eq!(json["provider"], "in-memory");
    }
}
