//! JSON API handlers for products, search and chat

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use storefront_core::Product;
use storefront_search::{ScoredProduct, SearchField, SearchStrategy};
use uuid::Uuid;

use crate::server::AppState;
use crate::sessions::ConversationEntry;

type ApiError = (StatusCode, Json<serde_json::Value>);

fn api_error(status: StatusCode, message: impl std::fmt::Display) -> ApiError {
    (status, Json(json!({ "error": message.to_string() })))
}

#[derive(Deserialize)]
pub struct ProductsQuery {
    pub top: Option<usize>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub strategy: SearchStrategy,
    pub count: usize,
    pub results: Vec<ScoredProduct>,
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub session_id: Option<Uuid>,
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub session_id: Uuid,
    pub reply: ConversationEntry,
}

pub async fn api_products(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<Json<Vec<ScoredProduct>>, ApiError> {
    state
        .search
        .get_all_products(query.top)
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!("Listing products failed: {}", e);
            api_error(StatusCode::BAD_GATEWAY, e)
        })
}

pub async fn api_upload_products(
    State(state): State<AppState>,
    Json(products): Json<Vec<Product>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let uploaded = state.search.upload_products(&products).await.map_err(|e| {
        tracing::error!("Uploading {} products failed: {}", products.len(), e);
        api_error(StatusCode::BAD_GATEWAY, e)
    })?;

    Ok(Json(json!({
        "uploaded": uploaded,
        "total": products.len()
    })))
}

/// Search with `q`, optional `strategy`, repeated `fields` and `top`.
pub async fn api_search(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<SearchResponse>, ApiError> {
    let mut query = String::new();
    let mut strategy = SearchStrategy::default();
    let mut fields: Vec<SearchField> = Vec::new();
    let mut top = None;

    for (key, value) in &pairs {
        match key.as_str() {
            "q" => query = value.clone(),
            "strategy" => {
                strategy = value
                    .parse()
                    .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?;
            }
            "fields" => {
                let field = value
                    .parse()
                    .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?;
                if !fields.contains(&field) {
                    fields.push(field);
                }
            }
            "top" => {
                top = Some(value.parse::<usize>().map_err(|_| {
                    api_error(StatusCode::BAD_REQUEST, format!("Invalid top value: {value}"))
                })?);
            }
            _ => {}
        }
    }

    match state.search.search(strategy, &query, &fields, top).await {
        Ok(results) => Ok(Json(SearchResponse {
            query: query.trim().to_string(),
            strategy,
            count: results.len(),
            results,
        })),
        Err(e) if e.is_user_error() => Err(api_error(StatusCode::BAD_REQUEST, e)),
        Err(e) => {
            tracing::error!("Search for '{}' failed: {}", query, e);
            Err(api_error(StatusCode::BAD_GATEWAY, e))
        }
    }
}

pub async fn api_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Message is empty"));
    }

    let session_id = request.session_id.unwrap_or_else(Uuid::new_v4);
    let reply = state
        .sessions
        .converse(&state.assistant, session_id, message)
        .await;

    Ok(Json(ChatResponse { session_id, reply }))
}

pub async fn api_settings(State(state): State<AppState>) -> Json<serde_json::Value> {
    let config = &state.config;
    let credential_kind = |credential: &Option<storefront_core::ServiceCredential>| {
        credential.as_ref().map(|c| c.kind()).unwrap_or("none")
    };

    Json(json!({
        "mode": state.mode.to_string(),
        "openai": {
            "endpoint": config.openai.endpoint,
            "credential": credential_kind(&config.openai.credential),
            "api_version": config.openai.api_version,
            "chat_deployment": config.openai.chat_deployment,
            "embedding_deployment": config.openai.embedding_deployment,
            "embedding_dimension": config.openai.embedding_dimension,
        },
        "search": {
            "endpoint": config.search.endpoint,
            "credential": credential_kind(&config.search.credential),
            "index_name": config.search.index_name,
            "vector_field": config.search.vector_field,
            "max_results": config.search.max_results,
        },
        "chat": {
            "temperature": config.chat.temperature,
            "max_tokens": config.chat.max_tokens,
            "history_window": config.chat.history_window,
            "stored_messages": config.chat.stored_messages,
            "max_sessions": config.chat.max_sessions,
            "session_idle_timeout_secs": config.chat.session_idle_timeout.as_secs(),
        },
        "web": {
            "products_per_page": config.web.products_per_page,
            "grid_columns": config.web.grid_columns,
        }
    }))
}

pub async fn api_health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "mode": state.mode.to_string(),
        "backends": state.mode.backends(),
        "provider": state.search.provider_name(),
        "uptime_seconds": state.started_at.elapsed().as_secs()
    }))
}
