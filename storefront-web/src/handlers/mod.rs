//! HTTP request handlers organized by functionality

pub mod api;

// Re-export handler functions
pub use api::{
    ChatRequest, ChatResponse, ProductsQuery, SearchResponse, api_chat, api_health, api_products,
    api_search, api_settings, api_upload_products,
};
