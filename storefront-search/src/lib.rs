//! Storefront Search - product retrieval and the shopping assistant
//!
//! Wraps the search index behind a provider trait, adds embedding-backed
//! vector and hybrid queries on top of it, and grounds chat replies in the
//! best matching product.

#![deny(clippy::missing_errors_doc)]
#![warn(clippy::too_many_lines)]

pub mod assistant;
pub mod errors;
pub mod providers;
pub mod service;
pub mod types;

// Re-export main types
pub use assistant::{AssistantReply, ShoppingAssistant};
pub use errors::SearchError;
pub use providers::{AzureSearchProvider, SearchIndexProvider};
pub use service::{ProductSearchService, SearchSettings};
pub use types::{IndexQuery, IndexingOutcome, ScoredProduct, SearchField, SearchStrategy, VectorQuery};

/// Convenience type alias for Results with SearchError.
pub type Result<T> = std::result::Result<T, SearchError>;
