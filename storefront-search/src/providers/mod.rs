//! Search index backends.

use async_trait::async_trait;
use storefront_core::Product;

use crate::errors::SearchError;
use crate::types::{IndexQuery, IndexingOutcome, ScoredProduct};

pub mod azure;
#[cfg(test)]
mod mock;

pub use azure::AzureSearchProvider;
#[cfg(test)]
pub use mock::MockProvider;

/// Trait for product search index backends.
///
/// Implementations answer keyword, vector and hybrid queries and accept
/// document uploads (managed cloud index, in-memory catalog, test mocks).
#[async_trait]
pub trait SearchIndexProvider: Send + Sync + std::fmt::Debug {
    /// Runs a query and returns hits in relevance order.
    ///
    /// # Errors
    /// - `SearchError::SearchFailed` - Index rejected the query
    /// - `SearchError::NetworkError` - Network connectivity issues
    /// - `SearchError::ParseError` - Unexpected response shape
    async fn query(&self, query: &IndexQuery) -> Result<Vec<ScoredProduct>, SearchError>;

    /// Uploads (inserts or replaces) documents by id.
    ///
    /// # Errors
    /// - `SearchError::UploadFailed` - Index rejected the whole batch
    /// - `SearchError::NetworkError` - Network connectivity issues
    async fn upload(&self, products: &[Product]) -> Result<Vec<IndexingOutcome>, SearchError>;

    /// Short backend name for logs and the settings page.
    fn name(&self) -> &'static str;
}
