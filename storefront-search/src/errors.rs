//! Error types for product search and the shopping assistant.

use storefront_core::ModelError;
use thiserror::Error;

/// Errors that can occur during search, indexing and assistant operations.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Search index rejected or failed the query.
    #[error("Search failed for query '{query}': {reason}")]
    SearchFailed {
        /// The search text that failed
        query: String,
        /// The reason for the failure
        reason: String,
    },

    /// Network communication error occurred during search.
    #[error("Network error: {reason}")]
    NetworkError {
        /// The reason for the network error
        reason: String,
    },

    /// Failed to parse search results or response data.
    #[error("Parse error: {reason}")]
    ParseError {
        /// The reason for the parse error
        reason: String,
    },

    /// Search provider is misconfigured or unavailable.
    #[error("Provider error: {reason}")]
    ProviderError {
        /// The reason for the provider error
        reason: String,
    },

    /// Query embedding or chat completion failed.
    #[error("Model service error: {0}")]
    Model(#[from] ModelError),

    /// Upload batch was rejected as a whole.
    #[error("Upload failed: {reason}")]
    UploadFailed {
        /// The reason for the upload failure
        reason: String,
    },

    /// Query text was empty or whitespace.
    #[error("Search query is empty")]
    EmptyQuery,

    /// Unknown search strategy name.
    #[error("Invalid search strategy: {strategy}")]
    InvalidStrategy {
        /// The unrecognized strategy
        strategy: String,
    },

    /// Unknown searchable field name.
    #[error("Invalid search field: {field}")]
    InvalidField {
        /// The unrecognized field
        field: String,
    },
}

impl SearchError {
    /// Whether the error was caused by the caller's input.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            SearchError::EmptyQuery
                | SearchError::InvalidStrategy { .. }
                | SearchError::InvalidField { .. }
        )
    }
}
