//! Product search service
//!
//! Turns user queries into index queries for the configured provider,
//! embedding the query text when a strategy needs a vector.

use std::sync::Arc;

use storefront_core::config::SearchConfig;
use storefront_core::{ModelService, Product};

use crate::errors::SearchError;
use crate::providers::SearchIndexProvider;
use crate::types::{IndexQuery, ScoredProduct, SearchField, SearchStrategy, VectorQuery};

/// Fields returned for every product hit.
pub const SELECT_FIELDS: [&str; 9] = [
    "id",
    "name",
    "brand",
    "description",
    "price",
    "imageUrl",
    "imageCaption",
    "imageDescription",
    "imageTags",
];

/// Maximum documents per upload request accepted by the index.
pub const UPLOAD_BATCH_SIZE: usize = 1000;

/// Query defaults taken from configuration.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub vector_field: String,
    pub max_results: usize,
    pub browse_limit: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for SearchSettings {
    fn from(config: &SearchConfig) -> Self {
        Self {
            vector_field: config.vector_field.clone(),
            max_results: config.max_results,
            browse_limit: config.browse_limit,
        }
    }
}

/// Product search over a search index provider.
///
/// Cheap to clone; the provider and model are shared.
#[derive(Debug, Clone)]
pub struct ProductSearchService {
    provider: Arc<dyn SearchIndexProvider>,
    model: Arc<dyn ModelService>,
    settings: SearchSettings,
}

impl ProductSearchService {
    /// Creates a search service over the given provider and model.
    pub fn new(
        provider: Arc<dyn SearchIndexProvider>,
        model: Arc<dyn ModelService>,
        settings: SearchSettings,
    ) -> Self {
        Self {
            provider,
            model,
            settings,
        }
    }

    /// Query defaults in effect.
    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Name of the backing provider.
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Model used for query embeddings.
    pub fn model(&self) -> Arc<dyn ModelService> {
        Arc::clone(&self.model)
    }

    /// Lists catalog products with a match-all query.
    ///
    /// # Errors
    /// - `SearchError::SearchFailed` - Index rejected the query
    /// - `SearchError::NetworkError` - Network connectivity issues
    pub async fn get_all_products(
        &self,
        top: Option<usize>,
    ) -> Result<Vec<ScoredProduct>, SearchError> {
        let query = IndexQuery {
            search_text: Some("*".to_string()),
            select: SELECT_FIELDS.to_vec(),
            top: top.unwrap_or(self.settings.browse_limit),
            ..IndexQuery::default()
        };
        self.provider.query(&query).await
    }

    /// Full-text search restricted to `fields` (all searchable fields when empty).
    ///
    /// # Errors
    /// - `SearchError::EmptyQuery` - Query is blank
    /// - `SearchError::SearchFailed` - Index rejected the query
    /// - `SearchError::NetworkError` - Network connectivity issues
    pub async fn keyword_search(
        &self,
        query: &str,
        fields: &[SearchField],
        top: Option<usize>,
    ) -> Result<Vec<ScoredProduct>, SearchError> {
        let text = non_blank(query)?;
        let index_query = IndexQuery {
            search_text: Some(text.to_string()),
            search_fields: fields.to_vec(),
            select: SELECT_FIELDS.to_vec(),
            top: self.top_or_default(top),
            ..IndexQuery::default()
        };
        self.provider.query(&index_query).await
    }

    /// Nearest-neighbour search on the query embedding.
    ///
    /// `fields` is accepted for a uniform signature; vector similarity always
    /// runs against the configured vector field.
    ///
    /// # Errors
    /// - `SearchError::EmptyQuery` - Query is blank
    /// - `SearchError::Model` - Query embedding failed
    /// - `SearchError::SearchFailed` - Index rejected the query
    pub async fn vector_search(
        &self,
        query: &str,
        _fields: &[SearchField],
        top: Option<usize>,
    ) -> Result<Vec<ScoredProduct>, SearchError> {
        let text = non_blank(query)?;
        let top = self.top_or_default(top);
        let index_query = IndexQuery {
            vector: Some(self.vector_query(text, top).await?),
            select: SELECT_FIELDS.to_vec(),
            top,
            ..IndexQuery::default()
        };
        self.provider.query(&index_query).await
    }

    /// Full-text and vector query combined in one request.
    ///
    /// # Errors
    /// - `SearchError::EmptyQuery` - Query is blank
    /// - `SearchError::Model` - Query embedding failed
    /// - `SearchError::SearchFailed` - Index rejected the query
    pub async fn hybrid_search(
        &self,
        query: &str,
        fields: &[SearchField],
        top: Option<usize>,
    ) -> Result<Vec<ScoredProduct>, SearchError> {
        let text = non_blank(query)?;
        let top = self.top_or_default(top);
        let index_query = IndexQuery {
            search_text: Some(text.to_string()),
            search_fields: fields.to_vec(),
            vector: Some(self.vector_query(text, top).await?),
            select: SELECT_FIELDS.to_vec(),
            top,
        };
        self.provider.query(&index_query).await
    }

    /// Runs the search for the chosen strategy.
    ///
    /// # Errors
    /// Same as the strategy-specific operation.
    pub async fn search(
        &self,
        strategy: SearchStrategy,
        query: &str,
        fields: &[SearchField],
        top: Option<usize>,
    ) -> Result<Vec<ScoredProduct>, SearchError> {
        tracing::debug!("{} for '{}' over {} fields", strategy.label(), query, fields.len());
        match strategy {
            SearchStrategy::Keyword => self.keyword_search(query, fields, top).await,
            SearchStrategy::Vector => self.vector_search(query, fields, top).await,
            SearchStrategy::Hybrid => self.hybrid_search(query, fields, top).await,
        }
    }

    /// Uploads one product; returns whether the index accepted it.
    ///
    /// # Errors
    /// - `SearchError::UploadFailed` - Index rejected the request
    /// - `SearchError::NetworkError` - Network connectivity issues
    pub async fn upload_product(&self, product: &Product) -> Result<bool, SearchError> {
        let accepted = self.upload_products(std::slice::from_ref(product)).await?;
        Ok(accepted == 1)
    }

    /// Uploads products in batches; returns how many the index accepted.
    ///
    /// Per-document failures are logged and do not abort the remaining batches.
    ///
    /// # Errors
    /// - `SearchError::UploadFailed` - Index rejected a whole batch
    /// - `SearchError::NetworkError` - Network connectivity issues
    pub async fn upload_products(&self, products: &[Product]) -> Result<usize, SearchError> {
        let mut accepted = 0;
        for batch in products.chunks(UPLOAD_BATCH_SIZE) {
            let outcomes = self.provider.upload(batch).await?;
            for outcome in &outcomes {
                if outcome.succeeded {
                    accepted += 1;
                } else {
                    tracing::warn!(
                        "Upload of product {} failed (HTTP {}): {}",
                        outcome.key,
                        outcome.status_code,
                        outcome.error_message.as_deref().unwrap_or("unknown error")
                    );
                }
            }
        }

        tracing::info!("Uploaded {}/{} products", accepted, products.len());
        Ok(accepted)
    }

    async fn vector_query(&self, text: &str, top: usize) -> Result<VectorQuery, SearchError> {
        Ok(VectorQuery {
            vector: self.model.embed(text).await?,
            k_nearest_neighbors: top,
            fields: self.settings.vector_field.clone(),
        })
    }

    fn top_or_default(&self, top: Option<usize>) -> usize {
        top.unwrap_or(self.settings.max_results)
    }
}

fn non_blank(query: &str) -> Result<&str, SearchError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        Err(SearchError::EmptyQuery)
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use storefront_core::{ChatMessage, CompletionOptions, ModelError};

    use super::*;
    use crate::providers::MockProvider;

    #[derive(Debug)]
    struct FixedEmbedding;

    #[async_trait]
    impl ModelService for FixedEmbedding {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, ModelError> {
            Ok(vec![0.1, 0.2, 0.3])
        }

        async fn complete_chat(
            &self,
            _messages: &[ChatMessage],
            _options: CompletionOptions,
        ) -> Result<String, ModelError> {
            Ok(String::new())
        }
    }

    fn hits(count: usize) -> Vec<ScoredProduct> {
        (0..count)
            .map(|i| ScoredProduct {
                product: Product::new(format!("p-{i}"), format!("Product {i}")),
                score: Some(1.0 / (i + 1) as f64),
                reranker_score: None,
            })
            .collect()
    }

    fn service(provider: Arc<MockProvider>) -> ProductSearchService {
        ProductSearchService::new(provider, Arc::new(FixedEmbedding), SearchSettings::default())
    }

    #[tokio::test]
    async fn test_get_all_products_uses_match_all() {
        let provider = Arc::new(MockProvider::with_hits(hits(3)));
        let results = service(provider.clone()).get_all_products(None).await.unwrap();

        assert_eq!(results.len(), 3);
        let query = provider.last_query().unwrap();
        assert_eq!(query.search_text.as_deref(), Some("*"));
        assert_eq!(query.top, 100);
        assert_eq!(query.select, SELECT_FIELDS.to_vec());
        assert!(query.vector.is_none());
    }

    #[tokio::test]
    async fn test_keyword_search_restricts_fields() {
        let provider = Arc::new(MockProvider::with_hits(hits(8)));
        let results = service(provider.clone())
            .keyword_search("  coat ", &[SearchField::Name], None)
            .await
            .unwrap();

        assert_eq!(results.len(), 5);
        let query = provider.last_query().unwrap();
        assert_eq!(query.search_text.as_deref(), Some("coat"));
        assert_eq!(query.search_fields, vec![SearchField::Name]);
    }

    #[tokio::test]
    async fn test_vector_search_sends_only_vector() {
        let provider = Arc::new(MockProvider::with_hits(hits(2)));
        service(provider.clone())
            .vector_search("warm coat", &[SearchField::Brand], Some(3))
            .await
            .unwrap();

        let query = provider.last_query().unwrap();
        assert!(query.search_text.is_none());
        assert!(query.search_fields.is_empty());
        let vector = query.vector.unwrap();
        assert_eq!(vector.k_nearest_neighbors, 3);
        assert_eq!(vector.fields, "descriptionVector");
    }

    #[tokio::test]
    async fn test_hybrid_search_sends_text_and_vector() {
        let provider = Arc::new(MockProvider::with_hits(hits(2)));
        service(provider.clone())
            .search(SearchStrategy::Hybrid, "warm coat", &[], None)
            .await
            .unwrap();

        let query = provider.last_query().unwrap();
        assert_eq!(query.search_text.as_deref(), Some("warm coat"));
        assert_eq!(query.vector.unwrap().vector, vec![0.1, 0.2, 0.3]);
        assert_eq!(query.top, 5);
    }

    #[tokio::test]
    async fn test_blank_query_is_rejected() {
        let provider = Arc::new(MockProvider::default());
        for strategy in SearchStrategy::ALL {
            let err = service(provider.clone())
                .search(strategy, "   ", &[], None)
                .await
                .unwrap_err();
            assert!(matches!(err, SearchError::EmptyQuery));
        }
        assert!(provider.last_query().is_none());
    }

    #[tokio::test]
    async fn test_upload_counts_accepted_documents() {
        let provider = Arc::new(MockProvider::default().rejecting(&["p-1"]));
        let products: Vec<Product> = (0..2500)
            .map(|i| Product::new(format!("p-{i}"), "Item"))
            .collect();

        let accepted = service(provider.clone()).upload_products(&products).await.unwrap();

        assert_eq!(accepted, 2499);
        assert_eq!(*provider.upload_batches.lock(), vec![1000, 1000, 500]);
    }

    #[tokio::test]
    async fn test_upload_product_reports_rejection() {
        let provider = Arc::new(MockProvider::default().rejecting(&["bad"]));
        let service = service(provider);

        assert!(service.upload_product(&Product::new("ok", "Item")).await.unwrap());
        assert!(!service.upload_product(&Product::new("bad", "Item")).await.unwrap());
    }
}
