//! Mock provider implementation for testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use storefront_core::Product;

use super::SearchIndexProvider;
use crate::errors::SearchError;
use crate::types::{IndexQuery, IndexingOutcome, ScoredProduct};

/// Mock provider that records queries and replays canned hits.
#[derive(Debug, Default)]
pub struct MockProvider {
    hits: Vec<ScoredProduct>,
    /// Document ids whose upload is reported as failed
    rejected_ids: Vec<String>,
    pub queries: Mutex<Vec<IndexQuery>>,
    pub upload_batches: Mutex<Vec<usize>>,
}

impl MockProvider {
    /// Creates a mock returning the given hits for every query.
    pub fn with_hits(hits: Vec<ScoredProduct>) -> Self {
        Self {
            hits,
            ..Self::default()
        }
    }

    /// Reports uploads of these ids as failed.
    pub fn rejecting(mut self, ids: &[&str]) -> Self {
        self.rejected_ids = ids.iter().map(|id| id.to_string()).collect();
        self
    }

    /// Most recent query seen by the mock.
    pub fn last_query(&self) -> Option<IndexQuery> {
        self.queries.lock().last().cloned()
    }
}

#[async_trait]
impl SearchIndexProvider for MockProvider {
    async fn query(&self, query: &IndexQuery) -> Result<Vec<ScoredProduct>, SearchError> {
        self.queries.lock().push(query.clone());
        Ok(self.hits.iter().take(query.top).cloned().collect())
    }

    async fn upload(&self, products: &[Product]) -> Result<Vec<IndexingOutcome>, SearchError> {
        self.upload_batches.lock().push(products.len());
        Ok(products
            .iter()
            .map(|product| {
                let rejected = self.rejected_ids.contains(&product.id);
                IndexingOutcome {
                    key: product.id.clone(),
                    succeeded: !rejected,
                    status_code: if rejected { 400 } else { 201 },
                    error_message: rejected.then(|| "Document rejected".to_string()),
                }
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
