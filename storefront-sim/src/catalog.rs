//! In-memory search index for development mode.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use storefront_core::Product;
use storefront_core::authoring::embedding_text;
use storefront_search::{
    IndexQuery, IndexingOutcome, ScoredProduct, SearchError, SearchField, SearchIndexProvider,
};

use crate::content_database::create_sample_catalog;
use crate::model::{DeterministicModel, tokenize};

/// Search index held in memory, keyed by product id.
///
/// Keyword hits are scored by how many query words occur in the searched
/// fields. Vector hits are ranked by cosine similarity of stored vectors.
/// Hybrid queries list keyword hits first, then vector hits not yet listed.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: RwLock<BTreeMap<String, Product>>,
}

impl InMemoryCatalog {
    /// Creates a catalog holding the given products.
    pub fn with_products(products: Vec<Product>) -> Self {
        let catalog = Self::default();
        {
            let mut stored = catalog.products.write();
            for product in products {
                stored.insert(product.id.clone(), product);
            }
        }
        catalog
    }

    /// Creates the sample catalog with vectors computed by `model`.
    pub fn seeded(model: &DeterministicModel) -> Self {
        let products = create_sample_catalog()
            .into_iter()
            .map(|mut product| {
                product.description_vector = Some(model.embed_text(&embedding_text(&product)));
                product
            })
            .collect();
        Self::with_products(products)
    }

    /// Number of stored products.
    pub fn len(&self) -> usize {
        self.products.read().len()
    }

    /// Whether the catalog holds no products.
    pub fn is_empty(&self) -> bool {
        self.products.read().is_empty()
    }

    fn keyword_hits(&self, text: &str, fields: &[SearchField]) -> Vec<ScoredProduct> {
        let products = self.products.read();
        if text.trim() == "*" {
            return products
                .values()
                .cloned()
                .map(|product| scored(product, 1.0))
                .collect();
        }

        let terms: Vec<String> = tokenize(text).collect();
        let fields = if fields.is_empty() {
            &SearchField::ALL[..]
        } else {
            fields
        };

        let mut hits: Vec<ScoredProduct> = products
            .values()
            .filter_map(|product| {
                let haystack: Vec<String> = fields
                    .iter()
                    .flat_map(|field| field_text(product, *field))
                    .flat_map(|text| tokenize(&text).collect::<Vec<_>>())
                    .collect();
                let matches = terms
                    .iter()
                    .filter(|term| haystack.contains(term))
                    .count();
                (matches > 0).then(|| scored(product.clone(), matches as f64))
            })
            .collect();
        sort_by_score(&mut hits);
        hits
    }

    fn vector_hits(&self, vector: &[f32], k: usize) -> Vec<ScoredProduct> {
        let products = self.products.read();
        let mut hits: Vec<ScoredProduct> = products
            .values()
            .filter_map(|product| {
                let stored = product.description_vector.as_deref()?;
                (stored.len() == vector.len())
                    .then(|| scored(product.clone(), cosine_similarity(vector, stored)))
            })
            .filter(|hit| hit.score.is_some_and(|score| score > 0.0))
            .collect();
        sort_by_score(&mut hits);
        hits.truncate(k);
        hits
    }
}

fn scored(product: Product, score: f64) -> ScoredProduct {
    ScoredProduct {
        product,
        score: Some(score),
        reranker_score: None,
    }
}

fn sort_by_score(hits: &mut [ScoredProduct]) {
    hits.sort_by(|a, b| {
        b.score
            .unwrap_or_default()
            .total_cmp(&a.score.unwrap_or_default())
    });
}

fn field_text(product: &Product, field: SearchField) -> Vec<String> {
    let single = |value: &Option<String>| -> Vec<String> { value.iter().cloned().collect() };
    match field {
        SearchField::Name => single(&product.name),
        SearchField::Brand => single(&product.brand),
        SearchField::Description => single(&product.description),
        SearchField::ImageCaption => single(&product.image_caption),
        SearchField::ImageDescription => single(&product.image_description),
        SearchField::ImageTags => product.image_tags.clone(),
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        f64::from(dot / (norm_a * norm_b))
    }
}

/// Drops fields the query did not select.
fn project(mut hit: ScoredProduct, select: &[&str]) -> ScoredProduct {
    if !select.is_empty() && !select.contains(&"descriptionVector") {
        hit.product.description_vector = None;
    }
    hit
}

#[async_trait]
impl SearchIndexProvider for InMemoryCatalog {
    async fn query(&self, query: &IndexQuery) -> Result<Vec<ScoredProduct>, SearchError> {
        let mut hits = match &query.search_text {
            Some(text) => self.keyword_hits(text, &query.search_fields),
            None => Vec::new(),
        };

        if let Some(vector) = &query.vector {
            for hit in self.vector_hits(&vector.vector, vector.k_nearest_neighbors) {
                if !hits.iter().any(|h| h.product.id == hit.product.id) {
                    hits.push(hit);
                }
            }
        }

        hits.truncate(query.top);
        tracing::debug!("In-memory catalog matched {} products", hits.len());
        Ok(hits
            .into_iter()
            .map(|hit| project(hit, &query.select))
            .collect())
    }

    async fn upload(&self, products: &[Product]) -> Result<Vec<IndexingOutcome>, SearchError> {
        let mut stored = self.products.write();
        Ok(products
            .iter()
            .map(|product| {
                if product.id.trim().is_empty() {
                    return IndexingOutcome {
                        key: product.id.clone(),
                        succeeded: false,
                        status_code: 400,
                        error_message: Some("Document key cannot be missing or empty".to_string()),
                    };
                }
                let replaced = stored
                    .insert(product.id.clone(), product.clone())
                    .is_some();
                IndexingOutcome {
                    key: product.id.clone(),
                    succeeded: true,
                    status_code: if replaced { 200 } else { 201 },
                    error_message: None,
                }
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "in-memory"
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use storefront_search::{ProductSearchService, SearchSettings, SearchStrategy};

    use super::*;

    fn service() -> (Arc<InMemoryCatalog>, ProductSearchService) {
        let model = Arc::new(DeterministicModel::new(128));
        let catalog = Arc::new(InMemoryCatalog::seeded(&model));
        let service =
            ProductSearchService::new(catalog.clone(), model, SearchSettings::default());
        (catalog, service)
    }

    #[tokio::test]
    async fn test_browse_returns_whole_catalog_without_vectors() {
        let (catalog, service) = service();
        let products = service.get_all_products(None).await.unwrap();

        assert_eq!(products.len(), catalog.len());
        assert!(products.iter().all(|p| p.product.description_vector.is_none()));
    }

    #[tokio::test]
    async fn test_keyword_search_ranks_by_matching_terms() {
        let (_, service) = service();
        let hits = service
            .keyword_search("white linen shirt", &[], None)
            .await
            .unwrap();

        assert_eq!(hits[0].product.display_name(), "Relaxed Linen Shirt");
        assert!(hits.len() <= 5);
    }

    #[tokio::test]
    async fn test_keyword_search_respects_fields() {
        let (_, service) = service();
        let by_brand = service
            .keyword_search("northwind", &[SearchField::Brand], Some(10))
            .await
            .unwrap();
        assert_eq!(by_brand.len(), 2);

        let by_tags = service
            .keyword_search("northwind", &[SearchField::ImageTags], Some(10))
            .await
            .unwrap();
        assert!(by_tags.is_empty());
    }

    #[tokio::test]
    async fn test_vector_search_finds_similar_products() {
        let (_, service) = service();
        let hits = service
            .vector_search("warm winter coat", &[], Some(3))
            .await
            .unwrap();

        assert!(!hits.is_empty());
        assert!(hits.len() <= 3);
        assert!(hits.iter().any(|h| h.product.id == "2"));
    }

    #[tokio::test]
    async fn test_hybrid_search_has_no_duplicates() {
        let (_, service) = service();
        let hits = service
            .search(SearchStrategy::Hybrid, "winter jacket", &[], Some(10))
            .await
            .unwrap();

        let mut ids: Vec<_> = hits.iter().map(|h| h.product.id.clone()).collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[tokio::test]
    async fn test_upload_inserts_and_replaces() {
        let catalog = InMemoryCatalog::default();
        let outcomes = catalog
            .upload(&[Product::new("a", "Hat"), Product::new("", "Nameless")])
            .await
            .unwrap();
        assert_eq!(outcomes[0].status_code, 201);
        assert!(!outcomes[1].succeeded);

        let outcomes = catalog.upload(&[Product::new("a", "Cap")]).await.unwrap();
        assert_eq!(outcomes[0].status_code, 200);
        assert_eq!(catalog.len(), 1);
    }
}
