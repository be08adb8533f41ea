//! Catalog JSON files feeding the in-memory index

use std::sync::Arc;

use storefront_core::product::{load_products_from_json, save_products_to_json};
use storefront_core::{Product, ProductAuthor};
use storefront_search::{ProductSearchService, SearchSettings, SearchStrategy};
use storefront_sim::{DeterministicModel, InMemoryCatalog};

#[tokio::test]
async fn test_missing_catalog_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let products = load_products_from_json(&dir.path().join("missing.json"))
        .await
        .unwrap();
    assert!(products.is_empty());
}

#[tokio::test]
async fn test_malformed_catalog_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("products.json");
    tokio::fs::write(&path, r#"{"id": "not-an-array"}"#).await.unwrap();

    let err = load_products_from_json(&path).await.unwrap_err();
    assert!(err.is_user_error());
}

#[tokio::test]
async fn test_embedded_file_is_searchable_by_vector() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog/products.json");
    let model = Arc::new(DeterministicModel::new(32));
    let author = ProductAuthor::new(model.clone());

    let mut products = vec![
        Product::new("a", "Alpaca Wool Scarf"),
        Product::new("b", "Rubber Rain Boots"),
    ];
    products[0].description = Some("soft alpaca wool scarf for cold days".to_string());
    for product in &mut products {
        author.embed_product(product).await.unwrap();
    }
    save_products_to_json(&path, &products).await.unwrap();

    let loaded = load_products_from_json(&path).await.unwrap();
    assert_eq!(loaded, products);

    let search = ProductSearchService::new(
        Arc::new(InMemoryCatalog::default()),
        model,
        SearchSettings::default(),
    );
    assert_eq!(search.upload_products(&loaded).await.unwrap(), 2);

    let hits = search
        .search(SearchStrategy::Vector, "alpaca scarf", &[], Some(1))
        .await
        .unwrap();
    assert_eq!(hits[0].product.id, "a");
}
