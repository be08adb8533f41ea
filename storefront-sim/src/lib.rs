//! Storefront Simulation - offline stand-ins for the cloud services.

#![warn(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
//!
//! Development mode runs the whole storefront without network access:
//!
//! - **In-memory catalog**: keyword, vector and hybrid queries over a seeded
//!   product list, implementing the same provider trait as the cloud index
//! - **Deterministic model**: hashed bag-of-words embeddings and templated
//!   chat replies, identical for identical input
//! - **Sample catalog**: a small fashion catalog with captions and tags
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use storefront_search::{ProductSearchService, SearchSettings, SearchStrategy};
//! use storefront_sim::{DeterministicModel, InMemoryCatalog};
//!
//! # async fn demo() -> Result<(), storefront_search::SearchError> {
//! let model = Arc::new(DeterministicModel::new(64));
//! let catalog = Arc::new(InMemoryCatalog::seeded(&model));
//! let search = ProductSearchService::new(catalog, model, SearchSettings::default());
//!
//! let hits = search.search(SearchStrategy::Hybrid, "linen shirt", &[], None).await?;
//! println!("{} products", hits.len());
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod content_database;
pub mod model;

pub use catalog::InMemoryCatalog;
pub use content_database::create_sample_catalog;
pub use model::DeterministicModel;
