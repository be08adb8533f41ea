//! Integration tests for Storefront
//!
//! These tests exercise the crates together: the router over the development
//! stack, the production clients against mocked Azure endpoints, and catalog
//! files on disk.

#[path = "integration/azure_wire.rs"]
mod azure_wire;
#[path = "integration/catalog_files.rs"]
mod catalog_files;
#[path = "integration/web_routes.rs"]
mod web_routes;
