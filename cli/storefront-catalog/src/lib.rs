//! HTTP client for the remote product catalog.
//!
//! This crate provides:
//! - HTTP client construction with per-attempt timeouts and retries
//! - The catalog data model (products, ratings, categories)
//! - Common error handling for catalog operations
//! - A canned in-process client for downstream tests (feature-gated)
//!
//! ## Usage
//!
//! ```ignore
//! use storefront_catalog::{CatalogApi, CatalogClient, CatalogClientConfig};
//!
//! let client = CatalogClient::new(CatalogClientConfig::default())?;
//! let catalog = client.load_catalog().await?;
//! let product = client.fetch_product(catalog.products[0].id).await?;
//! ```

mod client;
mod config;
mod error;
mod retry;
pub mod types;

#[cfg(any(test, feature = "tests"))]
pub mod mock;

// Public exports
pub use client::{CatalogApi, CatalogClient};
pub use config::{CatalogClientConfig, DEFAULT_CATALOG_URL, RetryPolicy};
pub use error::{CatalogClientError, Resource};
pub use types::{Catalog, Category, Product, ProductId, Rating};
