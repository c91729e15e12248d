//! Canned catalog responses for testing consumers of [CatalogApi].
//!
//! This module is only available when the `tests` feature is enabled.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub use reqwest::StatusCode;
use tracing::debug;

use crate::client::CatalogApi;
use crate::error::{CatalogClientError, Resource};
use crate::types::{Category, Product, ProductId};

/// A failure the mock reports instead of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    Status(StatusCode),
    Timeout,
}

impl MockFailure {
    fn into_error(self, resource: Resource) -> CatalogClientError {
        match self {
            MockFailure::Status(status) => CatalogClientError::Status { resource, status },
            MockFailure::Timeout => CatalogClientError::Timeout {
                resource,
                after: Duration::from_secs(10),
            },
        }
    }
}

/// Catalog client answering from memory.
///
/// Queued failures are returned by the next calls, one per call and in
/// order, before any canned data is served again.
/// The mock does not retry; it stands in for a whole logical call.
#[derive(Debug, Default)]
pub struct MockCatalogClient {
    products: Vec<Product>,
    categories: Vec<Category>,
    failures: Mutex<VecDeque<MockFailure>>,
    calls: AtomicUsize,
}

impl MockCatalogClient {
    pub fn new(products: Vec<Product>, categories: Vec<Category>) -> Self {
        Self {
            products,
            categories,
            ..Default::default()
        }
    }

    /// Fail the next call that has no earlier queued failure.
    pub fn push_failure(&self, failure: MockFailure) {
        self.failures
            .lock()
            .expect("mock failures poisoned")
            .push_back(failure);
    }

    /// Number of calls made so far, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn serve<T>(
        &self,
        resource: Resource,
        respond: impl FnOnce() -> Result<T, CatalogClientError>,
    ) -> Result<T, CatalogClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let failure = self
            .failures
            .lock()
            .expect("mock failures poisoned")
            .pop_front();
        if let Some(failure) = failure {
            debug!(%resource, ?failure, "mock catalog failing call");
            return Err(failure.into_error(resource));
        }
        respond()
    }
}

impl CatalogApi for MockCatalogClient {
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogClientError> {
        self.serve(Resource::Products, || Ok(self.products.clone()))
    }

    async fn fetch_product(&self, id: ProductId) -> Result<Product, CatalogClientError> {
        let resource = Resource::Product(id);
        self.serve(resource, || {
            self.products
                .iter()
                .find(|product| product.id == id)
                .cloned()
                .ok_or(CatalogClientError::Status {
                    resource,
                    status: StatusCode::NOT_FOUND,
                })
        })
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, CatalogClientError> {
        self.serve(Resource::Categories, || Ok(self.categories.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rating;

    fn product(id: u64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("product {id}"),
            price: id as f64,
            description: String::new(),
            category: Category::from("electronics"),
            image: format!("https://fakestoreapi.com/img/{id}.jpg").parse().unwrap(),
            rating: Rating {
                rate: 4.0,
                count: 10,
            },
        }
    }

    #[tokio::test]
    async fn serves_canned_products() {
        let mock = MockCatalogClient::new(vec![product(1), product(2)], vec![
            Category::from("electronics"),
        ]);

        let catalog = mock.load_catalog().await.unwrap();
        assert_eq!(catalog.products.len(), 2);
        assert_eq!(catalog.categories.len(), 1);
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn unknown_product_is_not_found() {
        let mock = MockCatalogClient::new(vec![product(1)], vec![]);

        assert_eq!(mock.fetch_product(ProductId::new(1)).await.unwrap(), product(1));
        let err = mock.fetch_product(ProductId::new(9)).await.unwrap_err();
        assert_eq!(err.to_string(), "failed to fetch product 9: 404 Not Found");
    }

    #[tokio::test]
    async fn queued_failures_are_served_first() {
        let mock = MockCatalogClient::new(vec![product(1)], vec![]);
        mock.push_failure(MockFailure::Timeout);

        assert!(matches!(
            mock.fetch_products().await,
            Err(CatalogClientError::Timeout { .. })
        ));
        assert!(mock.fetch_products().await.is_ok());
    }
}
