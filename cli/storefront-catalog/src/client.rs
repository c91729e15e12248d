//! Catalog client performing retrying HTTP requests against the catalog API.

use std::fmt::Debug;
use std::str::FromStr;

use reqwest::header::{self, HeaderMap};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::config::CatalogClientConfig;
use crate::error::{CatalogClientError, Resource};
use crate::types::{Catalog, Category, Product, ProductId};

/// A client for the catalog service.
///
/// Handles:
/// - HTTP client configuration with default and extra headers
/// - Per-attempt timeouts and retries of transient failures
/// - Decoding of the JSON documents served by the catalog
pub struct CatalogClient {
    client: reqwest::Client,
    config: CatalogClientConfig,
}

impl Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("catalog_url", &self.config.catalog_url)
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Create a new catalog client from configuration.
    pub fn new(config: CatalogClientConfig) -> Result<Self, CatalogClientError> {
        let client = build_http_client(&config)?;
        Ok(Self { client, config })
    }

    fn url_for(&self, resource: Resource) -> String {
        format!(
            "{}/{}",
            self.config.catalog_url.trim_end_matches('/'),
            resource.path()
        )
    }

    /// GET a resource and decode its JSON body, retrying per the configured
    /// [crate::RetryPolicy].
    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: Resource,
    ) -> Result<T, CatalogClientError> {
        let url = self.url_for(resource);
        let url = url.as_str();

        self.config
            .retry
            .run(resource, move |attempt| async move {
                debug!(%url, attempt, "sending catalog request");
                let response = self.client.get(url).send().await.map_err(|source| {
                    CatalogClientError::Transport { resource, source }
                })?;

                let status = response.status();
                if !status.is_success() {
                    return Err(CatalogClientError::Status { resource, status });
                }

                let body = response
                    .bytes()
                    .await
                    .map_err(|source| CatalogClientError::Transport { resource, source })?;

                serde_json::from_slice(&body)
                    .map_err(|source| CatalogClientError::InvalidResponse { resource, source })
            })
            .await
    }
}

// ---------------------------------------------------------------------------
// Catalog trait
// ---------------------------------------------------------------------------

/// The complete catalog API interface.
///
/// This trait enables alternate implementations:
/// - **HTTP**: REST calls to the catalog API via [`CatalogClient`]
/// - **Mock** (tests): canned responses without HTTP, see `mock::MockCatalogClient`
#[allow(async_fn_in_trait)]
pub trait CatalogApi {
    /// Fetch the full product list, in catalog order.
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogClientError>;

    /// Fetch a single product.
    async fn fetch_product(&self, id: ProductId) -> Result<Product, CatalogClientError>;

    /// Fetch the list of category names.
    async fn fetch_categories(&self) -> Result<Vec<Category>, CatalogClientError>;

    /// Fetch products and categories concurrently.
    ///
    /// Completes once both requests have completed,
    /// and fails with the first error if either of them fails.
    async fn load_catalog(&self) -> Result<Catalog, CatalogClientError> {
        let (products, categories) =
            futures::try_join!(self.fetch_products(), self.fetch_categories())?;
        debug!(
            n_products = products.len(),
            n_categories = categories.len(),
            "loaded catalog"
        );
        Ok(Catalog {
            products,
            categories,
        })
    }
}

// ---------------------------------------------------------------------------
// CatalogApi implementation for CatalogClient
// ---------------------------------------------------------------------------

impl CatalogApi for CatalogClient {
    #[instrument(skip_all, fields(resource = "products"))]
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogClientError> {
        self.get_json(Resource::Products).await
    }

    #[instrument(skip(self), fields(resource = "product"))]
    async fn fetch_product(&self, id: ProductId) -> Result<Product, CatalogClientError> {
        if id.get() == 0 {
            return Err(CatalogClientError::InvalidProductId(id.to_string()));
        }
        self.get_json(Resource::Product(id)).await
    }

    #[instrument(skip_all, fields(resource = "categories"))]
    async fn fetch_categories(&self) -> Result<Vec<Category>, CatalogClientError> {
        self.get_json(Resource::Categories).await
    }
}

// ---------------------------------------------------------------------------
// HTTP client builder
// ---------------------------------------------------------------------------

/// Build the HTTP client for the catalog API.
///
/// The per-attempt timeout is enforced by the retry loop rather than by
/// the client, so that a timed out attempt can be retried.
fn build_http_client(config: &CatalogClientConfig) -> Result<reqwest::Client, CatalogClientError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/json"),
    );

    for (key, value) in &config.extra_headers {
        headers.insert(
            header::HeaderName::from_str(key).map_err(
                |e: reqwest::header::InvalidHeaderName| CatalogClientError::Other(e.to_string()),
            )?,
            header::HeaderValue::from_str(value).map_err(
                |e: reqwest::header::InvalidHeaderValue| CatalogClientError::Other(e.to_string()),
            )?,
        );
    }

    debug!(
        catalog_url = %config.catalog_url,
        extra_headers = config.extra_headers.len(),
        retry = ?config.retry,
        "building catalog HTTP client"
    );

    let client_builder = reqwest::Client::builder()
        .default_headers(headers)
        .connect_timeout(config.retry.timeout);

    let client_builder = if let Some(ref user_agent) = config.user_agent {
        client_builder.user_agent(user_agent)
    } else {
        client_builder
    };

    client_builder
        .build()
        .map_err(|e| CatalogClientError::Other(e.to_string()))
}
