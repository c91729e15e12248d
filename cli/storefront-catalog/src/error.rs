//! Error handling for catalog operations.

use std::fmt::Display;
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

use crate::types::ProductId;

/// The catalog resource a request was made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Products,
    Product(ProductId),
    Categories,
}

impl Resource {
    /// Path of the resource relative to the catalog base URL.
    pub fn path(&self) -> String {
        match self {
            Resource::Products => "products".to_string(),
            Resource::Product(id) => format!("products/{id}"),
            Resource::Categories => "products/categories".to_string(),
        }
    }
}

impl Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resource::Products => write!(f, "products"),
            Resource::Product(id) => write!(f, "product {id}"),
            Resource::Categories => write!(f, "categories"),
        }
    }
}

/// Common error type for catalog operations.
///
/// When all attempts of a call are spent, the error of the last attempt is
/// returned as is, so the variant always names the last failure reason.
#[derive(Debug, Error)]
pub enum CatalogClientError {
    /// The catalog answered with a non-success status.
    #[error("failed to fetch {resource}: {status}")]
    Status {
        resource: Resource,
        status: StatusCode,
    },
    /// An attempt did not complete within the configured timeout.
    #[error(
        "request timeout: the catalog took too long to respond ({resource}, {}s)",
        .after.as_secs_f64()
    )]
    Timeout { resource: Resource, after: Duration },
    /// The request could not be sent or the response body could not be read.
    #[error("failed to fetch {resource}: {source}")]
    Transport {
        resource: Resource,
        #[source]
        source: reqwest::Error,
    },
    /// The response body is not the expected JSON document.
    #[error("invalid response for {resource}")]
    InvalidResponse {
        resource: Resource,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid product id '{0}'")]
    InvalidProductId(String),
    #[error("{0}")]
    Other(String),
}

impl CatalogClientError {
    /// Whether another attempt may succeed where this one failed.
    ///
    /// The catalog sporadically blocks clients with `403 Forbidden`,
    /// so that status is retried along with timeouts and transport failures.
    /// Any other status is final.
    pub fn is_transient(&self) -> bool {
        match self {
            CatalogClientError::Status { status, .. } => *status == StatusCode::FORBIDDEN,
            CatalogClientError::Timeout { .. }
            | CatalogClientError::Transport { .. }
            | CatalogClientError::InvalidResponse { .. } => true,
            CatalogClientError::InvalidProductId(_) | CatalogClientError::Other(_) => false,
        }
    }
}
