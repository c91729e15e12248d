//! Configuration types for catalog client construction.

use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::time::Duration;

/// The public FakeStore API the storefront browses.
pub const DEFAULT_CATALOG_URL: &str = "https://fakestoreapi.com";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_MAX_ATTEMPTS: NonZeroU32 = NonZeroU32::new(3).unwrap();
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Configuration for catalog client construction.
#[derive(Debug, Clone)]
pub struct CatalogClientConfig {
    /// Base URL for the catalog API.
    // Using a URL here adds an extra trailing slash,
    // so just use a String.
    pub catalog_url: String,
    /// Additional headers to include in requests.
    pub extra_headers: BTreeMap<String, String>,
    /// Override for the `user-agent` header.
    pub user_agent: Option<String>,
    /// Timeout and retry behaviour applied to every request.
    pub retry: RetryPolicy,
}

impl Default for CatalogClientConfig {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            extra_headers: BTreeMap::new(),
            user_agent: None,
            retry: RetryPolicy::default(),
        }
    }
}

/// Bounds on a single logical catalog call.
///
/// Every attempt is limited to `timeout`.
/// After failed attempt `n` the client waits `retry_delay * n`
/// before the next one, for at most `max_attempts` attempts in total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub timeout: Duration,
    pub max_attempts: NonZeroU32,
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}
