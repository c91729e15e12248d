//! Timeout and retry loop shared by all catalog requests.

use std::future::Future;

use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

use crate::config::RetryPolicy;
use crate::error::{CatalogClientError, Resource};

impl RetryPolicy {
    /// Run `attempt` until it succeeds, fails permanently, or the attempt
    /// budget is spent.
    ///
    /// `attempt` receives the 1-based attempt number.
    /// Attempts are strictly sequential: an attempt that exceeds
    /// [RetryPolicy::timeout] is dropped, which aborts its in-flight request,
    /// before the next one is started.
    /// The error of the last attempt is returned when no attempts remain.
    pub async fn run<T, F, Fut>(
        &self,
        resource: Resource,
        mut attempt: F,
    ) -> Result<T, CatalogClientError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, CatalogClientError>>,
    {
        let max_attempts = self.max_attempts.get();
        let mut attempt_number = 1;

        loop {
            let outcome = match timeout(self.timeout, attempt(attempt_number)).await {
                Ok(outcome) => outcome,
                Err(_elapsed) => Err(CatalogClientError::Timeout {
                    resource,
                    after: self.timeout,
                }),
            };

            let err = match outcome {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if !err.is_transient() {
                debug!(%resource, attempt = attempt_number, %err, "request failed permanently");
                return Err(err);
            }

            if attempt_number >= max_attempts {
                warn!(%resource, attempts = attempt_number, %err, "giving up after retries");
                return Err(err);
            }

            let delay = self.retry_delay * attempt_number;
            warn!(
                %resource,
                attempt = attempt_number,
                ?delay,
                %err,
                "attempt failed, retrying"
            );
            sleep(delay).await;
            attempt_number += 1;
        }
    }
}
