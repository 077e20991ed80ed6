use async_trait::async_trait;
use std::time::Duration;

use crate::catalog::ProductCatalog;
use crate::error::CatalogError;
use crate::event::RequestScope;
use crate::product::ProductCatalogSnapshot;

/// Policy controlling how many times an operation is retried and the delay
/// between attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of additional attempts to make after the first failure.
    pub max_retries: usize,
    /// Delay between retry attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(1, Duration::from_millis(200))
    }
}

impl RetryPolicy {
    pub fn new(max_retries: usize, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// Execute `op`, retrying on error according to the policy.
    pub async fn retry<F, Fut, T, E>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut attempts = 0usize;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(e) if attempts < self.max_retries => {
                    attempts += 1;
                    tracing::debug!(attempt = attempts, error = %e, "retrying");
                    tokio::time::sleep(self.delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Wrapper around a [`ProductCatalog`] that retries failed fetches.
#[derive(Clone)]
pub struct RetryCatalog<C> {
    inner: C,
    policy: RetryPolicy,
}

impl<C> RetryCatalog<C> {
    pub fn new(inner: C, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl<C> ProductCatalog for RetryCatalog<C>
where
    C: ProductCatalog,
{
    async fn fetch_products(
        &self,
        scope: &RequestScope,
    ) -> Result<ProductCatalogSnapshot, CatalogError> {
        self.policy.retry(|| self.inner.fetch_products(scope)).await
    }
}
