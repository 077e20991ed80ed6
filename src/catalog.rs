use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::path::Path;
use url::Url;

use crate::error::{CatalogError, ConfigError};
use crate::event::RequestScope;
use crate::product::{Product, ProductCatalogSnapshot};

/// Source of the user's purchasable products.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Fetch a fresh snapshot for the user and locale in `scope`.
    async fn fetch_products(
        &self,
        scope: &RequestScope,
    ) -> Result<ProductCatalogSnapshot, CatalogError>;
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductsPage {
    #[serde(default)]
    in_skill_products: Vec<Product>,
    next_token: Option<String>,
    #[serde(default)]
    is_truncated: bool,
}

const PRODUCTS_PATH: &str = "v1/users/~current/skills/~current/inSkillProducts";
const MAX_PAGES: usize = 20;

/// [`ProductCatalog`] backed by the platform's monetization service.
#[derive(Clone)]
pub struct HttpProductCatalog {
    client: Client,
    endpoint: Option<String>,
}

impl HttpProductCatalog {
    /// Use the API endpoint carried by each request envelope.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            endpoint: None,
        }
    }

    /// Always call `endpoint`, ignoring the envelope's endpoint.
    pub fn with_endpoint(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: Some(endpoint.into()),
        }
    }

    fn products_url(&self, scope: &RequestScope) -> Result<Url, CatalogError> {
        let base = self
            .endpoint
            .as_deref()
            .or(scope.api_endpoint.as_deref())
            .ok_or_else(|| CatalogError::new("no monetization endpoint"))?;
        let base = format!("{}/", base.trim_end_matches('/'));
        Url::parse(&base)
            .and_then(|u| u.join(PRODUCTS_PATH))
            .map_err(|e| CatalogError::new(format!("bad endpoint {base}: {e}")))
    }
}

#[async_trait]
impl ProductCatalog for HttpProductCatalog {
    async fn fetch_products(
        &self,
        scope: &RequestScope,
    ) -> Result<ProductCatalogSnapshot, CatalogError> {
        let url = self.products_url(scope)?;
        let mut products = Vec::new();
        let mut next_token: Option<String> = None;
        for page_no in 1..=MAX_PAGES {
            let mut req = self
                .client
                .get(url.clone())
                .header(reqwest::header::ACCEPT_LANGUAGE, &scope.locale);
            if let Some(token) = &scope.api_access_token {
                req = req.bearer_auth(token);
            }
            if let Some(next) = &next_token {
                req = req.query(&[("nextToken", next)]);
            }
            let resp = req.send().await?;
            let status = resp.status();
            if !status.is_success() {
                tracing::warn!(%status, %url, "monetization service refused product request");
                return Err(CatalogError::new(format!("HTTP {status}")));
            }
            let page: ProductsPage = resp.json().await?;
            products.extend(page.in_skill_products);
            match page.next_token {
                Some(token) if page.is_truncated => {
                    if page_no == MAX_PAGES {
                        tracing::warn!(pages = MAX_PAGES, "product listing still truncated, stopping");
                    }
                    next_token = Some(token);
                }
                _ => break,
            }
        }
        tracing::debug!(count = products.len(), locale = %scope.locale, "fetched product catalog");
        Ok(ProductCatalogSnapshot::new(products))
    }
}

/// Fixed in-memory catalog for local replay and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticProductCatalog {
    snapshot: ProductCatalogSnapshot,
}

impl StaticProductCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            snapshot: ProductCatalogSnapshot::new(products),
        }
    }

    /// Load a JSON file shaped like the monetization service's response.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.display().to_string(),
                source,
            })?;
        let page: ProductsPage =
            serde_json::from_str(&text).map_err(|source| ConfigError::CatalogFile {
                path: path.display().to_string(),
                source,
            })?;
        Ok(Self::new(page.in_skill_products))
    }
}

#[async_trait]
impl ProductCatalog for StaticProductCatalog {
    async fn fetch_products(
        &self,
        _scope: &RequestScope,
    ) -> Result<ProductCatalogSnapshot, CatalogError> {
        Ok(self.snapshot.clone())
    }
}
