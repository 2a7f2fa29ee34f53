//! Price-list API client.
//!
//! Uses `reqwest` for HTTP and caches the decoded product list with `moka`
//! (TTL from configuration, 5 minutes by default), so the catalog is fetched
//! once and reused by every view built within the TTL.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use pricelist_core::Product;
use tracing::{debug, error, instrument};
use url::Url;

use super::{CatalogError, ProductCatalogSource, decode_product_list};
use crate::config::CatalogConfig;

/// Client for the price-list API.
#[derive(Clone)]
pub struct HttpCatalogSource {
    inner: Arc<HttpCatalogSourceInner>,
}

struct HttpCatalogSourceInner {
    client: reqwest::Client,
    endpoint: Url,
    cache: Cache<String, Arc<[Product]>>,
}

impl std::fmt::Debug for HttpCatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCatalogSource")
            .field("endpoint", &self.inner.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl HttpCatalogSource {
    /// Create a new client.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(config.cache_ttl)
            .build();

        Self {
            inner: Arc::new(HttpCatalogSourceInner {
                client: reqwest::Client::new(),
                endpoint: config.api_url.clone(),
                cache,
            }),
        }
    }

    /// Create a client for `endpoint` with the given cache TTL.
    #[must_use]
    pub fn with_endpoint(endpoint: Url, cache_ttl: Duration) -> Self {
        Self::new(&CatalogConfig {
            api_url: endpoint,
            cache_ttl,
        })
    }

    async fn request(&self) -> Result<Vec<Product>, CatalogError> {
        let response = self
            .inner
            .client
            .get(self.inner.endpoint.clone())
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Status(status.as_u16()));
        }

        decode_product_list(&body).inspect_err(|e| {
            error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to decode catalog payload"
            );
        })
    }
}

impl ProductCatalogSource for HttpCatalogSource {
    #[instrument(skip(self), fields(endpoint = %self.inner.endpoint))]
    async fn fetch_all(&self) -> Result<Vec<Product>, CatalogError> {
        let key = self.inner.endpoint.to_string();

        if let Some(products) = self.inner.cache.get(&key).await {
            debug!(products = products.len(), "Catalog served from cache");
            return Ok(products.to_vec());
        }

        let products = self.request().await?;
        debug!(products = products.len(), "Catalog fetched");

        self.inner
            .cache
            .insert(key, Arc::from(products.as_slice()))
            .await;

        Ok(products)
    }
}
