//! Product catalog sources and filtered views.
//!
//! # Sources
//!
//! [`ProductCatalogSource`] is the only network-shaped dependency. All sources
//! decode the same payload shape:
//!
//! ```json
//! { "productList": [ { "id": 1, "name": "...", "brand": "...", "price": 100,
//!                      "description": "...", "image": "..." } ] }
//! ```
//!
//! - [`HttpCatalogSource`] - the price-list API over `reqwest`, cached with
//!   `moka`
//! - [`FileCatalogSource`] - a saved payload on disk
//! - [`StaticCatalogSource`] - an in-memory list
//!
//! Failures are returned as [`CatalogError`], never as an empty list.
//! [`load_catalog`] turns the outcome into a [`CatalogState`] for callers that
//! present loading and failure states.

mod filter;
mod http;

use std::future::Future;
use std::path::PathBuf;

use pricelist_core::Product;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument, warn};

pub use filter::{CatalogView, filter_products, fold};
pub use http::HttpCatalogSource;

/// Catalog fetch errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (connection, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("catalog API returned status {0}")]
    Status(u16),

    /// The payload was not a valid product list.
    #[error("malformed catalog payload: {0}")]
    Parse(#[from] serde_json::Error),

    /// A local catalog file could not be read.
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
}

/// Wire shape of a catalog payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductList {
    pub product_list: Vec<Product>,
}

/// Decode a catalog payload.
///
/// # Errors
///
/// Returns [`CatalogError::Parse`] if the payload is not a product list or any
/// product fails validation.
pub fn decode_product_list(payload: &str) -> Result<Vec<Product>, CatalogError> {
    let list: ProductList = serde_json::from_str(payload)?;
    Ok(list.product_list)
}

/// Supplier of the full product list.
pub trait ProductCatalogSource: Send + Sync {
    /// Fetch every product.
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;
}

/// In-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalogSource {
    products: Vec<Product>,
}

impl StaticCatalogSource {
    /// Serve `products`.
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }
}

impl ProductCatalogSource for StaticCatalogSource {
    async fn fetch_all(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.clone())
    }
}

/// Catalog read from a saved payload file.
#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    /// Read the payload at `path` on each fetch.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ProductCatalogSource for FileCatalogSource {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn fetch_all(&self) -> Result<Vec<Product>, CatalogError> {
        let payload = tokio::fs::read_to_string(&self.path).await?;
        decode_product_list(&payload)
    }
}

/// Outcome of loading the catalog.
#[derive(Debug)]
pub enum CatalogState {
    /// Fetch not finished yet.
    Loading,
    /// Catalog available.
    Ready(Vec<Product>),
    /// Fetch failed; filtering and cart workflows stay idle.
    Failed(CatalogError),
}

impl CatalogState {
    /// Whether a fetch is still in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The products, if loaded.
    #[must_use]
    pub fn products(&self) -> Option<&[Product]> {
        match self {
            Self::Ready(products) => Some(products),
            _ => None,
        }
    }
}

/// Fetch the catalog from `source` and wrap the outcome.
pub async fn load_catalog(source: &impl ProductCatalogSource) -> CatalogState {
    match source.fetch_all().await {
        Ok(products) => {
            info!(products = products.len(), "Catalog loaded");
            CatalogState::Ready(products)
        }
        Err(e) => {
            warn!(error = %e, "Catalog fetch failed");
            CatalogState::Failed(e)
        }
    }
}
