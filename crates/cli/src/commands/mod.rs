//! Command implementations.

pub mod browse;
pub mod cart;
pub mod products;

use std::path::Path;

use pricelist_core::{Price, Product};
use pricelist_storefront::catalog::{CatalogState, FileCatalogSource, load_catalog};
use pricelist_storefront::error::{AppError, Result};
use pricelist_storefront::state::AppState;
use rust_decimal::Decimal;

/// Fetch the catalog from `file` if given, the API otherwise.
pub async fn fetch_catalog(state: &AppState, file: Option<&Path>) -> Result<Vec<Product>> {
    let loaded = match file {
        Some(path) => load_catalog(&FileCatalogSource::new(path)).await,
        None => load_catalog(state.catalog()).await,
    };

    match loaded {
        CatalogState::Ready(products) => Ok(products),
        CatalogState::Failed(e) => Err(e.into()),
        CatalogState::Loading => Err(AppError::NotFound("catalog".to_string())),
    }
}

/// Find `id` in `products`.
pub fn find_product<'a>(products: &'a [Product], id: &str) -> Result<&'a Product> {
    products
        .iter()
        .find(|p| p.id.as_str() == id.trim())
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// Display an amount the way prices are shown, `$1.234,5`.
pub fn money(amount: Decimal) -> String {
    Price::new(amount).map_or_else(|_| amount.to_string(), |price| price.grouped())
}

pub fn print_product(product: &Product) {
    if product.brand.is_empty() {
        println!("{:>6}  {}  ${}", product.id, product.name, product.price.grouped());
    } else {
        println!(
            "{:>6}  {} ({})  ${}",
            product.id,
            product.name,
            product.brand,
            product.price.grouped()
        );
    }
}
