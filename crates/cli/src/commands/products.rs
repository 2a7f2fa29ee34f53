//! Catalog listing commands.

use std::path::Path;

use pricelist_storefront::aroma::suggest_aromas;
use pricelist_storefront::catalog::filter_products;
use pricelist_storefront::error::Result;
use pricelist_storefront::state::AppState;

use super::{fetch_catalog, find_product, print_product};

/// Print every product matching `search` (all products without one).
pub async fn list(state: &AppState, catalog: Option<&Path>, search: Option<&str>) -> Result<()> {
    let products = fetch_catalog(state, catalog).await?;
    let visible = filter_products(&products, search.unwrap_or_default());

    if visible.is_empty() {
        println!("No products found.");
        return Ok(());
    }
    for product in &visible {
        print_product(product);
    }
    tracing::debug!(shown = visible.len(), total = products.len(), "Listed products");
    Ok(())
}

/// Print scent suggestions for product `id`.
pub async fn suggest(state: &AppState, catalog: Option<&Path>, id: &str) -> Result<()> {
    let products = fetch_catalog(state, catalog).await?;
    let product = find_product(&products, id)?;

    print_product(product);
    for aroma in suggest_aromas(&product.description) {
        println!("  - {aroma}");
    }
    Ok(())
}
