//! Integration tests for the Pricelist storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pricelist-integration-tests
//! ```
//!
//! The tests need no network: catalogs come from [`sample_catalog`] or a
//! payload file, and session storage lives in a temporary directory.
//!
//! # Test Categories
//!
//! - `cart_persistence` - cart state surviving a restart
//! - `search_flow` - debounced search driving the visible product list
//! - `ordering` - add-to-cart form through to the order message

#![cfg_attr(not(test), forbid(unsafe_code))]

use pricelist_core::Product;
use pricelist_storefront::catalog::decode_product_list;

/// Catalog payload shaped like the price-list API response.
pub const SAMPLE_PAYLOAD: &str = r#"{
    "productList": [
        {"id": 1, "name": "Difusor Jazmín", "brand": "Aromanza", "price": 4500,
         "description": "Difusor de varillas con notas de jazmín y rosa"},
        {"id": 2, "name": "Vela de Soja", "brand": "Luz Natural", "price": 2800,
         "description": "Vela aromática de coco y vainilla"},
        {"id": 3, "name": "Sahumerio", "brand": "Sagrada Madre", "price": 900,
         "description": ""},
        {"id": 4, "name": "Home Spray", "brand": "Aromanza", "price": 3200.5,
         "description": "Spray de ambientes, lavanda intensa"}
    ]
}"#;

/// The products in [`SAMPLE_PAYLOAD`].
///
/// # Panics
///
/// Panics if the sample payload does not decode.
#[must_use]
pub fn sample_catalog() -> Vec<Product> {
    decode_product_list(SAMPLE_PAYLOAD).expect("sample payload decodes")
}

/// Write [`SAMPLE_PAYLOAD`] to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_sample_payload(path: &std::path::Path) -> std::io::Result<()> {
    let value: serde_json::Value =
        serde_json::from_str(SAMPLE_PAYLOAD).map_err(std::io::Error::other)?;
    std::fs::write(path, serde_json::to_vec_pretty(&value).map_err(std::io::Error::other)?)
}
