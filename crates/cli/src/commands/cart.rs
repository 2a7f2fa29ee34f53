//! Cart commands.
//!
//! The cart lives in session storage, so each invocation sees what the
//! previous one left.

use std::path::Path;

use pricelist_core::{ProductId, VariantLabel};
use pricelist_storefront::cart::{CartError, order_text};
use pricelist_storefront::error::{AppError, Result};
use pricelist_storefront::selection::AddToCartForm;
use pricelist_storefront::state::AppState;

use super::{fetch_catalog, find_product, money};

const WHATSAPP_SEND_URL: &str = "https://api.whatsapp.com/send";

pub fn show(state: &AppState) {
    let cart = state.cart();
    let items = cart.items();
    if items.is_empty() {
        println!("Cart is empty.");
        return;
    }

    for line in &items {
        println!(
            "{} x {} ({}) [{}]  ${} = ${}",
            line.quantity,
            line.name,
            line.brand,
            line.variant,
            line.price.grouped(),
            money(line.subtotal()),
        );
    }
    println!("Items: {}", cart.item_count());
    println!("Total: ${}", money(cart.total()));
}

/// Add `quantity` units of product `id` in scent `aroma`.
pub async fn add(
    state: &AppState,
    catalog: Option<&Path>,
    id: &str,
    aroma: &str,
    quantity: i64,
) -> Result<()> {
    let products = fetch_catalog(state, catalog).await?;
    let product = find_product(&products, id)?.clone();
    let name = product.name.clone();

    let mut form = AddToCartForm::new();
    form.select_product(product);
    form.set_quantity(quantity);
    form.on_variant_input(aroma);
    form.submit(state.cart())?;

    println!("Added {quantity} x {name} ({}).", aroma.trim());
    println!("Total: ${}", money(state.cart().total()));
    Ok(())
}

pub fn remove(state: &AppState, id: &str, aroma: &str) -> Result<()> {
    let id = ProductId::parse(id).map_err(|e| AppError::NotFound(e.to_string()))?;
    let variant = VariantLabel::parse(aroma).map_err(CartError::from)?;

    let before = state.cart().items().len();
    state.cart().remove_item(&id, &variant)?;
    if state.cart().items().len() == before {
        println!("No {id} [{variant}] line in the cart.");
    } else {
        println!("Removed {id} [{variant}].");
    }
    Ok(())
}

/// Empty the cart and save the empty cart.
pub fn clear(state: &AppState) -> Result<()> {
    state.cart().clear();
    state.cart().persist()?;
    println!("Cart cleared.");
    Ok(())
}

/// Print the order link (or the plain message with `text`).
pub fn order(state: &AppState, text: bool) {
    let cart = state.cart();
    if cart.is_empty() {
        tracing::warn!("Ordering with an empty cart");
    }

    if text {
        println!("{}", order_text(&cart.items()));
    } else {
        println!("{}", order_link(&state.config().whatsapp_phone, &cart.order_message()));
    }
}

fn order_link(phone: &str, encoded_message: &str) -> String {
    format!("{WHATSAPP_SEND_URL}?phone={phone}&text={encoded_message}")
}
