//! Cart state across restarts.
//!
//! Each "restart" builds a fresh `AppState` over the same session directory.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::path::Path;
use std::sync::Arc;

use pricelist_core::{ProductId, VariantLabel};
use pricelist_integration_tests::sample_catalog;
use pricelist_storefront::cart::{AddItem, CART_STORAGE_KEY, CartStore};
use pricelist_storefront::config::StorefrontConfig;
use pricelist_storefront::state::AppState;
use pricelist_storefront::storage::{FileStorage, SessionStorage};
use rust_decimal::Decimal;

fn state_in(dir: &Path) -> AppState {
    let config = StorefrontConfig {
        session_dir: dir.to_path_buf(),
        ..StorefrontConfig::default()
    };
    AppState::new(config).unwrap()
}

#[test]
fn cart_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = sample_catalog();

    let first = state_in(dir.path());
    first
        .cart()
        .add_item(AddItem::for_product(&catalog[0], 2, "Jazmín"))
        .unwrap();
    first
        .cart()
        .add_item(AddItem::for_product(&catalog[1], 1, "Coco"))
        .unwrap();
    let before = first.cart().items();
    drop(first);

    let second = state_in(dir.path());
    assert_eq!(second.cart().items(), before);
    assert_eq!(second.cart().total(), Decimal::from(4500 * 2 + 2800));
    assert_eq!(second.cart().item_count(), 3);
}

#[test]
fn removal_is_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = sample_catalog();

    let first = state_in(dir.path());
    first
        .cart()
        .add_item(AddItem::for_product(&catalog[3], 1, "Lavanda"))
        .unwrap();
    first
        .cart()
        .remove_item(
            &ProductId::parse("4").unwrap(),
            &VariantLabel::parse("Lavanda").unwrap(),
        )
        .unwrap();

    assert!(state_in(dir.path()).cart().is_empty());
}

#[test]
fn clear_survives_restart_only_after_persist() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = sample_catalog();

    let first = state_in(dir.path());
    first
        .cart()
        .add_item(AddItem::for_product(&catalog[2], 3, "Palo Santo"))
        .unwrap();
    first.cart().clear();
    assert_eq!(state_in(dir.path()).cart().item_count(), 3);

    first.cart().persist().unwrap();
    assert!(state_in(dir.path()).cart().is_empty());
}

#[test]
fn corrupt_session_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::open(dir.path()).unwrap();
    storage.set_item(CART_STORAGE_KEY, "[{\"id\":").unwrap();

    let cart = CartStore::new(Arc::new(storage.clone()));
    assert!(cart.is_empty());

    // The next write replaces the corrupt record.
    cart.add_item(AddItem::for_product(&sample_catalog()[0], 1, "Rosa"))
        .unwrap();
    let restarted = CartStore::new(Arc::new(storage));
    assert_eq!(restarted.items().len(), 1);
}

#[test]
fn saved_record_uses_wire_field_names() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_in(dir.path());
    state
        .cart()
        .add_item(AddItem::for_product(&sample_catalog()[1], 2, "Vainilla"))
        .unwrap();

    let raw = std::fs::read_to_string(dir.path().join("cart.json")).unwrap();
    let saved: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let line = &saved[0];
    assert_eq!(line["id"], "2");
    assert_eq!(line["aroma"], "Vainilla");
    assert_eq!(line["quantity"], 2);
    assert_eq!(line["price"], 2800);
    assert_eq!(line["brand"], "Luz Natural");
}
