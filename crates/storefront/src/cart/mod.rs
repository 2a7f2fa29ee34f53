//! Cart store.
//!
//! [`CartStore`] owns the authoritative list of cart lines. Lines are keyed by
//! `(product id, variant label)`; adding an existing key accumulates quantity
//! and keeps the original name, brand and price.
//!
//! # Persistence
//!
//! Every `add_item` / `remove_item` serializes the full line list and writes
//! it under [`CART_STORAGE_KEY`] before the new list is committed in memory
//! and published. A failed write returns an error and leaves the cart as it
//! was, so memory and storage never disagree after a call returns.
//!
//! On construction the store reads the key once. Missing, unreadable or
//! unparseable data yields an empty cart; it is never a startup failure.

mod order;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pricelist_core::{CartLine, CartLineError, Price, Product, ProductId, Quantity, VariantLabel};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::reactive::{Subject, Subscription};
use crate::storage::{SessionStorage, StorageError};

pub use order::{ORDER_HEADER, cart_total, encode_order_message, order_text};

/// Storage key holding the serialized cart.
pub const CART_STORAGE_KEY: &str = "cart";

/// Cart operation errors.
#[derive(Debug, Error)]
pub enum CartError {
    /// The requested line failed validation (quantity or variant label).
    #[error("invalid cart line: {0}")]
    InvalidLine(#[from] CartLineError),

    /// An add was attempted without a selected product.
    #[error("no product selected")]
    NoProductSelected,

    /// The cart could not be persisted.
    #[error("failed to persist cart: {0}")]
    Storage(#[from] StorageError),
}

/// Unvalidated request to add a line to the cart.
///
/// Quantity and variant are taken as the caller supplied them; validation
/// happens in [`CartStore::add_item`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddItem {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    pub price: Price,
    pub quantity: i64,
    pub variant: String,
}

impl AddItem {
    /// Request `quantity` units of `product` in `variant`.
    #[must_use]
    pub fn for_product(product: &Product, quantity: i64, variant: impl Into<String>) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            brand: product.brand.clone(),
            price: product.price,
            quantity,
            variant: variant.into(),
        }
    }

    fn into_line(self) -> Result<CartLine, CartLineError> {
        let quantity = Quantity::new(self.quantity)?;
        let variant = VariantLabel::parse(&self.variant)?;
        Ok(CartLine {
            id: self.id,
            name: self.name,
            price: self.price,
            quantity,
            variant,
            brand: self.brand,
        })
    }
}

/// Merge `line` into `lines`: accumulate quantity on a key match, append
/// otherwise.
fn merge_line(lines: &mut Vec<CartLine>, line: CartLine) {
    match lines
        .iter_mut()
        .find(|existing| existing.has_key(&line.id, &line.variant))
    {
        Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
        None => lines.push(line),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The cart store.
pub struct CartStore {
    storage: Arc<dyn SessionStorage>,
    lines: Mutex<Vec<CartLine>>,
    changes: Subject<Vec<CartLine>>,
    open: Subject<bool>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("lines", &*lock(&self.lines))
            .field("open", &self.open.get())
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Create a store over `storage`, rehydrating any saved cart.
    #[must_use]
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        let lines = rehydrate(storage.as_ref());
        info!(lines = lines.len(), "Cart store initialized");

        Self {
            storage,
            changes: Subject::new(lines.clone()),
            lines: Mutex::new(lines),
            open: Subject::new(false),
        }
    }

    /// Add a line, merging with an existing line of the same key.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidLine`] for a non-positive quantity or a
    /// blank variant (nothing is changed or written), and
    /// [`CartError::Storage`] if the cart cannot be persisted.
    #[instrument(skip_all, fields(product_id = %item.id, variant = %item.variant))]
    pub fn add_item(&self, item: AddItem) -> Result<(), CartError> {
        let line = item.into_line().inspect_err(|e| {
            debug!(error = %e, "Rejected cart line");
        })?;
        let quantity = line.quantity;

        self.mutate(|lines| merge_line(lines, line))?;
        debug!(%quantity, "Added item to cart");
        Ok(())
    }

    /// Remove the line keyed `(id, variant)`. Removing a missing key leaves
    /// the lines unchanged and is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the cart cannot be persisted.
    #[instrument(skip_all, fields(product_id = %id, variant = %variant))]
    pub fn remove_item(&self, id: &ProductId, variant: &VariantLabel) -> Result<(), CartError> {
        self.mutate(|lines| lines.retain(|line| !line.has_key(id, variant)))?;
        debug!("Removed item from cart");
        Ok(())
    }

    /// Empty the cart and publish the empty list.
    ///
    /// Storage is not touched; the saved cart is replaced by the next
    /// persisting call.
    pub fn clear(&self) {
        lock(&self.lines).clear();
        self.changes.next(Vec::new());
        debug!("Cleared cart");
    }

    /// Write the current lines to storage.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the write fails.
    pub fn persist(&self) -> Result<(), CartError> {
        let lines = lock(&self.lines);
        self.write(&lines)?;
        Ok(())
    }

    /// Sum of `price x quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        cart_total(&lock(&self.lines))
    }

    /// A copy of the current lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> Vec<CartLine> {
        lock(&self.lines).clone()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        lock(&self.lines)
            .iter()
            .map(|line| u64::from(line.quantity.get()))
            .sum()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.lines).is_empty()
    }

    /// Percent-encoded order message for the current lines.
    #[must_use]
    pub fn order_message(&self) -> String {
        encode_order_message(&lock(&self.lines))
    }

    /// Subscribe to line list changes. The callback receives the current list
    /// immediately.
    pub fn subscribe(&self, callback: impl Fn(&Vec<CartLine>) + Send + Sync + 'static) -> Subscription {
        self.changes.subscribe(callback)
    }

    // -------------------------------------------------------------------------
    // Open / closed flag
    // -------------------------------------------------------------------------

    /// Whether the cart panel is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    /// Flip the open flag.
    pub fn toggle(&self) {
        self.open.update(|open| !open);
    }

    /// Set the open flag.
    pub fn open(&self) {
        self.open.next(true);
    }

    /// Clear the open flag.
    pub fn close(&self) {
        self.open.next(false);
    }

    /// Subscribe to open flag changes.
    pub fn subscribe_open(&self, callback: impl Fn(&bool) + Send + Sync + 'static) -> Subscription {
        self.open.subscribe(callback)
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Apply `f` to a copy of the lines, persist the copy, then commit and
    /// publish it.
    fn mutate(&self, f: impl FnOnce(&mut Vec<CartLine>)) -> Result<(), StorageError> {
        let snapshot = {
            let mut lines = lock(&self.lines);
            let mut next = lines.clone();
            f(&mut next);
            self.write(&next)?;
            lines.clone_from(&next);
            next
        };
        self.changes.next(snapshot);
        Ok(())
    }

    fn write(&self, lines: &[CartLine]) -> Result<(), StorageError> {
        let json = serde_json::to_string(lines)?;
        self.storage.set_item(CART_STORAGE_KEY, &json).inspect_err(|e| {
            warn!(error = %e, "Failed to persist cart");
        })
    }
}

/// Read the saved cart, falling back to empty on any failure.
///
/// Lines are merged on load so a hand-edited record with repeated keys still
/// yields unique keys.
fn rehydrate(storage: &dyn SessionStorage) -> Vec<CartLine> {
    let raw = match storage.get_item(CART_STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(error = %e, "Failed to read saved cart, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<CartLine>>(&raw) {
        Ok(saved) => {
            let mut lines = Vec::with_capacity(saved.len());
            for line in saved {
                merge_line(&mut lines, line);
            }
            lines
        }
        Err(e) => {
            warn!(error = %e, "Saved cart is corrupt, starting empty");
            Vec::new()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::storage::MemoryStorage;

    /// Storage whose writes always fail.
    struct ReadOnlyStorage(MemoryStorage);

    impl SessionStorage for ReadOnlyStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.get_item(key)
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }

        fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    fn item(id: &str, variant: &str, price: u64, quantity: i64) -> AddItem {
        AddItem {
            id: ProductId::parse(id).unwrap(),
            name: format!("Product {id}"),
            brand: "Aromanza".to_string(),
            price: Price::from_units(price),
            quantity,
            variant: variant.to_string(),
        }
    }

    fn key(id: &str, variant: &str) -> (ProductId, VariantLabel) {
        (
            ProductId::parse(id).unwrap(),
            VariantLabel::parse(variant).unwrap(),
        )
    }

    fn store() -> (CartStore, MemoryStorage) {
        let storage = MemoryStorage::new();
        (CartStore::new(Arc::new(storage.clone())), storage)
    }

    #[test]
    fn test_same_key_merges_quantity() {
        let (cart, _) = store();
        cart.add_item(item("p1", "Lavanda", 100, 1)).unwrap();
        cart.add_item(item("p1", "Lavanda", 100, 2)).unwrap();

        let items = cart.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity.get(), 3);
    }

    #[test]
    fn test_merge_keeps_original_fields() {
        let (cart, _) = store();
        cart.add_item(item("p1", "Lavanda", 100, 1)).unwrap();

        let mut changed = item("p1", "Lavanda", 999, 1);
        changed.name = "Renamed".to_string();
        cart.add_item(changed).unwrap();

        let items = cart.items();
        assert_eq!(items[0].name, "Product p1");
        assert_eq!(items[0].price, Price::from_units(100));
        assert_eq!(cart.total(), Decimal::from(200));
    }

    #[test]
    fn test_different_variants_are_distinct() {
        let (cart, _) = store();
        cart.add_item(item("p1", "Lavender", 100, 1)).unwrap();
        cart.add_item(item("p1", "Vanilla", 100, 1)).unwrap();
        assert_eq!(cart.items().len(), 2);
    }

    #[test]
    fn test_remove_is_exact_match() {
        let (cart, _) = store();
        cart.add_item(item("p1", "Lavender", 100, 1)).unwrap();
        cart.add_item(item("p1", "Vanilla", 100, 1)).unwrap();

        let (id, lavender) = key("p1", "Lavender");
        cart.remove_item(&id, &lavender).unwrap();

        let items = cart.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].variant.as_str(), "Vanilla");

        let before = cart.items();
        let (missing, variant) = key("p9", "Vanilla");
        cart.remove_item(&missing, &variant).unwrap();
        assert_eq!(cart.items(), before);
    }

    #[test]
    fn test_invalid_input_is_a_noop() {
        let (cart, storage) = store();

        let err = cart.add_item(item("p1", "Lavanda", 100, 0)).unwrap_err();
        assert!(matches!(
            err,
            CartError::InvalidLine(CartLineError::NonPositiveQuantity(0))
        ));

        let err = cart.add_item(item("p1", "   ", 100, 1)).unwrap_err();
        assert!(matches!(
            err,
            CartError::InvalidLine(CartLineError::EmptyVariantLabel)
        ));

        assert!(cart.is_empty());
        assert!(storage.get_item(CART_STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_items_is_a_defensive_copy() {
        let (cart, _) = store();
        cart.add_item(item("p1", "Lavanda", 100, 1)).unwrap();

        let mut copy = cart.items();
        copy.clear();
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_every_mutation_is_persisted() {
        let (cart, storage) = store();
        cart.add_item(item("p1", "Lavanda", 100, 2)).unwrap();

        let saved: Vec<CartLine> =
            serde_json::from_str(&storage.get_item(CART_STORAGE_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(saved, cart.items());

        let (id, variant) = key("p1", "Lavanda");
        cart.remove_item(&id, &variant).unwrap();
        assert_eq!(
            storage.get_item(CART_STORAGE_KEY).unwrap().as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn test_rehydrates_saved_cart() {
        let (cart, storage) = store();
        cart.add_item(item("p1", "Lavanda", 150, 2)).unwrap();
        cart.add_item(item("p2", "Coco", 80, 1)).unwrap();

        let restarted = CartStore::new(Arc::new(storage));
        assert_eq!(restarted.items(), cart.items());
        assert_eq!(restarted.total(), Decimal::from(380));
    }

    #[test]
    fn test_corrupt_storage_starts_empty() {
        let storage = MemoryStorage::new();
        storage.set_item(CART_STORAGE_KEY, "{not json").unwrap();
        let cart = CartStore::new(Arc::new(storage.clone()));
        assert!(cart.is_empty());

        storage
            .set_item(
                CART_STORAGE_KEY,
                r#"[{"id":"p1","name":"x","price":1,"quantity":0,"aroma":"A","brand":""}]"#,
            )
            .unwrap();
        assert!(CartStore::new(Arc::new(storage)).is_empty());
    }

    #[test]
    fn test_rehydrate_merges_duplicate_keys() {
        let storage = MemoryStorage::new();
        storage
            .set_item(
                CART_STORAGE_KEY,
                r#"[
                    {"id":"p1","name":"x","price":10,"quantity":1,"aroma":"A","brand":"b"},
                    {"id":"p1","name":"x","price":10,"quantity":4,"aroma":"A","brand":"b"}
                ]"#,
            )
            .unwrap();

        let cart = CartStore::new(Arc::new(storage));
        let items = cart.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity.get(), 5);
    }

    #[test]
    fn test_failed_write_leaves_cart_unchanged() {
        let (cart, storage) = store();
        cart.add_item(item("p1", "Lavanda", 100, 1)).unwrap();

        let read_only = CartStore::new(Arc::new(ReadOnlyStorage(storage)));
        let err = read_only.add_item(item("p2", "Coco", 50, 1)).unwrap_err();
        assert!(matches!(err, CartError::Storage(_)));
        assert_eq!(read_only.items(), cart.items());
    }

    #[test]
    fn test_clear_publishes_but_does_not_persist() {
        let (cart, storage) = store();
        cart.add_item(item("p1", "Lavanda", 100, 1)).unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = cart.subscribe(move |lines| sink.lock().unwrap().push(lines.len()));

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(*seen.lock().unwrap(), vec![1, 0]);
        assert_ne!(
            storage.get_item(CART_STORAGE_KEY).unwrap().as_deref(),
            Some("[]")
        );

        cart.persist().unwrap();
        assert_eq!(
            storage.get_item(CART_STORAGE_KEY).unwrap().as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn test_subscribers_see_ordered_full_list() {
        let (cart, _) = store();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = cart.subscribe(move |lines| {
            let ids: Vec<String> = lines
                .iter()
                .map(|l| format!("{}:{}", l.id, l.variant))
                .collect();
            sink.lock().unwrap().push(ids);
        });

        cart.add_item(item("p2", "Coco", 1, 1)).unwrap();
        cart.add_item(item("p1", "Lavanda", 1, 1)).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[2], vec!["p2:Coco", "p1:Lavanda"]);
    }

    #[test]
    fn test_open_flag_is_independent_of_lines() {
        let (cart, _) = store();
        cart.add_item(item("p1", "Lavanda", 100, 1)).unwrap();
        let before = cart.items();

        assert!(!cart.is_open());
        cart.toggle();
        assert!(cart.is_open());
        cart.toggle();
        assert!(!cart.is_open());
        cart.open();
        cart.close();
        assert!(!cart.is_open());

        assert_eq!(cart.items(), before);
    }

    #[test]
    fn test_open_flag_subscribers() {
        let (cart, _) = store();
        cart.add_item(item("p1", "Lavanda", 100, 1)).unwrap();
        let before = cart.items();

        let flags = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&flags);
        let _open_sub = cart.subscribe_open(move |open| sink.lock().unwrap().push(*open));

        let line_updates = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&line_updates);
        let _lines_sub = cart.subscribe(move |_| *counter.lock().unwrap() += 1);

        cart.toggle();
        cart.toggle();
        cart.open();

        assert_eq!(*flags.lock().unwrap(), vec![false, true, false, true]);
        // Only the immediate delivery on subscribe.
        assert_eq!(*line_updates.lock().unwrap(), 1);
        assert_eq!(cart.items(), before);
    }

    #[test]
    fn test_item_count() {
        let (cart, _) = store();
        cart.add_item(item("p1", "A", 1, 2)).unwrap();
        cart.add_item(item("p2", "B", 1, 3)).unwrap();
        assert_eq!(cart.item_count(), 5);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add {
            id: u8,
            variant: u8,
            price: u32,
            qty: i64,
        },
        Remove {
            id: u8,
            variant: u8,
        },
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..4, 0u8..3, 0u32..10_000, -1i64..5).prop_map(|(id, variant, price, qty)| {
                Op::Add {
                    id,
                    variant,
                    price,
                    qty,
                }
            }),
            (0u8..4, 0u8..3).prop_map(|(id, variant)| Op::Remove { id, variant }),
        ]
    }

    proptest! {
        #[test]
        fn prop_total_matches_recomputation(ops in proptest::collection::vec(op(), 0..40)) {
            let (cart, _) = store();
            for op in ops {
                match op {
                    Op::Add { id, variant, price, qty } => {
                        let _ = cart.add_item(item(
                            &format!("p{id}"),
                            &format!("v{variant}"),
                            u64::from(price),
                            qty,
                        ));
                    }
                    Op::Remove { id, variant } => {
                        let (id, variant) = key(&format!("p{id}"), &format!("v{variant}"));
                        cart.remove_item(&id, &variant).unwrap();
                    }
                }

                let items = cart.items();
                let expected: Decimal = items
                    .iter()
                    .map(|l| l.price.amount() * Decimal::from(l.quantity.get()))
                    .sum();
                prop_assert_eq!(cart.total(), expected);

                for (i, a) in items.iter().enumerate() {
                    for b in items.iter().skip(i + 1) {
                        prop_assert!(!(a.id == b.id && a.variant == b.variant));
                    }
                }
            }
        }
    }
}
