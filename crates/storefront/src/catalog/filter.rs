//! Catalog filtering.
//!
//! [`filter_products`] is a pure function of `(catalog, term)`. Matching is a
//! case- and accent-insensitive substring test against name, brand,
//! description and the decimal string of the price; any field matching is
//! enough. Result order is catalog order.
//!
//! [`CatalogView`] keeps the full catalog (fetched once) and the last
//! filtered result, re-filtering whenever the canonical search term changes.

use std::sync::{Arc, Mutex, PoisonError};

use pricelist_core::Product;
use tracing::debug;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::reactive::{Subject, Subscription};
use crate::search::SearchBroadcaster;

/// Fold text for matching: decompose, drop combining marks, lowercase.
///
/// `"Jazmín"` and `"JAZMIN"` both fold to `"jazmin"`.
#[must_use]
pub fn fold(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn matches(product: &Product, folded_term: &str) -> bool {
    fold(&product.name).contains(folded_term)
        || fold(&product.brand).contains(folded_term)
        || fold(&product.description).contains(folded_term)
        || product.price.to_string().contains(folded_term)
}

/// Products visible for `term`.
///
/// An empty or whitespace-only term returns the whole catalog.
#[must_use]
pub fn filter_products(products: &[Product], term: &str) -> Vec<Product> {
    let term = term.trim();
    if term.is_empty() {
        return products.to_vec();
    }

    let folded = fold(term);
    products
        .iter()
        .filter(|product| matches(product, &folded))
        .cloned()
        .collect()
}

struct ViewState {
    term: String,
}

/// Filtered view over a catalog, driven by the canonical search term.
pub struct CatalogView {
    catalog: Arc<[Product]>,
    visible: Subject<Vec<Product>>,
    state: Arc<Mutex<ViewState>>,
    _subscription: Subscription,
}

impl std::fmt::Debug for CatalogView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogView")
            .field("catalog", &self.catalog.len())
            .field("visible", &self.visible.get().len())
            .field("term", &self.term())
            .finish()
    }
}

impl CatalogView {
    /// Cache `catalog` and start following `broadcaster`.
    ///
    /// The view is filtered immediately with the broadcaster's current term.
    #[must_use]
    pub fn attach(catalog: Vec<Product>, broadcaster: &SearchBroadcaster) -> Self {
        let catalog: Arc<[Product]> = catalog.into();
        let visible = Subject::new(catalog.to_vec());
        let state = Arc::new(Mutex::new(ViewState {
            term: String::new(),
        }));

        let subscription = {
            let catalog = Arc::clone(&catalog);
            let visible = visible.clone();
            let state = Arc::clone(&state);
            broadcaster.subscribe(move |term: &String| {
                state
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .term
                    .clone_from(term);
                let result = filter_products(&catalog, term);
                debug!(term = %term, visible = result.len(), "Catalog re-filtered");
                visible.next(result);
            })
        };

        Self {
            catalog,
            visible,
            state,
            _subscription: subscription,
        }
    }

    /// The full catalog.
    #[must_use]
    pub fn catalog(&self) -> &[Product] {
        &self.catalog
    }

    /// The last filtered result.
    #[must_use]
    pub fn visible(&self) -> Vec<Product> {
        self.visible.get()
    }

    /// The term that produced [`CatalogView::visible`].
    #[must_use]
    pub fn term(&self) -> String {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .term
            .clone()
    }

    /// Subscribe to visible-list changes.
    pub fn subscribe(&self, callback: impl Fn(&Vec<Product>) + Send + Sync + 'static) -> Subscription {
        self.visible.subscribe(callback)
    }

    /// Find a catalog product by identifier.
    #[must_use]
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.catalog.iter().find(|p| p.id.as_str() == id)
    }
}
