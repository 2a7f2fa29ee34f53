//! Add-to-cart form state.
//!
//! Holds the product being added, the requested quantity and the scent label
//! typed so far, plus the suggestion list derived from the product
//! description. Submitting hands a validated request to the [`CartStore`] and
//! resets the form.

use pricelist_core::{CartLineError, Product};
use tracing::debug;

use crate::aroma::{filter_suggestions, suggest_aromas};
use crate::cart::{AddItem, CartError, CartStore};

/// Form state for adding one product to the cart.
#[derive(Debug, Clone)]
pub struct AddToCartForm {
    selected: Option<Product>,
    quantity: i64,
    variant: String,
    suggestions: Vec<String>,
    filtered: Vec<String>,
}

impl Default for AddToCartForm {
    fn default() -> Self {
        Self {
            selected: None,
            quantity: 1,
            variant: String::new(),
            suggestions: Vec::new(),
            filtered: Vec::new(),
        }
    }
}

impl AddToCartForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new selection for `product`: quantity 1, no label, suggestions
    /// mined from its description.
    pub fn select_product(&mut self, product: Product) {
        let suggestions = suggest_aromas(&product.description);
        debug!(product_id = %product.id, suggestions = suggestions.len(), "Product selected");

        self.selected = Some(product);
        self.quantity = 1;
        self.variant.clear();
        self.filtered.clone_from(&suggestions);
        self.suggestions = suggestions;
    }

    /// The product being added.
    #[must_use]
    pub const fn selected(&self) -> Option<&Product> {
        self.selected.as_ref()
    }

    #[must_use]
    pub const fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Set the requested quantity. Validation happens on submit.
    pub const fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity;
    }

    /// The label typed so far.
    #[must_use]
    pub fn variant(&self) -> &str {
        &self.variant
    }

    /// Every suggestion for the selected product.
    #[must_use]
    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// Suggestions matching the label typed so far.
    #[must_use]
    pub fn filtered_suggestions(&self) -> &[String] {
        &self.filtered
    }

    /// Record typed text and narrow the suggestions to those containing it.
    pub fn on_variant_input(&mut self, text: &str) {
        self.variant = text.to_string();
        self.filtered = filter_suggestions(&self.suggestions, text);
    }

    /// Take `suggestion` as the label.
    pub fn select_suggestion(&mut self, suggestion: &str) {
        self.variant = suggestion.to_string();
        self.filtered.clear();
    }

    /// Whether the label is non-blank.
    #[must_use]
    pub fn is_variant_valid(&self) -> bool {
        !self.variant.trim().is_empty()
    }

    /// Submit the form to `cart`. On success the form is reset.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NoProductSelected`] with no selection,
    /// [`CartError::InvalidLine`] for a blank label or non-positive quantity,
    /// and [`CartError::Storage`] if the cart cannot be persisted. The form is
    /// left as it was on error.
    pub fn submit(&mut self, cart: &CartStore) -> Result<(), CartError> {
        let product = self.selected.as_ref().ok_or(CartError::NoProductSelected)?;
        if !self.is_variant_valid() {
            return Err(CartError::InvalidLine(CartLineError::EmptyVariantLabel));
        }

        cart.add_item(AddItem::for_product(product, self.quantity, self.variant.trim()))?;
        self.reset();
        Ok(())
    }

    /// Clear the selection.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
