//! Cart line types.
//!
//! A [`CartLine`] is keyed by `(product id, variant label)`: the same product
//! in two scents is two lines, the same product in the same scent is one line
//! with a summed quantity. Both halves of the key and the quantity are
//! validated newtypes, so an invalid line cannot be constructed or decoded.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Price, Product, ProductId};

/// Errors that can occur when building a cart line.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartLineError {
    /// Quantity must be at least 1.
    #[error("quantity must be at least 1 (got {0})")]
    NonPositiveQuantity(i64),
    /// Quantity does not fit the supported range.
    #[error("quantity {0} is too large")]
    QuantityTooLarge(i64),
    /// The variant label is empty or whitespace.
    #[error("variant label cannot be empty")]
    EmptyVariantLabel,
}

/// User-chosen variant descriptor, such as a scent.
///
/// Surrounding whitespace is trimmed; the label must not be empty afterwards.
///
/// ```
/// use pricelist_core::VariantLabel;
///
/// assert_eq!(VariantLabel::parse(" Lavanda ").unwrap().as_str(), "Lavanda");
/// assert!(VariantLabel::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VariantLabel(String);

impl VariantLabel {
    /// Parse a variant label.
    ///
    /// # Errors
    ///
    /// Returns [`CartLineError::EmptyVariantLabel`] for blank input.
    pub fn parse(s: &str) -> Result<Self, CartLineError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CartLineError::EmptyVariantLabel);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariantLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for VariantLabel {
    type Error = CartLineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<VariantLabel> for String {
    fn from(label: VariantLabel) -> Self {
        label.0
    }
}

impl AsRef<str> for VariantLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A line quantity, always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    /// A quantity of one.
    pub const ONE: Self = Self(1);

    /// Create a quantity from a caller-supplied count.
    ///
    /// # Errors
    ///
    /// Returns [`CartLineError::NonPositiveQuantity`] for zero or negative
    /// counts and [`CartLineError::QuantityTooLarge`] above `u32::MAX`.
    pub fn new(count: i64) -> Result<Self, CartLineError> {
        if count < 1 {
            return Err(CartLineError::NonPositiveQuantity(count));
        }
        u32::try_from(count)
            .map(Self)
            .map_err(|_| CartLineError::QuantityTooLarge(count))
    }

    /// The count.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Sum of two quantities, saturating at `u32::MAX`.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Quantity {
    type Error = CartLineError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

/// One orderable entry in the cart.
///
/// Field order matches the persisted cart record: `id`, `name`, `price`,
/// `quantity`, `aroma`, `brand`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product identifier (first half of the line key).
    pub id: ProductId,
    /// Product name at the time the line was created.
    pub name: String,
    /// Unit price at the time the line was created.
    pub price: Price,
    /// Number of units.
    pub quantity: Quantity,
    /// Variant label (second half of the line key).
    #[serde(rename = "aroma")]
    pub variant: VariantLabel,
    /// Product brand.
    #[serde(default)]
    pub brand: String,
}

impl CartLine {
    /// Build a line for `product` with the given quantity and variant.
    #[must_use]
    pub fn for_product(product: &Product, quantity: Quantity, variant: VariantLabel) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            quantity,
            variant,
            brand: product.brand.clone(),
        }
    }

    /// Whether this line has the key `(id, variant)`.
    #[must_use]
    pub fn has_key(&self, id: &ProductId, variant: &VariantLabel) -> bool {
        self.id == *id && self.variant == *variant
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.price.amount() * Decimal::from(self.quantity.get())
    }
}
