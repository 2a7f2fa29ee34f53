//! Core types for Pricelist.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart_line;
pub mod id;
pub mod price;
pub mod product;

pub use cart_line::{CartLine, CartLineError, Quantity, VariantLabel};
pub use id::{ProductId, ProductIdError};
pub use price::{Price, PriceError};
pub use product::Product;
