//! Unified error handling.
//!
//! Provides a unified `AppError` type wrapping every module's error so the
//! binary can propagate with `?` and report once at the top.

use thiserror::Error;

use crate::cart::CartError;
use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog could not be fetched or decoded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Cart operation rejected or not persisted.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Session storage could not be opened.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Terminal or other local I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use pricelist_core::CartLineError;

    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product 123".to_string());
        assert_eq!(err.to_string(), "Not found: product 123");

        let err = AppError::from(CartError::NoProductSelected);
        assert_eq!(err.to_string(), "Cart error: no product selected");
    }

    #[test]
    fn test_app_error_conversions() {
        assert!(matches!(
            AppError::from(CatalogError::Status(503)),
            AppError::Catalog(CatalogError::Status(503))
        ));
        assert!(matches!(
            AppError::from(CartError::InvalidLine(CartLineError::EmptyVariantLabel)),
            AppError::Cart(CartError::InvalidLine(CartLineError::EmptyVariantLabel))
        ));
        assert!(matches!(
            AppError::from(StorageError::InvalidKey("x y".to_string())),
            AppError::Storage(StorageError::InvalidKey(_))
        ));
    }
}
