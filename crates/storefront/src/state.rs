//! Application state shared across the session.

use std::sync::Arc;

use tracing::info;

use crate::cart::CartStore;
use crate::catalog::HttpCatalogSource;
use crate::config::StorefrontConfig;
use crate::search::SearchBroadcaster;
use crate::storage::{FileStorage, SessionStorage, StorageError};

/// Application state for one shopping session.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// cart, the canonical search term and the catalog client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    cart: CartStore,
    search: SearchBroadcaster,
    catalog: HttpCatalogSource,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .field("catalog", &self.inner.catalog)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create application state with file-backed session storage under
    /// `config.session_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the session directory cannot be created.
    pub fn new(config: StorefrontConfig) -> Result<Self, StorageError> {
        let storage = FileStorage::open(&config.session_dir)?;
        info!(dir = %config.session_dir.display(), "Session storage opened");
        Ok(Self::with_storage(config, Arc::new(storage)))
    }

    /// Create application state over an arbitrary storage backend.
    #[must_use]
    pub fn with_storage(config: StorefrontConfig, storage: Arc<dyn SessionStorage>) -> Self {
        let catalog = HttpCatalogSource::new(&config.catalog);
        let cart = CartStore::new(storage);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                cart,
                search: SearchBroadcaster::new(),
                catalog,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Get a reference to the canonical search term holder.
    #[must_use]
    pub fn search(&self) -> &SearchBroadcaster {
        &self.inner.search
    }

    /// Get a reference to the catalog API client.
    #[must_use]
    pub fn catalog(&self) -> &HttpCatalogSource {
        &self.inner.catalog
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pricelist_core::{Price, ProductId};

    use super::*;
    use crate::cart::AddItem;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_clones_share_cart() {
        let state = AppState::with_storage(
            StorefrontConfig::default(),
            Arc::new(MemoryStorage::new()),
        );
        let other = state.clone();

        state
            .cart()
            .add_item(AddItem {
                id: ProductId::parse("1").unwrap(),
                name: "Vela".to_string(),
                brand: String::new(),
                price: Price::from_units(10),
                quantity: 1,
                variant: "Coco".to_string(),
            })
            .unwrap();

        assert_eq!(other.cart().item_count(), 1);
        other.search().update_search_term("vela");
        assert_eq!(state.search().current_term(), "vela");
    }

    #[test]
    fn test_file_backed_state_rehydrates() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorefrontConfig {
            session_dir: dir.path().join("session"),
            ..StorefrontConfig::default()
        };

        let state = AppState::new(config.clone()).unwrap();
        state
            .cart()
            .add_item(AddItem {
                id: ProductId::parse("7").unwrap(),
                name: "Difusor".to_string(),
                brand: "Aromanza".to_string(),
                price: Price::from_units(1500),
                quantity: 2,
                variant: "Lavanda".to_string(),
            })
            .unwrap();

        let restarted = AppState::new(config).unwrap();
        assert_eq!(restarted.cart().items(), state.cart().items());
    }
}
