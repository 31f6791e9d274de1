//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::{Catalog, CatalogError};
use crate::config::StorefrontConfig;
use crate::services::CartService;
use crate::store::CartStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the catalog, the cart service and configuration.
#[derive(Clone, Debug)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Debug)]
struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    carts: CartService,
}

impl AppState {
    /// Create application state with the default in-memory cart store.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog) -> Self {
        Self::with_carts(config, catalog, CartService::default())
    }

    /// Create application state with carts kept in `store`.
    #[must_use]
    pub fn with_store(
        config: StorefrontConfig,
        catalog: Catalog,
        store: Arc<dyn CartStore>,
    ) -> Self {
        Self::with_carts(config, catalog, CartService::new(store))
    }

    fn with_carts(config: StorefrontConfig, catalog: Catalog, carts: CartService) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                carts,
            }),
        }
    }

    /// Load the catalog named by the configuration and build the state.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, CatalogError> {
        let catalog = Catalog::load(config.catalog_path.as_deref())?;
        Ok(Self::new(config, catalog))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the book catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the cart service.
    #[must_use]
    pub fn carts(&self) -> &CartService {
        &self.inner.carts
    }
}
